use crate::block::blocks;
use crate::journal::Journal;
use crate::ledger::Ledger;
use crate::settings::Settings;
use crate::Result;

use std::fs;
use std::path::Path;

use tracing::debug;

#[derive(Parser)]
#[grammar = "journal.pest"]
pub struct JournalParser;

/// Reads the plain-text format into a [`Ledger`].
#[derive(Clone, Debug, Default)]
pub struct Reader {
    settings: Settings,
}

impl Reader {
    pub fn new(settings: Settings) -> Reader {
        Reader { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parse `input` into a fresh ledger. Any malformed block aborts the read.
    pub fn read(&self, input: &str) -> Result<Ledger> {
        let journal = Journal::with_currency(self.settings.locale.currency.as_deref());
        let mut ledger = Ledger::from_parts(Default::default(), journal);
        self.read_into(input, &mut ledger)?;
        Ok(ledger)
    }

    /// Parse `input` and append its transactions to `carried_ledger`, so
    /// several inputs can build one ledger.
    ///
    /// All or nothing: when any block is malformed the error is returned and
    /// `carried_ledger` is left exactly as it was.
    pub fn read_into(&self, input: &str, carried_ledger: &mut Ledger) -> Result<()> {
        let (accounts, journal) = carried_ledger.parts_mut();

        let mut staged_accounts = accounts.clone();
        let transactions = blocks(input)
            .iter()
            .map(|block| block.parse(&self.settings, &mut staged_accounts))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            transactions = transactions.len(),
            accounts = staged_accounts.len(),
            "read journal"
        );
        *accounts = staged_accounts;
        for transaction in transactions {
            journal.add_transaction(transaction);
        }
        Ok(())
    }

    pub fn read_file(&self, path: &Path) -> Result<Ledger> {
        let fcontent = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = fcontent.len(), "reading journal file");
        self.read(&fcontent)
    }
}

/// Parses journal text with default settings: plain amounts, `*` cleared and
/// `!` pending.
pub fn parse(input: &str) -> Result<Ledger> {
    Reader::default().read(input)
}

pub fn parse_file(path: &Path) -> Result<Ledger> {
    Reader::default().read_file(path)
}
