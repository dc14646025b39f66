//! Journal serialization back to the plain-text format.

use crate::amount::Amount;
use crate::journal::Journal;
use crate::settings::{AmountStyle, Settings};
use crate::transaction::{Entry, Transaction};
use crate::{Result, DATE_FORMAT};

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Columns between the account name and the amount never shrink below this.
const MIN_GAP: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct Writer {
    settings: Settings,
}

impl Writer {
    pub fn new(settings: Settings) -> Writer {
        Writer { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Render every transaction of `journal` in order, separated by one blank
    /// line. There is no blank line after the last transaction.
    ///
    /// Amounts with a fractional part are written with two decimals, rounded
    /// half away from zero, so `0.125` is written as `0.13`. Reading the text
    /// back gives the journal unchanged only when every amount has at most
    /// two decimals.
    pub fn write(&self, journal: &Journal) -> String {
        let mut out = String::new();

        for (idx, transaction) in journal.transactions().iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&self.build_header(transaction));
            out.push('\n');
            for entry in transaction.entries() {
                out.push_str(&self.build_entry(entry));
                out.push('\n');
            }
        }

        out
    }

    pub fn write_into<W: io::Write>(&self, journal: &Journal, out: &mut W) -> Result<()> {
        out.write_all(self.write(journal).as_bytes())?;
        Ok(())
    }

    /// Write `journal` to `path`, replacing whatever the file held before.
    pub fn write_file(&self, journal: &Journal, path: &Path) -> Result<()> {
        let text = self.write(journal);
        debug!(
            path = %path.display(),
            transactions = journal.len(),
            bytes = text.len(),
            "writing journal file"
        );
        fs::write(path, text)?;
        Ok(())
    }

    pub(crate) fn build_header(&self, transaction: &Transaction) -> String {
        let mut header = transaction.date().format(DATE_FORMAT).to_string();
        if let Some(symbol) = self.settings.writer_symbols.symbol_of(transaction.state()) {
            header.push(' ');
            header.push(symbol);
        }
        header.push(' ');
        header.push_str(transaction.payee());
        header
    }

    pub(crate) fn build_entry(&self, entry: &Entry) -> String {
        let name = entry.account.name();
        let mut line = format!("    {}", name);

        if let Some(amount) = &entry.amount {
            let amount = self.format_amount(amount);
            let gap = (self
                .settings
                .account_width
                .saturating_sub(name.chars().count())
                + self
                    .settings
                    .amount_width
                    .saturating_sub(amount.chars().count()))
            .max(MIN_GAP);

            line.push_str(&" ".repeat(gap));
            line.push_str(&amount);
        }

        line
    }

    fn format_amount(&self, amount: &Amount) -> String {
        match self.settings.amount_style {
            AmountStyle::Plain => amount.to_string(),
            AmountStyle::Localized => self.settings.locale.format_amount(amount),
        }
    }
}
