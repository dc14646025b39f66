//! Ledger representation.

use crate::account::{Account, ChartOfAccounts};
use crate::journal::Journal;
use crate::transaction::Transaction;

/// A chart of accounts paired with the journal that uses it, as produced by
/// one successful read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    accounts: ChartOfAccounts,
    journal: Journal,
}

impl Ledger {
    pub fn new() -> Ledger {
        Default::default()
    }

    pub fn from_parts(accounts: ChartOfAccounts, journal: Journal) -> Ledger {
        Ledger { accounts, journal }
    }

    pub fn into_parts(self) -> (ChartOfAccounts, Journal) {
        (self.accounts, self.journal)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut ChartOfAccounts, &mut Journal) {
        (&mut self.accounts, &mut self.journal)
    }

    pub fn accounts(&self) -> &ChartOfAccounts {
        &self.accounts
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.journal.transactions()
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }
}
