use indexmap::IndexSet;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{Error, Result};

/// A ledger account, identified by its colon separated name, e.g. `Assets:Cash`.
///
/// Two accounts with the same name are the same account. Cloning is cheap, the
/// name is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Account {
    name: Arc<str>,
}

impl Account {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the name, `Food` for `Expenses:Restaurant:Food`.
    pub fn short_name(&self) -> &str {
        match self.name.rfind(':') {
            Some(idx) => &self.name[idx + 1..],
            None => self.name(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split(':')
    }

    /// Whether the full name contains `fragment`, so `Cash` matches `Assets:Cash`.
    pub fn matches(&self, fragment: &str) -> bool {
        self.name.contains(fragment)
    }

    fn is_valid_name(s: &str) -> bool {
        !s.is_empty()
            && s.trim() == s
            && !s.contains("  ")
            && !s.contains('\t')
            && !s.contains('\n')
            && !s.contains('\r')
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Borrow<str> for Account {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl TryFrom<&str> for Account {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        if !Account::is_valid_name(s) {
            return Err(Error::InvalidAccount(s.to_string()));
        }

        Ok(Account { name: s.into() })
    }
}

impl FromStr for Account {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.try_into()
    }
}

/// Registry of every distinct account seen while building a ledger.
///
/// Accounts keep their registration order. There is no way to remove one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartOfAccounts {
    accounts: IndexSet<Account>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert `account`, returns `false` when it was already registered.
    pub fn add(&mut self, account: Account) -> bool {
        self.accounts.insert(account)
    }

    /// Look up `name`, registering it first if needed.
    ///
    /// The returned account shares its name with the registered one.
    pub fn register(&mut self, name: &str) -> Result<Account> {
        if let Some(account) = self.get(name) {
            return Ok(account.clone());
        }

        let account = Account::try_from(name)?;
        self.accounts.insert(account.clone());
        Ok(account)
    }

    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.accounts.contains(account)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

impl<'a> IntoIterator for &'a ChartOfAccounts {
    type Item = &'a Account;
    type IntoIter = indexmap::set::Iter<'a, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}
