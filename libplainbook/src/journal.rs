use crate::amount::{checked_sum, Amount};
use crate::parse_date;
use crate::report::{BalanceReport, TransactionReport};
use crate::transaction::{Entry, Transaction};
use crate::{Error, Result};

use chrono::NaiveDate;

/// Entry selection by payee, date, account and amount.
///
/// Payee and date select whole transactions; every entry of a selected
/// transaction is then checked against the account (name containment) and
/// amount (equality) predicates. Unset predicates match everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryFilter<'f> {
    payee: Option<&'f str>,
    date: Option<NaiveDate>,
    account: Option<&'f str>,
    amount: Option<&'f Amount>,
}

impl<'f> EntryFilter<'f> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn payee(mut self, payee: &'f str) -> Self {
        self.payee = Some(payee);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Same as [`EntryFilter::on`] with a `yyyy/mm/dd` date.
    pub fn date(self, date: &str) -> Result<Self> {
        Ok(self.on(parse_date(date)?))
    }

    pub fn account(mut self, account: &'f str) -> Self {
        self.account = Some(account);
        self
    }

    pub fn amount(mut self, amount: &'f Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn admits_transaction(&self, transaction: &Transaction) -> bool {
        self.payee.map_or(true, |payee| transaction.has_payee(payee))
            && self.date.map_or(true, |date| transaction.date() == date)
    }

    pub fn admits_entry(&self, entry: &Entry) -> bool {
        self.account
            .map_or(true, |account| entry.account.matches(account))
            && self
                .amount
                .map_or(true, |amount| entry.amount.as_ref() == Some(amount))
    }
}

macro_rules! entry_queries {
    ($($name:ident($($arg:ident: $ty:ty),+) => $filter:expr;)*) => {
        camelpaste::paste! {
            $(
                pub fn [<entries_by_ $name>](&self, $($arg: $ty),+) -> Vec<&Entry> {
                    self.entries_matching(&$filter)
                }
            )*
        }
    };
}

macro_rules! dated_entry_queries {
    ($($name:ident($($arg:ident: $ty:ty),+) => $filter:expr;)*) => {
        camelpaste::paste! {
            $(
                pub fn [<entries_by_ $name>](&self, $($arg: $ty),+) -> Result<Vec<&Entry>> {
                    Ok(self.entries_matching(&$filter))
                }
            )*
        }
    };
}

/// Transactions in the order they were added, and the queries over them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Journal {
    transactions: Vec<Transaction>,
    currency: Option<String>,
}

impl Journal {
    pub fn new() -> Journal {
        Default::default()
    }

    /// Journal whose balances are reported in `currency`.
    pub fn with_currency(currency: Option<&str>) -> Journal {
        Journal {
            transactions: Vec::new(),
            currency: currency.map(str::to_string),
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest and latest transaction dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.iter().map(Transaction::date).min()?;
        let last = self.transactions.iter().map(Transaction::date).max()?;
        Some((first, last))
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.transactions
            .iter()
            .flat_map(|transaction| transaction.entries().iter())
    }

    fn total<'a>(&self, account: &str, entries: impl Iterator<Item = &'a Entry>) -> Result<Amount> {
        let sum = checked_sum(entries.map(Entry::number))
            .ok_or_else(|| Error::Overflow(format!("account `{}'", account)))?;
        Ok(Amount::new(sum, self.currency.clone()))
    }

    /// Sum of every entry whose account name contains `account`. Fails with
    /// [`Error::Overflow`] when the sum cannot be represented.
    pub fn balance(&self, account: &str) -> Result<Amount> {
        self.total(
            account,
            self.entries().filter(|entry| entry.account.matches(account)),
        )
    }

    /// [`Journal::balance`] restricted to transactions dated `start..=end`,
    /// both `yyyy/mm/dd`.
    pub fn balance_between(&self, account: &str, start: &str, end: &str) -> Result<Amount> {
        self.balance_within(account, parse_date(start)?, parse_date(end)?)
    }

    pub fn balance_within(&self, account: &str, start: NaiveDate, end: NaiveDate) -> Result<Amount> {
        self.total(
            account,
            self.transactions
                .iter()
                .filter(|transaction| transaction.within(start, end))
                .flat_map(|transaction| transaction.entries().iter())
                .filter(|entry| entry.account.matches(account)),
        )
    }

    /// Matching entries and their total.
    pub fn balance_report(&self, account: &str) -> Result<BalanceReport<'_>> {
        let entries = self.entries_by_account(account);
        let total = self.total(account, entries.iter().copied())?;
        Ok(BalanceReport::new(entries, total))
    }

    /// Entries admitted by `filter`, in transaction order then entry order.
    pub fn entries_matching(&self, filter: &EntryFilter) -> Vec<&Entry> {
        self.transactions
            .iter()
            .filter(|transaction| filter.admits_transaction(transaction))
            .flat_map(|transaction| transaction.entries().iter())
            .filter(|entry| filter.admits_entry(entry))
            .collect()
    }

    entry_queries! {
        payee(payee: &str) => EntryFilter::new().payee(payee);
        account(account: &str) => EntryFilter::new().account(account);
        amount(amount: &Amount) => EntryFilter::new().amount(amount);
        payee_and_account(payee: &str, account: &str) =>
            EntryFilter::new().payee(payee).account(account);
        payee_and_amount(payee: &str, amount: &Amount) =>
            EntryFilter::new().payee(payee).amount(amount);
        account_and_amount(account: &str, amount: &Amount) =>
            EntryFilter::new().account(account).amount(amount);
        payee_account_amount(payee: &str, account: &str, amount: &Amount) =>
            EntryFilter::new().payee(payee).account(account).amount(amount);
    }

    dated_entry_queries! {
        date(date: &str) => EntryFilter::new().date(date)?;
        payee_and_date(payee: &str, date: &str) =>
            EntryFilter::new().payee(payee).date(date)?;
        account_and_date(account: &str, date: &str) =>
            EntryFilter::new().account(account).date(date)?;
        amount_and_date(amount: &Amount, date: &str) =>
            EntryFilter::new().amount(amount).date(date)?;
        payee_account_date(payee: &str, account: &str, date: &str) =>
            EntryFilter::new().payee(payee).account(account).date(date)?;
        payee_date_amount(payee: &str, date: &str, amount: &Amount) =>
            EntryFilter::new().payee(payee).date(date)?.amount(amount);
        account_date_amount(account: &str, date: &str, amount: &Amount) =>
            EntryFilter::new().account(account).date(date)?.amount(amount);
    }

    /// Each journal position is visited once, so a transaction shows up at
    /// most once and identical transactions stay distinct.
    fn transactions_where<P>(&self, predicate: P) -> Vec<&Transaction>
    where
        P: Fn(&Transaction) -> bool,
    {
        self.transactions
            .iter()
            .filter(|transaction| predicate(transaction))
            .collect()
    }

    /// Transactions with an entry whose account name contains `account`.
    pub fn transactions_by_account(&self, account: &str) -> Vec<&Transaction> {
        self.transactions_where(|transaction| transaction.posts_to(account))
    }

    /// Transactions posting to any of `accounts`, in journal order.
    pub fn transactions_by_accounts(&self, accounts: &[&str]) -> Vec<&Transaction> {
        self.transactions_where(|transaction| {
            accounts.iter().any(|account| transaction.posts_to(account))
        })
    }

    pub fn transactions_by_payee(&self, payee: &str) -> Vec<&Transaction> {
        self.transactions_where(|transaction| transaction.has_payee(payee))
    }

    /// Transactions dated `start..=end`, both `yyyy/mm/dd`.
    pub fn transactions_between(&self, start: &str, end: &str) -> Result<Vec<&Transaction>> {
        let (start, end) = (parse_date(start)?, parse_date(end)?);
        Ok(self.transactions_where(|transaction| transaction.within(start, end)))
    }

    /// Per transaction, each entry with the running balance inside that
    /// transaction.
    pub fn transaction_report<'a, I>(&self, transactions: I) -> Result<TransactionReport<'a>>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        TransactionReport::new(transactions)
    }
}
