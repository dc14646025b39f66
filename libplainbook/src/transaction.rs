use crate::account::Account;
use crate::amount::{checked_sum, Amount};
use crate::parser::{JournalParser, Rule};
use crate::{parse_date, Error, Result};

use chrono::NaiveDate;
use pest::Parser;
use rust_decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Cleared, // '*'
    Pending, // '!' when read, '?' when written
    Unset,   // no symbol
}

/// Bidirectional mapping between header symbols and transaction states.
///
/// The reader and the writer each own one table. Their canonical tables
/// disagree on the pending symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSymbols {
    pub cleared: char,
    pub pending: char,
}

impl StatusSymbols {
    pub const READER: StatusSymbols = StatusSymbols {
        cleared: '*',
        pending: '!',
    };

    pub const WRITER: StatusSymbols = StatusSymbols {
        cleared: '*',
        pending: '?',
    };

    pub fn state_of(&self, symbol: char) -> Option<TransactionState> {
        if symbol == self.cleared {
            Some(TransactionState::Cleared)
        } else if symbol == self.pending {
            Some(TransactionState::Pending)
        } else {
            None
        }
    }

    pub fn symbol_of(&self, state: TransactionState) -> Option<char> {
        match state {
            TransactionState::Cleared => Some(self.cleared),
            TransactionState::Pending => Some(self.pending),
            TransactionState::Unset => None,
        }
    }
}

/// One account/amount line of a transaction.
///
/// `amount` is `None` when the amount expression could not be read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    pub account: Account,
    pub amount: Option<Amount>,
}

impl Entry {
    pub fn new(account: Account, amount: Amount) -> Entry {
        Entry {
            account,
            amount: Some(amount),
        }
    }

    pub fn without_amount(account: Account) -> Entry {
        Entry {
            account,
            amount: None,
        }
    }

    /// Entry amount, zero when absent.
    pub fn number(&self) -> Decimal {
        self.amount
            .as_ref()
            .map(Amount::number)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transaction {
    date: NaiveDate,
    state: TransactionState,
    payee: String,
    entries: Vec<Entry>,
}

impl Transaction {
    /// Build a transaction. At least one entry is required; entries are not
    /// required to balance.
    pub fn new(
        date: NaiveDate,
        state: TransactionState,
        payee: &str,
        entries: Vec<Entry>,
    ) -> Result<Transaction> {
        if entries.is_empty() {
            return Err(Error::EmptyTransaction(payee.to_string()));
        }

        Ok(Transaction {
            date,
            state,
            payee: payee.to_string(),
            entries,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Whether any entry's account name contains `account`.
    pub fn posts_to(&self, account: &str) -> bool {
        self.entries.iter().any(|entry| entry.account.matches(account))
    }

    pub fn has_payee(&self, payee: &str) -> bool {
        self.payee == payee
    }

    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.date && self.date <= end
    }

    /// Sum of every entry, absent amounts count as zero.
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.entries.iter().map(Entry::number))
            .ok_or_else(|| Error::Overflow(format!("transaction `{}'", self.payee)))
    }

    /// A transaction whose total overflows is not balanced.
    pub fn is_balanced(&self) -> bool {
        matches!(self.total(), Ok(total) if total.is_zero())
    }
}

/// Header line of a transaction block, as written.
#[derive(Debug, PartialEq)]
pub struct TxnHeader<'th> {
    pub(crate) date: &'th str,
    pub(crate) flag: Option<char>,
    pub(crate) payee: &'th str,
}

impl<'th> TxnHeader<'th> {
    /// Split `line` into date, optional flag and payee. `None` when the line
    /// does not have that shape.
    pub fn parse(line: &'th str) -> Option<TxnHeader<'th>> {
        let header = JournalParser::parse(Rule::header, line).ok()?.next()?;

        let mut parsed = TxnHeader {
            date: "",
            flag: None,
            payee: "",
        };
        let mut flag_at = None;
        for token in header.into_inner() {
            match token.as_rule() {
                Rule::date => parsed.date = token.as_str(),
                Rule::flag => {
                    parsed.flag = token.as_str().chars().next();
                    flag_at = Some(token.as_span().start());
                }
                Rule::payee => parsed.payee = token.as_str().trim_end(),
                _ => {}
            }
        }

        // Keep the raw tail so an unknown flag can fall back into the payee.
        if let Some(start) = flag_at {
            parsed.payee = line[start..].trim_end();
        }

        Some(parsed)
    }

    /// Resolve the flag through `symbols`. A flag the table does not know
    /// stays part of the payee and the state is unset.
    pub fn resolve(&self, symbols: &StatusSymbols) -> Result<(NaiveDate, TransactionState, &'th str)> {
        let date = parse_date(self.date)?;

        let resolved = match self.flag.and_then(|flag| symbols.state_of(flag)) {
            Some(state) => {
                let flag_len = self.flag.map(char::len_utf8).unwrap_or(0);
                (state, self.payee[flag_len..].trim_start())
            }
            None => (TransactionState::Unset, self.payee),
        };

        Ok((date, resolved.0, resolved.1))
    }
}

/// Entry line of a transaction block, as written.
#[derive(Debug, PartialEq)]
pub struct ParsedEntry<'pe> {
    pub(crate) account: &'pe str,
    pub(crate) amount: &'pe str,
}

impl<'pe> ParsedEntry<'pe> {
    pub fn parse(line: &'pe str) -> Option<ParsedEntry<'pe>> {
        let entry = JournalParser::parse(Rule::entry, line).ok()?.next()?;

        let mut parsed = ParsedEntry {
            account: "",
            amount: "",
        };
        for token in entry.into_inner() {
            match token.as_rule() {
                Rule::account => parsed.account = token.as_str(),
                Rule::expr => parsed.amount = token.as_str().trim_end(),
                _ => {}
            }
        }

        Some(parsed)
    }
}
