//! Plainbook - A plain-text double-entry journal reader, query engine and writer
//! ---
//!
//! Journals are written in a small, human editable format:
//!
//! ```text
//! 2023/03/06 * Opening Balance
//!     Assets:Cash                                  500
//!     Equity:Opening Balances                    -500
//! ```
//!
//! [`parse`] turns such text into a [`Ledger`], the [`Journal`] inside it
//! answers balance and filter queries, and [`Writer`] turns a journal back
//! into text. Balancing is not enforced: a transaction whose entries do not
//! sum to zero is accepted as is.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Accounts and the chart of accounts they are registered in.
pub mod account;

pub mod amount;
mod block;

/// Ordered transactions and every query over them.
pub mod journal;

pub mod ledger;

/// Our main parser entrypoints.
pub mod parser;

pub mod report;
pub mod settings;
pub mod transaction;
pub mod writer;

pub use account::{Account, ChartOfAccounts};
pub use amount::Amount;
pub use journal::{EntryFilter, Journal};
pub use ledger::Ledger;
pub use parser::{parse, parse_file, Reader};
pub use report::{BalanceReport, TransactionReport};
pub use settings::{AmountStyle, Locale, Settings};
pub use transaction::{Entry, StatusSymbols, Transaction, TransactionState};
pub use writer::Writer;

use chrono::NaiveDate;

/// Date layout used by the journal format and by every date-taking query.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Everything that can go wrong while reading, querying or writing a journal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header or entry line that does not follow the line grammar.
    #[error("line {line}: malformed {what}: `{text}'")]
    Format {
        line: usize,
        what: &'static str,
        text: String,
    },

    #[error("invalid date `{0}', expected yyyy/mm/dd")]
    Date(String),

    #[error("unrecognized amount `{0}'")]
    Amount(String),

    #[error("input `{0}' is not a valid account name")]
    InvalidAccount(String),

    #[error("transaction `{0}' has no entries")]
    EmptyTransaction(String),

    /// A sum left the range `rust_decimal` can represent.
    #[error("amount overflow while summing {0}")]
    Overflow(String),

    #[error("invalid option `{key}' = `{value}'")]
    Option { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(line: usize, what: &'static str, text: &str) -> Error {
        Error::Format {
            line,
            what,
            text: text.to_string(),
        }
    }
}

/// Parse a `yyyy/mm/dd` date. Only the zero padded form is accepted.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(Error::Date(s.to_string()));
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::Date(s.to_string()))
}
