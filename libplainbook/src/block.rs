use crate::account::ChartOfAccounts;
use crate::amount::ParsedAmount;
use crate::settings::Settings;
use crate::transaction::{Entry, ParsedEntry, Transaction, TxnHeader};
use crate::{Error, Result};

use tracing::{debug, trace, warn};

/// Consecutive non-blank lines of input: one header line and its entry lines.
#[derive(Debug, PartialEq)]
pub(crate) struct Block<'b> {
    /// 1-based line number of the header.
    pub(crate) line: usize,
    pub(crate) lines: Vec<&'b str>,
}

/// Split `input` on runs of blank (or whitespace-only) lines. Leading and
/// trailing blank lines produce no block.
pub(crate) fn blocks(input: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }

        current
            .get_or_insert_with(|| Block {
                line: idx + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }

    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

impl<'b> Block<'b> {
    /// Parse this block into a transaction, registering its accounts in
    /// `accounts`.
    pub(crate) fn parse(&self, settings: &Settings, accounts: &mut ChartOfAccounts) -> Result<Transaction> {
        let (header_line, entry_lines) = self
            .lines
            .split_first()
            .ok_or_else(|| Error::format(self.line, "transaction", ""))?;

        let header = TxnHeader::parse(header_line)
            .ok_or_else(|| Error::format(self.line, "transaction header", header_line))?;
        let (date, state, payee) = header.resolve(&settings.reader_symbols)?;

        if entry_lines.is_empty() {
            return Err(Error::format(self.line, "transaction without entries", header_line));
        }

        let mut entries = Vec::with_capacity(entry_lines.len());
        for (offset, line) in entry_lines.iter().enumerate() {
            let line_no = self.line + offset + 1;
            let parsed =
                ParsedEntry::parse(line).ok_or_else(|| Error::format(line_no, "entry line", line))?;
            let account = accounts.register(parsed.account)?;

            let amount = match ParsedAmount::parse(parsed.amount)
                .ok_or_else(|| Error::Amount(parsed.amount.to_string()))
                .and_then(|amount| amount.resolve(&settings.locale))
            {
                Ok(amount) => Some(amount),
                Err(err) if settings.strict_amounts => return Err(err),
                Err(err) => {
                    warn!(line = line_no, account = %account, "{}, entry kept without amount", err);
                    None
                }
            };

            entries.push(Entry { account, amount });
        }

        let transaction = Transaction::new(date, state, payee, entries)?;
        match transaction.total() {
            Ok(total) if total.is_zero() => {}
            Ok(total) => debug!(line = self.line, payee, total = %total, "unbalanced transaction"),
            Err(err) => warn!(line = self.line, payee, "{}", err),
        }
        trace!(line = self.line, entries = transaction.entries().len(), "parsed transaction");

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use crate::account::ChartOfAccounts;
    use crate::amount::Amount;
    use crate::block::{blocks, Block};
    use crate::settings::{Locale, Settings};
    use crate::transaction::TransactionState;
    use crate::Error;

    use anyhow::Result;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn split_blocks() {
        let input = "\n2023/03/06 A\n  X  1\n\n\n2023/03/07 B\n  Y  2\n  \n2023/03/08 C\n  Z  3\n\n";
        assert_eq!(
            blocks(input),
            vec![
                Block {
                    line: 2,
                    lines: vec!["2023/03/06 A", "  X  1"],
                },
                Block {
                    line: 6,
                    lines: vec!["2023/03/07 B", "  Y  2"],
                },
                Block {
                    line: 9,
                    lines: vec!["2023/03/08 C", "  Z  3"],
                },
            ]
        );
    }

    #[test]
    fn split_blocks_crlf() {
        let found = blocks("2023/03/06 A\r\n  X  1\r\n\r\n2023/03/07 B\r\n  Y  2");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].lines, vec!["2023/03/07 B", "  Y  2"]);
        assert!(blocks("").is_empty());
        assert!(blocks("\n\n  \n").is_empty());
    }

    #[test]
    fn parse_block() -> Result<()> {
        let block = Block {
            line: 1,
            lines: vec![
                "2023/03/07 Mike's convenience store",
                "    Expenses:Groceries                         35.95",
                "    Assets:Cash                               -35.95",
            ],
        };
        let mut accounts = ChartOfAccounts::new();
        let txn = block.parse(&Settings::default(), &mut accounts)?;

        assert_eq!(txn.date(), NaiveDate::from_ymd_opt(2023, 3, 7).unwrap());
        assert_eq!(txn.state(), TransactionState::Unset);
        assert_eq!(txn.payee(), "Mike's convenience store");
        assert_eq!(txn.entries().len(), 2);
        assert_eq!(txn.entries()[1].account.name(), "Assets:Cash");
        assert_eq!(txn.entries()[1].amount, Some(Amount::plain(dec!(-35.95))));
        assert_eq!(accounts.len(), 2);
        Ok(())
    }

    #[test]
    fn parse_block_with_currency() -> Result<()> {
        let block = Block {
            line: 1,
            lines: vec!["2023/03/06 * Cambio", "  Assets:Cash  € 10", "  Assets:Bank  -10"],
        };
        let settings = Settings::with_locale(Locale::es_es());
        let txn = block.parse(&settings, &mut ChartOfAccounts::new())?;

        for entry in txn.entries() {
            assert_eq!(entry.amount.as_ref().and_then(Amount::currency), Some("EUR"));
        }
        Ok(())
    }

    #[test]
    fn soft_amount_failure() -> Result<()> {
        let block = Block {
            line: 1,
            lines: vec!["2023/03/06 Broken", "  Assets:Cash  foo bar baz", "  Equity:Void  -1"],
        };
        let txn = block.parse(&Settings::default(), &mut ChartOfAccounts::new())?;
        assert_eq!(txn.entries()[0].amount, None);
        assert_eq!(txn.total()?, dec!(-1));

        let strict = Settings {
            strict_amounts: true,
            ..Default::default()
        };
        assert!(matches!(
            block.parse(&strict, &mut ChartOfAccounts::new()),
            Err(Error::Amount(ref s)) if s == "foo bar baz"
        ));
        Ok(())
    }

    #[test]
    fn overflowing_block_is_read() -> Result<()> {
        let block = Block {
            line: 1,
            lines: vec![
                "2023/03/06 Big",
                "    Assets:Cash  79228162514264337593543950335",
                "    Assets:Bank  79228162514264337593543950335",
            ],
        };
        let txn = block.parse(&Settings::default(), &mut ChartOfAccounts::new())?;

        assert_eq!(txn.entries().len(), 2);
        assert!(matches!(txn.total(), Err(Error::Overflow(_))));
        assert!(!txn.is_balanced());
        Ok(())
    }

    #[test]
    fn malformed_blocks() {
        let settings = Settings::default();
        let cases = [
            (vec!["2023/03/06"], "line 4: malformed transaction header: `2023/03/06'"),
            (
                vec!["2023/03/06 Lonely"],
                "line 4: malformed transaction without entries: `2023/03/06 Lonely'",
            ),
            (
                vec!["2023/03/06 Payee", "  Assets:Cash  1", "  Assets:Bank -1"],
                "line 6: malformed entry line: `  Assets:Bank -1'",
            ),
        ];

        for (lines, message) in cases {
            let block = Block { line: 4, lines };
            let err = block
                .parse(&settings, &mut ChartOfAccounts::new())
                .unwrap_err();
            assert_eq!(format!("{}", err), message);
        }
    }

    #[test]
    fn bad_date_block() {
        let block = Block {
            line: 1,
            lines: vec!["06/03/2023 * Payee", "  Assets:Cash  1"],
        };
        assert!(matches!(
            block.parse(&Settings::default(), &mut ChartOfAccounts::new()),
            Err(Error::Date(_))
        ));
    }
}
