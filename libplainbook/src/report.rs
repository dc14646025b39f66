//! Balance and transaction reports.
//!
//! Reports hold the already computed figures; `Display` lays them out.

use crate::amount::Amount;
use crate::transaction::{Entry, StatusSymbols, Transaction};
use crate::{Error, Result, DATE_FORMAT};

use std::fmt;

const AMOUNT_WIDTH: usize = 12;
const ACCOUNT_WIDTH: usize = 40;

#[derive(Debug, PartialEq)]
pub struct BalanceReport<'r> {
    entries: Vec<&'r Entry>,
    total: Amount,
}

impl<'r> BalanceReport<'r> {
    pub(crate) fn new(entries: Vec<&'r Entry>, total: Amount) -> Self {
        BalanceReport { entries, total }
    }

    pub fn entries(&self) -> &[&'r Entry] {
        &self.entries
    }

    pub fn total(&self) -> &Amount {
        &self.total
    }
}

fn entry_amount(entry: &Entry) -> String {
    entry
        .amount
        .as_ref()
        .map(Amount::to_string)
        .unwrap_or_default()
}

impl fmt::Display for BalanceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{:>width$}  {}",
                entry_amount(entry),
                entry.account,
                width = AMOUNT_WIDTH
            )?;
        }
        writeln!(f, "{}", "-".repeat(AMOUNT_WIDTH))?;
        writeln!(f, "{:>width$}", self.total, width = AMOUNT_WIDTH)
    }
}

/// One entry of a [`TransactionReport`] with the balance of the transaction
/// so far.
#[derive(Debug, PartialEq)]
pub struct ReportLine<'r> {
    pub entry: &'r Entry,
    pub running: Amount,
}

#[derive(Debug, PartialEq)]
pub struct TransactionReport<'r> {
    sections: Vec<(&'r Transaction, Vec<ReportLine<'r>>)>,
}

impl<'r> TransactionReport<'r> {
    pub(crate) fn new<I>(transactions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'r Transaction>,
    {
        let sections = transactions
            .into_iter()
            .map(|transaction| -> Result<(&'r Transaction, Vec<ReportLine<'r>>)> {
                let mut running = Amount::zero(None);
                let lines = transaction
                    .entries()
                    .iter()
                    .map(|entry| -> Result<ReportLine<'r>> {
                        if let Some(amount) = &entry.amount {
                            running = running.checked_add(amount).ok_or_else(|| {
                                Error::Overflow(format!("transaction `{}'", transaction.payee()))
                            })?;
                        }
                        Ok(ReportLine {
                            entry,
                            running: running.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((transaction, lines))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TransactionReport { sections })
    }

    pub fn sections(&self) -> &[(&'r Transaction, Vec<ReportLine<'r>>)] {
        &self.sections
    }
}

impl fmt::Display for TransactionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (transaction, lines) in &self.sections {
            write!(f, "{}", transaction.date().format(DATE_FORMAT))?;
            if let Some(symbol) = StatusSymbols::READER.symbol_of(transaction.state()) {
                write!(f, " {}", symbol)?;
            }
            writeln!(f, " {}", transaction.payee())?;

            for line in lines {
                writeln!(
                    f,
                    "    {:<acc$}{:>amt$}{:>amt$}",
                    line.entry.account.name(),
                    entry_amount(line.entry),
                    line.running,
                    acc = ACCOUNT_WIDTH,
                    amt = AMOUNT_WIDTH
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::amount::Amount;
    use crate::parser::parse;

    use anyhow::Result;
    use rust_decimal_macros::dec;

    const INPUT: &str = "2023/03/06 * Opening Balance
    Assets:Cash  500
    Assets:Debit Card  500
    Equity:Opening Balances  -1000

2023/03/07 ! Moe's restaurant
    Expenses:Restaurant:Food  20
    Expenses:Restaurant:Tips  2
    Assets:Cash  -12
    Assets:Debit Card  -10
";

    #[test]
    fn balance_report() -> Result<()> {
        let ledger = parse(INPUT)?;
        let report = ledger.journal().balance_report("Cash")?;

        assert_eq!(report.entries().len(), 2);
        assert_eq!(report.total(), &Amount::plain(dec!(488)));
        assert_eq!(
            report.to_string(),
            concat!(
                "         500  Assets:Cash\n",
                "         -12  Assets:Cash\n",
                "------------\n",
                "         488\n",
            )
        );
        Ok(())
    }

    #[test]
    fn transaction_report() -> Result<()> {
        let ledger = parse(INPUT)?;
        let journal = ledger.journal();
        let report = journal.transaction_report(journal.transactions_by_payee("Moe's restaurant"))?;

        let running: Vec<_> = report.sections()[0]
            .1
            .iter()
            .map(|line| line.running.number())
            .collect();
        assert_eq!(running, vec![dec!(20), dec!(22), dec!(10), dec!(0)]);

        let text = report.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("2023/03/07 ! Moe's restaurant"));
        assert_eq!(
            lines.next(),
            Some(
                "    Expenses:Restaurant:Food                          20          20"
            )
        );
        assert_eq!(
            lines.last(),
            Some(
                "    Assets:Debit Card                                -10           0"
            )
        );
        Ok(())
    }

    #[test]
    fn running_balance_restarts_per_transaction() -> Result<()> {
        let ledger = parse(INPUT)?;
        let journal = ledger.journal();
        let report = journal.transaction_report(journal.transactions())?;

        assert_eq!(report.sections().len(), 2);
        for (_, lines) in report.sections() {
            let first = &lines[0];
            assert_eq!(Some(&first.running), first.entry.amount.as_ref());
        }
        Ok(())
    }

    #[test]
    fn running_balance_overflow() -> Result<()> {
        let ledger = parse(
            "2023/03/06 Big\n    Assets:Cash  79228162514264337593543950335\n    Assets:Bank  79228162514264337593543950335\n",
        )?;
        let journal = ledger.journal();

        assert!(matches!(
            journal.transaction_report(journal.transactions()),
            Err(crate::Error::Overflow(ref context)) if context == "transaction `Big'"
        ));
        Ok(())
    }
}
