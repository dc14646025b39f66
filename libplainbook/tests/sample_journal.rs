use libplainbook::{
    Account, Amount, Entry, Locale, Reader, Settings, StatusSymbols, TransactionState, Writer,
};

use anyhow::Result;
use rust_decimal_macros::dec;

const SAMPLE: &str = "2023/03/06 * Opening Balance
    Assets:Cash                                  500
    Assets:Debit Card                            500
    Equity:Opening Balances                    -1000

2023/03/07 ! Moe's restaurant
    Expenses:Restaurant:Food                      20
    Expenses:Restaurant:Tips                       2
    Assets:Cash                                  -12
    Assets:Debit Card                            -10

2023/03/07 Mike's convenience store
    Expenses:Groceries                         35.95
    Assets:Cash                               -35.95
";

fn eur(number: rust_decimal::Decimal) -> Amount {
    Amount::with_currency(number, "EUR")
}

#[test]
fn euro_journal_queries() -> Result<()> {
    let reader = Reader::new(Settings::with_locale(Locale::es_es()));
    let ledger = reader.read(SAMPLE)?;
    let journal = ledger.journal();

    assert_eq!(journal.currency(), Some("EUR"));
    assert_eq!(journal.balance("Assets:Cash")?, eur(dec!(452.05)));
    assert_eq!(journal.balance_between("Cash", "2023/03/06", "2023/03/06")?, eur(dec!(500)));
    assert_eq!(journal.balance("Equity")?, eur(dec!(-1000)));

    let cash = Entry::new(Account::try_from("Assets:Cash")?, eur(dec!(-12)));
    assert_eq!(
        journal.entries_by_payee_and_account("Moe's restaurant", "Assets:Cash"),
        vec![&cash]
    );
    assert_eq!(journal.entries_by_amount(&eur(dec!(-12))), vec![&cash]);
    assert_eq!(journal.entries_by_date("2023/03/07")?.len(), 6);

    let by_account = journal.transactions_by_accounts(&["Assets:Cash", "Expenses:Groceries"]);
    assert_eq!(by_account.len(), 3);
    let by_payee = journal.transactions_by_payee("Mike's convenience store");
    assert_eq!(by_payee.len(), 1);
    assert_eq!(journal.transactions_between("2023/03/07", "2023/03/31")?.len(), 2);
    Ok(())
}

#[test]
fn unset_header_keeps_payee() -> Result<()> {
    let ledger = Reader::default().read(SAMPLE)?;
    let mike = &ledger.transactions()[2];

    assert_eq!(mike.state(), TransactionState::Unset);
    assert_eq!(mike.payee(), "Mike's convenience store");
    assert!(ledger.transactions().iter().all(|txn| txn.is_balanced()));
    Ok(())
}

#[test]
fn chart_of_accounts_in_first_seen_order() -> Result<()> {
    let ledger = Reader::default().read(SAMPLE)?;
    let names: Vec<&str> = ledger.accounts().iter().map(Account::name).collect();

    assert_eq!(
        names,
        vec![
            "Assets:Cash",
            "Assets:Debit Card",
            "Equity:Opening Balances",
            "Expenses:Restaurant:Food",
            "Expenses:Restaurant:Tips",
            "Expenses:Groceries",
        ]
    );
    Ok(())
}

#[test]
fn configured_round_trip() -> Result<()> {
    let mut settings = Settings::with_locale(Locale::es_es());
    settings.set_option("pending_symbol", "!")?;
    assert_eq!(settings.writer_symbols, StatusSymbols::READER);

    let reader = Reader::new(settings.clone());
    let ledger = reader.read(SAMPLE)?;
    let text = Writer::new(settings).write(ledger.journal());

    assert!(text.contains("    Assets:Cash                              500 EUR\n"));
    assert_eq!(reader.read(&text)?.journal(), ledger.journal());
    Ok(())
}

#[test]
fn transaction_report_for_account() -> Result<()> {
    let ledger = Reader::default().read(SAMPLE)?;
    let journal = ledger.journal();
    let report = journal.transaction_report(journal.transactions_by_account("Debit Card"))?;

    let text = report.to_string();
    assert!(text.starts_with("2023/03/06 * Opening Balance\n"));
    assert!(text.contains("2023/03/07 ! Moe's restaurant\n"));
    assert!(!text.contains("Mike's"));
    Ok(())
}

#[test]
fn malformed_amount_keeps_entry() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let input = "2023/03/08 Bakery\n    Expenses:Food  three euros\n    Assets:Cash  -3\n";
    let ledger = Reader::default().read(input)?;
    let bakery = &ledger.transactions()[0];

    assert_eq!(bakery.entries()[0].amount, None);
    assert!(!bakery.is_balanced());
    assert_eq!(ledger.journal().balance("Expenses")?.number(), dec!(0));

    let mut strict = Settings::default();
    strict.set_option("strict_amounts", "true")?;
    assert!(Reader::new(strict).read(input).is_err());
    Ok(())
}

#[test]
fn repeated_transactions_are_reported_twice() -> Result<()> {
    let coffee = "2023/03/06 * Coffee\n    Expenses:Coffee  3\n    Assets:Cash  -3\n";
    let ledger = Reader::default().read(&format!("{}\n{}", coffee, coffee))?;
    let journal = ledger.journal();

    let coffees = journal.transactions_by_payee("Coffee");
    assert_eq!(coffees.len(), 2);
    assert_eq!(journal.balance("Cash")?, Amount::plain(dec!(-6)));

    let text = journal.transaction_report(coffees)?.to_string();
    assert_eq!(text.matches("2023/03/06 * Coffee\n").count(), 2);
    Ok(())
}

#[test]
fn oversized_amounts_do_not_abort_the_read() -> Result<()> {
    let input = "2023/03/06 Big\n    Assets:Cash  79228162514264337593543950335\n    Assets:Bank  79228162514264337593543950335\n";
    let ledger = Reader::default().read(input)?;
    let journal = ledger.journal();

    assert!(!ledger.transactions()[0].is_balanced());
    assert!(journal.balance("Assets").is_err());
    assert!(journal.balance_report("Assets").is_err());
    assert!(journal.transaction_report(journal.transactions()).is_err());

    let text = Writer::default().write(journal);
    assert!(text.contains("79228162514264337593543950335\n"));
    Ok(())
}
