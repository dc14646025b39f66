//! Explicit configuration threaded through [`Reader`](crate::Reader),
//! [`Writer`](crate::Writer) and [`Journal`](crate::Journal).
//!
//! Nothing here looks at the process locale. Callers pick a [`Locale`] preset
//! (or build one) and override individual values with
//! [`Settings::set_option`].

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::amount::{display_number, Amount};
use crate::transaction::StatusSymbols;
use crate::{Error, Result};

/// Number and currency conventions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    pub tag: String,
    pub decimal: char,
    pub grouping: char,
    /// Currency given to amounts written without one. `None` keeps them plain.
    pub currency: Option<String>,
    /// Currency symbols recognized in amount expressions, with their codes.
    pub symbols: Vec<(String, String)>,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::plain()
    }
}

impl Locale {
    /// No default currency, `.` radix point and `,` grouping.
    pub fn plain() -> Locale {
        Locale {
            tag: "plain".to_string(),
            decimal: '.',
            grouping: ',',
            currency: None,
            symbols: Vec::new(),
        }
    }

    pub fn en_us() -> Locale {
        Locale {
            tag: "en-US".to_string(),
            decimal: '.',
            grouping: ',',
            currency: Some("USD".to_string()),
            symbols: vec![("$".to_string(), "USD".to_string())],
        }
    }

    pub fn en_gb() -> Locale {
        Locale {
            tag: "en-GB".to_string(),
            decimal: '.',
            grouping: ',',
            currency: Some("GBP".to_string()),
            symbols: vec![("£".to_string(), "GBP".to_string())],
        }
    }

    pub fn es_es() -> Locale {
        Locale {
            tag: "es-ES".to_string(),
            decimal: ',',
            grouping: '.',
            currency: Some("EUR".to_string()),
            symbols: vec![("€".to_string(), "EUR".to_string())],
        }
    }

    /// Preset for a language tag such as `es-ES` or `en_US`.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag.replace('_', "-").as_str() {
            "plain" | "C" | "POSIX" => Some(Locale::plain()),
            "en-US" => Some(Locale::en_us()),
            "en-GB" => Some(Locale::en_gb()),
            "es-ES" => Some(Locale::es_es()),
            _ => None,
        }
    }

    /// Currency code for `token`: either a three letter upper-case code or one
    /// of this locale's symbols.
    pub fn currency_code(&self, token: &str) -> Option<String> {
        if token.len() == 3 && token.bytes().all(|b| b.is_ascii_uppercase()) {
            return Some(token.to_string());
        }

        self.symbols
            .iter()
            .find(|(symbol, _)| symbol == token)
            .map(|(_, code)| code.clone())
    }

    /// Render `number` with this locale's grouping and decimal symbols.
    pub fn format_number(&self, number: Decimal) -> String {
        let plain = display_number(number.abs());
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (plain.as_str(), None),
        };

        let digits: Vec<char> = int_part.chars().collect();
        let mut out = String::new();
        if number.is_sign_negative() && !number.is_zero() {
            out.push('-');
        }
        for (idx, digit) in digits.iter().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(self.grouping);
            }
            out.push(*digit);
        }
        if let Some(frac_part) = frac_part {
            out.push(self.decimal);
            out.push_str(frac_part);
        }

        out
    }

    /// Localized number followed by the currency code, if any.
    pub fn format_amount(&self, amount: &Amount) -> String {
        let mut out = self.format_number(amount.number());
        if let Some(currency) = amount.currency() {
            out.push(' ');
            out.push_str(currency);
        }
        out
    }
}

/// How the writer renders entry amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmountStyle {
    /// `1234.50 EUR`, always readable back.
    #[default]
    Plain,
    /// `1.234,50 EUR` with the locale's symbols.
    Localized,
}

impl FromStr for AmountStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(AmountStyle::Plain),
            "localized" => Ok(AmountStyle::Localized),
            _ => Err(Error::Option {
                key: "amount_style".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub locale: Locale,
    pub reader_symbols: StatusSymbols,
    pub writer_symbols: StatusSymbols,
    /// Fail the whole read on an unrecognized amount instead of keeping the
    /// entry without one.
    pub strict_amounts: bool,
    pub amount_style: AmountStyle,
    pub account_width: usize,
    pub amount_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            locale: Locale::plain(),
            reader_symbols: StatusSymbols::READER,
            writer_symbols: StatusSymbols::WRITER,
            strict_amounts: false,
            amount_style: AmountStyle::Plain,
            account_width: 40,
            amount_width: 8,
        }
    }
}

impl Settings {
    pub fn new() -> Settings {
        Default::default()
    }

    pub fn with_locale(locale: Locale) -> Settings {
        Settings {
            locale,
            ..Default::default()
        }
    }

    pub fn set_option(&mut self, key: &str, val: &str) -> Result<()> {
        let invalid = || Error::Option {
            key: key.to_string(),
            value: val.to_string(),
        };

        match key {
            "locale" => self.locale = Locale::from_tag(val).ok_or_else(invalid)?,
            "currency" => {
                self.locale.currency = match val {
                    "" | "none" => None,
                    _ => Some(self.locale.currency_code(val).ok_or_else(invalid)?),
                }
            }
            "strict_amounts" => self.strict_amounts = val.parse().map_err(|_| invalid())?,
            "amount_style" => self.amount_style = val.parse()?,
            "account_width" => self.account_width = val.parse().map_err(|_| invalid())?,
            "amount_width" => self.amount_width = val.parse().map_err(|_| invalid())?,
            "pending_symbol" => {
                let mut chars = val.chars();
                self.writer_symbols.pending = match (chars.next(), chars.next()) {
                    (Some(symbol), None) if !symbol.is_alphanumeric() => symbol,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(invalid()),
        }

        Ok(())
    }

    pub fn get_option(&self, key: &str) -> Option<String> {
        match key {
            "locale" => Some(self.locale.tag.clone()),
            "currency" => Some(self.locale.currency.clone().unwrap_or_default()),
            "strict_amounts" => Some(self.strict_amounts.to_string()),
            "amount_style" => Some(
                match self.amount_style {
                    AmountStyle::Plain => "plain",
                    AmountStyle::Localized => "localized",
                }
                .to_string(),
            ),
            "account_width" => Some(self.account_width.to_string()),
            "amount_width" => Some(self.amount_width.to_string()),
            "pending_symbol" => Some(self.writer_symbols.pending.to_string()),
            _ => None,
        }
    }
}
