//! Monetary amounts.
//!
//! Numbers are exact decimals ([`rust_decimal::Decimal`]), so repeated
//! additions never drift. A currency is optional: journals read without a
//! default currency keep plain numbers.

use crate::parser::{JournalParser, Rule};
use crate::settings::Locale;
use crate::{Error, Result};

use pest::Parser;
use rust_decimal::{Decimal, RoundingStrategy};

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Amount {
    number: Decimal,
    currency: Option<String>,
}

impl Amount {
    pub fn new(number: Decimal, currency: Option<String>) -> Amount {
        Amount { number, currency }
    }

    pub fn plain(number: Decimal) -> Amount {
        Amount::new(number, None)
    }

    pub fn with_currency(number: Decimal, currency: &str) -> Amount {
        Amount::new(number, Some(currency.to_string()))
    }

    pub fn zero(currency: Option<&str>) -> Amount {
        Amount::new(Decimal::ZERO, currency.map(str::to_string))
    }

    pub fn number(&self) -> Decimal {
        self.number
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// `self + rhs`, `None` on overflow. Currency follows the `+` operator.
    pub fn checked_add(&self, rhs: &Amount) -> Option<Amount> {
        Some(Amount {
            number: self.number.checked_add(rhs.number)?,
            currency: self.currency.clone().or_else(|| rhs.currency.clone()),
        })
    }

    pub fn checked_sub(&self, rhs: &Amount) -> Option<Amount> {
        self.checked_add(&-rhs)
    }
}

/// Sum of `numbers`, `None` when the running total overflows.
pub(crate) fn checked_sum<I>(numbers: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    numbers
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, number| acc.checked_add(number))
}

/// Integer text when `number` has no fractional part, two decimals otherwise.
pub(crate) fn display_number(number: Decimal) -> String {
    if number.is_zero() {
        return "0".to_string();
    }

    if number.fract().is_zero() {
        return number.trunc().normalize().to_string();
    }

    let mut rounded = number.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match &self.currency {
            Some(currency) => format!("{} {}", display_number(self.number), currency),
            None => display_number(self.number),
        };
        // Honour width and alignment flags, e.g. `{:>8}`.
        f.pad(&text)
    }
}

impl std::ops::Add<&Amount> for &Amount {
    type Output = Amount;

    /// Numbers are added as is, there is no currency conversion. The result
    /// keeps the left hand currency, or the right hand one when the left has
    /// none. Panics on overflow like `Decimal` addition, see
    /// [`Amount::checked_add`].
    fn add(self, rhs: &Amount) -> Self::Output {
        Amount {
            number: self.number + rhs.number,
            currency: self.currency.clone().or_else(|| rhs.currency.clone()),
        }
    }
}

impl std::ops::Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Self::Output {
        self + &(-rhs)
    }
}

impl std::ops::Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount {
            number: -self.number,
            currency: self.currency.clone(),
        }
    }
}

/// Which of the three amount expression shapes matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountShape {
    /// `EUR 2.95`
    Prefixed,
    /// `2.95 EUR`
    Suffixed,
    /// `2.95`
    Bare,
}

/// Amount expression as written, before currency resolution.
#[derive(Debug, PartialEq)]
pub struct ParsedAmount<'s> {
    pub(crate) number: &'s str,
    pub(crate) currency: Option<&'s str>,
    pub(crate) shape: AmountShape,
}

impl<'a> ParsedAmount<'a> {
    /// Match `input` against the amount shapes, in order. `None` when no shape
    /// fits.
    pub fn parse(input: &'a str) -> Option<ParsedAmount<'a>> {
        let amount = JournalParser::parse(Rule::amount, input).ok()?.next()?;
        let shaped = amount.into_inner().next()?;

        let shape = match shaped.as_rule() {
            Rule::prefixed => AmountShape::Prefixed,
            Rule::suffixed => AmountShape::Suffixed,
            Rule::bare => AmountShape::Bare,
            _ => return None,
        };

        let mut parsed = ParsedAmount {
            number: "",
            currency: None,
            shape,
        };
        for token in shaped.into_inner() {
            match token.as_rule() {
                Rule::number => parsed.number = token.as_str(),
                Rule::currency => parsed.currency = Some(token.as_str()),
                _ => {}
            }
        }

        Some(parsed)
    }

    pub fn number(&self) -> &str {
        self.number
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency
    }

    pub fn shape(&self) -> AmountShape {
        self.shape
    }

    /// Turn the expression into an [`Amount`]. Currency tokens must be known
    /// to `locale`; a bare number takes the locale's default currency.
    pub fn resolve(&self, locale: &Locale) -> Result<Amount> {
        let digits = self.number.strip_prefix('+').unwrap_or(self.number);
        let number = Decimal::from_str(digits).map_err(|_| Error::Amount(self.to_string()))?;

        let currency = match self.currency {
            Some(token) => Some(
                locale
                    .currency_code(token)
                    .ok_or_else(|| Error::Amount(self.to_string()))?,
            ),
            None => locale.currency.clone(),
        };

        Ok(Amount::new(number, currency))
    }
}

impl fmt::Display for ParsedAmount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.shape, self.currency) {
            (AmountShape::Prefixed, Some(currency)) => write!(f, "{} {}", currency, self.number),
            (AmountShape::Suffixed, Some(currency)) => write!(f, "{} {}", self.number, currency),
            _ => f.write_str(self.number),
        }
    }
}

/// Parse a complete amount expression such as `EUR 2.95`.
pub fn parse_amount(input: &str, locale: &Locale) -> Result<Amount> {
    let trimmed = input.trim();
    ParsedAmount::parse(trimmed)
        .ok_or_else(|| Error::Amount(trimmed.to_string()))?
        .resolve(locale)
}
