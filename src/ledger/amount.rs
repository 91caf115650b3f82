//! Monetary amount helpers.
//!
//! Amounts are kept as `Decimal` normalised to two fractional digits so repeated
//! additions and subtractions never drift.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::LedgerError;

pub const AMOUNT_SCALE: u32 = 2;

/// Largest magnitude a single order may carry.
pub const MAX_WHOLE_AMOUNT: i64 = 1_000_000_000_000_000;

/// Rounds a value to the two digits the ledger stores.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp(AMOUNT_SCALE)
}

/// Normalises `value` and rejects magnitudes above [`MAX_WHOLE_AMOUNT`].
pub fn check_amount(value: Decimal) -> Result<Decimal, LedgerError> {
    let value = normalize(value);
    if value.abs() > Decimal::from(MAX_WHOLE_AMOUNT) {
        return Err(LedgerError::AmountOverflow(format!(
            "{} exceeds {}",
            value, MAX_WHOLE_AMOUNT
        )));
    }
    Ok(value)
}

/// Parses user text such as `-12.5` or `900`.
pub fn parse_amount(text: &str) -> Result<Decimal, LedgerError> {
    let value =
        Decimal::from_str(text.trim()).map_err(|_| LedgerError::InvalidAmount(text.to_string()))?;
    check_amount(value)
}

pub(crate) fn add_amounts(left: Decimal, right: Decimal) -> Result<Decimal, LedgerError> {
    left.checked_add(right)
        .ok_or_else(|| LedgerError::AmountOverflow(format!("{} + {}", left, right)))
}

pub(crate) fn sub_amounts(left: Decimal, right: Decimal) -> Result<Decimal, LedgerError> {
    left.checked_sub(right)
        .ok_or_else(|| LedgerError::AmountOverflow(format!("{} - {}", left, right)))
}

/// Renders an amount with exactly two decimals.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", normalize(value))
}

/// Serde adapter writing amounts as two-decimal strings.
pub(crate) mod two_decimals {
    use std::fmt;

    use rust_decimal::Decimal;
    use serde::{
        de::{self, Visitor},
        Deserializer, Serializer,
    };

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_amount(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as string or number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
            super::parse_amount(value).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
            super::check_amount(Decimal::from(value)).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
            super::check_amount(Decimal::from(value)).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
            let value = Decimal::try_from(value).map_err(E::custom)?;
            super::check_amount(value).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_pads_to_two_digits() {
        assert_eq!(format_amount(dec!(-900)), "-900.00");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(format_amount(dec!(0.125)), "0.12");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_amount(" 42.10 ").unwrap(), dec!(42.10));
        assert!(parse_amount("forty").is_err());
    }

    #[test]
    fn amounts_beyond_the_bound_are_rejected() {
        let bound = Decimal::from(MAX_WHOLE_AMOUNT);
        assert_eq!(check_amount(bound).unwrap(), bound);
        assert_eq!(check_amount(-bound).unwrap(), -bound);
        assert!(matches!(
            check_amount(Decimal::MAX),
            Err(LedgerError::AmountOverflow(_))
        ));
        assert!(matches!(
            parse_amount("79228162514264337593543950335"),
            Err(LedgerError::AmountOverflow(_))
        ));
    }

    #[test]
    fn checked_sums_report_overflow() {
        assert_eq!(add_amounts(dec!(1.10), dec!(2.20)).unwrap(), dec!(3.30));
        assert!(matches!(
            add_amounts(Decimal::MAX, Decimal::MAX),
            Err(LedgerError::AmountOverflow(_))
        ));
        assert!(matches!(
            sub_amounts(Decimal::MIN, Decimal::MAX),
            Err(LedgerError::AmountOverflow(_))
        ));
    }

    #[test]
    fn repeated_cents_do_not_drift() {
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += dec!(0.10);
        }
        for _ in 0..1000 {
            total -= dec!(0.10);
        }
        assert_eq!(total, Decimal::ZERO);
    }
}
