use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::two_decimals;
use crate::errors::LedgerError;

pub type OrderId = Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle of a payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionState {
    /// No payment performed yet.
    Pending,
    /// Payment ordered but postponed.
    InProgress,
    /// Payment done.
    Done,
}

impl TransactionState {
    pub const ALL: [TransactionState; 3] = [
        TransactionState::Pending,
        TransactionState::InProgress,
        TransactionState::Done,
    ];
}

/// Data associated to a unique transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub(crate) id: OrderId,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) description: String,
    #[serde(with = "two_decimals")]
    pub(crate) amount: Decimal,
    pub(crate) resource: Option<String>,
    #[serde(default)]
    pub(crate) tags: BTreeSet<String>,
    pub(crate) state: TransactionState,
    pub(crate) visible: bool,
}

impl Order {
    pub(crate) fn new(id: OrderId) -> Self {
        Self {
            id,
            date: None,
            description: String::new(),
            amount: Decimal::ZERO,
            resource: None,
            tags: BTreeSet::new(),
            state: TransactionState::Pending,
            visible: true,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// `false` once the order has been soft-deleted.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Parses a calendar date written exactly as `YYYY-MM-DD`.
///
/// `NaiveDate::parse_from_str` alone tolerates unpadded fields and signed years,
/// so the shape is checked first.
pub fn parse_date(text: &str) -> Result<NaiveDate, LedgerError> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return Err(LedgerError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_has_defaults() {
        let order = Order::new(Uuid::new_v4());
        assert_eq!(order.date, None);
        assert_eq!(order.amount, Decimal::ZERO);
        assert_eq!(order.state, TransactionState::Pending);
        assert!(order.visible);
        assert!(order.resource().is_none());
        assert!(order.tags().is_empty());
    }

    #[test]
    fn parse_date_accepts_leap_day() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_impossible_and_malformed_dates() {
        for text in [
            "2024-02-30",
            "2023-02-29",
            "2024-2-9",
            "24-02-09",
            "2024/02/09",
            "",
            "+2024-02-0",
            "2024-02-09 ",
        ] {
            assert!(
                matches!(parse_date(text), Err(LedgerError::InvalidDate(_))),
                "`{text}` should be rejected"
            );
        }
    }
}
