use thiserror::Error;
use uuid::Uuid;

use crate::ledger::Dimension;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid label: {0}")]
    InvalidLabel(String),
    #[error("Invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("Amount out of range: {0}")]
    AmountOverflow(String),
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),
    #[error("{dimension} `{label}` not found")]
    LabelNotFound { dimension: Dimension, label: String },
    #[error("{dimension} `{label}` already exists")]
    LabelExists { dimension: Dimension, label: String },
    #[error("No data: {0}")]
    NoData(String),
    #[error("Corrupt ledger data: {0}")]
    Corrupt(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Coarse classification callers use to decide how to re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    NoData,
    Storage,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidDate(_)
            | LedgerError::InvalidLabel(_)
            | LedgerError::InvalidAmount(_)
            | LedgerError::InvalidRange(_)
            | LedgerError::AmountOverflow(_) => ErrorKind::Validation,
            LedgerError::OrderNotFound(_) | LedgerError::LabelNotFound { .. } => {
                ErrorKind::NotFound
            }
            LedgerError::LabelExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::NoData(_) => ErrorKind::NoData,
            LedgerError::Corrupt(_) | LedgerError::Io(_) | LedgerError::Serde(_) => {
                ErrorKind::Storage
            }
        }
    }

    pub(crate) fn label_not_found(dimension: Dimension, label: &str) -> Self {
        LedgerError::LabelNotFound {
            dimension,
            label: label.to_string(),
        }
    }
}
