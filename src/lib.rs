#![doc(test(attr(deny(warnings))))]

//! Ledger Core filters and aggregates the orders of a personal ledger:
//! category registry, order store, multi-dimensional filters and
//! state-bucketed totals over date windows.

pub mod config;
pub mod core;
pub mod errors;
pub mod filter;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{LedgerEngine, SharedLedger};
pub use errors::{ErrorKind, LedgerError};
pub use filter::Filter;
pub use ledger::{Dimension, Ledger, Order, OrderId, TransactionState};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ledger Core tracing initialized.");
    });
}

/// Like [`init`], using the log directive from `config`.
pub fn init_with_config(config: &config::Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing_with(&config.log_filter);
        tracing::info!(currency = %config.currency, "Ledger Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_config(&crate::config::Config::default());
    }
}
