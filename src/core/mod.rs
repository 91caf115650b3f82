pub mod engine;
pub mod services;

pub use engine::{LedgerEngine, SharedLedger};
