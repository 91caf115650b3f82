//! Ledger domain models, persistence-friendly types, and helpers.

pub mod amount;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod order;
pub mod store;

pub use amount::{format_amount, parse_amount};
pub use category::{CategoryRegistry, Dimension};
pub use ledger::Ledger;
pub use order::{parse_date, Order, OrderId, TransactionState};
pub use store::OrderStore;
