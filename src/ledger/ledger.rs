use rust_decimal::Decimal;

use super::{
    category::CategoryRegistry,
    order::{Order, OrderId, TransactionState},
    store::OrderStore,
};
use crate::errors::LedgerError;

/// Order store and category registry of one account.
///
/// Label-checked mutators live here because they need both halves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub(crate) registry: CategoryRegistry,
    pub(crate) store: OrderStore,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(registry: CategoryRegistry, store: OrderStore) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn orders(&self) -> &[Order] {
        self.store.orders()
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.store.get(id)
    }

    pub fn create_order(&mut self) -> OrderId {
        self.store.create()
    }

    pub fn set_date(&mut self, id: OrderId, text: &str) -> Result<(), LedgerError> {
        self.store.set_date(id, text)
    }

    pub fn clear_date(&mut self, id: OrderId) -> Result<(), LedgerError> {
        self.store.clear_date(id)
    }

    pub fn set_description(&mut self, id: OrderId, text: &str) -> Result<(), LedgerError> {
        self.store.set_description(id, text)
    }

    pub fn set_amount(&mut self, id: OrderId, value: Decimal) -> Result<(), LedgerError> {
        self.store.set_amount(id, value)
    }

    pub fn set_resource(&mut self, id: OrderId, label: Option<&str>) -> Result<(), LedgerError> {
        self.store.set_resource(id, label, &self.registry)
    }

    pub fn set_tags<I, S>(&mut self, id: OrderId, labels: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.set_tags(id, labels, &self.registry)
    }

    pub fn add_tag(&mut self, id: OrderId, label: &str) -> Result<(), LedgerError> {
        self.store.add_tag(id, label, &self.registry)
    }

    pub fn remove_tag(&mut self, id: OrderId, label: &str) -> Result<(), LedgerError> {
        self.store.remove_tag(id, label)
    }

    pub fn set_state(&mut self, id: OrderId, state: TransactionState) -> Result<(), LedgerError> {
        self.store.set_state(id, state)
    }

    pub fn toggle_visibility(&mut self, id: OrderId) -> Result<bool, LedgerError> {
        self.store.toggle_visibility(id)
    }

    pub fn delete_order(&mut self, id: OrderId) -> Result<Order, LedgerError> {
        self.store.delete(id)
    }
}
