//! Owned collection of orders and their field-level mutators.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::{
    amount,
    category::{CategoryRegistry, Dimension},
    order::{parse_date, Order, OrderId, TransactionState},
};
use crate::errors::LedgerError;

/// Orders kept in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an order with default values and returns its identifier.
    pub fn create(&mut self) -> OrderId {
        let id = Uuid::new_v4();
        self.orders.push(Order::new(id));
        id
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Fails on anything but a valid `YYYY-MM-DD` date, keeping the previous value.
    pub fn set_date(&mut self, id: OrderId, text: &str) -> Result<(), LedgerError> {
        let order = self.order_mut(id)?;
        order.date = Some(parse_date(text)?);
        Ok(())
    }

    pub fn clear_date(&mut self, id: OrderId) -> Result<(), LedgerError> {
        self.order_mut(id)?.date = None;
        Ok(())
    }

    pub fn set_description(&mut self, id: OrderId, text: &str) -> Result<(), LedgerError> {
        self.order_mut(id)?.description = text.to_string();
        Ok(())
    }

    /// Stores the amount rounded to cents; magnitudes above
    /// [`amount::MAX_WHOLE_AMOUNT`] are rejected.
    pub fn set_amount(&mut self, id: OrderId, value: Decimal) -> Result<(), LedgerError> {
        let value = amount::check_amount(value)?;
        self.order_mut(id)?.amount = value;
        Ok(())
    }

    /// Selects the resource among registered ones, or clears it with `None`.
    pub fn set_resource(
        &mut self,
        id: OrderId,
        label: Option<&str>,
        registry: &CategoryRegistry,
    ) -> Result<(), LedgerError> {
        if let Some(label) = label {
            if !registry.contains(Dimension::Resource, label) {
                return Err(LedgerError::label_not_found(Dimension::Resource, label));
            }
        }
        self.order_mut(id)?.resource = label.map(str::to_string);
        Ok(())
    }

    /// Replaces the whole tag set; nothing changes if any label is unregistered.
    pub fn set_tags<I, S>(
        &mut self,
        id: OrderId,
        labels: I,
        registry: &CategoryRegistry,
    ) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = BTreeSet::new();
        for label in labels {
            let label = label.as_ref();
            if !registry.contains(Dimension::Tag, label) {
                return Err(LedgerError::label_not_found(Dimension::Tag, label));
            }
            tags.insert(label.to_string());
        }
        self.order_mut(id)?.tags = tags;
        Ok(())
    }

    /// Adds a single registered tag. Adding a tag already carried is a no-op.
    pub fn add_tag(
        &mut self,
        id: OrderId,
        label: &str,
        registry: &CategoryRegistry,
    ) -> Result<(), LedgerError> {
        if !registry.contains(Dimension::Tag, label) {
            return Err(LedgerError::label_not_found(Dimension::Tag, label));
        }
        self.order_mut(id)?.tags.insert(label.to_string());
        Ok(())
    }

    pub fn remove_tag(&mut self, id: OrderId, label: &str) -> Result<(), LedgerError> {
        let order = self.order_mut(id)?;
        if order.tags.remove(label) {
            Ok(())
        } else {
            Err(LedgerError::label_not_found(Dimension::Tag, label))
        }
    }

    /// Changes the lifecycle state only. Marking an undated order `Done` does
    /// not stamp it with today's date; callers set the date explicitly.
    pub fn set_state(&mut self, id: OrderId, state: TransactionState) -> Result<(), LedgerError> {
        self.order_mut(id)?.state = state;
        Ok(())
    }

    /// Flips the soft-delete flag and returns the new visibility.
    pub fn toggle_visibility(&mut self, id: OrderId) -> Result<bool, LedgerError> {
        let order = self.order_mut(id)?;
        order.visible = !order.visible;
        Ok(order.visible)
    }

    /// Hard removal. Visible orders may be deleted too; the caller decides.
    pub fn delete(&mut self, id: OrderId) -> Result<Order, LedgerError> {
        let index = self
            .orders
            .iter()
            .position(|order| order.id == id)
            .ok_or(LedgerError::OrderNotFound(id))?;
        Ok(self.orders.remove(index))
    }

    /// Drops every reference to `label`, returning how many orders changed.
    pub(crate) fn forget_label(&mut self, dimension: Dimension, label: &str) -> usize {
        let mut touched = 0;
        for order in &mut self.orders {
            let changed = match dimension {
                Dimension::Resource => {
                    if order.resource.as_deref() == Some(label) {
                        order.resource = None;
                        true
                    } else {
                        false
                    }
                }
                Dimension::Tag => order.tags.remove(label),
            };
            if changed {
                touched += 1;
            }
        }
        touched
    }

    pub(crate) fn from_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    fn order_mut(&mut self, id: OrderId) -> Result<&mut Order, LedgerError> {
        self.orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(LedgerError::OrderNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn registry() -> CategoryRegistry {
        let mut registry = CategoryRegistry::new();
        registry.add(Dimension::Resource, "Bank").unwrap();
        registry.add(Dimension::Resource, "Cash").unwrap();
        registry.add(Dimension::Tag, "Food").unwrap();
        registry.add(Dimension::Tag, "Service").unwrap();
        registry
    }

    #[test]
    fn create_assigns_unique_ids() {
        let mut store = OrderStore::new();
        let first = store.create();
        let second = store.create();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.orders()[0].id(), first);
    }

    #[test]
    fn invalid_date_keeps_previous_value() {
        let mut store = OrderStore::new();
        let id = store.create();
        store.set_date(id, "2024-02-29").unwrap();

        let err = store.set_date(id, "2024-02-30").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            store.get(id).unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn set_resource_requires_registered_label() {
        let registry = registry();
        let mut store = OrderStore::new();
        let id = store.create();

        store.set_resource(id, Some("Cash"), &registry).unwrap();
        let err = store
            .set_resource(id, Some("Gift card"), &registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.get(id).unwrap().resource(), Some("Cash"));

        store.set_resource(id, None, &registry).unwrap();
        assert_eq!(store.get(id).unwrap().resource(), None);
    }

    #[test]
    fn set_tags_is_atomic() {
        let registry = registry();
        let mut store = OrderStore::new();
        let id = store.create();
        store.set_tags(id, ["Food"], &registry).unwrap();

        assert!(store
            .set_tags(id, ["Service", "Unknown"], &registry)
            .is_err());
        assert_eq!(
            store.get(id).unwrap().tags().iter().collect::<Vec<_>>(),
            ["Food"]
        );

        store
            .set_tags(id, ["Service", "Food", "Service"], &registry)
            .unwrap();
        assert_eq!(store.get(id).unwrap().tags().len(), 2);
    }

    #[test]
    fn add_and_remove_single_tags() {
        let registry = registry();
        let mut store = OrderStore::new();
        let id = store.create();

        store.add_tag(id, "Food", &registry).unwrap();
        store.add_tag(id, "Food", &registry).unwrap();
        assert!(store.add_tag(id, "Other tag", &registry).is_err());
        assert_eq!(store.get(id).unwrap().tags().len(), 1);

        store.remove_tag(id, "Food").unwrap();
        assert_eq!(
            store.remove_tag(id, "Food").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn amounts_are_normalised() {
        let mut store = OrderStore::new();
        let id = store.create();
        store.set_amount(id, dec!(-12.345)).unwrap();
        assert_eq!(store.get(id).unwrap().amount(), dec!(-12.34));
    }

    #[test]
    fn oversized_amount_keeps_previous_value() {
        let mut store = OrderStore::new();
        let id = store.create();
        store.set_amount(id, dec!(250)).unwrap();

        let err = store.set_amount(id, Decimal::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, LedgerError::AmountOverflow(_)));
        assert_eq!(store.get(id).unwrap().amount(), dec!(250));
    }

    #[test]
    fn marking_done_leaves_date_unset() {
        let mut store = OrderStore::new();
        let id = store.create();
        store.set_state(id, TransactionState::Done).unwrap();

        let order = store.get(id).unwrap();
        assert_eq!(order.state(), TransactionState::Done);
        assert!(order.date().is_none());
    }

    #[test]
    fn toggle_visibility_twice_restores_original() {
        let mut store = OrderStore::new();
        let id = store.create();
        assert!(!store.toggle_visibility(id).unwrap());
        assert!(store.toggle_visibility(id).unwrap());
        assert!(store.get(id).unwrap().is_visible());
    }

    #[test]
    fn mutators_fail_for_unknown_id() {
        let registry = registry();
        let mut store = OrderStore::new();
        store.create();
        let missing = Uuid::new_v4();

        assert!(store.set_date(missing, "2024-01-01").is_err());
        assert!(store.set_description(missing, "x").is_err());
        assert!(store.set_amount(missing, dec!(1)).is_err());
        assert!(store.set_resource(missing, None, &registry).is_err());
        assert!(store.set_tags(missing, ["Food"], &registry).is_err());
        assert!(store.set_state(missing, TransactionState::Done).is_err());
        assert!(store.toggle_visibility(missing).is_err());
        assert!(matches!(
            store.delete(missing),
            Err(LedgerError::OrderNotFound(id)) if id == missing
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_visible_order_too() {
        let mut store = OrderStore::new();
        let ids: Vec<_> = (0..3).map(|_| store.create()).collect();
        for (index, id) in ids.iter().enumerate() {
            store
                .set_description(*id, &format!("Order {}", index))
                .unwrap();
        }

        let removed = store.delete(ids[1]).unwrap();
        assert_eq!(removed.description(), "Order 1");
        assert_eq!(
            store
                .orders()
                .iter()
                .map(Order::description)
                .collect::<Vec<_>>(),
            ["Order 0", "Order 2"]
        );
    }

    #[test]
    fn forget_label_cascades_into_orders() {
        let registry = registry();
        let mut store = OrderStore::new();
        let first = store.create();
        let second = store.create();
        store.set_resource(first, Some("Bank"), &registry).unwrap();
        store.set_tags(first, ["Food", "Service"], &registry).unwrap();
        store.set_tags(second, ["Food"], &registry).unwrap();

        assert_eq!(store.forget_label(Dimension::Tag, "Food"), 2);
        assert_eq!(store.forget_label(Dimension::Resource, "Bank"), 1);
        assert_eq!(store.forget_label(Dimension::Resource, "Bank"), 0);
        assert!(store.get(first).unwrap().resource().is_none());
        assert!(!store.get(second).unwrap().has_tag("Food"));
        assert!(store.get(first).unwrap().has_tag("Service"));
    }
}
