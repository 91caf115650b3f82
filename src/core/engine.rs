use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::Config;
use crate::core::services::{
    AmountBuckets, CategoryService, CategoryTable, PeriodAmount, ServiceResult, SummaryService,
};
use crate::filter::{self, Filter, ItemSelector};
use crate::ledger::{Dimension, Ledger, Order, OrderId, TransactionState};
use crate::storage::{self, StorageBackend};

/// Exclusive owner of one ledger and the filter applied to it.
///
/// Every mutation takes `&mut self`, so interleaved writers are ruled out at
/// compile time. Wrap it in [`SharedLedger`] to hand it across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerEngine {
    ledger: Ledger,
    filter: Filter,
}

impl LedgerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            ledger: Ledger::new(),
            filter: Filter::from_config(config),
        }
    }

    pub fn from_ledger(ledger: Ledger, filter: Filter) -> Self {
        Self { ledger, filter }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Mutable access to the filter; label cascades only happen through the
    /// category methods below.
    pub fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }

    pub fn into_parts(self) -> (Ledger, Filter) {
        (self.ledger, self.filter)
    }

    // Categories

    pub fn add_category(&mut self, dimension: Dimension, label: &str) -> ServiceResult<()> {
        CategoryService::add(&mut self.ledger, dimension, label)?;
        self.filter.track_label(dimension, label);
        Ok(())
    }

    /// Removes a label from the registry, every order and the filter.
    pub fn remove_category(&mut self, dimension: Dimension, label: &str) -> ServiceResult<usize> {
        CategoryService::remove_with_filter(&mut self.ledger, &mut self.filter, dimension, label)
    }

    pub fn categories(&self, dimension: Dimension) -> &[String] {
        CategoryService::list(&self.ledger, dimension)
    }

    pub fn sorted_categories(&self, dimension: Dimension) -> Vec<String> {
        self.ledger.registry().sorted(dimension)
    }

    /// Enables category filtering over every registered label of `dimension`.
    pub fn enable_category_filter(&mut self, dimension: Dimension) {
        let labels = self.ledger.registry().list(dimension).to_vec();
        self.filter.enable_category_filter(dimension, labels);
    }

    pub fn disable_category_filter(&mut self, dimension: Dimension) {
        self.filter.disable_category_filter(dimension);
    }

    pub fn toggle_category_selection(
        &mut self,
        dimension: Dimension,
        label: &str,
    ) -> ServiceResult<ItemSelector> {
        self.filter.toggle_category_selection(dimension, label)
    }

    // Orders

    pub fn create_order(&mut self) -> OrderId {
        self.ledger.create_order()
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.ledger.order(id)
    }

    pub fn set_date(&mut self, id: OrderId, text: &str) -> ServiceResult<()> {
        self.ledger.set_date(id, text)
    }

    pub fn clear_date(&mut self, id: OrderId) -> ServiceResult<()> {
        self.ledger.clear_date(id)
    }

    pub fn set_description(&mut self, id: OrderId, text: &str) -> ServiceResult<()> {
        self.ledger.set_description(id, text)
    }

    pub fn set_amount(&mut self, id: OrderId, value: Decimal) -> ServiceResult<()> {
        self.ledger.set_amount(id, value)
    }

    pub fn set_resource(&mut self, id: OrderId, label: Option<&str>) -> ServiceResult<()> {
        self.ledger.set_resource(id, label)
    }

    pub fn set_tags<I, S>(&mut self, id: OrderId, labels: I) -> ServiceResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ledger.set_tags(id, labels)
    }

    pub fn add_tag(&mut self, id: OrderId, label: &str) -> ServiceResult<()> {
        self.ledger.add_tag(id, label)
    }

    pub fn remove_tag(&mut self, id: OrderId, label: &str) -> ServiceResult<()> {
        self.ledger.remove_tag(id, label)
    }

    pub fn set_state(&mut self, id: OrderId, state: TransactionState) -> ServiceResult<()> {
        self.ledger.set_state(id, state)
    }

    pub fn toggle_visibility(&mut self, id: OrderId) -> ServiceResult<bool> {
        self.ledger.toggle_visibility(id)
    }

    pub fn delete_order(&mut self, id: OrderId) -> ServiceResult<Order> {
        self.ledger.delete_order(id)
    }

    // Queries

    pub fn filtered_orders(&self) -> Vec<Order> {
        filter::filtered_and_sorted(self.ledger.orders(), &self.filter)
    }

    pub fn filtered_sum(&self) -> ServiceResult<Decimal> {
        filter::sum_filtered(self.ledger.orders(), &self.filter)
    }

    pub fn category_totals(&self, dimension: Dimension, label: &str) -> ServiceResult<AmountBuckets> {
        SummaryService::category_totals(&self.ledger, &self.filter, dimension, label)
    }

    pub fn category_table(&self, dimension: Dimension) -> ServiceResult<CategoryTable> {
        SummaryService::category_table(&self.ledger, &self.filter, dimension)
    }

    pub fn absolute_amount_by_date(
        &self,
        dimension: Dimension,
        label: &str,
        as_of: NaiveDate,
    ) -> ServiceResult<AmountBuckets> {
        SummaryService::absolute_amount_by_date(&self.ledger, &self.filter, dimension, label, as_of)
    }

    pub fn relative_amount_by_date(
        &self,
        dimension: Dimension,
        label: &str,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<AmountBuckets> {
        SummaryService::relative_amount_by_date(
            &self.ledger,
            &self.filter,
            dimension,
            label,
            begin,
            end,
        )
    }

    pub fn absolute_series(
        &self,
        dimension: Dimension,
        label: &str,
        dates: &[NaiveDate],
    ) -> Vec<(NaiveDate, Option<AmountBuckets>)> {
        SummaryService::absolute_series(&self.ledger, &self.filter, dimension, label, dates)
    }

    pub fn relative_series(
        &self,
        dimension: Dimension,
        label: &str,
        periods: &[(NaiveDate, NaiveDate)],
    ) -> Vec<PeriodAmount> {
        SummaryService::relative_series(&self.ledger, &self.filter, dimension, label, periods)
    }

    // Persistence

    pub fn dump(&self) -> ServiceResult<String> {
        storage::dump(&self.ledger)
    }

    /// Replaces the ledger with the parsed one. The filter is reset to its
    /// current preferences with category selections cleared.
    pub fn load(&mut self, data: &str) -> ServiceResult<()> {
        let ledger = storage::load(data)?;
        self.replace_ledger(ledger);
        Ok(())
    }

    pub fn save(&self, backend: &dyn StorageBackend, name: &str) -> ServiceResult<()> {
        backend.save(&self.ledger, name)
    }

    pub fn open(&mut self, backend: &dyn StorageBackend, name: &str) -> ServiceResult<()> {
        let ledger = backend.load(name)?;
        info!(name, orders = ledger.orders().len(), "ledger opened");
        self.replace_ledger(ledger);
        Ok(())
    }

    fn replace_ledger(&mut self, ledger: Ledger) {
        let mut filter = Filter::new();
        filter.set_visibility(self.filter.visibility);
        filter.set_ordering(self.filter.ordering, self.filter.direction);
        self.ledger = ledger;
        self.filter = filter;
    }
}

/// Cloneable handle serializing access to one [`LedgerEngine`].
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<LedgerEngine>>,
}

impl SharedLedger {
    pub fn new(engine: LedgerEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Locks the engine. A poisoned lock is recovered since every engine
    /// mutation is all-or-nothing.
    pub fn lock(&self) -> MutexGuard<'_, LedgerEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerEngine) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn new_label_joins_enabled_filter_at_default() {
        let mut engine = LedgerEngine::new();
        engine.add_category(Dimension::Resource, "Bank").unwrap();
        engine.add_category(Dimension::Tag, "Food").unwrap();
        engine.enable_category_filter(Dimension::Resource);
        engine.enable_category_filter(Dimension::Tag);

        engine.add_category(Dimension::Resource, "Cash").unwrap();
        engine.add_category(Dimension::Tag, "Home").unwrap();

        let filter = engine.filter();
        assert_eq!(
            filter.category_state(Dimension::Resource, "Cash"),
            Some(ItemSelector::Selected)
        );
        assert_eq!(
            filter.category_state(Dimension::Tag, "Home"),
            Some(ItemSelector::Discarded)
        );
    }

    #[test]
    fn label_removal_reaches_filter_and_orders() {
        let mut engine = LedgerEngine::new();
        engine.add_category(Dimension::Tag, "Food").unwrap();
        engine.enable_category_filter(Dimension::Tag);
        engine.toggle_category_selection(Dimension::Tag, "Food").unwrap();
        let id = engine.create_order();
        engine.add_tag(id, "Food").unwrap();
        assert_eq!(engine.filtered_orders().len(), 1);

        assert_eq!(engine.remove_category(Dimension::Tag, "Food").unwrap(), 1);
        assert!(engine.order(id).unwrap().tags().is_empty());
        assert_eq!(engine.filter().category_state(Dimension::Tag, "Food"), None);
        assert!(!engine.filter().is_restricted(Dimension::Tag));
        assert!(matches!(
            engine.toggle_category_selection(Dimension::Tag, "Food"),
            Err(LedgerError::LabelNotFound { .. })
        ));
    }

    #[test]
    fn load_replaces_ledger_and_clears_selections() {
        let mut engine = LedgerEngine::new();
        engine.add_category(Dimension::Resource, "Bank").unwrap();
        let id = engine.create_order();
        engine.set_amount(id, dec!(12.5)).unwrap();
        engine.set_resource(id, Some("Bank")).unwrap();
        let text = engine.dump().unwrap();

        let mut other = LedgerEngine::new();
        other.add_category(Dimension::Resource, "Old").unwrap();
        other.enable_category_filter(Dimension::Resource);
        other.load(&text).unwrap();

        assert_eq!(other.ledger(), engine.ledger());
        assert!(!other.filter().category_selection(Dimension::Resource).is_enabled());
        assert_eq!(other.filtered_sum().unwrap(), dec!(12.50));
    }

    #[test]
    fn failed_load_keeps_previous_ledger() {
        let mut engine = LedgerEngine::new();
        engine.add_category(Dimension::Resource, "Bank").unwrap();
        assert!(engine.load("{ not json").is_err());
        assert_eq!(engine.categories(Dimension::Resource), ["Bank"]);
    }

    #[test]
    fn shared_handle_serializes_writers() {
        let shared = SharedLedger::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.with(|engine| {
                            let id = engine.create_order();
                            engine.set_amount(id, dec!(1)).unwrap();
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let engine = shared.lock();
        assert_eq!(engine.ledger().orders().len(), 100);
        assert_eq!(engine.filtered_sum().unwrap(), dec!(100));
    }
}
