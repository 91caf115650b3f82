#![allow(dead_code)]

use chrono::NaiveDate;
use ledger_core::{
    config::ConfigManager, ledger::parse_date, storage::JsonStorage, Dimension, LedgerEngine,
    OrderId, TransactionState,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Creates storage and config managers rooted in a fresh temp dir.
///
/// The returned guard must outlive both managers.
pub fn setup_test_env() -> (JsonStorage, ConfigManager, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    let storage = JsonStorage::new(base.join("ledgers")).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (storage, config_manager, temp)
}

pub fn day(text: &str) -> NaiveDate {
    parse_date(text).expect("valid test date")
}

/// Fluent helper for populating an engine in tests.
pub struct EngineBuilder {
    engine: LedgerEngine,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            engine: LedgerEngine::new(),
        }
    }

    pub fn resources(mut self, labels: &[&str]) -> Self {
        for label in labels {
            self.engine
                .add_category(Dimension::Resource, label)
                .expect("add resource");
        }
        self
    }

    pub fn tags(mut self, labels: &[&str]) -> Self {
        for label in labels {
            self.engine
                .add_category(Dimension::Tag, label)
                .expect("add tag");
        }
        self
    }

    pub fn order(mut self, fields: OrderSpec<'_>) -> Self {
        fields.apply(&mut self.engine);
        self
    }

    pub fn build(self) -> LedgerEngine {
        self.engine
    }
}

/// Field values for one order; unset fields keep the store defaults.
#[derive(Clone, Default)]
pub struct OrderSpec<'a> {
    pub date: Option<&'a str>,
    pub description: &'a str,
    pub amount: Decimal,
    pub resource: Option<&'a str>,
    pub tags: &'a [&'a str],
    pub state: Option<TransactionState>,
    pub hidden: bool,
}

impl OrderSpec<'_> {
    pub fn apply(&self, engine: &mut LedgerEngine) -> OrderId {
        let id = engine.create_order();
        if let Some(date) = self.date {
            engine.set_date(id, date).expect("set date");
        }
        engine
            .set_description(id, self.description)
            .expect("set description");
        engine.set_amount(id, self.amount).expect("set amount");
        engine.set_resource(id, self.resource).expect("set resource");
        engine.set_tags(id, self.tags).expect("set tags");
        if let Some(state) = self.state {
            engine.set_state(id, state).expect("set state");
        }
        if self.hidden {
            engine.toggle_visibility(id).expect("hide order");
        }
        id
    }
}
