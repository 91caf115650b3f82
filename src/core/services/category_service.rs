use tracing::debug;

use crate::errors::LedgerError;
use crate::filter::Filter;
use crate::ledger::{Dimension, Ledger};

use super::ServiceResult;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, dimension: Dimension, label: &str) -> ServiceResult<()> {
        ledger.registry.add(dimension, label)
    }

    /// Unregisters a label and strips it from every order referencing it.
    ///
    /// Returns the number of orders that lost the reference. Filters are not
    /// touched: a stale entry can keep its dimension restricted, so callers
    /// holding a filter use [`CategoryService::remove_with_filter`].
    pub fn remove(ledger: &mut Ledger, dimension: Dimension, label: &str) -> ServiceResult<usize> {
        ledger.registry.remove(dimension, label)?;
        let touched = ledger.store.forget_label(dimension, label);
        debug!(%dimension, label, touched, "category removed");
        Ok(touched)
    }

    /// Like [`CategoryService::remove`], also dropping the label from `filter`.
    pub fn remove_with_filter(
        ledger: &mut Ledger,
        filter: &mut Filter,
        dimension: Dimension,
        label: &str,
    ) -> ServiceResult<usize> {
        let touched = Self::remove(ledger, dimension, label)?;
        if filter.forget_label(dimension, label) {
            debug!(%dimension, label, "label dropped from filter");
        }
        Ok(touched)
    }

    pub fn list(ledger: &Ledger, dimension: Dimension) -> &[String] {
        ledger.registry.list(dimension)
    }

    /// Fails with `LabelNotFound` unless the label is registered.
    pub fn ensure_exists(ledger: &Ledger, dimension: Dimension, label: &str) -> ServiceResult<()> {
        if ledger.registry.contains(dimension, label) {
            Ok(())
        } else {
            Err(LedgerError::label_not_found(dimension, label))
        }
    }
}
