//! # Management of filtering options for an `Order` list.

pub mod category;
pub mod date;
pub mod matcher;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::LedgerError;
use crate::ledger::{parse_date, Dimension, TransactionState};
pub use category::{CategorySelection, LabelSelection};
pub use date::DateRange;
pub use matcher::{filtered_and_sorted, matches, sum_filtered};
use ItemSelector::{Discarded, Selected};

/// Stores current state of a given filter parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemSelector {
    /// Filter out.
    Discarded,
    /// Filter in.
    Selected,
}

impl ItemSelector {
    pub fn toggle(&mut self) {
        *self = match *self {
            Discarded => Selected,
            Selected => Discarded,
        };
    }
}

/// State a label starts in when filtering is enabled for its dimension.
///
/// Resources start fully included while tags start fully excluded; the two
/// dimensions intentionally differ.
pub fn default_selection(dimension: Dimension) -> ItemSelector {
    match dimension {
        Dimension::Resource => Selected,
        Dimension::Tag => Discarded,
    }
}

/// Filtering options for visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum VisibilityFilter {
    /// Hidden and visible orders alike.
    VisibilityIgnored,
    #[default]
    VisibleOnly,
    HiddenOnly,
}

/// Sort key of the filtered sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderingPreference {
    /// Keeps the store's creation order.
    #[default]
    ByCreation,
    ByDate,
    ByAmount,
    ByDescription,
    ByState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderingDirection {
    #[default]
    Ascending,
    Descending,
}

/// One selector per transaction state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateSelection {
    pub pending: ItemSelector,
    pub in_progress: ItemSelector,
    pub done: ItemSelector,
}

impl Default for StateSelection {
    fn default() -> Self {
        Self {
            pending: Selected,
            in_progress: Selected,
            done: Selected,
        }
    }
}

impl StateSelection {
    pub fn get(&self, state: TransactionState) -> ItemSelector {
        match state {
            TransactionState::Pending => self.pending,
            TransactionState::InProgress => self.in_progress,
            TransactionState::Done => self.done,
        }
    }

    fn get_mut(&mut self, state: TransactionState) -> &mut ItemSelector {
        match state {
            TransactionState::Pending => &mut self.pending,
            TransactionState::InProgress => &mut self.in_progress,
            TransactionState::Done => &mut self.done,
        }
    }
}

/// Stores all filtering options.
///
/// Labels are held by value and a filter is not tied to a registry. Entries
/// for removed labels linger until [`Filter::forget_label`] drops them, and a
/// lingering entry still counts towards [`Filter::is_restricted`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub visibility: VisibilityFilter,
    pub ordering: OrderingPreference,
    pub direction: OrderingDirection,
    states: StateSelection,
    date_range: DateRange,
    resources: CategorySelection,
    tags: CategorySelection,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            visibility: config.default_visibility,
            ordering: config.default_ordering,
            direction: config.default_direction,
            ..Self::default()
        }
    }

    pub fn category_selection(&self, dimension: Dimension) -> &CategorySelection {
        match dimension {
            Dimension::Resource => &self.resources,
            Dimension::Tag => &self.tags,
        }
    }

    fn category_selection_mut(&mut self, dimension: Dimension) -> &mut CategorySelection {
        match dimension {
            Dimension::Resource => &mut self.resources,
            Dimension::Tag => &mut self.tags,
        }
    }

    /// Explicit state of a label, if the dimension is enabled and knows it.
    pub fn category_state(&self, dimension: Dimension, label: &str) -> Option<ItemSelector> {
        self.category_selection(dimension).get(label)
    }

    pub fn set_category_selection(
        &mut self,
        dimension: Dimension,
        label: &str,
        selector: ItemSelector,
    ) {
        self.category_selection_mut(dimension).set(label, selector);
    }

    /// Flips a label and returns the state it had before.
    pub fn toggle_category_selection(
        &mut self,
        dimension: Dimension,
        label: &str,
    ) -> Result<ItemSelector, LedgerError> {
        self.category_selection_mut(dimension)
            .toggle(label)
            .ok_or_else(|| LedgerError::label_not_found(dimension, label))
    }

    /// Initialises every given label of a dimension to `selector`.
    pub fn bulk_set<I, S>(&mut self, dimension: Dimension, labels: I, selector: ItemSelector)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_selection_mut(dimension)
            .set_all(labels, selector);
    }

    /// Turns filtering on for a dimension using its default starting state.
    pub fn enable_category_filter<I, S>(&mut self, dimension: Dimension, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bulk_set(dimension, labels, default_selection(dimension));
    }

    pub fn disable_category_filter(&mut self, dimension: Dimension) {
        *self.category_selection_mut(dimension) = CategorySelection::CategoryIgnored;
    }

    /// Registers a label that appeared after filtering was enabled.
    pub fn track_label(&mut self, dimension: Dimension, label: &str) {
        let selection = self.category_selection_mut(dimension);
        if selection.is_enabled() && selection.get(label).is_none() {
            selection.set(label, default_selection(dimension));
        }
    }

    /// Drops a label from the selection map.
    pub fn forget_label(&mut self, dimension: Dimension, label: &str) -> bool {
        self.category_selection_mut(dimension).remove(label)
    }

    /// Whether the dimension currently narrows the result set.
    ///
    /// Resources restrict once some label is discarded; tags restrict once
    /// some label is selected. Entries for labels no longer registered count
    /// too.
    pub fn is_restricted(&self, dimension: Dimension) -> bool {
        let selection = self.category_selection(dimension);
        match (dimension, selection.is_enabled()) {
            (_, false) => false,
            (Dimension::Resource, true) => !selection.all_selected(),
            (Dimension::Tag, true) => selection.any_selected(),
        }
    }

    pub fn state_selection(&self) -> &StateSelection {
        &self.states
    }

    pub fn state_selector(&self, state: TransactionState) -> ItemSelector {
        self.states.get(state)
    }

    pub fn toggle_state(&mut self, state: TransactionState) {
        self.states.get_mut(state).toggle();
    }

    pub fn set_state_selection(&mut self, state: TransactionState, selector: ItemSelector) {
        *self.states.get_mut(state) = selector;
    }

    pub fn set_visibility(&mut self, visibility: VisibilityFilter) {
        self.visibility = visibility;
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    /// Sets the lower bound. Invalid text keeps the current range.
    pub fn set_date_begin(&mut self, text: &str) -> Result<(), LedgerError> {
        let begin = parse_date(text)?;
        self.date_range = self.date_range.with_begin(begin);
        Ok(())
    }

    /// Sets the upper bound. Invalid text keeps the current range.
    pub fn set_date_end(&mut self, text: &str) -> Result<(), LedgerError> {
        let end = parse_date(text)?;
        self.date_range = self.date_range.with_end(end);
        Ok(())
    }

    pub fn clear_date_range(&mut self) {
        self.date_range = DateRange::DateIgnored;
    }

    pub fn set_ordering(&mut self, ordering: OrderingPreference, direction: OrderingDirection) {
        self.ordering = ordering;
        self.direction = direction;
    }
}
