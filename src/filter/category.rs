//! Filtering option which allows or not an `Order` according to its *category* subscription.

use serde::{Deserialize, Serialize};

use super::ItemSelector;
use CategorySelection::{CategoryIgnored, Enabled};

/// Selection state of one label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelSelection {
    pub label: String,
    pub selector: ItemSelector,
}

impl LabelSelection {
    pub fn new(label: impl Into<String>, selector: ItemSelector) -> Self {
        Self {
            label: label.into(),
            selector,
        }
    }
}

/// Filtering options for tags or resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    CategoryIgnored,
    Enabled(Vec<LabelSelection>),
}

impl CategorySelection {
    /// Replaces every entry with `labels`, all set to `selector`.
    pub fn set_all<I, S>(&mut self, labels: I, selector: ItemSelector)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<LabelSelection> = Vec::new();
        for label in labels {
            let label = label.into();
            if !entries.iter().any(|entry| entry.label == label) {
                entries.push(LabelSelection::new(label, selector));
            }
        }
        *self = Enabled(entries);
    }

    /// Sets one label, enabling the selection if needed.
    pub fn set(&mut self, label: &str, selector: ItemSelector) {
        match self {
            CategoryIgnored => *self = Enabled(vec![LabelSelection::new(label, selector)]),
            Enabled(entries) => match entries.iter_mut().find(|entry| entry.label == label) {
                Some(entry) => entry.selector = selector,
                None => entries.push(LabelSelection::new(label, selector)),
            },
        }
    }

    /// Toggles a known label and returns the state it had before.
    pub fn toggle(&mut self, label: &str) -> Option<ItemSelector> {
        let Enabled(entries) = self else {
            return None;
        };
        let entry = entries.iter_mut().find(|entry| entry.label == label)?;
        let previous = entry.selector;
        entry.selector.toggle();
        Some(previous)
    }

    /// Drops a label. Removing the last entry disables the selection.
    pub fn remove(&mut self, label: &str) -> bool {
        let Enabled(entries) = self else {
            return false;
        };
        let Some(index) = entries.iter().position(|entry| entry.label == label) else {
            return false;
        };
        entries.remove(index);
        if entries.is_empty() {
            *self = CategoryIgnored;
        }
        true
    }

    pub fn get(&self, label: &str) -> Option<ItemSelector> {
        match self {
            CategoryIgnored => None,
            Enabled(entries) => entries
                .iter()
                .find(|entry| entry.label == label)
                .map(|entry| entry.selector),
        }
    }

    /// State of `label`, falling back to `default` when it has no entry.
    pub fn selector_or(&self, label: &str, default: ItemSelector) -> ItemSelector {
        self.get(label).unwrap_or(default)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Enabled(_))
    }

    pub fn entries(&self) -> &[LabelSelection] {
        match self {
            CategoryIgnored => &[],
            Enabled(entries) => entries,
        }
    }

    pub fn all_selected(&self) -> bool {
        self.entries()
            .iter()
            .all(|entry| entry.selector == ItemSelector::Selected)
    }

    pub fn any_selected(&self) -> bool {
        self.entries()
            .iter()
            .any(|entry| entry.selector == ItemSelector::Selected)
    }
}
