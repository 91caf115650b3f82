use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// The two independent label namespaces of a ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Something which represents or holds money (bank, cash, card).
    Resource,
    /// A category of expense; an order may carry several.
    Tag,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Resource, Dimension::Tag];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::Resource => "Resource",
            Dimension::Tag => "Tag",
        };
        f.write_str(label)
    }
}

/// Insertion-ordered sets of resource and tag labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    resources: Vec<String>,
    tags: Vec<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new label. Blank labels are rejected.
    pub fn add(&mut self, dimension: Dimension, label: &str) -> Result<(), LedgerError> {
        if label.is_empty() {
            return Err(LedgerError::InvalidLabel("label is empty".into()));
        }
        if label.chars().all(char::is_whitespace) {
            return Err(LedgerError::InvalidLabel(format!(
                "label `{}` is blank",
                label
            )));
        }
        let labels = self.labels_mut(dimension);
        if labels.iter().any(|item| item == label) {
            return Err(LedgerError::LabelExists {
                dimension,
                label: label.to_string(),
            });
        }
        labels.push(label.to_string());
        Ok(())
    }

    /// Unregisters a label. Orders are not touched here; see `CategoryService::remove`.
    pub fn remove(&mut self, dimension: Dimension, label: &str) -> Result<(), LedgerError> {
        let labels = self.labels_mut(dimension);
        match labels.iter().position(|item| item == label) {
            Some(index) => {
                labels.remove(index);
                Ok(())
            }
            None => Err(LedgerError::label_not_found(dimension, label)),
        }
    }

    pub fn list(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Resource => &self.resources,
            Dimension::Tag => &self.tags,
        }
    }

    /// Case-insensitive alphabetical listing used for display.
    pub fn sorted(&self, dimension: Dimension) -> Vec<String> {
        let mut labels = self.list(dimension).to_vec();
        labels.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
        labels
    }

    pub fn contains(&self, dimension: Dimension, label: &str) -> bool {
        self.list(dimension).iter().any(|item| item == label)
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn labels_mut(&mut self, dimension: Dimension) -> &mut Vec<String> {
        match dimension {
            Dimension::Resource => &mut self.resources,
            Dimension::Tag => &mut self.tags,
        }
    }
}
