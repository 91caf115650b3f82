use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    config::{tmp_path, write_atomic},
    errors::LedgerError,
    ledger::{CategoryRegistry, Dimension, Ledger, Order, OrderStore},
};

use super::{Result, StorageBackend};

const LEDGER_EXTENSION: &str = "json";

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk shape of a ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub schema_version: u32,
    pub resources: Vec<String>,
    pub tags: Vec<String>,
    pub orders: Vec<Order>,
}

impl LedgerDocument {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            resources: ledger.registry().resources().to_vec(),
            tags: ledger.registry().tags().to_vec(),
            orders: ledger.orders().to_vec(),
        }
    }

    /// Rebuilds the ledger, rejecting anything the in-memory invariants forbid.
    pub fn into_ledger(self) -> Result<Ledger> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(LedgerError::Corrupt(format!(
                "unsupported schema version {}",
                self.schema_version
            )));
        }

        let mut registry = CategoryRegistry::new();
        for (dimension, labels) in [
            (Dimension::Resource, &self.resources),
            (Dimension::Tag, &self.tags),
        ] {
            for label in labels {
                registry
                    .add(dimension, label)
                    .map_err(|err| LedgerError::Corrupt(err.to_string()))?;
            }
        }

        let mut seen = HashSet::new();
        for order in &self.orders {
            if !seen.insert(order.id()) {
                return Err(LedgerError::Corrupt(format!(
                    "duplicate order id {}",
                    order.id()
                )));
            }
            if let Some(resource) = order.resource() {
                if !registry.contains(Dimension::Resource, resource) {
                    return Err(LedgerError::Corrupt(format!(
                        "order {} references unknown resource `{}`",
                        order.id(),
                        resource
                    )));
                }
            }
            if let Some(tag) = order
                .tags()
                .iter()
                .find(|tag| !registry.contains(Dimension::Tag, tag))
            {
                return Err(LedgerError::Corrupt(format!(
                    "order {} references unknown tag `{}`",
                    order.id(),
                    tag
                )));
            }
        }

        Ok(Ledger::from_parts(
            registry,
            OrderStore::from_orders(self.orders),
        ))
    }
}

/// Serializes a ledger, hidden orders included.
pub fn dump(ledger: &Ledger) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LedgerDocument::from_ledger(
        ledger,
    ))?)
}

pub fn load(data: &str) -> Result<Ledger> {
    let document: LedgerDocument = serde_json::from_str(data)?;
    document.into_ledger()
}

/// Stores ledgers as `<root>/<name>.json`.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        let json = dump(ledger)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        info!(path = %path.display(), orders = ledger.orders().len(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        let data = fs::read_to_string(&path)?;
        let ledger = load(&data)?;
        debug!(path = %path.display(), orders = ledger.orders().len(), "ledger loaded");
        Ok(ledger)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}
