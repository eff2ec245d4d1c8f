//! Inventory ledger models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Stock level and reference price of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Item name; unique within a ledger.
    pub name: String,

    /// Units on hand. Negative after a sale that overdraws stock.
    pub quantity: i64,

    /// Reference unit price.
    pub unit_price: Decimal,
}

impl InventoryEntry {
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }
}

/// In-memory snapshot of the inventory, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLedger {
    entries: BTreeMap<String, InventoryEntry>,
}

impl InventoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by item name.
    pub fn get(&self, name: &str) -> Option<&InventoryEntry> {
        self.entries.get(name)
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, entry: InventoryEntry) -> Option<InventoryEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    /// Total value of stock on hand (quantity times unit price).
    pub fn stock_value(&self) -> Decimal {
        self.entries
            .values()
            .map(|e| e.unit_price * Decimal::from(e.quantity))
            .sum()
    }
}

impl FromIterator<InventoryEntry> for InventoryLedger {
    fn from_iter<I: IntoIterator<Item = InventoryEntry>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for entry in iter {
            ledger.insert(entry);
        }
        ledger
    }
}

impl IntoIterator for InventoryLedger {
    type Item = InventoryEntry;
    type IntoIter = std::collections::btree_map::IntoValues<String, InventoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// Direction of stock movement for a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Stock comes in.
    Purchase,
    /// Stock goes out.
    Sale,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }

    /// Signed quantity change for `quantity` units of this kind.
    pub fn signed(&self, quantity: u32) -> i64 {
        match self {
            Self::Purchase => i64::from(quantity),
            Self::Sale => -i64::from(quantity),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(InventoryError::InvalidArgument(format!(
                "unknown transaction kind '{}', expected 'purchase' or 'sale'",
                other
            ))),
        }
    }
}
