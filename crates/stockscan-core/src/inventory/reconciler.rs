//! Applies bill line items to an inventory ledger.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::InventoryError;
use crate::models::bill::LineItem;
use crate::models::config::InventoryConfig;
use crate::models::inventory::{InventoryEntry, InventoryLedger, TransactionKind};

use super::store::LedgerStore;

/// What happened to one ledger entry while applying one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerChange {
    /// Item name.
    pub name: String,
    /// Quantity before the item was applied; `None` when the entry was created.
    pub previous_quantity: Option<i64>,
    /// Quantity after the item was applied.
    pub new_quantity: i64,
    /// Signed change applied.
    pub delta: i64,
    /// Whether the stored unit price was overwritten.
    pub price_updated: bool,
}

impl LedgerChange {
    pub fn created(&self) -> bool {
        self.previous_quantity.is_none()
    }
}

/// Changes made by one reconciliation call, in item order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub kind: TransactionKind,
    pub changes: Vec<LedgerChange>,
}

impl ChangeSummary {
    fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            changes: Vec::new(),
        }
    }

    /// Number of entries created.
    pub fn created(&self) -> usize {
        self.changes.iter().filter(|c| c.created()).count()
    }

    /// Number of updates to entries that already existed.
    pub fn updated(&self) -> usize {
        self.changes.len() - self.created()
    }

    /// Entries whose quantity ended up below zero.
    pub fn overdrawn(&self) -> Vec<&LedgerChange> {
        self.changes.iter().filter(|c| c.new_quantity < 0).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Reconciles bill items against a ledger.
///
/// Purchases add stock and sales remove it; stock may go negative. A name
/// not yet in the ledger gets a new entry holding the item's price and
/// quantity, on either kind of bill. With
/// [`with_negative_new_stock`](Self::with_negative_new_stock) the missing
/// entry counts as zero stock instead, so a sale creates it below zero.
/// Applying the same items twice applies them twice: deduplicate bills
/// before calling.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    update_price_on_purchase: bool,
    negative_new_stock: bool,
}

impl Reconciler {
    /// Create a reconciler that keeps the first recorded unit price.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler from configuration.
    pub fn from_config(config: &InventoryConfig) -> Self {
        Self {
            update_price_on_purchase: config.update_price_on_purchase,
            negative_new_stock: config.sale_creates_negative_stock,
        }
    }

    /// Overwrite unit prices of existing entries on purchase.
    pub fn with_price_updates(mut self, update: bool) -> Self {
        self.update_price_on_purchase = update;
        self
    }

    /// Start missing entries from zero stock, so a sale creates them negative.
    pub fn with_negative_new_stock(mut self, negative: bool) -> Self {
        self.negative_new_stock = negative;
        self
    }

    /// Apply `items` to a ledger snapshot and return the updated snapshot.
    pub fn reconcile(
        &self,
        mut ledger: InventoryLedger,
        items: &[LineItem],
        kind: TransactionKind,
    ) -> (InventoryLedger, ChangeSummary) {
        let summary = match self.apply(&mut ledger, items, kind) {
            Ok(summary) => summary,
            Err(never) => match never {},
        };
        (ledger, summary)
    }

    /// Like [`reconcile`](Self::reconcile), with the kind given as a string.
    ///
    /// The kind is validated before any item is applied.
    pub fn reconcile_str(
        &self,
        ledger: InventoryLedger,
        items: &[LineItem],
        kind: &str,
    ) -> Result<(InventoryLedger, ChangeSummary), InventoryError> {
        let kind: TransactionKind = kind.parse()?;
        Ok(self.reconcile(ledger, items, kind))
    }

    /// Apply `items` to any ledger store, in order.
    ///
    /// A store error stops processing; items before it stay applied.
    pub fn apply<S>(
        &self,
        store: &mut S,
        items: &[LineItem],
        kind: TransactionKind,
    ) -> Result<ChangeSummary, S::Error>
    where
        S: LedgerStore + ?Sized,
    {
        let mut summary = ChangeSummary::new(kind);

        for item in items {
            let delta = kind.signed(item.quantity);

            let change = match store.get(&item.name)? {
                Some(mut entry) => {
                    let previous = entry.quantity;
                    entry.quantity = previous.saturating_add(delta);

                    let price_updated = kind == TransactionKind::Purchase
                        && self.update_price_on_purchase
                        && entry.unit_price != item.unit_price;
                    if price_updated {
                        entry.unit_price = item.unit_price;
                    }

                    let change = LedgerChange {
                        name: item.name.clone(),
                        previous_quantity: Some(previous),
                        new_quantity: entry.quantity,
                        delta,
                        price_updated,
                    };
                    store.put(entry)?;
                    change
                }
                None => {
                    let quantity = if self.negative_new_stock {
                        delta
                    } else {
                        i64::from(item.quantity)
                    };
                    store.put(InventoryEntry::new(item.name.clone(), quantity, item.unit_price))?;
                    LedgerChange {
                        name: item.name.clone(),
                        previous_quantity: None,
                        new_quantity: quantity,
                        delta: quantity,
                        price_updated: false,
                    }
                }
            };

            debug!(
                "{} {}: {:?} -> {}",
                kind, change.name, change.previous_quantity, change.new_quantity
            );
            summary.changes.push(change);
        }

        info!(
            "Reconciled {} items as {}: {} created, {} updated",
            items.len(),
            kind,
            summary.created(),
            summary.updated()
        );

        Ok(summary)
    }
}
