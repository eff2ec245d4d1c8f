//! Ledger storage capability.

use std::convert::Infallible;

use crate::models::inventory::{InventoryEntry, InventoryLedger};

/// Minimal read/write access to a ledger.
///
/// The reconciler only ever looks up one entry by name and writes one entry
/// back, so an in-memory map and a row-per-item table can both back it.
pub trait LedgerStore {
    /// Error raised by the backing storage.
    type Error;

    /// Fetch the entry for `name`, if any.
    fn get(&self, name: &str) -> Result<Option<InventoryEntry>, Self::Error>;

    /// Insert or replace the entry keyed by `entry.name`.
    fn put(&mut self, entry: InventoryEntry) -> Result<(), Self::Error>;
}

impl LedgerStore for InventoryLedger {
    type Error = Infallible;

    fn get(&self, name: &str) -> Result<Option<InventoryEntry>, Self::Error> {
        Ok(InventoryLedger::get(self, name).cloned())
    }

    fn put(&mut self, entry: InventoryEntry) -> Result<(), Self::Error> {
        self.insert(entry);
        Ok(())
    }
}
