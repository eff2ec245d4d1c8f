//! Inventory reconciliation module.

mod reconciler;
mod store;

pub use reconciler::{ChangeSummary, LedgerChange, Reconciler};
pub use store::LedgerStore;
