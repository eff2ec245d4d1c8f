//! Core library for bill scanning and inventory reconciliation.
//!
//! This crate provides:
//! - OCR span model and the detector seam (`pure-onnx-ocr` backed when `native` is on)
//! - Rule-based bill extraction (bill number, date, total, line items)
//! - Inventory reconciliation of purchase and sale bills against a ledger
//! - Configuration for extraction and reconciliation policy

pub mod error;
pub mod models;
pub mod ocr;
pub mod bill;
pub mod inventory;

pub use error::{StockscanError, Result};
pub use models::bill::{BillRecord, LineItem};
pub use models::inventory::{InventoryEntry, InventoryLedger, TransactionKind};
pub use models::config::StockscanConfig;
pub use ocr::{OcrSpan, SpanDetector};
#[cfg(feature = "native")]
pub use ocr::PureOcrDetector;
pub use bill::{BillExtractor, ExtractionReport};
pub use inventory::{ChangeSummary, LedgerChange, LedgerStore, Reconciler};
