//! Error types for the stockscan-core library.

use thiserror::Error;

/// Main error type for the stockscan library.
#[derive(Error, Debug)]
pub enum StockscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Inventory reconciliation error.
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an OCR span detector.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text detection failed: {0}")]
    Detection(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to inventory reconciliation.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The caller passed an argument the reconciler cannot act on,
    /// e.g. a transaction kind other than purchase or sale.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing ledger store failed to read or write an entry.
    #[error("ledger store error: {0}")]
    Store(String),
}

/// Result type for the stockscan library.
pub type Result<T> = std::result::Result<T, StockscanError>;
