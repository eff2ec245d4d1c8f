//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for stockscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockscanConfig {
    /// OCR detector configuration.
    pub ocr: OcrConfig,

    /// Bill extraction configuration.
    pub extraction: ExtractionConfig,

    /// Inventory reconciliation configuration.
    pub inventory: InventoryConfig,
}

/// OCR detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }
}

/// Bill extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Spans with a lower OCR confidence are dropped before extraction.
    /// `0.0` keeps every span.
    pub min_span_confidence: f32,

    /// Remove the price and quantity markers from item names instead of
    /// keeping the whole OCR line.
    pub strip_item_names: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_span_confidence: 0.0,
            strip_item_names: false,
        }
    }
}

/// Inventory reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Overwrite the stored unit price of an existing item with the price
    /// from a purchase bill. When off, the first recorded price is kept.
    pub update_price_on_purchase: bool,

    /// Treat an item missing from the ledger as zero stock, so a sale of it
    /// creates a negative entry. When off, a new entry always starts at the
    /// bill quantity, whatever the transaction kind.
    pub sale_creates_negative_stock: bool,

    /// Ledger file used by the command-line front-end.
    pub ledger_path: PathBuf,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            update_price_on_purchase: false,
            sale_creates_negative_stock: false,
            ledger_path: PathBuf::from("inventory.csv"),
        }
    }
}

impl StockscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
