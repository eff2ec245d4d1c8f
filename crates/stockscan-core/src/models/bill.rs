//! Bill data models produced by the extractor.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line item read off a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name. Never empty.
    pub name: String,

    /// Number of units, at least 1.
    pub quantity: u32,

    /// Price of a single unit.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Create a new line item.
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Quantity times unit price.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Structured data extracted from one bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    /// Bill, invoice or receipt number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,

    /// Date printed on the bill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<NaiveDate>,

    /// Total amount; zero when no total line was found.
    #[serde(default)]
    pub total_amount: Decimal,

    /// Line items in OCR span order.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl BillRecord {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.bill_number.is_none()
            && self.bill_date.is_none()
            && self.total_amount.is_zero()
            && self.items.is_empty()
    }

    /// Sum of all line totals.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }
}
