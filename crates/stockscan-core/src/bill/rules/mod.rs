//! Rule-based field extractors for bills.
//!
//! Each rule looks at the trimmed text of one OCR span and either yields a
//! [`BillField`] or nothing. Rules do not see each other's results, so one
//! span can feed several fields at once (a "Total: $15.00" line is both the
//! total and an item candidate).

pub mod amounts;
pub mod bill_number;
pub mod dates;
pub mod items;
pub mod patterns;

pub use amounts::{first_amount, parse_amount, AmountMatch, TotalAmountRule};
pub use bill_number::{extract_bill_number, BillNumberRule};
pub use dates::{extract_bill_date, BillDateRule};
pub use items::{extract_quantity, LineItemRule};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::bill::LineItem;

/// A partial result produced by a rule for one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillField {
    BillNumber(String),
    BillDate(NaiveDate),
    TotalAmount(Decimal),
    Item(LineItem),
}

/// A single extraction rule.
pub trait SpanRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect one trimmed span and report what it contributes, if anything.
    fn apply(&self, text: &str) -> Option<BillField>;
}

/// The built-in rules in priority order.
pub fn default_rules(strip_item_names: bool) -> Vec<Box<dyn SpanRule>> {
    vec![
        Box::new(BillNumberRule),
        Box::new(BillDateRule),
        Box::new(TotalAmountRule),
        Box::new(LineItemRule::new().with_stripped_names(strip_item_names)),
    ]
}
