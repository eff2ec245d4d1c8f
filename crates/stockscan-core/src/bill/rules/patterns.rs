//! Common regex patterns for bill extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Invoice #123", "Bill No. 42", "Receipt: 7", "RECEIPT#0009"
    pub static ref BILL_NUMBER: Regex = Regex::new(
        r"(?i)(?:bill|invoice|receipt)\s*(?:#|no\.?)?\s*[:#]?\s*(\d+)"
    ).unwrap();

    // Month/day/year with '-' or '/' separators; may be glued to other text,
    // but the year must not run into further digits
    pub static ref DATE_MDY: Regex = Regex::new(
        r"(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})(?:\D|$)"
    ).unwrap();

    // Dollar amount, symbol before ("$ 5.00") or after ("5.00$", "5.00 $")
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"\$\s*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)\s*\$"
    ).unwrap();

    // Quantity marker "x3" / "X 12", anywhere in the span
    pub static ref QUANTITY_MARKER: Regex = Regex::new(
        r"(?i)(?P<marker>x\s*(?P<qty>\d+))"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}
