//! Bill number extraction.

use super::patterns::BILL_NUMBER;
use super::{BillField, SpanRule};

/// Matches "Bill/Invoice/Receipt" labels followed by digits.
pub struct BillNumberRule;

impl SpanRule for BillNumberRule {
    fn name(&self) -> &'static str {
        "bill_number"
    }

    fn apply(&self, text: &str) -> Option<BillField> {
        extract_bill_number(text).map(BillField::BillNumber)
    }
}

/// Extract the digits of a labelled bill number.
pub fn extract_bill_number(text: &str) -> Option<String> {
    BILL_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_any_case() {
        for text in ["Invoice #123", "INVOICE #123", "invoice #123", "InVoIcE #123"] {
            assert_eq!(extract_bill_number(text), Some("123".to_string()), "{}", text);
        }
    }

    #[test]
    fn test_label_variants() {
        assert_eq!(extract_bill_number("Bill No. 42"), Some("42".to_string()));
        assert_eq!(extract_bill_number("Receipt: 0007"), Some("0007".to_string()));
        assert_eq!(extract_bill_number("Bill No: 9"), Some("9".to_string()));
        assert_eq!(extract_bill_number("Receipt#55"), Some("55".to_string()));
    }

    #[test]
    fn test_no_label() {
        assert_eq!(extract_bill_number("#123"), None);
        assert_eq!(extract_bill_number("Invoice"), None);
        assert_eq!(extract_bill_number("Invoice number pending"), None);
    }
}
