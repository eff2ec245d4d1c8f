//! Bill extractor applying the rule chain to OCR spans.

use std::time::Instant;

use tracing::{debug, info, trace};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::bill::{BillRecord, LineItem};
use crate::models::config::ExtractionConfig;
use crate::ocr::OcrSpan;

use super::rules::{default_rules, BillField, SpanRule};

/// Extraction result with diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Extracted bill data.
    pub record: BillRecord,
    /// Things that were expected on a bill but not found.
    pub warnings: Vec<String>,
    /// Number of spans received.
    pub spans_total: usize,
    /// Spans dropped by the confidence filter.
    pub spans_dropped: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Turns OCR spans into a [`BillRecord`].
///
/// Spans are visited in order and every rule sees every span. For the bill
/// number, date and total the first value produced wins; items accumulate.
/// Extraction never fails: an unrecognizable bill is an empty record.
pub struct BillExtractor {
    rules: Vec<Box<dyn SpanRule>>,
    min_confidence: f32,
}

impl BillExtractor {
    /// Create an extractor with the built-in rules and no confidence filter.
    pub fn new() -> Self {
        Self {
            rules: default_rules(false),
            min_confidence: 0.0,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: default_rules(config.strip_item_names),
            min_confidence: config.min_span_confidence,
        }
    }

    /// Set minimum span confidence.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: Box<dyn SpanRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Names of the active rules in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Extract a bill record from OCR spans.
    pub fn extract(&self, spans: &[OcrSpan]) -> BillRecord {
        self.run(spans).0
    }

    /// Extract from plain text, one span per line.
    pub fn extract_from_text(&self, text: &str) -> BillRecord {
        let spans: Vec<OcrSpan> = text.lines().map(OcrSpan::from).collect();
        self.extract(&spans)
    }

    /// Extract a bill record and report what is missing.
    pub fn extract_with_report(&self, spans: &[OcrSpan]) -> ExtractionReport {
        let start = Instant::now();

        info!("Extracting bill from {} spans", spans.len());

        let (record, spans_dropped) = self.run(spans);

        let mut warnings = Vec::new();
        if record.bill_number.is_none() {
            warnings.push("Could not extract bill number".to_string());
        }
        if record.bill_date.is_none() {
            warnings.push("Could not extract bill date".to_string());
        }
        if record.total_amount.is_zero() {
            warnings.push("Could not extract total amount".to_string());
        }
        if record.items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        } else if !record.total_amount.is_zero() && record.items_total() != record.total_amount {
            warnings.push(format!(
                "Total {} does not match item sum {}",
                record.total_amount,
                record.items_total()
            ));
        }

        debug!(
            "Extracted bill {:?} with {} items, {} warnings",
            record.bill_number,
            record.items.len(),
            warnings.len()
        );

        ExtractionReport {
            record,
            warnings,
            spans_total: spans.len(),
            spans_dropped,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn run(&self, spans: &[OcrSpan]) -> (BillRecord, usize) {
        let mut acc = Accumulator::default();
        let mut dropped = 0;

        for span in spans {
            if span.confidence < self.min_confidence {
                trace!("Dropping span {:?} (confidence {:.2})", span.text, span.confidence);
                dropped += 1;
                continue;
            }

            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }

            for rule in &self.rules {
                if let Some(field) = rule.apply(text) {
                    trace!("Rule {} matched {:?}", rule.name(), text);
                    acc.merge(field);
                }
            }
        }

        (acc.into_record(), dropped)
    }
}

impl Default for BillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects rule results; the first scalar value seen for a field is kept.
#[derive(Default)]
struct Accumulator {
    bill_number: Option<String>,
    bill_date: Option<NaiveDate>,
    total_amount: Option<Decimal>,
    items: Vec<LineItem>,
}

impl Accumulator {
    fn merge(&mut self, field: BillField) {
        match field {
            BillField::BillNumber(number) => {
                self.bill_number.get_or_insert(number);
            }
            BillField::BillDate(date) => {
                self.bill_date.get_or_insert(date);
            }
            BillField::TotalAmount(amount) => {
                self.total_amount.get_or_insert(amount);
            }
            BillField::Item(item) => self.items.push(item),
        }
    }

    fn into_record(self) -> BillRecord {
        BillRecord {
            bill_number: self.bill_number,
            bill_date: self.bill_date,
            total_amount: self.total_amount.unwrap_or_default(),
            items: self.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn spans(texts: &[&str]) -> Vec<OcrSpan> {
        texts.iter().map(|t| OcrSpan::from(*t)).collect()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_widget_bill() {
        let record = BillExtractor::new().extract(&spans(&["Widget $5.00 x3", "Total: $15.00"]));

        assert_eq!(record.total_amount, dec("15.00"));
        assert_eq!(
            record.items[0],
            LineItem::new("Widget $5.00 x3", 3, dec("5.00"))
        );
        // Rules run independently on every span, and the total line carries a
        // price, so it is also an item candidate: two items, not one
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[1].name, "Total: $15.00");
    }

    #[test]
    fn test_full_receipt() {
        let record = BillExtractor::new().extract(&spans(&[
            "  Corner Store  ",
            "Receipt No. 4471",
            "Date: 03/14/2024",
            "Coffee $3.50 x2",
            "Bagel 2.25$",
            "Subtotal $9.25",
            "Total $9.25",
            "Invoice #999",
            "04/01/2024",
        ]));

        assert_eq!(record.bill_number.as_deref(), Some("4471"));
        assert_eq!(record.bill_date, NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(record.total_amount, dec("9.25"));
        assert_eq!(record.items.len(), 4);
        assert_eq!(record.items[0].quantity, 2);
        assert_eq!(record.items[1].unit_price, dec("2.25"));
    }

    #[test]
    fn test_glued_ocr_tokens() {
        let record = BillExtractor::new().extract(&spans(&[
            "Date:03/14/2024PM",
            "Widgetx3 $5.00",
            "Total 15.00 $",
        ]));

        assert_eq!(record.bill_date, NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(record.items[0].quantity, 3);
        assert_eq!(record.items[0].unit_price, dec("5.00"));
        assert_eq!(record.total_amount, dec("15.00"));
        assert_eq!(record.items.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let record = BillExtractor::new().extract(&[]);
        assert_eq!(record, BillRecord::default());
    }

    #[test]
    fn test_no_currency_no_items() {
        let record = BillExtractor::new().extract(&spans(&[
            "Invoice #12",
            "Thank you",
            "Items: 3",
            "01/02/2023",
        ]));

        assert!(record.items.is_empty());
        assert_eq!(record.total_amount, Decimal::ZERO);
        assert_eq!(record.bill_number.as_deref(), Some("12"));
    }

    #[test]
    fn test_invalid_date_skipped_for_later_one() {
        let record = BillExtractor::new().extract(&spans(&["13/45/2023", "Date 02/03/2023"]));
        assert_eq!(record.bill_date, NaiveDate::from_ymd_opt(2023, 2, 3));
    }

    #[test]
    fn test_unparsable_price_discards_span() {
        let record = BillExtractor::new().extract(&spans(&[
            "Total $99999999999999999999999999999999",
            "Total $4.00",
        ]));

        assert_eq!(record.total_amount, dec("4.00"));
        assert_eq!(record.items.len(), 1);
    }

    #[test]
    fn test_confidence_filter() {
        let extractor = BillExtractor::new().with_min_confidence(0.5);
        let input = vec![
            OcrSpan::new("Pen $1.00", 0.9),
            OcrSpan::new("Smudge $7.00", 0.2),
        ];

        let report = extractor.extract_with_report(&input);
        assert_eq!(report.record.items.len(), 1);
        assert_eq!(report.spans_dropped, 1);
        assert_eq!(report.spans_total, 2);
    }

    #[test]
    fn test_deterministic() {
        let input = spans(&["Bill #7", "Soap $2 x4", "Total $8", "5/6/22"]);
        let extractor = BillExtractor::new();
        assert_eq!(extractor.extract(&input), extractor.extract(&input));
    }

    #[test]
    fn test_report_warnings() {
        let report = BillExtractor::new().extract_with_report(&spans(&["hello"]));
        assert_eq!(report.warnings.len(), 4);

        let report = BillExtractor::new()
            .extract_with_report(&spans(&["Invoice 1", "1/1/2024", "Pen $2", "Total $5"]));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("does not match"));
    }

    #[test]
    fn test_extract_from_text() {
        let record = BillExtractor::new().extract_from_text("Invoice #5\nPen $1.00 x2\n");
        assert_eq!(record.bill_number.as_deref(), Some("5"));
        assert_eq!(record.items.len(), 1);
    }

    #[test]
    fn test_custom_rule_appended() {
        struct FreeRule;
        impl SpanRule for FreeRule {
            fn name(&self) -> &'static str {
                "free"
            }
            fn apply(&self, text: &str) -> Option<BillField> {
                text.strip_prefix("FREE ")
                    .map(|name| BillField::Item(LineItem::new(name, 1, Decimal::ZERO)))
            }
        }

        let extractor = BillExtractor::new().with_rule(Box::new(FreeRule));
        assert_eq!(
            extractor.rule_names(),
            vec!["bill_number", "bill_date", "total_amount", "line_item", "free"]
        );

        let record = extractor.extract(&spans(&["FREE Sticker"]));
        assert_eq!(record.items, vec![LineItem::new("Sticker", 1, Decimal::ZERO)]);
    }
}
