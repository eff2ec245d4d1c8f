//! Bill date extraction.

use chrono::NaiveDate;

use super::patterns::DATE_MDY;
use super::{BillField, SpanRule};

/// Reads the first month/day/year date in a span.
pub struct BillDateRule;

impl SpanRule for BillDateRule {
    fn name(&self) -> &'static str {
        "bill_date"
    }

    fn apply(&self, text: &str) -> Option<BillField> {
        extract_bill_date(text).map(BillField::BillDate)
    }
}

/// Parse the first date-shaped token in `text` as month/day/year.
///
/// Only the first token is considered; if it is not a real calendar date the
/// span yields nothing.
pub fn extract_bill_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_MDY.captures(text)?;

    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}
