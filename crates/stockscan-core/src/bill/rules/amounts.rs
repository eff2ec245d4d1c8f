//! Currency amount and bill total extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::CURRENCY_AMOUNT;
use super::{BillField, SpanRule};

/// A parsed currency amount and where it sits in the span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountMatch {
    pub value: Decimal,
    pub start: usize,
    pub end: usize,
}

/// Parse the first currency amount in `text`.
///
/// Returns `None` when there is no amount, and also when the first amount
/// cannot be represented (later amounts are not tried).
///
/// A `$` followed by digits belongs to those digits, so "x3 $2.50" reads
/// 2.50 rather than 3.
pub fn first_amount(text: &str) -> Option<AmountMatch> {
    let mut from = 0;
    loop {
        let caps = CURRENCY_AMOUNT.captures_at(text, from)?;
        let full_match = caps.get(0)?;

        let digits = match caps.get(1) {
            Some(digits) => digits,
            None => {
                let after = text[full_match.end()..].trim_start();
                if after.starts_with(|c: char| c.is_ascii_digit()) {
                    // Retry from the symbol itself
                    from = full_match.end() - 1;
                    continue;
                }
                caps.get(2)?
            }
        };

        return parse_amount(digits.as_str()).map(|value| AmountMatch {
            value,
            start: full_match.start(),
            end: full_match.end(),
        });
    }
}

/// Parse an amount such as "$ 5.00" or "12$", ignoring the symbol.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// Reads the bill total from a span mentioning "total".
pub struct TotalAmountRule;

impl SpanRule for TotalAmountRule {
    fn name(&self) -> &'static str {
        "total_amount"
    }

    fn apply(&self, text: &str) -> Option<BillField> {
        if !text.to_lowercase().contains("total") {
            return None;
        }

        first_amount(text).map(|m| BillField::TotalAmount(m.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$5.00"), Some(dec("5.00")));
        assert_eq!(parse_amount("$ 12"), Some(dec("12")));
        assert_eq!(parse_amount("7.25$"), Some(dec("7.25")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_first_amount_position() {
        let m = first_amount("Widget $5.00 x3").unwrap();
        assert_eq!(m.value, dec("5.00"));
        assert_eq!(&"Widget $5.00 x3"[m.start..m.end], "$5.00");
    }

    #[test]
    fn test_first_amount_symbol_after() {
        let m = first_amount("Milk 2.49$ each").unwrap();
        assert_eq!(m.value, dec("2.49"));
    }

    #[test]
    fn test_first_amount_symbol_after_with_space() {
        let m = first_amount("Total 5.00 $").unwrap();
        assert_eq!(m.value, dec("5.00"));
        assert_eq!(&"Total 5.00 $"[m.start..m.end], "5.00 $");
    }

    #[test]
    fn test_symbol_binds_to_following_digits() {
        let m = first_amount("Pen x3 $2.50").unwrap();
        assert_eq!(m.value, dec("2.50"));
        assert_eq!(first_amount("Item 2 $5.00").unwrap().value, dec("5.00"));
    }

    #[test]
    fn test_overflowing_amount_is_unparsable() {
        assert_eq!(first_amount("Gold $99999999999999999999999999999999"), None);
    }

    #[test]
    fn test_total_rule() {
        let rule = TotalAmountRule;
        assert_eq!(
            rule.apply("Total: $15.00"),
            Some(BillField::TotalAmount(dec("15.00")))
        );
        assert_eq!(
            rule.apply("GRAND TOTAL 20.10$"),
            Some(BillField::TotalAmount(dec("20.10")))
        );
        assert_eq!(
            rule.apply("Total 5.00 $"),
            Some(BillField::TotalAmount(dec("5.00")))
        );
        assert_eq!(rule.apply("Total items: 3"), None);
        assert_eq!(rule.apply("Widget $5.00"), None);
    }
}
