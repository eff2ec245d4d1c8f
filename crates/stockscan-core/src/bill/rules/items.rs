//! Line item extraction.

use super::amounts::first_amount;
use super::patterns::{QUANTITY_MARKER, WHITESPACE};
use super::{BillField, SpanRule};
use crate::models::bill::LineItem;

/// Turns any span carrying a currency amount into a line item.
#[derive(Debug, Clone, Default)]
pub struct LineItemRule {
    strip_names: bool,
}

impl LineItemRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip the price and quantity marker out of the item name.
    pub fn with_stripped_names(mut self, strip: bool) -> Self {
        self.strip_names = strip;
        self
    }

    fn item_name(&self, text: &str, price: (usize, usize)) -> String {
        if !self.strip_names {
            return text.to_string();
        }

        let mut cuts = vec![price];
        if let Some(marker) = quantity_marker(text, price) {
            cuts.push((marker.start, marker.end));
        }
        cuts.sort();

        let mut kept = String::with_capacity(text.len());
        let mut pos = 0;
        for (start, end) in cuts {
            if start >= pos {
                kept.push_str(&text[pos..start]);
                kept.push(' ');
            }
            pos = pos.max(end);
        }
        kept.push_str(&text[pos..]);

        let name = WHITESPACE.replace_all(&kept, " ");
        let name = name.trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '@' | ','));

        if name.is_empty() {
            text.to_string()
        } else {
            name.to_string()
        }
    }
}

impl SpanRule for LineItemRule {
    fn name(&self) -> &'static str {
        "line_item"
    }

    fn apply(&self, text: &str) -> Option<BillField> {
        let price = first_amount(text)?;
        let range = (price.start, price.end);

        Some(BillField::Item(LineItem {
            name: self.item_name(text, range),
            quantity: quantity_from(text, range),
            unit_price: price.value,
        }))
    }
}

/// Quantity from an "x<digits>" marker, defaulting to 1.
///
/// Zero or unparsable quantities also fall back to 1. Digits that belong to
/// the price ("Tax 12.50$") are not a quantity.
pub fn extract_quantity(text: &str) -> u32 {
    let price = first_amount(text).map_or((0, 0), |m| (m.start, m.end));
    quantity_from(text, price)
}

struct QuantityMarker {
    start: usize,
    end: usize,
    quantity: Option<u32>,
}

/// First quantity marker that does not overlap the price.
fn quantity_marker(text: &str, price: (usize, usize)) -> Option<QuantityMarker> {
    QUANTITY_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let marker = caps.name("marker")?;
            Some(QuantityMarker {
                start: marker.start(),
                end: marker.end(),
                quantity: caps["qty"].parse::<u32>().ok(),
            })
        })
        .find(|m| m.end <= price.0 || m.start >= price.1)
}

fn quantity_from(text: &str, price: (usize, usize)) -> u32 {
    quantity_marker(text, price)
        .and_then(|m| m.quantity)
        .filter(|&qty| qty >= 1)
        .unwrap_or(1)
}
