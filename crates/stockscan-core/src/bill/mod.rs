//! Bill field extraction module.

mod extractor;
pub mod rules;

pub use extractor::{BillExtractor, ExtractionReport};
pub use rules::{BillField, SpanRule};
