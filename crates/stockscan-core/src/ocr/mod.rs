//! OCR spans and the detector seam.
//!
//! The OCR engine is an external collaborator: it turns an image into a list
//! of [`OcrSpan`]s. Callers create one detector at startup and pass it down to
//! whatever needs it; nothing in this crate holds an engine globally.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrDetector;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// One text region reported by the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSpan {
    /// Recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl OcrSpan {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

impl From<&str> for OcrSpan {
    fn from(text: &str) -> Self {
        Self::new(text, 1.0)
    }
}

/// Image in, spans out.
pub trait SpanDetector {
    /// Detect and recognize text regions in an image.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<OcrSpan>, OcrError>;
}

impl<F> SpanDetector for F
where
    F: Fn(&DynamicImage) -> Result<Vec<OcrSpan>, OcrError>,
{
    fn detect(&self, image: &DynamicImage) -> Result<Vec<OcrSpan>, OcrError> {
        self(image)
    }
}

/// Join span texts into one newline-separated block.
pub fn spans_to_text(spans: &[OcrSpan]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_detector() {
        let detector = |_: &DynamicImage| -> Result<Vec<OcrSpan>, OcrError> {
            Ok(vec![OcrSpan::from("Total: $3.00")])
        };
        let image = DynamicImage::new_rgb8(4, 4);

        let spans = detector.detect(&image).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].confidence, 1.0);
    }

    #[test]
    fn test_span_confidence_defaults_to_one() {
        let span: OcrSpan = serde_json::from_str(r#"{"text": "Pen $1"}"#).unwrap();
        assert_eq!(span.confidence, 1.0);
    }

    #[test]
    fn test_spans_to_text() {
        let spans = vec![OcrSpan::from("a"), OcrSpan::from("b")];
        assert_eq!(spans_to_text(&spans), "a\nb");
    }
}
