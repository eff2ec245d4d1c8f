//! Reading OCR spans from span files, text files, and images.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use stockscan_core::models::config::OcrConfig;
use stockscan_core::{OcrSpan, PureOcrDetector, SpanDetector};

/// Supported input file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// JSON array of spans (`{"text", "confidence"}` objects or plain strings).
    Spans,
    /// Plain text, one span per line.
    Text,
    /// Bill photograph, run through OCR.
    Image,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Some(Self::Spans),
            "txt" => Some(Self::Text),
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanInput {
    Span(OcrSpan),
    Text(String),
}

/// Holds the OCR detector for the duration of one command.
///
/// Models are loaded the first time an image is read and released when the
/// session is closed.
pub struct OcrSession {
    config: OcrConfig,
    detector: Option<PureOcrDetector>,
}

impl OcrSession {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            detector: None,
        }
    }

    fn detector(&mut self) -> anyhow::Result<&PureOcrDetector> {
        if self.detector.is_none() {
            info!("Loading OCR models from {}", self.config.model_dir.display());
            let detector = PureOcrDetector::from_config(&self.config).with_context(|| {
                format!(
                    "Failed to load OCR models from {}",
                    self.config.model_dir.display()
                )
            })?;
            self.detector = Some(detector);
        }

        self.detector
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("OCR detector unavailable"))
    }

    /// Read the spans of one input file.
    pub fn read_spans(&mut self, path: &Path) -> anyhow::Result<Vec<OcrSpan>> {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }

        let kind = InputKind::from_path(path).ok_or_else(|| {
            anyhow::anyhow!("Unsupported file format: {}", path.display())
        })?;

        let spans = match kind {
            InputKind::Spans => {
                let content = fs::read_to_string(path)?;
                let inputs: Vec<SpanInput> = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid span file {}", path.display()))?;
                inputs
                    .into_iter()
                    .map(|input| match input {
                        SpanInput::Span(span) => span,
                        SpanInput::Text(text) => OcrSpan::new(text, 1.0),
                    })
                    .collect()
            }
            InputKind::Text => fs::read_to_string(path)?
                .lines()
                .map(OcrSpan::from)
                .collect(),
            InputKind::Image => {
                let image = image::open(path)?;
                self.detector()?.detect(&image)?
            }
        };

        debug!("Read {} spans from {}", spans.len(), path.display());

        Ok(spans)
    }

    /// Release the OCR detector, if one was loaded.
    pub fn close(self) {
        if self.detector.is_some() {
            debug!("Closing OCR session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_input_kind() {
        assert_eq!(InputKind::from_path(Path::new("bill.JSON")), Some(InputKind::Spans));
        assert_eq!(InputKind::from_path(Path::new("bill.txt")), Some(InputKind::Text));
        assert_eq!(InputKind::from_path(Path::new("bill.jpeg")), Some(InputKind::Image));
        assert_eq!(InputKind::from_path(Path::new("bill.pdf")), None);
    }

    #[test]
    fn test_read_mixed_span_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.json");
        fs::write(
            &path,
            r#"[{"text": "Invoice #1", "confidence": 0.8}, "Pen $2.00"]"#,
        )
        .unwrap();

        let spans = OcrSession::new(OcrConfig::default()).read_spans(&path).unwrap();

        assert_eq!(
            spans,
            vec![OcrSpan::new("Invoice #1", 0.8), OcrSpan::new("Pen $2.00", 1.0)]
        );
    }

    #[test]
    fn test_missing_models_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bill.png");
        image::DynamicImage::new_rgb8(8, 8).save(&path).unwrap();

        let config = OcrConfig {
            model_dir: dir.path().join("no-models"),
            ..Default::default()
        };

        let err = OcrSession::new(config).read_spans(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load OCR models"));
    }
}
