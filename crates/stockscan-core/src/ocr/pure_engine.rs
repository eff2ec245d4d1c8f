//! Span detector backed by `pure-onnx-ocr`.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrSpan, SpanDetector};

/// OCR detector backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Loading the models is expensive, so create one detector when the process
/// starts and drop it on shutdown.
pub struct PureOcrDetector {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl PureOcrDetector {
    /// Load the detection and recognition models named in `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl SpanDetector for PureOcrDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<OcrSpan>, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("{}x{}", width, height)));
        }

        info!("Processing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Detection(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        // Sort by reading order: rows of ~20px, then left to right
        let mut positioned: Vec<((f64, f64), OcrSpan)> = results
            .iter()
            .map(|r| {
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                (top_left(&r.bounding_box), OcrSpan::new(text, r.confidence))
            })
            .collect();

        positioned.sort_by(|(a, _), (b, _)| {
            let row_a = (a.1 / 20.0) as i64;
            let row_b = (b.1 / 20.0) as i64;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let spans: Vec<OcrSpan> = positioned.into_iter().map(|(_, span)| span).collect();

        info!(
            "OCR complete: {} spans in {}ms",
            spans.len(),
            start.elapsed().as_millis()
        );

        Ok(spans)
    }
}

impl Drop for PureOcrDetector {
    fn drop(&mut self) {
        debug!("Releasing pure-onnx-ocr engine");
    }
}

/// Minimum (x, y) over the first four polygon points.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}
