//! Precomputed horizon confidence from vanishing-point analysis.
//!
//! The estimate is produced offline for a sequence and stored as JSON:
//!
//! ```json
//! { "samples": [ { "row": 220.0, "confidence": -3.1 },
//!                { "row": 240.0, "confidence": -0.4 } ] }
//! ```
//!
//! Lookups interpolate linearly between samples and clamp outside the
//! sampled range. An estimate without samples scores every row 0.0, which
//! leaves the calibrator driven by detections and the horizon prior alone.
//! A NaN row has no defined score and yields NaN, which the calibrator skips.

use crate::error::ObservationError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Confidence of the horizon lying at a given image row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizonSample {
    pub row: f64,
    pub confidence: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VanishingPointEstimate {
    samples: Vec<HorizonSample>,
}

impl VanishingPointEstimate {
    /// Builds an estimate from unordered samples.
    ///
    /// Returns `None` when a sample is not finite.
    pub fn from_samples(mut samples: Vec<HorizonSample>) -> Option<Self> {
        if samples
            .iter()
            .any(|s| !s.row.is_finite() || !s.confidence.is_finite())
        {
            return None;
        }
        samples.sort_by(|a, b| a.row.total_cmp(&b.row));
        Some(Self { samples })
    }

    pub fn load(path: &Path) -> Result<Self, ObservationError> {
        let fail = |reason: String| ObservationError::VanishingPointFile {
            path: path.to_path_buf(),
            reason,
        };
        let contents = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let raw: VanishingPointEstimate =
            serde_json::from_str(&contents).map_err(|e| fail(e.to_string()))?;
        if raw.samples.is_empty() {
            return Err(fail("no horizon samples".to_string()));
        }
        Self::from_samples(raw.samples).ok_or_else(|| fail("non-finite sample".to_string()))
    }

    pub fn samples(&self) -> &[HorizonSample] {
        &self.samples
    }

    /// Confidence at `row`; NaN when `row` is NaN and samples exist.
    pub fn horizon_confidence(&self, row: f64) -> f64 {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if row.is_nan() {
            return f64::NAN;
        }
        if row <= first.row {
            return first.confidence;
        }
        if row >= last.row {
            return last.confidence;
        }
        // first.row < row < last.row, so a strictly larger sample exists.
        let hi = self.samples.partition_point(|s| s.row <= row);
        let (a, b) = (&self.samples[hi - 1], &self.samples[hi]);
        let span = b.row - a.row;
        if span <= 0.0 {
            return a.confidence;
        }
        let t = (row - a.row) / span;
        a.confidence + t * (b.confidence - a.confidence)
    }
}
