//! Horizon auto-calibration.
//!
//! The horizon row of a simplified camera is refined by scoring every
//! integer row within [`HORIZON_SEARCH_RADIUS`] of the current estimate and
//! keeping the best one. The score fuses three terms:
//! - the precomputed vanishing-point confidence of the row;
//! - a capped squared deviation from the horizon implied by each detection
//!   under the object height prior;
//! - a squared deviation from the configured prior horizon, if any.
//!
//! The scan probes a clone of the camera, so the caller's state only changes
//! once, when the winner is written back. The current row is not scored as a
//! baseline: the result is always a row inside the window. Rows whose score
//! is NaN lose to any row with a defined score.

use super::confidence::MAX_VOTE_PENALTY;
use super::registry::ObservationManager;
use crate::camera::CameraState;
use crate::error::ObservationError;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Half-width, in rows, of the horizon search window.
pub const HORIZON_SEARCH_RADIUS: f64 = 200.0;

/// Outcome of one horizon search.
#[derive(Clone, Debug, Serialize)]
pub struct HorizonCalibration {
    /// Row written back into the camera.
    pub horizon: f64,
    /// Fused confidence of that row.
    pub score: f64,
    /// Scanned rows, `[start, end)`.
    pub window: (i64, i64),
    pub candidates: usize,
    pub latency_ms: f64,
}

impl ObservationManager {
    /// Fused horizon confidence of a camera hypothesis.
    pub fn camera_confidence(&self, camera: &dyn CameraState) -> Result<f64, ObservationError> {
        let model = camera.model();
        let (horizon_idx, height_idx) = match (model.horizon_element(), model.height_element()) {
            (Some(h), Some(c)) => (h, c),
            _ => return Err(ObservationError::UnsupportedCamera { model }),
        };
        let horizon = camera.element(horizon_idx);

        let mut ret = self.vp_estimate.horizon_confidence(horizon);
        for vote in self.horizon_votes(camera.element(height_idx)) {
            let z = (vote.row - horizon) / vote.std;
            ret -= (z * z).min(MAX_VOTE_PENALTY);
        }
        if let Some(mean) = self.params.mean_horizon {
            let z = (horizon - mean) / self.params.std_horizon;
            ret -= z * z;
        }
        Ok(ret)
    }

    /// Moves the camera horizon to the best-scoring row near its current
    /// value.
    pub fn calibrate_horizon(
        &self,
        camera: &mut dyn CameraState,
    ) -> Result<HorizonCalibration, ObservationError> {
        let t0 = Instant::now();
        let model = camera.model();
        let horizon_idx = model
            .horizon_element()
            .ok_or(ObservationError::UnsupportedCamera { model })?;

        let current = camera.element(horizon_idx);
        let start = (current - HORIZON_SEARCH_RADIUS) as i64;
        let end = (current + HORIZON_SEARCH_RADIUS) as i64;

        let mut probe = camera.clone_box();
        let mut best: Option<(i64, f64)> = None;
        for row in start..end {
            probe.set_element(horizon_idx, row as f64);
            let score = self.camera_confidence(&*probe)?;
            // A NaN score only stands until any defined score appears.
            let better = match best {
                None => true,
                Some((_, b)) => b < score || (b.is_nan() && !score.is_nan()),
            };
            if better {
                best = Some((row, score));
            }
        }

        let (row, score) = best.unwrap_or((start, f64::MIN));
        camera.set_element(horizon_idx, row as f64);
        let latency_ms = t0.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "ObservationManager::calibrate_horizon {current:.1} -> {row} score={score:.3} window=[{start}, {end}) latency_ms={latency_ms:.3}"
        );
        Ok(HorizonCalibration {
            horizon: row as f64,
            score,
            window: (start, end),
            candidates: (end - start).max(0) as usize,
            latency_ms,
        })
    }
}
