use super::registry::ObservationManager;
use crate::camera::{CameraState, FeatureState, ObjectState};
use crate::error::ObservationError;
use crate::types::NodeFilter;
use log::warn;
use serde::Serialize;
use std::f64::consts::PI;

/// Score of a feature whose reprojection likelihood is undefined.
pub const FEATURE_NAN_PENALTY: f64 = -100.0;
/// Offset, in standard deviations, at which a valid association and an
/// outlier are equally likely.
pub const OUTLIER_SIGMA_OFFSET: f64 = 1.4;
/// Cap on the squared normalized deviation of a single horizon vote.
pub const MAX_VOTE_PENALTY: f64 = 9.0;

/// Horizon row implied by one detection, with its uncertainty in rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HorizonVote {
    pub row: f64,
    pub std: f64,
}

/// Log density of `N(mean, std²)` at `x`.
#[inline]
pub fn log_gaussian_prob(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    -std.ln() - 0.5 * (2.0 * PI).ln() - 0.5 * z * z
}

impl ObservationManager {
    /// Detector evidence for an object hypothesis seen through `camera`.
    ///
    /// Objects outside the configured height range get the fixed
    /// out-of-height penalty without consulting any node.
    pub fn object_confidence(
        &self,
        object: &dyn ObjectState,
        camera: &dyn CameraState,
        filter: &NodeFilter,
    ) -> f64 {
        let height = object.height();
        if height < self.params.min_height || height > self.params.max_height {
            return self.params.out_of_height_penalty;
        }
        let rect = camera.project_object(object);
        let sum: f64 = self
            .nodes
            .iter()
            .filter(|n| filter.accepts(n.node_type()))
            .map(|n| n.confidence(&rect))
            .sum();
        sum * self.params.total_weight
    }

    /// Log-likelihood ratio of the kept feature at `index` being the
    /// projection of `feature`, against it being an outlier.
    pub fn feature_confidence(
        &self,
        feature: &FeatureState,
        index: usize,
        camera: &dyn CameraState,
    ) -> Result<f64, ObservationError> {
        let (_, obs) = self
            .features
            .get(index)
            .ok_or(ObservationError::FeatureIndexOutOfRange {
                index,
                len: self.features.len(),
            })?;
        let proj = camera.project_feature(feature);
        let (su, sv) = (self.params.feat_sigma_u, self.params.feat_sigma_v);

        let mut ret = log_gaussian_prob(obs.x as f64, proj.x, su)
            + log_gaussian_prob(obs.y as f64, proj.y, sv);
        ret -= log_gaussian_prob(OUTLIER_SIGMA_OFFSET * su, 0.0, su)
            + log_gaussian_prob(OUTLIER_SIGMA_OFFSET * sv, 0.0, sv);

        if ret.is_nan() {
            warn!(
                "ObservationManager::feature_confidence undefined score for feature {index}, projection {:?}",
                proj
            );
            return Ok(FEATURE_NAN_PENALTY);
        }
        Ok(ret)
    }

    /// Horizon rows implied by the current detections for a camera mounted
    /// `camera_height` metres above ground.
    pub fn horizon_votes(&self, camera_height: f64) -> Vec<HorizonVote> {
        let (mean_h, std_h) = self.params.object_type.height_prior();
        self.detections()
            .iter()
            .map(|det| {
                let h = det.height as f64;
                HorizonVote {
                    row: det.y as f64 + (h * (mean_h - camera_height) / mean_h).round(),
                    std: h / mean_h * std_h,
                }
            })
            .collect()
    }
}
