//! Per-frame feature selection.
//!
//! The tracker reports every live corner each frame; the scorer only wants a
//! bounded, stable subset that stays clear of objects. Selection runs in two
//! passes:
//! - carry forward: previous ids are revisited in their original order and
//!   kept when the tracker still has them outside every exclusion zone;
//! - replenish: the remaining quota is filled with the strongest unused
//!   corners, again skipping those inside a zone.
//!
//! Previous ids that are not kept are reported by index so the caller can
//! retire whatever state it attached to them. A drop is routine output.

use super::registry::ObservationManager;
use crate::camera::{CameraState, FeatureState};
use crate::error::ObservationError;
use crate::grouping::{group_rectangles, in_any_rect};
use crate::tracker::TrackedFeature;
use crate::types::{FeatureId, FeatureSet, Rect};
use log::debug;

/// Minimum cluster support when merging exclusion zones; every box is
/// pushed twice so isolated boxes pass.
const ZONE_GROUP_THRESHOLD: usize = 1;
/// Relative edge tolerance for merging exclusion zones.
const ZONE_GROUP_EPS: f64 = 0.2;

/// Outcome of one association cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Association {
    /// Kept features, carried-forward ones first.
    pub features: FeatureSet,
    /// Indices into the previous id list of every id not kept.
    pub dropped: Vec<usize>,
}

/// Selects at most `max_count` features from `pool`.
///
/// Ids in `prev_ids` are considered first, in order; each one is kept if it
/// is still in the pool and outside every zone, and dropped otherwise. Once
/// the quota is full the remaining previous ids are dropped without lookup.
/// The rest of the quota is filled by repeatedly taking the pool entry with
/// the highest response (earliest wins ties); entries inside a zone are
/// discarded and never reconsidered.
pub fn associate(
    prev_ids: &[FeatureId],
    max_count: usize,
    mut pool: Vec<TrackedFeature>,
    zones: &[Rect],
) -> Association {
    let mut features = FeatureSet::with_capacity(max_count.min(prev_ids.len() + pool.len()));
    let mut dropped = Vec::new();

    for (i, id) in prev_ids.iter().enumerate() {
        if features.len() >= max_count {
            dropped.extend(i..prev_ids.len());
            break;
        }
        match pool.iter().position(|f| f.id == *id) {
            Some(idx) => {
                let feat = pool.remove(idx);
                if in_any_rect(zones, feat.point) || features.position(feat.id).is_some() {
                    dropped.push(i);
                } else {
                    features.push(feat.id, feat.point);
                }
            }
            None => dropped.push(i),
        }
    }

    while features.len() < max_count {
        let Some(idx) = strongest(&pool) else {
            break;
        };
        let feat = pool.remove(idx);
        if !in_any_rect(zones, feat.point) && features.position(feat.id).is_none() {
            features.push(feat.id, feat.point);
        }
    }

    Association { features, dropped }
}

/// Index of the first entry with the maximum response.
fn strongest(pool: &[TrackedFeature]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, f) in pool.iter().enumerate() {
        match best {
            Some(b) if !(pool[b].response < f.response) => {}
            _ => best = Some(i),
        }
    }
    best
}

impl ObservationManager {
    /// Current feature set, replaced by every [`Self::select_features`].
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Merged object regions in which features are ignored: the given
    /// target boxes and the current detections.
    pub fn exclusion_zones(&self, targets: &[Rect]) -> Vec<Rect> {
        let boxes: Vec<Rect> = targets
            .iter()
            .copied()
            .chain(self.detections())
            .flat_map(|r| [r, r])
            .collect();
        group_rectangles(&boxes, ZONE_GROUP_THRESHOLD, ZONE_GROUP_EPS)
    }

    /// Rebuilds the feature set for the current frame.
    ///
    /// Returns the indices into `prev_ids` of the features that were
    /// dropped.
    pub fn select_features(
        &mut self,
        prev_ids: &[FeatureId],
        max_count: usize,
        targets: &[Rect],
    ) -> Result<Vec<usize>, ObservationError> {
        let tracker = self
            .tracker
            .as_ref()
            .ok_or(ObservationError::MissingFeatureTracker)?;
        let row_offset = self.tracked_row_offset()?;
        let mut pool = tracker
            .lock()
            .map_err(|_| ObservationError::TrackerUnavailable)?
            .features(self.time_sec);
        for f in pool.iter_mut() {
            f.point.y += row_offset;
        }

        let zones = self.exclusion_zones(targets);
        let pool_size = pool.len();
        let Association { features, dropped } = associate(prev_ids, max_count, pool, &zones);
        debug!(
            "ObservationManager::select_features pool={} zones={} prev={} kept={} dropped={}",
            pool_size,
            zones.len(),
            prev_ids.len(),
            features.len(),
            dropped.len()
        );
        self.features = features;
        Ok(dropped)
    }

    /// Back-projects the kept feature `id` to seed a new feature hypothesis.
    pub fn initial_feature_state(
        &self,
        id: FeatureId,
        camera: &dyn CameraState,
    ) -> Result<FeatureState, ObservationError> {
        let idx = self
            .features
            .position(id)
            .ok_or(ObservationError::UnknownFeature { id })?;
        Ok(camera.inverse_project(self.features.points()[idx]))
    }
}
