//! Observation manager fusing detector nodes and feature tracks.
//!
//! Overview
//! - Owns the observation nodes in insertion order and broadcasts frame data
//!   and parameters to them; preprocessing fans out across nodes and then
//!   feeds the lower half of the frame to the feature tracker.
//! - Selects a bounded set of tracked features every frame, carrying the
//!   previous selection forward and topping it up with the strongest new
//!   corners, while excluding points inside object regions.
//! - Scores object hypotheses from node confidences and feature hypotheses
//!   from their reprojection error, as log-likelihood contributions.
//! - Calibrates the camera horizon row by a local exhaustive search over a
//!   score fusing the vanishing-point estimate, detection height votes and
//!   an optional horizon prior.
//!
//! Modules
//! - `registry` – the [`ObservationManager`] type, node ownership, broadcast
//!   and preprocessing.
//! - [`association`] – per-frame feature selection.
//! - `confidence` – object / feature scores and horizon votes.
//! - `calibration` – horizon search.

pub mod association;
mod calibration;
mod confidence;
mod registry;

pub use association::{associate, Association};
pub use calibration::{HorizonCalibration, HORIZON_SEARCH_RADIUS};
pub use confidence::{
    log_gaussian_prob, HorizonVote, FEATURE_NAN_PENALTY, MAX_VOTE_PENALTY, OUTLIER_SIGMA_OFFSET,
};
pub use registry::ObservationManager;
