#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod camera;
pub mod config;
pub mod error;
pub mod manager;
pub mod node;
pub mod tracker;
pub mod types;

// Building blocks, public for tools and tests.
pub mod grouping;
pub mod vanishing;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::{load_params, ObservationParams, Parameter};
pub use crate::error::ObservationError;
pub use crate::manager::{Association, HorizonCalibration, HorizonVote, ObservationManager};
pub use crate::types::{FeatureId, FeatureSet, NodeFilter, ObjectType, Rect};

// --- Prelude ---------------------------------------------------------------

/// Everything needed to drive the manager from a tracker loop.
pub mod prelude {
    pub use crate::camera::{CameraModel, CameraState, FeatureState, ObjectState};
    pub use crate::node::{FrameData, ObservationNode};
    pub use crate::tracker::{FeatureTracker, SharedTracker, TrackedFeature};
    pub use crate::{
        FeatureId, NodeFilter, ObjectType, ObservationError, ObservationManager,
        ObservationParams, Rect,
    };
}
