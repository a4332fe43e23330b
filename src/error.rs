use crate::camera::CameraModel;
use crate::types::FeatureId;
use std::path::PathBuf;

/// Failures surfaced by the observation manager.
///
/// Every variant is a caller or configuration mistake. Numerical
/// degeneracies and association misses are not errors and never show up
/// here.
#[derive(Clone, Debug, PartialEq)]
pub enum ObservationError {
    UnsupportedCamera {
        model: CameraModel,
    },
    MissingFeatureTracker,
    MissingFrame,
    TrackerUnavailable,
    InvalidParameter {
        name: String,
        value: String,
    },
    VanishingPointFile {
        path: PathBuf,
        reason: String,
    },
    Config {
        path: PathBuf,
        reason: String,
    },
    UnknownFeature {
        id: FeatureId,
    },
    FeatureIndexOutOfRange {
        index: usize,
        len: usize,
    },
}

impl std::fmt::Display for ObservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationError::UnsupportedCamera { model } => {
                write!(f, "camera model {model:?} has no horizon element")
            }
            ObservationError::MissingFeatureTracker => {
                write!(f, "no feature tracker has been set")
            }
            ObservationError::MissingFrame => write!(f, "no monochrome frame has been set"),
            ObservationError::TrackerUnavailable => {
                write!(f, "feature tracker lock is poisoned")
            }
            ObservationError::InvalidParameter { name, value } => {
                write!(f, "invalid value {value:?} for parameter {name}")
            }
            ObservationError::VanishingPointFile { path, reason } => write!(
                f,
                "failed to load vanishing-point estimate {}: {reason}",
                path.display()
            ),
            ObservationError::Config { path, reason } => {
                write!(f, "failed to load config {}: {reason}", path.display())
            }
            ObservationError::UnknownFeature { id } => {
                write!(f, "feature {} is not in the current feature set", id.0)
            }
            ObservationError::FeatureIndexOutOfRange { index, len } => {
                write!(f, "feature index {index} out of range ({len} features)")
            }
        }
    }
}

impl std::error::Error for ObservationError {}
