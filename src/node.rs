use crate::config::Parameter;
use crate::tracker::SharedTracker;
use crate::types::{ObjectType, Rect};
use image::{GrayImage, RgbImage};
use std::path::PathBuf;
use std::sync::Arc;

/// Per-frame inputs broadcast to the manager and its nodes.
#[derive(Clone)]
pub enum FrameData {
    MonoImage(Arc<GrayImage>),
    ColorImage(Arc<RgbImage>),
    Timestamp(f64),
    FeatureTracker(SharedTracker),
    /// Precomputed vanishing-point estimate for the sequence.
    VanishingPointFile(PathBuf),
}

impl FrameData {
    /// Key under which the payload is known to node configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            FrameData::MonoImage(_) => "image_mono",
            FrameData::ColorImage(_) => "image_color",
            FrameData::Timestamp(_) => "time_sec",
            FrameData::FeatureTracker(_) => "feat_tracker",
            FrameData::VanishingPointFile(_) => "vp_estimate_file",
        }
    }
}

impl std::fmt::Debug for FrameData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameData::MonoImage(img) => {
                write!(f, "MonoImage({}x{})", img.width(), img.height())
            }
            FrameData::ColorImage(img) => {
                write!(f, "ColorImage({}x{})", img.width(), img.height())
            }
            FrameData::Timestamp(t) => write!(f, "Timestamp({t})"),
            FrameData::FeatureTracker(_) => write!(f, "FeatureTracker(..)"),
            FrameData::VanishingPointFile(p) => write!(f, "VanishingPointFile({})", p.display()),
        }
    }
}

/// A detector or other evidence source scored by the manager.
///
/// `preprocess` may run concurrently with other nodes' `preprocess`, so an
/// implementation must not depend on another node having finished.
pub trait ObservationNode: Send {
    /// Type name used for lookup and score filtering.
    fn node_type(&self) -> &str;

    fn set_data(&mut self, data: &FrameData);

    fn set_parameter(&mut self, param: &Parameter);

    fn set_object_type(&mut self, _object_type: ObjectType) {}

    fn preprocess(&mut self);

    fn detections(&self) -> Vec<Rect>;

    /// Log-likelihood contribution of an object occupying `rect`.
    fn confidence(&self, rect: &Rect) -> f64;

    /// Node-specific diagnostics; `None` when the node does not know `name`.
    fn query(&self, _name: &str) -> Option<serde_json::Value> {
        None
    }
}
