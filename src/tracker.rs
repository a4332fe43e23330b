use crate::types::FeatureId;
use image::GrayImage;
use nalgebra::Point2;
use std::sync::{Arc, Mutex};

/// One point reported by the feature tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedFeature {
    pub id: FeatureId,
    /// Position in the coordinates of the image handed to the tracker.
    pub point: Point2<f32>,
    /// Detector response; higher is a stronger corner.
    pub response: f32,
}

impl TrackedFeature {
    pub fn new(id: u64, x: f32, y: f32, response: f32) -> Self {
        Self {
            id: FeatureId(id),
            point: Point2::new(x, y),
            response,
        }
    }
}

/// Corner tracker driven by the observation manager once per frame.
pub trait FeatureTracker: Send {
    fn set_detector_type(&mut self, name: &str);

    fn set_new_image(&mut self, image: GrayImage, timestamp: f64);

    fn process_tracking(&mut self);

    /// Every point alive at `timestamp`.
    fn features(&self, timestamp: f64) -> Vec<TrackedFeature>;
}

/// Tracker handle shared between the caller, the manager and the nodes.
pub type SharedTracker = Arc<Mutex<dyn FeatureTracker>>;
