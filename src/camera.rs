//! Interfaces to the externally owned camera and hypothesis states.
//!
//! The projection math lives with the tracker that owns these states; this
//! crate only consumes them through the traits below.

use crate::types::Rect;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Element index of the object height in an [`ObjectState`].
pub const OBJECT_HEIGHT_ELEMENT: usize = 1;

/// Camera parametrizations known to the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraModel {
    /// Ground-plane camera parametrized by height, horizon row and a few
    /// intrinsics.
    Simplified,
    /// Full pose camera without a horizon element.
    Full,
}

impl CameraModel {
    /// Element index of the horizon row, if the model has one.
    pub fn horizon_element(self) -> Option<usize> {
        match self {
            CameraModel::Simplified => Some(7),
            CameraModel::Full => None,
        }
    }

    /// Element index of the camera height above ground, if the model has one.
    pub fn height_element(self) -> Option<usize> {
        match self {
            CameraModel::Simplified => Some(3),
            CameraModel::Full => None,
        }
    }
}

/// Tracked object hypothesis; element [`OBJECT_HEIGHT_ELEMENT`] is its
/// height in metres.
pub trait ObjectState {
    fn element(&self, index: usize) -> f64;

    fn height(&self) -> f64 {
        self.element(OBJECT_HEIGHT_ELEMENT)
    }
}

/// Static 3D feature hypothesis in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureState {
    pub position: Point3<f64>,
}

impl FeatureState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// Parametrized camera hypothesis.
pub trait CameraState {
    fn model(&self) -> CameraModel;

    fn element(&self, index: usize) -> f64;

    fn set_element(&mut self, index: usize, value: f64);

    fn clone_box(&self) -> Box<dyn CameraState>;

    /// Image-space bounding box of an object hypothesis.
    fn project_object(&self, object: &dyn ObjectState) -> Rect;

    /// Image coordinates (`x`, `y`) and depth (`z`) of a feature.
    fn project_feature(&self, feature: &FeatureState) -> Point3<f64>;

    /// Back-projects an image point onto the scene.
    fn inverse_project(&self, point: Point2<f32>) -> FeatureState;
}

impl Clone for Box<dyn CameraState> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
