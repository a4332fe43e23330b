//! Stand-ins for the collaborators the manager is driven by.

use image::GrayImage;
use nalgebra::{Point2, Point3};
use observation_fusion::camera::{CameraModel, CameraState, FeatureState, ObjectState};
use observation_fusion::config::Parameter;
use observation_fusion::node::{FrameData, ObservationNode};
use observation_fusion::tracker::{FeatureTracker, SharedTracker, TrackedFeature};
use observation_fusion::{ObjectType, Rect};
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const HORIZON: usize = 7;
pub const CAMERA_HEIGHT: usize = 3;

/// Camera that projects every object onto a fixed box and every feature
/// onto its own x/y coordinates.
#[derive(Clone, Debug)]
pub struct StubCamera {
    pub model: CameraModel,
    pub elements: [f64; 8],
    pub object_rect: Rect,
}

impl StubCamera {
    pub fn simplified(camera_height: f64, horizon: f64) -> Self {
        let mut elements = [0.0; 8];
        elements[CAMERA_HEIGHT] = camera_height;
        elements[HORIZON] = horizon;
        Self {
            model: CameraModel::Simplified,
            elements,
            object_rect: Rect::new(100, 200, 40, 100),
        }
    }

    pub fn full() -> Self {
        Self {
            model: CameraModel::Full,
            ..Self::simplified(1.0, 240.0)
        }
    }
}

impl CameraState for StubCamera {
    fn model(&self) -> CameraModel {
        self.model
    }

    fn element(&self, index: usize) -> f64 {
        self.elements[index]
    }

    fn set_element(&mut self, index: usize, value: f64) {
        self.elements[index] = value;
    }

    fn clone_box(&self) -> Box<dyn CameraState> {
        Box::new(self.clone())
    }

    fn project_object(&self, _object: &dyn ObjectState) -> Rect {
        self.object_rect
    }

    fn project_feature(&self, feature: &FeatureState) -> Point3<f64> {
        feature.position
    }

    fn inverse_project(&self, point: Point2<f32>) -> FeatureState {
        FeatureState::new(point.x as f64, point.y as f64, 1.0)
    }
}

pub struct StubObject {
    pub elements: [f64; 4],
}

impl StubObject {
    pub fn with_height(height: f64) -> Self {
        Self {
            elements: [0.0, height, 5.0, 0.0],
        }
    }
}

impl ObjectState for StubObject {
    fn element(&self, index: usize) -> f64 {
        self.elements[index]
    }
}

/// Everything a [`StubNode`] was told, shared with the test body.
#[derive(Debug, Default)]
pub struct NodeLog {
    pub data_keys: Vec<&'static str>,
    pub parameters: Vec<Parameter>,
    pub object_type: Option<ObjectType>,
    pub preprocessed: usize,
}

pub struct StubNode {
    pub kind: String,
    pub detections: Vec<Rect>,
    pub score: f64,
    pub log: Arc<Mutex<NodeLog>>,
}

impl StubNode {
    pub fn new(kind: &str, score: f64, detections: Vec<Rect>) -> (Self, Arc<Mutex<NodeLog>>) {
        let log = Arc::new(Mutex::new(NodeLog::default()));
        let node = Self {
            kind: kind.to_string(),
            detections,
            score,
            log: Arc::clone(&log),
        };
        (node, log)
    }

    pub fn boxed(kind: &str, score: f64, detections: Vec<Rect>) -> Box<dyn ObservationNode> {
        Box::new(Self::new(kind, score, detections).0)
    }
}

impl ObservationNode for StubNode {
    fn node_type(&self) -> &str {
        &self.kind
    }

    fn set_data(&mut self, data: &FrameData) {
        self.log.lock().unwrap().data_keys.push(data.key());
    }

    fn set_parameter(&mut self, param: &Parameter) {
        self.log.lock().unwrap().parameters.push(param.clone());
    }

    fn set_object_type(&mut self, object_type: ObjectType) {
        self.log.lock().unwrap().object_type = Some(object_type);
    }

    fn preprocess(&mut self) {
        self.log.lock().unwrap().preprocessed += 1;
    }

    fn detections(&self) -> Vec<Rect> {
        self.detections.clone()
    }

    fn confidence(&self, _rect: &Rect) -> f64 {
        self.score
    }

    fn query(&self, name: &str) -> Option<serde_json::Value> {
        (name == "score").then(|| json!({ "type": self.kind, "score": self.score }))
    }
}

/// Tracker replaying a fixed set of points and recording what it was fed.
#[derive(Debug, Default)]
pub struct ScriptedTracker {
    pub features: Vec<TrackedFeature>,
    pub detector: Option<String>,
    pub image_size: Option<(u32, u32)>,
    pub timestamp: Option<f64>,
    pub processed: usize,
}

impl ScriptedTracker {
    pub fn shared(features: Vec<TrackedFeature>) -> (Arc<Mutex<ScriptedTracker>>, SharedTracker) {
        let tracker = Arc::new(Mutex::new(ScriptedTracker {
            features,
            ..Default::default()
        }));
        let shared: SharedTracker = tracker.clone();
        (tracker, shared)
    }
}

impl FeatureTracker for ScriptedTracker {
    fn set_detector_type(&mut self, name: &str) {
        self.detector = Some(name.to_string());
    }

    fn set_new_image(&mut self, image: GrayImage, timestamp: f64) {
        self.image_size = Some(image.dimensions());
        self.timestamp = Some(timestamp);
    }

    fn process_tracking(&mut self) {
        self.processed += 1;
    }

    fn features(&self, _timestamp: f64) -> Vec<TrackedFeature> {
        self.features.clone()
    }
}
