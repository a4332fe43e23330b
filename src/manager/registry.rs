use crate::config::{ObservationParams, Parameter};
use crate::error::ObservationError;
use crate::node::{FrameData, ObservationNode};
use crate::tracker::SharedTracker;
use crate::types::{FeatureSet, ObjectType, Rect};
use crate::vanishing::VanishingPointEstimate;
use image::{imageops, GrayImage, RgbImage};
use log::debug;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fuses observation nodes and feature tracks into tracker scores.
///
/// ```no_run
/// use observation_fusion::prelude::*;
///
/// # fn frame(mut manager: ObservationManager, gray: std::sync::Arc<image::GrayImage>)
/// #     -> Result<(), ObservationError> {
/// manager.set_data(FrameData::MonoImage(gray))?;
/// manager.set_data(FrameData::Timestamp(0.033))?;
/// manager.preprocess()?;
/// let dropped = manager.select_features(&[], 40, &[])?;
/// println!("kept={} dropped={}", manager.features().len(), dropped.len());
/// # Ok(())
/// # }
/// ```
pub struct ObservationManager {
    pub(super) params: ObservationParams,
    pub(super) nodes: Vec<Box<dyn ObservationNode>>,
    pub(super) img_mono: Option<Arc<GrayImage>>,
    pub(super) img_color: Option<Arc<RgbImage>>,
    pub(super) time_sec: f64,
    pub(super) tracker: Option<SharedTracker>,
    pub(super) vp_estimate: VanishingPointEstimate,
    pub(super) features: FeatureSet,
}

impl Default for ObservationManager {
    fn default() -> Self {
        Self::new(ObservationParams::default())
    }
}

impl ObservationManager {
    pub fn new(params: ObservationParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
            img_mono: None,
            img_color: None,
            time_sec: 0.0,
            tracker: None,
            vp_estimate: VanishingPointEstimate::default(),
            features: FeatureSet::default(),
        }
    }

    pub fn params(&self) -> &ObservationParams {
        &self.params
    }

    pub fn object_type(&self) -> ObjectType {
        self.params.object_type
    }

    pub fn timestamp(&self) -> f64 {
        self.time_sec
    }

    pub fn mono_image(&self) -> Option<&GrayImage> {
        self.img_mono.as_deref()
    }

    pub fn color_image(&self) -> Option<&RgbImage> {
        self.img_color.as_deref()
    }

    pub fn vanishing_point_estimate(&self) -> &VanishingPointEstimate {
        &self.vp_estimate
    }

    pub fn set_vanishing_point_estimate(&mut self, estimate: VanishingPointEstimate) {
        self.vp_estimate = estimate;
    }

    /// Takes ownership of `node`; nodes are visited in insertion order.
    pub fn insert_node(&mut self, node: Box<dyn ObservationNode>) {
        debug!(
            "ObservationManager::insert_node type={} total={}",
            node.node_type(),
            self.nodes.len() + 1
        );
        self.nodes.push(node);
    }

    /// First node, in insertion order, whose type is `node_type`.
    pub fn node(&self, node_type: &str) -> Option<&dyn ObservationNode> {
        self.nodes
            .iter()
            .find(|n| n.node_type() == node_type)
            .map(|n| n.as_ref())
    }

    pub fn node_mut(&mut self, node_type: &str) -> Option<&mut (dyn ObservationNode + 'static)> {
        self.nodes
            .iter_mut()
            .find(|n| n.node_type() == node_type)
            .map(|n| n.as_mut())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &dyn ObservationNode> + '_ {
        self.nodes.iter().map(|n| n.as_ref())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
    }

    pub fn set_object_type(&mut self, object_type: ObjectType) {
        self.params.object_type = object_type;
        for node in self.nodes.iter_mut() {
            node.set_object_type(object_type);
        }
    }

    /// Records manager-level frame data and forwards it to every node.
    ///
    /// A vanishing-point file that cannot be loaded is an error and is not
    /// forwarded.
    pub fn set_data(&mut self, data: FrameData) -> Result<(), ObservationError> {
        match &data {
            FrameData::MonoImage(img) => self.img_mono = Some(Arc::clone(img)),
            FrameData::ColorImage(img) => self.img_color = Some(Arc::clone(img)),
            FrameData::Timestamp(t) => self.time_sec = *t,
            FrameData::FeatureTracker(tracker) => self.tracker = Some(Arc::clone(tracker)),
            FrameData::VanishingPointFile(path) => {
                self.vp_estimate = VanishingPointEstimate::load(path)?;
                debug!(
                    "ObservationManager::set_data loaded {} horizon samples from {}",
                    self.vp_estimate.samples().len(),
                    path.display()
                );
            }
        }
        for node in self.nodes.iter_mut() {
            node.set_data(&data);
        }
        Ok(())
    }

    /// Parses a `name = value` pair and applies it with [`Self::apply_parameter`].
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), ObservationError> {
        let param = Parameter::parse(name, value)?;
        self.apply_parameter(param);
        Ok(())
    }

    /// Updates manager settings for known parameters and forwards every
    /// parameter, known or not, to all nodes.
    pub fn apply_parameter(&mut self, param: Parameter) {
        if !self.params.apply(&param) {
            debug!(
                "ObservationManager::apply_parameter {} is node-only",
                param.name()
            );
        }
        for node in self.nodes.iter_mut() {
            node.set_parameter(&param);
        }
    }

    /// Answers of every node that knows `name`, in insertion order.
    pub fn query(&self, name: &str) -> Vec<serde_json::Value> {
        self.nodes.iter().filter_map(|n| n.query(name)).collect()
    }

    /// All node detections for the current frame, in insertion order.
    pub fn detections(&self) -> Vec<Rect> {
        self.nodes.iter().flat_map(|n| n.detections()).collect()
    }

    /// Runs node preprocessing, then tracks features on the lower half of
    /// the monochrome frame.
    pub fn preprocess(&mut self) -> Result<(), ObservationError> {
        let tracker = self
            .tracker
            .as_ref()
            .ok_or(ObservationError::MissingFeatureTracker)?;
        let img = self.img_mono.as_ref().ok_or(ObservationError::MissingFrame)?;

        debug!(
            "ObservationManager::preprocess nodes={} t={:.3}",
            self.nodes.len(),
            self.time_sec
        );
        #[cfg(feature = "parallel")]
        self.nodes.par_iter_mut().for_each(|node| node.preprocess());
        #[cfg(not(feature = "parallel"))]
        self.nodes.iter_mut().for_each(|node| node.preprocess());

        // Content above the horizon carries no ground-plane evidence.
        let half = img.height() / 2;
        let lower = imageops::crop_imm(&**img, 0, half, img.width(), half).to_image();

        let mut tracker = tracker
            .lock()
            .map_err(|_| ObservationError::TrackerUnavailable)?;
        tracker.set_detector_type(&self.params.feature_detector);
        tracker.set_new_image(lower, self.time_sec);
        tracker.process_tracking();
        Ok(())
    }

    /// Row offset between tracker coordinates and full-frame coordinates.
    pub(super) fn tracked_row_offset(&self) -> Result<f32, ObservationError> {
        let img = self.img_mono.as_ref().ok_or(ObservationError::MissingFrame)?;
        Ok((img.height() / 2) as f32)
    }
}
