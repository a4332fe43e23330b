//! Manager-level settings and the string parameter boundary.
//!
//! Settings arrive either as a JSON file ([`load_params`]) or one
//! `name = value` pair at a time from a node configuration
//! ([`Parameter::parse`]). Values are parsed once here; the rest of the crate
//! only sees typed fields.

use crate::error::ObservationError;
use crate::types::ObjectType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scoring and calibration settings of the observation manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationParams {
    /// Objects shorter than this (metres) are rejected outright.
    pub min_height: f64,
    /// Objects taller than this (metres) are rejected outright.
    pub max_height: f64,
    /// Scale applied to the summed node confidences.
    pub total_weight: f64,
    /// Score returned for objects outside the height range.
    pub out_of_height_penalty: f64,
    /// Feature reprojection standard deviation along image x (pixels).
    pub feat_sigma_u: f64,
    /// Feature reprojection standard deviation along image y (pixels).
    pub feat_sigma_v: f64,
    /// Prior mean horizon row; `None` disables the prior.
    pub mean_horizon: Option<f64>,
    pub std_horizon: f64,
    /// Detector the feature tracker is asked to use every frame.
    pub feature_detector: String,
    pub object_type: ObjectType,
}

impl Default for ObservationParams {
    fn default() -> Self {
        Self {
            min_height: 1.3,
            max_height: 2.3,
            total_weight: 1.0,
            out_of_height_penalty: -15.0,
            feat_sigma_u: 3.0,
            feat_sigma_v: 3.0,
            mean_horizon: None,
            std_horizon: 1.0,
            feature_detector: "SURF".to_string(),
            object_type: ObjectType::Person,
        }
    }
}

impl ObservationParams {
    /// Applies a manager-level parameter; returns `false` for node-only ones.
    pub fn apply(&mut self, param: &Parameter) -> bool {
        match *param {
            Parameter::MinHeight(v) => self.min_height = v,
            Parameter::MaxHeight(v) => self.max_height = v,
            Parameter::TotalWeight(v) => self.total_weight = v,
            Parameter::FeatSigmaU(v) => self.feat_sigma_u = v,
            Parameter::FeatSigmaV(v) => self.feat_sigma_v = v,
            // A zero mean has always meant "no horizon prior".
            Parameter::MeanHorizon(v) => self.mean_horizon = (v != 0.0).then_some(v),
            Parameter::StdHorizon(v) => self.std_horizon = v,
            Parameter::Node { .. } => return false,
        }
        true
    }
}

/// A single named setting, typed when the manager knows the name.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    MinHeight(f64),
    MaxHeight(f64),
    TotalWeight(f64),
    FeatSigmaU(f64),
    FeatSigmaV(f64),
    MeanHorizon(f64),
    StdHorizon(f64),
    /// Setting only meaningful to nodes; passed through verbatim.
    Node { name: String, value: String },
}

impl Parameter {
    pub fn parse(name: &str, value: &str) -> Result<Self, ObservationError> {
        let ctor: fn(f64) -> Parameter = match name {
            "min_height" => Parameter::MinHeight,
            "max_height" => Parameter::MaxHeight,
            "total_weight" => Parameter::TotalWeight,
            "feat_sigma_u" => Parameter::FeatSigmaU,
            "feat_sigma_v" => Parameter::FeatSigmaV,
            "mean_horizon" => Parameter::MeanHorizon,
            "std_horizon" => Parameter::StdHorizon,
            _ => {
                return Ok(Parameter::Node {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            }
        };
        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|_| ObservationError::InvalidParameter {
                name: name.to_string(),
                value: value.to_string(),
            })?;
        Ok(ctor(parsed))
    }

    pub fn name(&self) -> &str {
        match self {
            Parameter::MinHeight(_) => "min_height",
            Parameter::MaxHeight(_) => "max_height",
            Parameter::TotalWeight(_) => "total_weight",
            Parameter::FeatSigmaU(_) => "feat_sigma_u",
            Parameter::FeatSigmaV(_) => "feat_sigma_v",
            Parameter::MeanHorizon(_) => "mean_horizon",
            Parameter::StdHorizon(_) => "std_horizon",
            Parameter::Node { name, .. } => name,
        }
    }
}

/// Loads [`ObservationParams`] from a JSON file; missing fields keep their
/// defaults.
pub fn load_params(path: &Path) -> Result<ObservationParams, ObservationError> {
    let contents = fs::read_to_string(path).map_err(|e| ObservationError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| ObservationError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
