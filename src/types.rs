use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer axis-aligned image box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    #[inline]
    pub fn contains(&self, pt: Point2<f32>) -> bool {
        let (x, y) = (self.x as f32, self.y as f32);
        x <= pt.x
            && pt.x < x + self.width as f32
            && y <= pt.y
            && pt.y < y + self.height as f32
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Persistent track identifier assigned by the feature tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

/// Object classes with a physical height prior, in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    #[default]
    Person,
    Car,
}

impl ObjectType {
    /// Mean and standard deviation of the class height.
    pub fn height_prior(self) -> (f64, f64) {
        match self {
            ObjectType::Person => (1.7, 0.1),
            ObjectType::Car => (1.5, 0.1),
        }
    }
}

/// Which nodes contribute to an object score.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeFilter {
    #[default]
    All,
    Type(String),
}

impl NodeFilter {
    /// `"all"` selects every node, anything else a node type.
    pub fn from_name(name: &str) -> Self {
        if name == "all" {
            NodeFilter::All
        } else {
            NodeFilter::Type(name.to_string())
        }
    }

    #[inline]
    pub fn accepts(&self, node_type: &str) -> bool {
        match self {
            NodeFilter::All => true,
            NodeFilter::Type(t) => t == node_type,
        }
    }
}

/// Features kept by one association cycle, in selection order.
///
/// Points and ids are parallel lists of equal length with unique ids. The
/// set is rebuilt from scratch every cycle and never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    points: Vec<Point2<f32>>,
    ids: Vec<FeatureId>,
}

impl FeatureSet {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
            ids: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, id: FeatureId, point: Point2<f32>) {
        debug_assert!(!self.ids.contains(&id), "duplicate feature id {id:?}");
        self.ids.push(id);
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    pub fn ids(&self) -> &[FeatureId] {
        &self.ids
    }

    pub fn get(&self, index: usize) -> Option<(FeatureId, Point2<f32>)> {
        Some((*self.ids.get(index)?, self.points[index]))
    }

    /// Selection index of `id`, if it was kept this cycle.
    pub fn position(&self, id: FeatureId) -> Option<usize> {
        self.ids.iter().position(|&k| k == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, Point2<f32>)> + '_ {
        self.ids.iter().copied().zip(self.points.iter().copied())
    }
}
