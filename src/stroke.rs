use serde::{Deserialize, Serialize};

use crate::options::Options;
use crate::path::compute_path;

/// A single recorded pointer sample. Never mutated once pushed into a mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }
}

/// The kind of device a mark was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// One freehand stroke.
///
/// `points` is the source of truth. `path` is a cache of
/// [`compute_path`] over those points and is never persisted; it is
/// rebuilt with [`Mark::recompute`] whenever the options change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: PointerKind,
    points: Vec<Point>,
    #[serde(skip)]
    path: String,
}

impl Mark {
    /// Start a mark from its first sample, deriving its path right away.
    pub fn begin(point: Point, kind: PointerKind, options: &Options) -> Self {
        let mut mark = Self {
            kind,
            points: vec![point],
            path: String::new(),
        };
        mark.recompute(options);
        mark
    }

    /// Build a mark from an existing point list, e.g. when hydrating a saved session.
    pub fn from_points(kind: PointerKind, points: Vec<Point>, options: &Options) -> Self {
        let mut mark = Self {
            kind,
            points,
            path: String::new(),
        };
        mark.recompute(options);
        mark
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a sample and refresh the path.
    pub(crate) fn push_point(&mut self, point: Point, options: &Options) {
        self.points.push(point);
        self.recompute(options);
    }

    /// Re-derive the path from the points under `options`.
    ///
    /// Pens report real pressure, so simulated pressure is always turned
    /// off for them here rather than at the call sites.
    pub fn recompute(&mut self, options: &Options) {
        self.path = compute_path(&self.points, &options.for_kind(self.kind));
    }
}
