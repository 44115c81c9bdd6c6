//! Geometry Resolver - anchor points for a connector between two node boxes.

mod index;

pub use index::*;

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;

/// A point in container coordinates (origin at the container's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box, box-model style: `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Re-express this box relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// Which way a connector leaves its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Source bottom edge to destination top edge.
    Vertical,
    /// Source right edge to destination left edge.
    Rightward,
    /// Source left edge to destination right edge.
    Leftward,
}

impl Orientation {
    pub fn is_lateral(self) -> bool {
        !matches!(self, Orientation::Vertical)
    }
}

/// Start and end of a connector, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPair {
    pub start: Point,
    pub end: Point,
    pub orientation: Orientation,
}

/// Chooses anchor points from two rendered boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryResolver {
    vertical_threshold: f64,
}

impl Default for GeometryResolver {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl GeometryResolver {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            vertical_threshold: config.vertical_threshold,
        }
    }

    /// Compute anchors for a connector `from -> to`, relative to `container`.
    ///
    /// Returns `None` when either box is absent (not rendered), meaning there
    /// is no connection to draw.
    pub fn resolve(&self, from: Option<Rect>, to: Option<Rect>, container: &Rect) -> Option<AnchorPair> {
        let from = from?.relative_to(container);
        let to = to?.relative_to(container);

        if to.top() - from.bottom() > self.vertical_threshold {
            return Some(AnchorPair {
                start: Point::new(from.center_x(), from.bottom()),
                end: Point::new(to.center_x(), to.top()),
                orientation: Orientation::Vertical,
            });
        }

        let anchors = if to.center_x() >= from.center_x() {
            AnchorPair {
                start: Point::new(from.right(), from.center_y()),
                end: Point::new(to.left(), to.center_y()),
                orientation: Orientation::Rightward,
            }
        } else {
            AnchorPair {
                start: Point::new(from.left(), from.center_y()),
                end: Point::new(to.right(), to.center_y()),
                orientation: Orientation::Leftward,
            }
        };
        Some(anchors)
    }
}
