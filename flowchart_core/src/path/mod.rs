//! Path Builder - turns an anchor pair into drawable connector commands.
//!
//! Routing style is a strategy ([`Router`]); the builder adds the arrowhead
//! decision on top. Output is a pure function of the inputs, so a path
//! recomputed on every animation frame is byte-identical while the layout
//! holds still.

mod router;

pub use router::*;

use serde::Serialize;
use std::fmt::Write as _;

use crate::config::{RoutingConfig, RoutingStyle};
use crate::geometry::{AnchorPair, Point};

/// One drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, end: Point },
}

/// A complete connector path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDescription {
    pub commands: Vec<PathCommand>,
    /// Draw the arrowhead marker at the final point.
    pub arrowhead: bool,
}

impl PathDescription {
    /// Render as an SVG `d` attribute.
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M {} {}", num(p.x), num(p.y)),
                PathCommand::LineTo(p) => write!(d, "L {} {}", num(p.x), num(p.y)),
                PathCommand::CubicTo { c1, c2, end } => write!(
                    d,
                    "C {} {}, {} {}, {} {}",
                    num(c1.x),
                    num(c1.y),
                    num(c2.x),
                    num(c2.y),
                    num(end.x),
                    num(end.y)
                ),
            };
        }
        d
    }

    /// Final point of the path, where the arrowhead sits.
    pub fn end_point(&self) -> Option<Point> {
        self.commands.last().map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::CubicTo { end, .. } => end,
        })
    }
}

/// Two decimals at most, trailing zeros trimmed, no negative zero.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Builds connector paths with a configured routing strategy.
#[derive(Debug)]
pub struct PathBuilder {
    router: Box<dyn Router>,
    arrowheads: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

impl PathBuilder {
    pub fn new(config: &RoutingConfig) -> Self {
        let router: Box<dyn Router> = match config.style {
            RoutingStyle::Curve => Box::new(CurveRouter::new(config.curve_offset)),
            RoutingStyle::Orthogonal => Box::new(OrthogonalRouter::new(config.gutter)),
        };
        Self::with_router(router, config.arrowheads)
    }

    /// Use a custom routing strategy.
    pub fn with_router(router: Box<dyn Router>, arrowheads: bool) -> Self {
        Self { router, arrowheads }
    }

    pub fn build(&self, anchors: &AnchorPair) -> PathDescription {
        build_path(anchors, self.router.as_ref(), self.arrowheads)
    }
}

/// Route `anchors` with `router`.
pub fn build_path(anchors: &AnchorPair, router: &dyn Router, arrowhead: bool) -> PathDescription {
    PathDescription {
        commands: router.route(anchors),
        arrowhead,
    }
}
