//! Routing strategies.

use super::PathCommand;
use crate::config::Gutter;
use crate::geometry::{AnchorPair, Orientation, Point};

/// A connector routing style.
pub trait Router: std::fmt::Debug {
    /// Commands from `anchors.start` to `anchors.end`, starting with a move.
    fn route(&self, anchors: &AnchorPair) -> Vec<PathCommand>;
}

/// Smooth cubic S-curves.
///
/// Control points are pushed out along the flow axis: down from the start and
/// up from the end for vertical flow, sideways for lateral links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveRouter {
    offset: f64,
}

impl CurveRouter {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl Router for CurveRouter {
    fn route(&self, anchors: &AnchorPair) -> Vec<PathCommand> {
        let AnchorPair { start, end, orientation } = *anchors;
        let (c1, c2) = match orientation {
            Orientation::Vertical => (
                Point::new(start.x, start.y + self.offset),
                Point::new(end.x, end.y - self.offset),
            ),
            Orientation::Rightward => (
                Point::new(start.x + self.offset, start.y),
                Point::new(end.x - self.offset, end.y),
            ),
            Orientation::Leftward => (
                Point::new(start.x - self.offset, start.y),
                Point::new(end.x + self.offset, end.y),
            ),
        };

        vec![PathCommand::MoveTo(start), PathCommand::CubicTo { c1, c2, end }]
    }
}

/// Right-angle paths through the channel between node rows.
///
/// Vertical flow goes down, across the gutter channel, then down again.
/// Lateral links go across, down the channel, then across.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthogonalRouter {
    gutter: Gutter,
}

impl OrthogonalRouter {
    pub fn new(gutter: Gutter) -> Self {
        Self { gutter }
    }

    /// Channel offset along a signed gap; never overshoots the far anchor.
    fn channel_offset(&self, gap: f64) -> f64 {
        match self.gutter {
            Gutter::Fixed(px) => gap.signum() * px.min(gap.abs()),
            Gutter::HalfGap => gap / 2.0,
        }
    }
}

impl Router for OrthogonalRouter {
    fn route(&self, anchors: &AnchorPair) -> Vec<PathCommand> {
        let AnchorPair { start, end, orientation } = *anchors;

        if orientation.is_lateral() {
            if start.y == end.y {
                return vec![PathCommand::MoveTo(start), PathCommand::LineTo(end)];
            }
            let channel_x = start.x + self.channel_offset(end.x - start.x);
            return vec![
                PathCommand::MoveTo(start),
                PathCommand::LineTo(Point::new(channel_x, start.y)),
                PathCommand::LineTo(Point::new(channel_x, end.y)),
                PathCommand::LineTo(end),
            ];
        }

        if start.x == end.x {
            return vec![PathCommand::MoveTo(start), PathCommand::LineTo(end)];
        }
        let channel_y = start.y + self.channel_offset(end.y - start.y);
        vec![
            PathCommand::MoveTo(start),
            PathCommand::LineTo(Point::new(start.x, channel_y)),
            PathCommand::LineTo(Point::new(end.x, channel_y)),
            PathCommand::LineTo(end),
        ]
    }
}
