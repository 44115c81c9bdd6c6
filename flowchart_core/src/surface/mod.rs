//! Drawing surface - where connectors and node display states end up.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use story_data::{Connection, NodeId, TimePeriodId};

use crate::path::PathDescription;

/// Display state pushed to a rendered node on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NodeDisplay {
    pub open: bool,
    pub locked: bool,
}

/// The page side of a redraw pass. Only the view's redraw pass writes to it.
pub trait DrawingSurface {
    /// Show the container of `period` and hide every other one.
    ///
    /// Connectors of the previous period must not stay visible until the
    /// next pass.
    fn activate_period(&mut self, period: &TimePeriodId);

    /// Remove every connector. Reusable definitions (the arrowhead marker) stay.
    fn clear(&mut self);

    fn set_node_display(&mut self, node: &NodeId, display: NodeDisplay);

    fn draw_connector(&mut self, connection: &Connection, path: &PathDescription);
}

/// Marker id referenced by `marker-end` on arrowed paths.
pub const ARROWHEAD_MARKER_ID: &str = "arrowhead";

const ARROWHEAD_DEFS: &str = concat!(
    "<defs><marker id=\"arrowhead\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" ",
    "markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\">",
    "<path d=\"M 0 0 L 10 5 L 0 10 z\"/></marker></defs>"
);

#[derive(Debug, Clone, PartialEq, Eq)]
struct SvgPath {
    from: NodeId,
    to: NodeId,
    d: String,
    arrowhead: bool,
}

/// Retained SVG connector layer.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    active_period: Option<TimePeriodId>,
    paths: Vec<SvgPath>,
    nodes: BTreeMap<NodeId, NodeDisplay>,
    clears: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_period(&self) -> Option<&TimePeriodId> {
        self.active_period.as_ref()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// `d` attribute of the connector `from -> to`, if drawn.
    pub fn path_d(&self, from: &NodeId, to: &NodeId) -> Option<&str> {
        self.paths
            .iter()
            .find(|path| &path.from == from && &path.to == to)
            .map(|path| path.d.as_str())
    }

    pub fn node_display(&self, node: &NodeId) -> Option<NodeDisplay> {
        self.nodes.get(node).copied()
    }

    /// How many times the connector layer has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// CSS classes for a node element: `flowchart-node`, `is-open`, `locked`.
    pub fn node_classes(&self, node: &NodeId) -> String {
        let display = self.node_display(node).unwrap_or_default();
        let mut classes = String::from("flowchart-node");
        if display.open {
            classes.push_str(" is-open");
        }
        if display.locked {
            classes.push_str(" locked");
        }
        classes
    }

    /// Render the connector layer as SVG markup.
    pub fn to_markup(&self) -> String {
        let mut svg = String::from("<svg class=\"connector-svg\" xmlns=\"http://www.w3.org/2000/svg\">");
        svg.push_str(ARROWHEAD_DEFS);
        for path in &self.paths {
            let _ = write!(
                svg,
                "<path d=\"{}\" data-from=\"{}\" data-to=\"{}\"",
                path.d,
                escape_attr(path.from.as_str()),
                escape_attr(path.to.as_str())
            );
            if path.arrowhead {
                let _ = write!(svg, " marker-end=\"url(#{ARROWHEAD_MARKER_ID})\"");
            }
            svg.push_str("/>");
        }
        svg.push_str("</svg>");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    fn activate_period(&mut self, period: &TimePeriodId) {
        self.active_period = Some(period.clone());
        self.nodes.clear();
        self.paths.clear();
    }

    fn clear(&mut self) {
        self.paths.clear();
        self.clears += 1;
    }

    fn set_node_display(&mut self, node: &NodeId, display: NodeDisplay) {
        self.nodes.insert(node.clone(), display);
    }

    fn draw_connector(&mut self, connection: &Connection, path: &PathDescription) {
        self.paths.push(SvgPath {
            from: connection.from.clone(),
            to: connection.to.clone(),
            d: path.to_svg_d(),
            arrowhead: path.arrowhead,
        });
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::path::PathCommand;

    fn line(arrowhead: bool) -> PathDescription {
        PathDescription {
            commands: vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 20.0)),
            ],
            arrowhead,
        }
    }

    #[test]
    fn test_markup_contains_paths_and_marker() {
        let mut surface = SvgSurface::new();
        surface.draw_connector(&Connection::new("A", "B"), &line(true));
        surface.draw_connector(&Connection::new("B", "C"), &line(false));

        let markup = surface.to_markup();
        assert!(markup.contains("<marker id=\"arrowhead\""));
        assert!(markup.contains(
            "<path d=\"M 0 0 L 10 20\" data-from=\"A\" data-to=\"B\" marker-end=\"url(#arrowhead)\"/>"
        ));
        assert!(markup.contains("<path d=\"M 0 0 L 10 20\" data-from=\"B\" data-to=\"C\"/>"));
    }

    #[test]
    fn test_clear_keeps_marker_definition() {
        let mut surface = SvgSurface::new();
        surface.draw_connector(&Connection::new("A", "B"), &line(true));
        surface.clear();

        assert_eq!(surface.path_count(), 0);
        assert_eq!(surface.clear_count(), 1);
        assert!(surface.to_markup().contains(ARROWHEAD_DEFS));
    }

    #[test]
    fn test_activate_period_drops_previous_connectors() {
        let mut surface = SvgSurface::new();
        surface.draw_connector(&Connection::new("A", "B"), &line(true));
        surface.activate_period(&TimePeriodId::new("evening"));

        assert_eq!(surface.path_count(), 0);
        assert!(surface.path_d(&NodeId::new("A"), &NodeId::new("B")).is_none());
        assert_eq!(surface.clear_count(), 0);
        assert!(surface.to_markup().contains(ARROWHEAD_DEFS));
    }

    #[test]
    fn test_node_classes() {
        let mut surface = SvgSurface::new();
        let a = NodeId::new("A");
        surface.set_node_display(&a, NodeDisplay { open: true, locked: false });
        assert_eq!(surface.node_classes(&a), "flowchart-node is-open");

        surface.set_node_display(&a, NodeDisplay { open: false, locked: true });
        assert_eq!(surface.node_classes(&a), "flowchart-node locked");
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(escape_attr("a\"<b>&"), "a&quot;&lt;b&gt;&amp;");
    }
}
