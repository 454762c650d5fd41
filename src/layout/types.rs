//! Data structures produced by a layout pass.

use serde::Serialize;

use crate::description::Meta;
use crate::diagnostics::Diagnostics;
use crate::ir::{EdgeBehavior, EdgeKind, NodeKind};
use crate::status::StatusToken;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            left: center.x - width / 2.0,
            right: center.x + width / 2.0,
            top: center.y - height / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// A role band with its vertical extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBand {
    pub id: String,
    pub label: String,
    pub accent: String,
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    pub center_y: f64,
    pub height: f64,
    /// Horizontal extent of the swimlane rectangle
    pub left: f64,
    pub width: f64,
    /// Centre of the band-label gutter
    pub label_x: f64,
}

/// A placed node. `x`/`y` is the centre of its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Label wrapped for display inside the node
    pub label_lines: Vec<String>,
    pub band: String,
    pub band_index: usize,
    pub column: usize,
    pub status: StatusToken,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub bounds: Bounds,
}

/// Rendering classification of a routed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    Flow,
    Message,
    Loop,
}

impl EdgeClass {
    pub fn color(self) -> &'static str {
        match self {
            EdgeClass::Flow => "#0f172a",
            EdgeClass::Message => "#f97316",
            EdgeClass::Loop => "#0ea5e9",
        }
    }
}

/// An edge with its routed geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub behavior: EdgeBehavior,
    pub kind: EdgeKind,
    /// Orthogonal path points (start, turns, end)
    pub waypoints: Vec<Point>,
    /// SVG path data with rounded corners
    pub path: String,
    pub label_anchor: Point,
    /// Anchor-centred box reserved for the label text
    pub label_bounds: Option<Bounds>,
    pub class: EdgeClass,
    pub color: &'static str,
    pub dashed: bool,
    pub is_loop: bool,
}

/// The complete layout result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub meta: Meta,
    pub bands: Vec<LayoutBand>,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f64,
    pub height: f64,
    pub diagnostics: Diagnostics,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn edge_between(&self, from: &str, to: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Distinct status tokens in node order, for a legend.
    pub fn legend(&self) -> Vec<StatusToken> {
        let mut tokens: Vec<StatusToken> = Vec::new();
        for node in &self.nodes {
            if !tokens.iter().any(|t| t.key == node.status.key) {
                tokens.push(node.status);
            }
        }
        tokens
    }
}
