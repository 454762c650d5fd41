//! Swimlane layout: columns from forward reachability, bands stacked by
//! declaration order, orthogonal edge routes with rounded corners.

mod bands;
mod config;
mod engine;
mod layering;
mod path;
mod placement;
mod routing;
mod types;

pub use config::{LayoutConfig, LayoutOverrides};
pub use engine::LayoutEngine;
pub use path::{label_anchor, polyline_length, rounded_path};
pub use types::{Bounds, EdgeClass, Layout, LayoutBand, LayoutEdge, LayoutNode, Point};
