//! Layout engine core implementation.

use log::{debug, info};

use crate::description::Description;
use crate::diagnostics::Diagnostics;
use crate::ir::{EdgeKind, ProcessIR};
use crate::measure::TextMetrics;

use super::bands::compute_bands;
use super::config::LayoutConfig;
use super::layering::assign_columns;
use super::path::{label_anchor, rounded_path};
use super::placement::{group_cells, place_nodes};
use super::routing::{RouteKind, route_edge};
use super::types::{EdgeClass, Layout, LayoutEdge};

/// Layout engine configuration and computation.
///
/// The engine holds no state between calls; `layout` is a pure function of
/// its input and the configuration.
#[derive(Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
    pub(crate) metrics: TextMetrics,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            metrics: TextMetrics::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Normalize a raw description and lay it out. The description's own
    /// `layout` block overrides this engine's configuration for this call.
    pub fn layout_description(&self, desc: &Description) -> Layout {
        let mut config_diagnostics = Diagnostics::new();
        let config = match &desc.layout {
            Some(overrides) => self.config.with_overrides(overrides, &mut config_diagnostics),
            None => self.config,
        };

        let ir = ProcessIR::from_description(desc);
        let engine = LayoutEngine {
            config,
            metrics: self.metrics.clone(),
        };
        let mut layout = engine.layout(&ir);

        config_diagnostics.extend(layout.diagnostics);
        layout.diagnostics = config_diagnostics;
        layout
    }

    /// Compute layout for the given process.
    pub fn layout(&self, ir: &ProcessIR) -> Layout {
        let config = &self.config;
        let mut diagnostics = ir.diagnostics.clone();

        // The normalizer has already said why nothing survived.
        if ir.nodes.is_empty() {
            return Layout {
                meta: ir.meta.clone(),
                bands: Vec::new(),
                nodes: Vec::new(),
                edges: Vec::new(),
                width: 0.0,
                height: 0.0,
                diagnostics,
            };
        }

        // Phase 1: Layering
        let columns = assign_columns(ir);
        for (idx, node) in ir.nodes.iter().enumerate() {
            if columns.fallback[idx] {
                diagnostics.push(format!(
                    "Node {} is part of a cycle of forward edges, its column follows declaration order; mark the returning edge as a loop",
                    node.id
                ));
            }
        }

        // Phase 2: Band geometry
        let cells = group_cells(ir, &columns);
        let width = config.band_label_width
            + config.padding_x * 2.0
            + (columns.max_column() + 1) as f64 * config.column_gap;
        let bands = compute_bands(ir, &cells, config, width);
        let height = config.padding_y * 2.0 + bands.iter().map(|b| b.height).sum::<f64>();
        debug!(width, height, bands = bands.len(); "Band geometry computed");

        // Phase 3: Node placement
        let nodes = place_nodes(ir, &columns, &cells, &bands, config, &self.metrics);

        // Phase 4: Edge routing
        let mut edges = Vec::with_capacity(ir.edges.len());
        for edge in &ir.edges {
            let source = &nodes[edge.source];
            let target = &nodes[edge.target];
            let route = RouteKind::classify(edge.behavior, source, target);
            if route == RouteKind::BackwardForward {
                diagnostics.push(format!(
                    "Edge {} ({} -> {}) does not move right, routed as a loop-back; mark it with behavior \"loop\"",
                    edge.id, source.id, target.id
                ));
            }

            let waypoints = route_edge(route, source, target, config, height);
            let path = rounded_path(&waypoints, config.corner_radius);
            let anchor = label_anchor(&waypoints);
            let class = if route.is_loop() {
                EdgeClass::Loop
            } else if edge.kind == EdgeKind::Message {
                EdgeClass::Message
            } else {
                EdgeClass::Flow
            };

            edges.push(LayoutEdge {
                id: edge.id.clone(),
                from: source.id.clone(),
                to: target.id.clone(),
                label: edge.label.clone(),
                behavior: edge.behavior,
                kind: edge.kind,
                label_bounds: edge
                    .label
                    .as_deref()
                    .map(|text| self.metrics.label_bounds(anchor, text)),
                waypoints,
                path,
                label_anchor: anchor,
                class,
                color: class.color(),
                dashed: edge.kind == EdgeKind::Message,
                is_loop: route.is_loop(),
            });
        }

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            columns = columns.max_column() + 1,
            warnings = diagnostics.len();
            "Layout complete"
        );

        Layout {
            meta: ir.meta.clone(),
            bands,
            nodes,
            edges,
            width,
            height,
            diagnostics,
        }
    }
}
