//! Node placement and sizing.

use std::collections::BTreeMap;

use crate::ir::{NodeKind, ProcessIR};
use crate::measure::TextMetrics;

use super::config::LayoutConfig;
use super::layering::Columns;
use super::types::{Bounds, LayoutBand, LayoutNode, Point};

/// Nodes sharing one (band, column) slot, in declaration order.
pub type Cells = BTreeMap<(usize, usize), Vec<usize>>;

/// Group nodes by (band, column).
pub fn group_cells(ir: &ProcessIR, columns: &Columns) -> Cells {
    let mut cells: Cells = BTreeMap::new();
    for (idx, node) in ir.nodes.iter().enumerate() {
        cells
            .entry((node.band, columns.column[idx]))
            .or_default()
            .push(idx);
    }
    cells
}

/// Height of a vertical stack of nodes with `gap` between neighbours.
pub fn stack_height(ir: &ProcessIR, members: &[usize], gap: f64) -> f64 {
    let heights: f64 = members.iter().map(|&i| ir.nodes[i].kind.size().1).sum();
    heights + gap * members.len().saturating_sub(1) as f64
}

/// Horizontal centre of a column; identical for every band.
pub fn column_x(column: usize, config: &LayoutConfig) -> f64 {
    config.band_label_width + config.padding_x + column as f64 * config.column_gap
}

fn wrap_width(kind: NodeKind) -> usize {
    if kind == NodeKind::Task { 20 } else { 16 }
}

/// Place every node at its column centre, spreading stacked nodes
/// symmetrically around the band centre.
pub fn place_nodes(
    ir: &ProcessIR,
    columns: &Columns,
    cells: &Cells,
    bands: &[LayoutBand],
    config: &LayoutConfig,
    metrics: &TextMetrics,
) -> Vec<LayoutNode> {
    let mut centers: Vec<Point> = vec![Point::new(0.0, 0.0); ir.nodes.len()];

    for (&(band, column), members) in cells {
        let x = column_x(column, config);
        let total = stack_height(ir, members, config.node_gap_y);
        let mut cursor = bands[band].center_y - total / 2.0;
        for &idx in members {
            let (_, h) = ir.nodes[idx].kind.size();
            centers[idx] = Point::new(x, cursor + h / 2.0);
            cursor += h + config.node_gap_y;
        }
    }

    ir.nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let (width, height) = node.kind.size();
            let center = centers[idx];
            LayoutNode {
                id: node.id.clone(),
                kind: node.kind,
                label: node.label.clone(),
                label_lines: metrics.wrap_label(&node.label, wrap_width(node.kind)),
                band: bands[node.band].id.clone(),
                band_index: node.band,
                column: columns.column[idx],
                status: node.status,
                x: center.x,
                y: center.y,
                width,
                height,
                bounds: Bounds::centered(center, width, height),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Description;
    use crate::layout::bands::compute_bands;
    use crate::layout::layering::assign_columns;

    fn place(desc: Description) -> (Vec<LayoutBand>, Vec<LayoutNode>) {
        let ir = ProcessIR::from_description(&desc);
        let config = LayoutConfig::default();
        let cols = assign_columns(&ir);
        let cells = group_cells(&ir, &cols);
        let bands = compute_bands(&ir, &cells, &config, 1000.0);
        let nodes = place_nodes(&ir, &cols, &cells, &bands, &config, &TextMetrics::default());
        (bands, nodes)
    }

    #[test]
    fn test_x_depends_only_on_column() {
        let (_, nodes) = place(
            Description::new()
                .band("a", "A")
                .band("b", "B")
                .node("s", "startEvent", "a")
                .node("t", "task", "a")
                .node("u", "subProcess", "b")
                .edge("s", "t")
                .edge("s", "u"),
        );
        assert_eq!(nodes[0].x, 270.0);
        assert_eq!(nodes[1].x, nodes[2].x);
        assert_eq!(nodes[1].x, 270.0 + 260.0);
    }

    #[test]
    fn test_single_node_sits_on_band_center() {
        let (bands, nodes) = place(
            Description::new()
                .band("a", "A")
                .band("b", "B")
                .node("x", "task", "b"),
        );
        assert_eq!(nodes[0].y, bands[1].center_y);
        assert_eq!(nodes[0].bounds.top, bands[1].center_y - 46.0);
    }

    #[test]
    fn test_stacked_nodes_are_symmetric() {
        let (bands, nodes) = place(
            Description::new()
                .band("a", "A")
                .node("x", "task", "a")
                .node("y", "task", "a")
                .node("z", "task", "a"),
        );
        let center = bands[0].center_y;
        assert_eq!(nodes[1].y, center);
        assert_eq!(center - nodes[0].y, nodes[2].y - center);
        assert!(!nodes[0].bounds.intersects(&nodes[1].bounds));
        assert!(!nodes[1].bounds.intersects(&nodes[2].bounds));
        // the stack fits inside its band
        assert!(nodes[0].bounds.top >= bands[0].top);
        assert!(nodes[2].bounds.bottom <= bands[0].bottom);
    }

    #[test]
    fn test_label_lines_wrapped() {
        let mut desc = Description::new().band("a", "A").node("x", "task", "a");
        if let crate::description::Entry::Item(node) = &mut desc.nodes[0] {
            node.label = Some("Send the contract for approval".to_string());
        }
        let (_, nodes) = place(desc);
        assert_eq!(nodes[0].label_lines, vec!["Send the contract", "for approval"]);
    }
}
