//! Layout constants as an explicit, immutable record.

use serde::Deserialize;

use crate::diagnostics::Diagnostics;

/// Spacing and sizing constants for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Lower bound for every band height
    pub min_band_height: f64,
    /// Horizontal distance between adjacent column centres
    pub column_gap: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Width of the band-label gutter on the left
    pub band_label_width: f64,
    /// Per-column horizontal step of a loop-back arc
    pub loop_offset: f64,
    /// Minimum clearance between an edge bend and a node
    pub edge_gap: f64,
    /// Vertical spacing between nodes stacked in one band cell
    pub node_gap_y: f64,
    /// Inner vertical padding of a band around its stacked nodes
    pub band_padding: f64,
    pub corner_radius: f64,
    /// Horizontal distance before a node's left edge where a loop turns in
    pub loop_approach: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_band_height: 160.0,
            column_gap: 260.0,
            padding_x: 120.0,
            padding_y: 80.0,
            band_label_width: 150.0,
            loop_offset: 80.0,
            edge_gap: 36.0,
            node_gap_y: 30.0,
            band_padding: 24.0,
            corner_radius: 14.0,
            loop_approach: 24.0,
        }
    }
}

/// Partial configuration, as found in a description's `layout` block or in
/// the `[layout]` table of a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutOverrides {
    #[serde(alias = "laneHeight", alias = "minBandHeight")]
    pub min_band_height: Option<f64>,
    #[serde(alias = "columnGap")]
    pub column_gap: Option<f64>,
    #[serde(alias = "paddingX")]
    pub padding_x: Option<f64>,
    #[serde(alias = "paddingY")]
    pub padding_y: Option<f64>,
    #[serde(alias = "laneLabelWidth", alias = "bandLabelWidth")]
    pub band_label_width: Option<f64>,
    #[serde(alias = "loopOffset")]
    pub loop_offset: Option<f64>,
    #[serde(alias = "edgeGap")]
    pub edge_gap: Option<f64>,
    #[serde(alias = "nodeGapY")]
    pub node_gap_y: Option<f64>,
    #[serde(alias = "bandPadding")]
    pub band_padding: Option<f64>,
    #[serde(alias = "cornerRadius")]
    pub corner_radius: Option<f64>,
    #[serde(alias = "loopApproach")]
    pub loop_approach: Option<f64>,
}

impl LayoutConfig {
    /// Return a copy with the given overrides applied. Values that are not
    /// finite, negative, or (for the column gap) zero are ignored with a
    /// diagnostic.
    pub fn with_overrides(&self, overrides: &LayoutOverrides, diag: &mut Diagnostics) -> Self {
        let mut cfg = *self;
        let o = overrides;
        apply(&mut cfg.min_band_height, o.min_band_height, "min_band_height", false, diag);
        apply(&mut cfg.column_gap, o.column_gap, "column_gap", true, diag);
        apply(&mut cfg.padding_x, o.padding_x, "padding_x", false, diag);
        apply(&mut cfg.padding_y, o.padding_y, "padding_y", false, diag);
        apply(&mut cfg.band_label_width, o.band_label_width, "band_label_width", false, diag);
        apply(&mut cfg.loop_offset, o.loop_offset, "loop_offset", false, diag);
        apply(&mut cfg.edge_gap, o.edge_gap, "edge_gap", false, diag);
        apply(&mut cfg.node_gap_y, o.node_gap_y, "node_gap_y", false, diag);
        apply(&mut cfg.band_padding, o.band_padding, "band_padding", false, diag);
        apply(&mut cfg.corner_radius, o.corner_radius, "corner_radius", false, diag);
        apply(&mut cfg.loop_approach, o.loop_approach, "loop_approach", false, diag);
        cfg
    }
}

fn apply(slot: &mut f64, value: Option<f64>, name: &str, positive: bool, diag: &mut Diagnostics) {
    let Some(v) = value else {
        return;
    };
    let valid = v.is_finite() && if positive { v > 0.0 } else { v >= 0.0 };
    if valid {
        *slot = v;
    } else {
        diag.push(format!(
            "Layout setting {name} = {v} is invalid, keeping {}",
            slot
        ));
    }
}
