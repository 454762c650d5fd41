//! Vertical band geometry.

use crate::ir::ProcessIR;

use super::config::LayoutConfig;
use super::placement::{Cells, stack_height};
use super::types::LayoutBand;

/// Height each band needs: the tallest (band, column) stack plus padding,
/// never below the configured minimum.
pub fn band_heights(ir: &ProcessIR, cells: &Cells, config: &LayoutConfig) -> Vec<f64> {
    let mut heights = vec![config.min_band_height; ir.bands.len()];
    for (&(band, _), members) in cells {
        let needed = stack_height(ir, members, config.node_gap_y) + config.band_padding * 2.0;
        heights[band] = heights[band].max(needed);
    }
    heights
}

/// Stack bands top to bottom by index. Consecutive bands share an edge, so
/// the `[top, bottom)` intervals tile the vertical space without gaps.
pub fn compute_bands(
    ir: &ProcessIR,
    cells: &Cells,
    config: &LayoutConfig,
    canvas_width: f64,
) -> Vec<LayoutBand> {
    let heights = band_heights(ir, cells, config);
    let mut top = config.padding_y;

    ir.bands
        .iter()
        .map(|band| {
            let height = heights[band.index];
            let layout = LayoutBand {
                id: band.id.clone(),
                label: band.label.clone(),
                accent: band.accent.clone(),
                index: band.index,
                top,
                bottom: top + height,
                center_y: top + height / 2.0,
                height,
                left: 0.0,
                width: canvas_width,
                label_x: config.band_label_width / 2.0,
            };
            top += height;
            layout
        })
        .collect()
}
