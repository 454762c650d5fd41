//! Edge routing and waypoint generation.
//!
//! Each edge is routed from its two placed endpoints alone; edges never
//! consult each other.

use crate::ir::EdgeBehavior;

use super::config::LayoutConfig;
use super::types::{LayoutNode, Point};

/// Which router branch an edge takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Forward,
    Loop,
    /// Forward-flagged, but the target does not lie in a later column.
    BackwardForward,
}

impl RouteKind {
    pub fn classify(behavior: EdgeBehavior, source: &LayoutNode, target: &LayoutNode) -> Self {
        match behavior {
            EdgeBehavior::LoopBack => RouteKind::Loop,
            EdgeBehavior::Forward if target.column > source.column => RouteKind::Forward,
            EdgeBehavior::Forward => RouteKind::BackwardForward,
        }
    }

    pub fn is_loop(self) -> bool {
        self != RouteKind::Forward
    }
}

/// Route a forward edge: leave the source's right edge, enter the target's
/// left edge, with one vertical jog when the rows differ.
pub fn route_forward(source: &LayoutNode, target: &LayoutNode, config: &LayoutConfig) -> Vec<Point> {
    let start = Point::new(source.bounds.right, source.y);
    let end = Point::new(target.bounds.left, target.y);

    if start.y == end.y {
        return vec![start, end];
    }

    let delta = target.column.saturating_sub(source.column).max(1) as f64;
    let offset = config.edge_gap.max(delta * config.column_gap / 2.0);
    let mut bend_x = (start.x + offset).min(end.x - config.edge_gap / 2.0);
    if bend_x <= start.x || bend_x >= end.x {
        bend_x = (start.x + end.x) / 2.0;
    }

    vec![
        start,
        Point::new(bend_x, start.y),
        Point::new(bend_x, end.y),
        end,
    ]
}

/// Route a loop-back: leave the source's left edge, run left of both
/// endpoints, arc above or below the spanned bands, and come back into the
/// target's left edge from outside.
pub fn route_loop(
    source: &LayoutNode,
    target: &LayoutNode,
    config: &LayoutConfig,
    canvas_height: f64,
) -> Vec<Point> {
    let start = Point::new(source.bounds.left, source.y);
    let end = Point::new(target.bounds.left, target.y);

    // Longer jumps back swing wider so nested loops stay apart.
    let skipped = source.column as f64 - target.column as f64;
    let factor = (skipped + 1.0).max(1.0);
    let leftmost = start.x.min(end.x);
    let loop_x = leftmost - config.loop_offset * factor - (config.edge_gap * factor).max(40.0);
    let ceiling = leftmost - config.edge_gap.max(1.0);
    let outer_x = loop_x.max(config.padding_x / 2.0).min(ceiling);

    let band_distance = source.band_index.abs_diff(target.band_index).max(1) as f64;
    let arc_span = config.min_band_height * (band_distance + 0.4);
    let inner_top = config.padding_y / 2.0;
    let inner_bottom = canvas_height - config.padding_y / 2.0;
    let arc_y = if target.y <= source.y {
        inner_top.max(source.y.min(target.y) - arc_span)
    } else {
        inner_bottom.min(source.y.max(target.y) + arc_span)
    };

    let approach_x = end.x - config.loop_approach;

    vec![
        start,
        Point::new(outer_x, start.y),
        Point::new(outer_x, arc_y),
        Point::new(approach_x, arc_y),
        Point::new(approach_x, end.y),
        end,
    ]
}

/// Drop consecutive duplicates and keep at least two distinct points.
pub fn clean_waypoints(points: Vec<Point>) -> Vec<Point> {
    let mut cleaned: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last() != Some(&p) {
            cleaned.push(p);
        }
    }
    if cleaned.len() == 1 {
        // Degenerate: both ports coincide. Keep a visible stub.
        let p = cleaned[0];
        cleaned.push(Point::new(p.x + 1.0, p.y));
    }
    cleaned
}

/// Route one edge between two placed nodes.
pub fn route_edge(
    kind: RouteKind,
    source: &LayoutNode,
    target: &LayoutNode,
    config: &LayoutConfig,
    canvas_height: f64,
) -> Vec<Point> {
    let points = match kind {
        RouteKind::Forward => route_forward(source, target, config),
        RouteKind::Loop | RouteKind::BackwardForward => {
            route_loop(source, target, config, canvas_height)
        }
    };
    clean_waypoints(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;
    use crate::layout::types::Bounds;
    use crate::status;

    fn node(id: &str, kind: NodeKind, column: usize, band_index: usize, x: f64, y: f64) -> LayoutNode {
        let (width, height) = kind.size();
        LayoutNode {
            id: id.to_string(),
            kind,
            label: id.to_string(),
            label_lines: vec![id.to_string()],
            band: format!("band-{band_index}"),
            band_index,
            column,
            status: status::NEUTRAL,
            x,
            y,
            width,
            height,
            bounds: Bounds::centered(Point::new(x, y), width, height),
        }
    }

    #[test]
    fn test_classify() {
        let a = node("a", NodeKind::Task, 0, 0, 270.0, 160.0);
        let b = node("b", NodeKind::Task, 1, 0, 530.0, 160.0);
        assert_eq!(RouteKind::classify(EdgeBehavior::Forward, &a, &b), RouteKind::Forward);
        assert_eq!(RouteKind::classify(EdgeBehavior::LoopBack, &a, &b), RouteKind::Loop);
        assert_eq!(
            RouteKind::classify(EdgeBehavior::Forward, &b, &a),
            RouteKind::BackwardForward
        );
        assert_eq!(
            RouteKind::classify(EdgeBehavior::Forward, &a, &a),
            RouteKind::BackwardForward
        );
    }

    #[test]
    fn test_forward_same_row_is_straight() {
        let cfg = LayoutConfig::default();
        let a = node("a", NodeKind::StartEvent, 0, 0, 270.0, 160.0);
        let b = node("b", NodeKind::Task, 1, 0, 530.0, 160.0);
        let pts = route_edge(RouteKind::Forward, &a, &b, &cfg, 400.0);
        assert_eq!(pts, vec![Point::new(302.0, 160.0), Point::new(425.0, 160.0)]);
    }

    #[test]
    fn test_forward_across_bands_bends_between_nodes() {
        let cfg = LayoutConfig::default();
        let a = node("a", NodeKind::Task, 0, 0, 270.0, 160.0);
        let b = node("b", NodeKind::Task, 1, 1, 530.0, 320.0);
        let pts = route_edge(RouteKind::Forward, &a, &b, &cfg, 560.0);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Point::new(375.0, 160.0));
        assert_eq!(pts[3], Point::new(425.0, 320.0));
        let bend = pts[1].x;
        assert!(bend > pts[0].x && bend < pts[3].x);
        assert_eq!(pts[1].y, 160.0);
        assert_eq!(pts[2], Point::new(bend, 320.0));
    }

    #[test]
    fn test_forward_bend_offset_grows_with_distance() {
        let cfg = LayoutConfig::default();
        let a = node("a", NodeKind::StartEvent, 0, 0, 270.0, 160.0);
        let near = node("n", NodeKind::StartEvent, 1, 1, 530.0, 320.0);
        let far = node("f", NodeKind::StartEvent, 3, 1, 1050.0, 320.0);
        let p_near = route_forward(&a, &near, &cfg);
        let p_far = route_forward(&a, &far, &cfg);
        assert!(p_far[1].x > p_near[1].x);
    }

    #[test]
    fn test_loop_exits_left_and_reenters_left() {
        let cfg = LayoutConfig::default();
        let draft = node("draft", NodeKind::Task, 0, 0, 270.0, 160.0);
        let rework = node("rework", NodeKind::Task, 2, 0, 790.0, 160.0);
        let pts = route_edge(RouteKind::Loop, &rework, &draft, &cfg, 400.0);
        assert_eq!(pts[0], Point::new(rework.bounds.left, 160.0));
        assert!(pts[1].x < rework.bounds.left - cfg.edge_gap / 2.0);
        assert!(pts[1].x < draft.bounds.left);
        assert_eq!(*pts.last().unwrap(), Point::new(draft.bounds.left, 160.0));
        // arcs above the band, clamped to the top margin
        assert_eq!(pts[2].y, cfg.padding_y / 2.0);
        assert!(pts.iter().all(|p| p.x >= cfg.padding_x / 2.0));
    }

    #[test]
    fn test_loop_downwards_clamped_to_canvas() {
        let cfg = LayoutConfig::default();
        let top = node("top", NodeKind::Task, 0, 0, 270.0, 160.0);
        let bottom = node("bottom", NodeKind::Task, 1, 1, 530.0, 320.0);
        let canvas_height = 480.0;
        let pts = route_loop(&top, &bottom, &cfg, canvas_height);
        assert_eq!(pts[2].y, canvas_height - cfg.padding_y / 2.0);
    }

    #[test]
    fn test_nested_loops_swing_wider() {
        let cfg = LayoutConfig {
            padding_x: 0.0,
            ..LayoutConfig::default()
        };
        let a = node("a", NodeKind::Task, 3, 0, 1050.0, 160.0);
        let b = node("b", NodeKind::Task, 4, 0, 1310.0, 160.0);
        let c = node("c", NodeKind::Task, 6, 0, 1830.0, 160.0);
        let short = route_loop(&b, &a, &cfg, 400.0);
        let long = route_loop(&c, &a, &cfg, 400.0);
        assert!(long[1].x < short[1].x);
    }

    #[test]
    fn test_self_loop_has_distinct_points() {
        let cfg = LayoutConfig::default();
        let a = node("a", NodeKind::Task, 1, 0, 530.0, 160.0);
        let pts = route_edge(RouteKind::BackwardForward, &a, &a, &cfg, 400.0);
        assert!(pts.len() >= 2);
        assert!(pts.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_clean_waypoints() {
        let p = Point::new(1.0, 1.0);
        let q = Point::new(2.0, 1.0);
        assert_eq!(clean_waypoints(vec![p, p, q, q]), vec![p, q]);
        assert_eq!(clean_waypoints(vec![p, p]).len(), 2);
    }
}
