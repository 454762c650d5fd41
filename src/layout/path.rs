//! Smooth path strings and label anchors from waypoints.

use std::fmt::Write;

use super::types::Point;

/// Format a coordinate with at most two decimals and no trailing zeros.
fn fmt_num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Build SVG path data: straight segments, with each interior corner
/// replaced by a quadratic blend of radius `min(radius, len1 / 2, len2 / 2)`.
pub fn rounded_path(points: &[Point], radius: f64) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = format!("M {} {}", fmt_num(first.x), fmt_num(first.y));
    if points.len() == 1 {
        return d;
    }

    for window in points.windows(3) {
        let (prev, current, next) = (window[0], window[1], window[2]);
        let (v1x, v1y) = (current.x - prev.x, current.y - prev.y);
        let (v2x, v2y) = (next.x - current.x, next.y - current.y);
        let len1 = v1x.hypot(v1y);
        let len2 = v2x.hypot(v2y);
        let corner = radius.min(len1 / 2.0).min(len2 / 2.0);
        let straight = (v1x * v2y - v1y * v2x).abs() < 1e-9;

        if straight || corner <= 0.0 || len1 == 0.0 || len2 == 0.0 {
            let _ = write!(d, " L {} {}", fmt_num(current.x), fmt_num(current.y));
            continue;
        }

        let before = Point::new(current.x - v1x / len1 * corner, current.y - v1y / len1 * corner);
        let after = Point::new(current.x + v2x / len2 * corner, current.y + v2y / len2 * corner);
        let _ = write!(
            d,
            " L {} {} Q {} {} {} {}",
            fmt_num(before.x),
            fmt_num(before.y),
            fmt_num(current.x),
            fmt_num(current.y),
            fmt_num(after.x),
            fmt_num(after.y)
        );
    }

    if let Some(last) = points.last() {
        let _ = write!(d, " L {} {}", fmt_num(last.x), fmt_num(last.y));
    }
    d
}

/// Total Euclidean length of the polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point at half of the polyline's cumulative length.
pub fn label_anchor(points: &[Point]) -> Point {
    match points {
        [] => return Point::new(0.0, 0.0),
        [only] => return *only,
        _ => {}
    }

    let mut remaining = polyline_length(points) / 2.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = a.distance(b);
        if remaining <= length {
            let t = if length == 0.0 { 0.0 } else { remaining / length };
            return Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        }
        remaining -= length;
    }
    points[points.len() / 2]
}
