//! Shared geometry utilities for closed polylines.

use kurbo::Point;

/// Signed area of a closed polyline via the shoelace formula.
///
/// Positive = counter-clockwise in y-up axes (clockwise on screen).
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

/// Enclosed area, independent of winding.
pub fn area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

/// Arc length of the closed polyline, including the closing edge.
pub fn perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .sum()
}
