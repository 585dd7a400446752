//! Tolerance-bounded polyline reduction (Ramer–Douglas–Peucker).

use geo::{LineString, Simplify};
use kurbo::Point;

/// Drop points that deviate less than `tolerance` from the simplified line.
///
/// `tolerance <= 0` returns the input unchanged. A `closed` ring keeps at
/// least three distinct vertices; if reduction would go below that, the
/// input is returned as-is.
pub fn simplify(points: &[Point], tolerance: f64, closed: bool) -> Vec<Point> {
    if points.len() <= 2 || tolerance <= 0.0 {
        return points.to_vec();
    }
    let line: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect();
    let simplified: Vec<Point> = line
        .simplify(&tolerance)
        .into_inner()
        .into_iter()
        .map(|c| Point::new(c.x, c.y))
        .collect();
    if closed && distinct_vertices(&simplified) < 3 {
        return points.to_vec();
    }
    simplified
}

/// Vertex count, not counting a repeated closing point.
fn distinct_vertices(points: &[Point]) -> usize {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
        _ => points.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn zero_tolerance_is_identity() {
        let input = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(simplify(&input, 0.0, false), input);
        assert_eq!(simplify(&input, 0.0, true), input);
    }

    #[test]
    fn collinear_points_collapse() {
        let input = pts(&[(0.0, 0.0), (1.0, 0.01), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(
            simplify(&input, 0.5, false),
            pts(&[(0.0, 0.0), (3.0, 0.0)])
        );
    }

    #[test]
    fn deviating_point_survives() {
        let input = pts(&[(0.0, 0.0), (1.0, 5.0), (2.0, 0.0)]);
        assert_eq!(simplify(&input, 1.0, false), input);
    }

    #[test]
    fn closed_ring_keeps_a_triangle() {
        // A thin sliver: RDP on the open chain would keep only the ends.
        let input = pts(&[(0.0, 0.0), (5.0, 0.1), (10.0, 0.0), (5.0, -0.1), (0.0, 0.0)]);
        let out = simplify(&input, 1.0, true);
        assert!(distinct_vertices(&out) >= 3);
    }

    #[test]
    fn endpoints_are_kept() {
        let input = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.5)]);
        let out = simplify(&input, 0.1, false);
        assert_eq!(out.first(), input.first());
        assert_eq!(out.last(), input.last());
    }
}
