//! Path flattening: normalized path elements → point subpaths.
//!
//! Per shape:
//! 1. Transform every element's points into output space
//! 2. Sample cubics uniformly and simplify each sampled run
//! 3. Split into subpaths at MoveTo / ClosePath
//! 4. Trim redundant closing points on fill-only shapes
//! 5. Simplify each whole subpath

use kurbo::{Affine, BezPath, CubicBez, ParamCurve, PathEl, Point};

use crate::error::ConvertError;
use crate::simplify::simplify;

/// One contiguous run of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point>,
    /// Sealed by an explicit ClosePath.
    pub closed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FlattenParams {
    /// Uniform parameter steps per cubic. Clamped to at least 1.
    pub sample_count: usize,
    pub tolerance: f64,
    /// Stroked shapes keep their duplicate closing point.
    pub stroked: bool,
}

/// Running allowance of sampled curve points for one conversion.
#[derive(Debug, Clone, Copy)]
pub struct SampleBudget {
    remaining: Option<usize>,
}

impl SampleBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self { remaining: limit }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    fn take(&mut self, samples: usize) -> Result<(), ConvertError> {
        let Some(remaining) = self.remaining.as_mut() else {
            return Ok(());
        };
        *remaining = remaining.checked_sub(samples).ok_or_else(|| {
            ConvertError::ResourceLimit("curve sample budget exhausted".into())
        })?;
        Ok(())
    }
}

/// Flatten `path` into output-space subpaths.
///
/// Points are transformed before curve sampling, so curves are sampled in
/// output space. Subpaths left with fewer than two points are dropped;
/// returns [`ConvertError::EmptyGeometry`] when nothing remains.
pub fn flatten(
    path: &BezPath,
    transform: Affine,
    params: &FlattenParams,
    budget: &mut SampleBudget,
) -> Result<Vec<Subpath>, ConvertError> {
    let samples = params.sample_count.max(1);
    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut start: Option<Point> = None;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                seal(&mut subpaths, &mut current, false);
                let p = transform * p;
                current.push(p);
                start = Some(p);
            }
            PathEl::LineTo(p) => {
                resume(&mut current, start)?;
                current.push(transform * p);
            }
            PathEl::CurveTo(c1, c2, p) => {
                let from = resume(&mut current, start)?;
                budget.take(samples)?;
                let cubic = CubicBez::new(from, transform * c1, transform * c2, transform * p);
                let run = sample_cubic(cubic, samples);
                current.extend(simplify(&run, params.tolerance, false));
            }
            PathEl::ClosePath => {
                if let Some(&first) = current.first() {
                    current.push(first);
                    seal(&mut subpaths, &mut current, true);
                }
            }
            PathEl::QuadTo(..) => {
                return Err(ConvertError::UnsupportedPathCommand(
                    "quadratic curve".into(),
                ));
            }
        }
    }
    seal(&mut subpaths, &mut current, false);

    if !params.stroked {
        for subpath in &mut subpaths {
            trim_closing_point(&mut subpath.points);
        }
    }
    // A lone point draws nothing.
    subpaths.retain(|s| s.points.len() >= 2);

    if subpaths.is_empty() {
        return Err(ConvertError::EmptyGeometry);
    }

    Ok(subpaths
        .into_iter()
        .map(|s| Subpath {
            points: simplify(&s.points, params.tolerance, s.closed),
            closed: s.closed,
        })
        .collect())
}

/// Sample `cubic` at `samples` uniform steps in (0, 1].
///
/// The start point is not included; the last sample is the end point.
pub fn sample_cubic(cubic: CubicBez, samples: usize) -> Vec<Point> {
    (1..=samples)
        .map(|i| cubic.eval(i as f64 / samples as f64))
        .collect()
}

// ── Helpers ──────────────────────────────────────────────

fn seal(subpaths: &mut Vec<Subpath>, current: &mut Vec<Point>, closed: bool) {
    if !current.is_empty() {
        subpaths.push(Subpath {
            points: std::mem::take(current),
            closed,
        });
    }
}

/// Current point for a drawing command. After a ClosePath the next
/// subpath starts where the closed one did.
fn resume(current: &mut Vec<Point>, start: Option<Point>) -> Result<Point, ConvertError> {
    if let Some(&last) = current.last() {
        return Ok(last);
    }
    let start = start.ok_or_else(|| {
        ConvertError::InvalidPath("drawing command before any MoveTo".into())
    })?;
    current.push(start);
    Ok(start)
}

/// Fill-only rings don't need the zero-length closing edge.
fn trim_closing_point(points: &mut Vec<Point>) {
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(stroked: bool) -> FlattenParams {
        FlattenParams {
            sample_count: 16,
            tolerance: 0.0,
            stroked,
        }
    }

    fn run(path: &BezPath, transform: Affine, p: &FlattenParams) -> Vec<Subpath> {
        flatten(path, transform, p, &mut SampleBudget::unlimited()).unwrap()
    }

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn cubic_endpoints_are_exact() {
        let cubic = CubicBez::new((1.5, -2.0), (3.0, 7.0), (11.0, 4.25), (9.0, 0.5));
        assert_eq!(cubic.eval(0.0), cubic.p0);
        assert_eq!(cubic.eval(1.0), cubic.p3);
        let samples = sample_cubic(cubic, 7);
        assert_eq!(samples.len(), 7);
        assert_eq!(samples.last(), Some(&cubic.p3));
    }

    #[test]
    fn cubic_sampling_matches_bernstein_blend() {
        let cubic = CubicBez::new((0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0));
        let mid = sample_cubic(cubic, 2)[0];
        assert!((mid.x - 2.0).abs() < 1e-12);
        assert!((mid.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn stroked_closed_subpath_repeats_first_point() {
        let out = run(&square(), Affine::IDENTITY, &params(true));
        assert_eq!(out.len(), 1);
        let ring = &out[0];
        assert!(ring.closed);
        assert_eq!(ring.points.len(), 5);
        assert_eq!(ring.points.first(), ring.points.last());
    }

    #[test]
    fn fill_only_drops_closing_point() {
        let out = run(&square(), Affine::IDENTITY, &params(false));
        assert_eq!(
            out[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn move_to_starts_new_subpath() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.move_to((5.0, 5.0));
        path.line_to((6.0, 5.0));
        let out = run(&path, Affine::IDENTITY, &params(true));
        assert_eq!(out.len(), 2);
        assert!(!out[0].closed && !out[1].closed);
        assert_eq!(out[1].points[0], Point::new(5.0, 5.0));
    }

    #[test]
    fn points_are_transformed() {
        let out = run(&square(), Affine::translate((3.0, 4.0)), &params(false));
        assert_eq!(out[0].points[0], Point::new(3.0, 4.0));
        assert_eq!(out[0].points[2], Point::new(13.0, 14.0));
    }

    #[test]
    fn curves_are_sampled_after_transform() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let out = run(&path, Affine::scale(10.0), &params(true));
        let points = &out[0].points;
        assert_eq!(points.len(), 17);
        assert_eq!(points.last(), Some(&Point::new(10.0, 0.0)));
    }

    #[test]
    fn curve_tolerance_bounds_point_count() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        // Straight cubic: every sample lies on the chord.
        path.curve_to((1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        let p = FlattenParams {
            sample_count: 1000,
            tolerance: 0.01,
            stroked: true,
        };
        let out = run(&path, Affine::IDENTITY, &p);
        assert_eq!(out[0].points, vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    }

    #[test]
    fn line_after_close_restarts_at_subpath_start() {
        let mut path = square();
        path.line_to((20.0, 20.0));
        let out = run(&path, Affine::IDENTITY, &params(true));
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1].points,
            vec![Point::new(0.0, 0.0), Point::new(20.0, 20.0)]
        );
    }

    #[test]
    fn quadratic_is_unsupported() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((1.0, 1.0), (2.0, 0.0));
        let err = flatten(&path, Affine::IDENTITY, &params(true), &mut SampleBudget::unlimited());
        assert!(matches!(err, Err(ConvertError::UnsupportedPathCommand(_))));
    }

    #[test]
    fn empty_path_has_no_geometry() {
        let err = flatten(
            &BezPath::new(),
            Affine::IDENTITY,
            &params(true),
            &mut SampleBudget::unlimited(),
        );
        assert_eq!(err, Err(ConvertError::EmptyGeometry));
    }

    #[test]
    fn lone_move_to_has_no_geometry() {
        let mut path = BezPath::new();
        path.move_to((3.0, 3.0));
        let err = flatten(&path, Affine::IDENTITY, &params(false), &mut SampleBudget::unlimited());
        assert_eq!(err, Err(ConvertError::EmptyGeometry));

        // Closed on itself and fill-only: the closing point is trimmed away too.
        path.close_path();
        let err = flatten(&path, Affine::IDENTITY, &params(false), &mut SampleBudget::unlimited());
        assert_eq!(err, Err(ConvertError::EmptyGeometry));
    }

    #[test]
    fn single_point_subpaths_are_dropped_among_real_ones() {
        let mut path = square();
        path.move_to((50.0, 50.0));
        let out = run(&path, Affine::IDENTITY, &params(false));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 4);
    }

    #[test]
    fn sample_budget_is_enforced() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        path.curve_to((1.0, -1.0), (2.0, -1.0), (2.0, 0.0));
        let mut budget = SampleBudget::new(Some(20));
        let err = flatten(&path, Affine::IDENTITY, &params(true), &mut budget);
        assert!(matches!(err, Err(ConvertError::ResourceLimit(_))));
    }

    #[test]
    fn zero_samples_still_reach_the_end_point() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let p = FlattenParams {
            sample_count: 0,
            ..params(true)
        };
        let out = run(&path, Affine::IDENTITY, &p);
        assert_eq!(out[0].points, vec![Point::ZERO, Point::new(1.0, 0.0)]);
    }
}
