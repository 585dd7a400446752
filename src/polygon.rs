//! Polygon records: output-space points plus resolved paint.

use kurbo::{Point, Vec2};

use crate::color::Color;
use crate::document::{Document, NodeId};
use crate::error::ConvertError;
use crate::flatten::Subpath;

/// One output polygon. At least one of `fill` / `stroke` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl Polygon {
    /// Interleaved `[x0, y0, x1, y1, ...]`.
    pub fn coordinates(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

/// Resolved paint for every polygon of one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl PolygonStyle {
    pub fn is_stroked(&self) -> bool {
        self.stroke.is_some()
    }
}

/// Computed paint of shape `id`, or `None` if it is neither filled nor
/// stroked.
pub fn resolve_style(doc: &Document, id: NodeId) -> Result<Option<PolygonStyle>, ConvertError> {
    let fill = doc.computed_fill(id).map(Color::parse).transpose()?;
    let stroke = doc.computed_stroke(id).map(Color::parse).transpose()?;
    if fill.is_none() && stroke.is_none() {
        return Ok(None);
    }
    Ok(Some(PolygonStyle { fill, stroke }))
}

/// Turn each subpath into a polygon, shifted so `origin` (in unscaled
/// units) lands at zero.
pub fn assemble(
    subpaths: Vec<Subpath>,
    style: &PolygonStyle,
    origin: Point,
    scale: f64,
) -> Vec<Polygon> {
    let shift = Vec2::new(-origin.x * scale, -origin.y * scale);
    subpaths
        .into_iter()
        .map(|subpath| Polygon {
            points: subpath.points.into_iter().map(|p| p + shift).collect(),
            fill: style.fill,
            stroke: style.stroke,
        })
        .collect()
}
