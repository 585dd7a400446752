//! polyimg: vector shape tree → compact polygon image.
//!
//! Flattens fills and strokes into point polygons small enough for a
//! memory-constrained display, and packs their coordinates into the
//! narrowest exact binary layout.
//!
//! # Example
//!
//! ```
//! use polyimg::kurbo::BezPath;
//! use polyimg::{convert, ConvertConfig, Document, Node, Paint, ShapeKind, Viewport};
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((10.0, 0.0));
//! path.line_to((10.0, 10.0));
//! path.close_path();
//!
//! let mut doc = Document::new(Viewport::new(10.0, 10.0));
//! let root = doc.root();
//! doc.append(
//!     root,
//!     Node::shape(ShapeKind::Path, path).with_fill(Paint::Color("rgb(255, 0, 0)".into())),
//! );
//!
//! let out = convert(&doc, &ConvertConfig::default())?;
//! assert!(out.starts_with("var polyImg = ["));
//! # Ok::<(), polyimg::ConvertError>(())
//! ```

#![forbid(unsafe_code)]

mod color;
mod config;

pub mod document;
pub mod emit;
pub mod encode;
pub mod error;
pub mod flatten;
pub mod polygon;
pub mod resolve;
pub mod simplify;
pub mod transform;
pub mod visibility;

// Re-export kurbo so callers build paths with the same version.
pub use kurbo;

pub use color::Color;
pub use config::{ConvertConfig, NumberFormat};
pub use document::{Document, Node, NodeId, NodeKind, Paint, ShapeKind, UseRef, Viewport};
pub use error::ConvertError;
pub use polygon::Polygon;

use std::time::Instant;

use kurbo::{Affine, Point};
use log::{debug, warn};

use flatten::{FlattenParams, SampleBudget};

/// Full pipeline: shape tree → `var polyImg = [...];` text.
pub fn convert(doc: &Document, config: &ConvertConfig) -> Result<String, ConvertError> {
    let polygons = convert_to_polygons(doc, config)?;
    emit::emit(&polygons, config.number_format)
}

/// Pipeline without emission: resolve reuse, then flatten every visible,
/// painted shape into output-space polygons.
///
/// Reference and resource-limit failures abort. A shape with bad geometry
/// or paint is skipped with a warning.
pub fn convert_to_polygons(
    doc: &Document,
    config: &ConvertConfig,
) -> Result<Vec<Polygon>, ConvertError> {
    let t_start = Instant::now();

    let resolved = resolve::resolve(doc, config.node_budget)?;
    debug!(
        "resolve: {} nodes -> {} nodes",
        doc.len(),
        resolved.len()
    );

    let mut budget = SampleBudget::new(config.sample_budget);
    let mut polygons = Vec::new();
    let mut skipped = 0usize;
    for id in resolved.shapes() {
        match shape_to_polygons(&resolved, id, config, &mut budget) {
            Ok(polys) => polygons.extend(polys),
            Err(ConvertError::EmptyGeometry) => {
                debug!("shape {} has no geometry", label(&resolved, id));
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("skipping shape {}: {}", label(&resolved, id), e);
                skipped += 1;
            }
        }
    }

    let points: usize = polygons.iter().map(|p| p.points.len()).sum();
    debug!(
        "flatten: {} polygons, {} points, {} shapes skipped ({}ms)",
        polygons.len(),
        points,
        skipped,
        t_start.elapsed().as_millis()
    );
    Ok(polygons)
}

fn shape_to_polygons(
    doc: &Document,
    id: NodeId,
    config: &ConvertConfig,
    budget: &mut SampleBudget,
) -> Result<Vec<Polygon>, ConvertError> {
    if !visibility::is_visible(doc, id) {
        return Ok(Vec::new());
    }
    let Some(style) = polygon::resolve_style(doc, id)? else {
        return Ok(Vec::new());
    };
    let NodeKind::Shape(_, path) = &doc.node(id).kind else {
        return Ok(Vec::new());
    };

    let transform = Affine::scale(config.scale) * transform::world_transform(doc, id);
    let params = FlattenParams {
        sample_count: config.sample_count,
        tolerance: config.tolerance,
        stroked: style.is_stroked(),
    };
    let subpaths = flatten::flatten(path, transform, &params, budget)?;
    let origin = Point::new(config.origin_x, config.origin_y);
    Ok(polygon::assemble(subpaths, &style, origin, config.scale))
}

/// Human-readable shape name for log lines.
fn label(doc: &Document, id: NodeId) -> String {
    match &doc.node(id).id {
        Some(name) => format!("#{}", name),
        None => format!("@{}", id.index()),
    }
}
