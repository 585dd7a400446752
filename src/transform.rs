//! Local → document space transforms.

use kurbo::{Affine, Size};

use crate::document::{Document, NodeId, NodeKind, Viewport};

/// Cumulative transform from `id`'s local space to document space.
///
/// Walks the ancestor chain once, outermost first. Each node contributes
/// its own transform, followed by its viewport mapping when it opens a
/// nested coordinate system.
pub fn world_transform(doc: &Document, id: NodeId) -> Affine {
    let chain: Vec<NodeId> = doc.ancestors(id).collect();
    let mut transform = Affine::IDENTITY;
    let mut available = Size::ZERO;
    for &n in chain.iter().rev() {
        let node = doc.node(n);
        transform *= node.transform;
        if let NodeKind::Viewport(viewport) = &node.kind {
            let viewport = if n == doc.root() {
                root_viewport(viewport)
            } else {
                viewport.clone()
            };
            transform *= viewport.transform(available);
            available = viewport.content_size(available);
        }
    }
    transform
}

/// The outermost viewport ignores x/y and takes a missing size from its
/// viewBox.
fn root_viewport(viewport: &Viewport) -> Viewport {
    let vb = viewport.view_box;
    Viewport {
        x: 0.0,
        y: 0.0,
        width: viewport.width.or(vb.map(|r| r.width())),
        height: viewport.height.or(vb.map(|r| r.height())),
        ..viewport.clone()
    }
}
