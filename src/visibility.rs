//! Which shapes take part in conversion.

use crate::document::{Display, Document, NodeId, NodeKind};

/// A node is visible unless it or an ancestor is `display: none`, or it
/// sits inside a definitions-only or template-only container.
pub fn is_visible(doc: &Document, id: NodeId) -> bool {
    doc.ancestors(id).all(|n| {
        let node = doc.node(n);
        node.style.display != Display::None
            && !matches!(node.kind, NodeKind::Defs | NodeKind::Symbol { .. })
    })
}
