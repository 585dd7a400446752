//! Reuse-node expansion: source tree → tree with no `Use` nodes.
//!
//! The input is never touched. Output is built into a fresh arena with an
//! explicit work stack, so deep trees do not grow the call stack.

use std::rc::Rc;

use kurbo::Affine;

use crate::document::{Document, Node, NodeId, NodeKind, UseRef, Viewport};
use crate::error::ConvertError;

struct Task {
    /// Node to copy, in the source document.
    src: NodeId,
    /// Where the copy goes, in the output document.
    parent: NodeId,
    /// Reuse targets currently being expanded on this branch.
    chain: Rc<Vec<NodeId>>,
}

/// Expand every reuse node in `doc` into a literal copy of its target.
///
/// Fails with [`ConvertError::UnresolvedReference`] when a target is
/// missing or refers back into its own expansion, and with
/// [`ConvertError::ResourceLimit`] when the output would exceed
/// `node_budget` nodes.
pub fn resolve(doc: &Document, node_budget: Option<usize>) -> Result<Document, ConvertError> {
    let mut out = Document::with_root(doc.node(doc.root()).clone());
    let mut stack = Vec::new();
    push_children(&mut stack, doc, doc.root(), out.root(), &Rc::new(Vec::new()));

    while let Some(task) = stack.pop() {
        let node = doc.node(task.src);
        let NodeKind::Use(reference) = &node.kind else {
            reserve(&out, node_budget, 1)?;
            let copy = out.append(task.parent, node.clone());
            push_children(&mut stack, doc, task.src, copy, &task.chain);
            continue;
        };

        let target = doc
            .find_by_id(reference.target_id())
            .ok_or_else(|| ConvertError::UnresolvedReference(reference.href.clone()))?;
        if task.chain.contains(&target) {
            return Err(ConvertError::UnresolvedReference(format!(
                "{} (reference cycle)",
                reference.href
            )));
        }
        let mut chain = (*task.chain).clone();
        chain.push(target);
        let chain = Rc::new(chain);

        let target_node = doc.node(target);
        let viewport = instance_viewport(&target_node.kind, reference);
        reserve(&out, node_budget, if viewport.is_some() { 2 } else { 1 })?;
        let wrapper = out.append(task.parent, wrapper_group(node, reference));
        match viewport {
            Some(viewport) => {
                let mut instance = target_node.clone();
                instance.kind = NodeKind::Viewport(viewport);
                let instance = out.append(wrapper, instance);
                push_children(&mut stack, doc, target, instance, &chain);
            }
            None => stack.push(Task {
                src: target,
                parent: wrapper,
                chain,
            }),
        }
    }

    Ok(out)
}

/// Fail if appending `count` more nodes would exceed `node_budget`.
fn reserve(out: &Document, node_budget: Option<usize>, count: usize) -> Result<(), ConvertError> {
    match node_budget {
        Some(limit) if out.len() + count > limit => Err(ConvertError::ResourceLimit(format!(
            "reference expansion exceeds {} nodes",
            limit
        ))),
        _ => Ok(()),
    }
}

/// Queue `src`'s children so they pop in document order.
fn push_children(
    stack: &mut Vec<Task>,
    doc: &Document,
    src: NodeId,
    parent: NodeId,
    chain: &Rc<Vec<NodeId>>,
) {
    stack.extend(doc.node(src).children().iter().rev().map(|&child| Task {
        src: child,
        parent,
        chain: Rc::clone(chain),
    }));
}

/// Group standing in for a reuse node: keeps its id, style and transform,
/// and adds the reuse offset.
fn wrapper_group(node: &Node, reference: &UseRef) -> Node {
    let mut group = Node::group();
    group.id = node.id.clone();
    group.style = node.style.clone();
    group.transform = node.transform * Affine::translate((reference.x, reference.y));
    group
}

/// Symbols and nested documents become a new coordinate system when
/// instantiated; everything else is copied as-is.
fn instance_viewport(target: &NodeKind, reference: &UseRef) -> Option<Viewport> {
    match target {
        NodeKind::Symbol { view_box } => Some(Viewport {
            width: reference.width,
            height: reference.height,
            view_box: *view_box,
            ..Viewport::default()
        }),
        NodeKind::Viewport(viewport) => Some(Viewport {
            width: reference.width.or(viewport.width),
            height: reference.height.or(viewport.height),
            ..viewport.clone()
        }),
        _ => None,
    }
}
