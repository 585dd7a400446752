//! Owned shape tree consumed by the conversion pipeline.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`].
//! Parsing a source document into this tree happens upstream; every
//! shape arrives with its geometry already normalized to move / line /
//! cubic / close elements.

use kurbo::{Affine, BezPath, Rect, Size};

/// SVG initial value for `fill`.
pub const DEFAULT_FILL: &str = "rgb(0, 0, 0)";

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A fill or stroke paint as set on a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Explicitly unpainted (`none`).
    None,
    /// A color in functional `rgb(r, g, b)` form (hex is accepted too).
    Color(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Inline,
    None,
}

/// Per-node presentation attributes.
///
/// `None` paints inherit from the parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub display: Display,
}

/// How a viewBox is fitted into its viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectRatio {
    /// Uniform scale, centered (`xMidYMid meet`).
    #[default]
    Meet,
    /// Independent X/Y scale (`none`).
    Stretch,
}

/// A nested coordinate system: the document root, a nested document,
/// or an instantiated symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    /// `None` = fill the available space.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<Rect>,
    pub aspect: AspectRatio,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// A viewport sized by its viewBox alone.
    pub fn from_view_box(view_box: Rect) -> Self {
        Self {
            view_box: Some(view_box),
            ..Self::default()
        }
    }

    /// Viewport size, with missing dimensions taken from `available`.
    pub fn size_within(&self, available: Size) -> Size {
        Size::new(
            self.width.unwrap_or(available.width),
            self.height.unwrap_or(available.height),
        )
    }

    /// Size of the user space this viewport establishes for its children.
    pub fn content_size(&self, available: Size) -> Size {
        match self.view_box {
            Some(vb) => vb.size(),
            None => self.size_within(available),
        }
    }

    /// Map from this viewport's user space into its parent's space.
    pub fn transform(&self, available: Size) -> Affine {
        let origin = Affine::translate((self.x, self.y));
        match self.view_box {
            Some(vb) => origin * view_box_transform(vb, self.size_within(available), self.aspect),
            None => origin,
        }
    }
}

/// viewBox → viewport mapping. Degenerate boxes or sizes map nothing.
fn view_box_transform(vb: Rect, size: Size, aspect: AspectRatio) -> Affine {
    if vb.width() <= 0.0 || vb.height() <= 0.0 || size.width <= 0.0 || size.height <= 0.0 {
        return Affine::IDENTITY;
    }
    let sx = size.width / vb.width();
    let sy = size.height / vb.height();
    let to_origin = Affine::translate((-vb.x0, -vb.y0));
    match aspect {
        AspectRatio::Stretch => Affine::scale_non_uniform(sx, sy) * to_origin,
        AspectRatio::Meet => {
            let s = sx.min(sy);
            let tx = (size.width - vb.width() * s) / 2.0;
            let ty = (size.height - vb.height() * s) / 2.0;
            Affine::translate((tx, ty)) * Affine::scale(s) * to_origin
        }
    }
}

/// A reuse node: instantiates another node's content at an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct UseRef {
    /// Target id, with or without a leading `#`.
    pub href: String,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl UseRef {
    pub fn new(href: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            href: href.into(),
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn target_id(&self) -> &str {
        self.href.trim_start_matches('#')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Viewport(Viewport),
    Group,
    /// Definitions-only container; its content never renders in place.
    Defs,
    /// Template-only definition, rendered only through a reuse node.
    Symbol { view_box: Option<Rect> },
    Use(UseRef),
    Shape(ShapeKind, BezPath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub id: Option<String>,
    /// Local transform attribute.
    pub transform: Affine,
    pub style: Style,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            transform: Affine::IDENTITY,
            style: Style::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn defs() -> Self {
        Self::new(NodeKind::Defs)
    }

    pub fn symbol(view_box: Option<Rect>) -> Self {
        Self::new(NodeKind::Symbol { view_box })
    }

    pub fn use_ref(href: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(NodeKind::Use(UseRef::new(href, x, y)))
    }

    pub fn shape(kind: ShapeKind, path: BezPath) -> Self {
        Self::new(NodeKind::Shape(kind, path))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.style.fill = Some(paint);
        self
    }

    pub fn with_stroke(mut self, paint: Paint) -> Self {
        self.style.stroke = Some(paint);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.style.display = Display::None;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, NodeKind::Shape(..))
    }

    /// Copy of this node's own attributes, detached from any tree.
    pub(crate) fn detached(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            id: self.id.clone(),
            transform: self.transform,
            style: self.style.clone(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An owned node arena with a single root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_root(Node::new(NodeKind::Viewport(viewport)))
    }

    /// Start a document from an arbitrary root node. The root is expected
    /// to be a viewport; other kinds are treated as an unsized one.
    pub fn with_root(root: Node) -> Self {
        Self {
            nodes: vec![root.detached()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = node.detached();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The node itself, then each parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// Shape nodes in document order.
    pub fn shapes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .filter(move |&id| self.node(id).is_shape())
    }

    /// First node in document order carrying `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&n| self.node(n).id.as_deref() == Some(id))
    }

    /// Effective fill color string, or `None` when unfilled.
    pub fn computed_fill(&self, id: NodeId) -> Option<&str> {
        self.inherited(id, |style| style.fill.as_ref(), Some(DEFAULT_FILL))
    }

    /// Effective stroke color string, or `None` when unstroked.
    pub fn computed_stroke(&self, id: NodeId) -> Option<&str> {
        self.inherited(id, |style| style.stroke.as_ref(), None)
    }

    fn inherited<'a>(
        &'a self,
        id: NodeId,
        get: impl Fn(&'a Style) -> Option<&'a Paint>,
        initial: Option<&'a str>,
    ) -> Option<&'a str> {
        for n in self.ancestors(id) {
            match get(&self.node(n).style) {
                Some(Paint::None) => return None,
                Some(Paint::Color(color)) => return Some(color.as_str()),
                None => {}
            }
        }
        initial
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.node(id).parent;
        Some(id)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.node(id).children.iter().rev().copied());
        Some(id)
    }
}
