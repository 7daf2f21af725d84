#![forbid(unsafe_code)]

//! The element tree.
//!
//! An id-arena of nodes with parent/children links. Reparenting (the
//! float/dock transitions) moves ids between child lists; node storage is
//! never compacted, so a [`NodeId`] stays valid for the life of the tree.
//!
//! The tree also carries the minimal measure/arrange pass the engine
//! needs to run headless: frame stacking and linear flow, enough to give
//! every node a measured size and an offset in its parent. Ordinary box
//! layout is the host toolkit's job; this is only its smallest stand-in.

use crate::spec::{ContainerKind, Extent, LayoutSpec};
use stickynest_core::geometry::{Offset, Size};
use stickynest_core::tag::TagSet;

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A host-assigned identifier for element lookup, independent of tree
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A content element with an intrinsic size.
    Leaf,
    /// A container arranging children.
    Container(ContainerKind),
}

/// One element in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    tags: TagSet,
    spec: LayoutSpec,
    intrinsic: Size,
    element_id: Option<ElementId>,
    /// Set on placeholders: the node this one stands in for while it
    /// floats. Lookup resolves through it.
    proxy_for: Option<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    size: Size,
    offset: Offset,
}

impl Node {
    fn new(kind: NodeKind, spec: LayoutSpec, intrinsic: Size) -> Self {
        Self {
            kind,
            tags: TagSet::empty(),
            spec,
            intrinsic,
            element_id: None,
            proxy_for: None,
            parent: None,
            children: Vec::new(),
            size: Size::ZERO,
            offset: Offset::ZERO,
        }
    }

    /// The node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Tags carried directly by this node.
    #[must_use]
    pub fn tags(&self) -> TagSet {
        self.tags
    }

    /// The node's layout parameters.
    #[must_use]
    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Measured size from the last layout pass.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Position relative to the parent from the last layout pass.
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// The host-assigned element id, if any.
    #[must_use]
    pub fn element_id(&self) -> Option<ElementId> {
        self.element_id
    }

    /// Whether this node is a placeholder standing in for a floating
    /// element.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.proxy_for.is_some()
    }
}

/// The element-tree arena.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created (detached nodes included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a leaf element with an intrinsic size.
    pub fn new_leaf(&mut self, spec: LayoutSpec, intrinsic: Size) -> NodeId {
        self.push(Node::new(NodeKind::Leaf, spec, intrinsic))
    }

    /// Create a container element.
    pub fn new_container(&mut self, kind: ContainerKind, spec: LayoutSpec) -> NodeId {
        self.push(Node::new(NodeKind::Container(kind), spec, Size::ZERO))
    }

    /// Create a placeholder leaf standing in for `target`.
    ///
    /// The placeholder does not copy the target's element id; lookup goes
    /// through [`Tree::find_element`], which delegates to the target.
    pub(crate) fn new_placeholder(
        &mut self,
        target: NodeId,
        spec: LayoutSpec,
        intrinsic: Size,
    ) -> NodeId {
        let mut node = Node::new(NodeKind::Leaf, spec, intrinsic);
        node.proxy_for = Some(target);
        self.push(node)
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The node's children, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The node's parent, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The index of `child` within `parent`, if present.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    /// Replace the tags carried by a node.
    pub fn set_tags(&mut self, id: NodeId, tags: TagSet) {
        self.nodes[id.0].tags = tags;
    }

    /// Assign a host element id for lookup.
    pub fn set_element_id(&mut self, id: NodeId, element: ElementId) {
        self.nodes[id.0].element_id = Some(element);
    }

    /// Replace a node's layout parameters.
    pub fn set_spec(&mut self, id: NodeId, spec: LayoutSpec) {
        self.nodes[id.0].spec = spec;
    }

    pub(crate) fn set_intrinsic(&mut self, id: NodeId, intrinsic: Size) {
        self.nodes[id.0].intrinsic = intrinsic;
    }

    pub(crate) fn set_offset(&mut self, id: NodeId, offset: Offset) {
        self.nodes[id.0].offset = offset;
    }

    /// Append `child` to `parent`'s child list.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` in `parent`'s child list.
    ///
    /// The child must be detached. An out-of-range index appends.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "insert_child: child already attached"
        );
        let len = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.insert(index.min(len), child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `child` from `parent`, returning the index it occupied.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let position = self.index_of(parent, child)?;
        self.nodes[parent.0].children.remove(position);
        self.nodes[child.0].parent = None;
        Some(position)
    }

    /// Accumulated offset of a node relative to the root of its subtree.
    ///
    /// An explicit accumulation loop over the ancestor chain; read-only,
    /// valid after the last arrange pass.
    #[must_use]
    pub fn offset_to_root(&self, id: NodeId) -> Offset {
        let mut acc = Offset::ZERO;
        let mut current = Some(id);
        while let Some(node) = current {
            acc = acc.translate(self.nodes[node.0].offset);
            current = self.nodes[node.0].parent;
        }
        acc
    }

    /// Find a node by host element id within `scope`.
    ///
    /// Resolves through placeholders: querying the position a floating
    /// element used to occupy returns the element itself, wherever it
    /// currently lives.
    #[must_use]
    pub fn find_element(&self, scope: NodeId, id: ElementId) -> Option<NodeId> {
        let node = &self.nodes[scope.0];
        if node.element_id == Some(id) {
            return Some(scope);
        }
        if let Some(target) = node.proxy_for
            && let Some(found) = self.find_element(target, id)
        {
            return Some(found);
        }
        for &child in &node.children {
            if let Some(found) = self.find_element(child, id) {
                return Some(found);
            }
        }
        None
    }

    /// Run the measure and arrange passes over a subtree.
    pub fn layout(&mut self, root: NodeId, available: Size) {
        self.measure(root, available);
        self.arrange_children(root);
    }

    /// Resolve sizes bottom-up. Returns the root's resolved size
    /// (margins excluded; those belong to the parent's arrangement).
    fn measure(&mut self, id: NodeId, available: Size) -> Size {
        let spec = self.nodes[id.0].spec.clone();
        let kind = self.nodes[id.0].kind;
        let inner = Size::new(
            (available.width.saturating_sub(spec.margin.horizontal())).max(0),
            (available.height.saturating_sub(spec.margin.vertical())).max(0),
        );
        // Children resolve Fill against this node's box where it is
        // already known, falling back to the inherited extent for Wrap.
        let child_available = Size::new(
            match spec.width {
                Extent::Exact(v) => v.max(0),
                Extent::Fill | Extent::Wrap => inner.width,
            },
            match spec.height {
                Extent::Exact(v) => v.max(0),
                Extent::Fill | Extent::Wrap => inner.height,
            },
        );
        let content = match kind {
            NodeKind::Leaf => self.nodes[id.0].intrinsic,
            NodeKind::Container(container) => {
                let children = self.nodes[id.0].children.clone();
                let mut content = Size::ZERO;
                for child in children {
                    let child_size = self.measure(child, child_available);
                    let margin = self.nodes[child.0].spec.margin;
                    let outer_width = child_size.width.saturating_add(margin.horizontal());
                    let outer_height = child_size.height.saturating_add(margin.vertical());
                    match container {
                        ContainerKind::Frame => {
                            content.width = content.width.max(outer_width);
                            content.height = content.height.max(outer_height);
                        }
                        ContainerKind::Column => {
                            content.width = content.width.max(outer_width);
                            content.height = content.height.saturating_add(outer_height);
                        }
                        ContainerKind::Row => {
                            content.width = content.width.saturating_add(outer_width);
                            content.height = content.height.max(outer_height);
                        }
                    }
                }
                content
            }
        };
        let size = Size::new(
            match spec.width {
                Extent::Exact(v) => v.max(0),
                Extent::Fill => inner.width,
                Extent::Wrap => content.width,
            },
            match spec.height {
                Extent::Exact(v) => v.max(0),
                Extent::Fill => inner.height,
                Extent::Wrap => content.height,
            },
        );
        self.nodes[id.0].size = size;
        size
    }

    /// Place children top-down from resolved sizes.
    fn arrange_children(&mut self, id: NodeId) {
        let NodeKind::Container(container) = self.nodes[id.0].kind else {
            return;
        };
        let children = self.nodes[id.0].children.clone();
        let mut cursor = 0i32;
        for child in children {
            let margin = self.nodes[child.0].spec.margin;
            let size = self.nodes[child.0].size;
            let offset = match container {
                ContainerKind::Frame => Offset::new(margin.left, margin.top),
                ContainerKind::Column => {
                    let offset = Offset::new(margin.left, cursor.saturating_add(margin.top));
                    cursor = cursor
                        .saturating_add(margin.vertical())
                        .saturating_add(size.height);
                    offset
                }
                ContainerKind::Row => {
                    let offset = Offset::new(cursor.saturating_add(margin.left), margin.top);
                    cursor = cursor
                        .saturating_add(margin.horizontal())
                        .saturating_add(size.width);
                    offset
                }
            };
            self.nodes[child.0].offset = offset;
            self.arrange_children(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickynest_core::geometry::Sides;

    fn leaf(tree: &mut Tree, height: i32) -> NodeId {
        tree.new_leaf(
            LayoutSpec::new(Extent::Fill, Extent::Wrap),
            Size::new(100, height),
        )
    }

    #[test]
    fn column_stacks_children_with_margins() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let a = leaf(&mut tree, 30);
        let b = tree.new_leaf(
            LayoutSpec::new(Extent::Fill, Extent::Wrap).margin(Sides::new(5, 10, 5, 10)),
            Size::new(100, 40),
        );
        let c = leaf(&mut tree, 20);
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(root, c);

        tree.layout(root, Size::new(200, 500));

        assert_eq!(tree.node(a).offset(), Offset::new(0, 0));
        assert_eq!(tree.node(b).offset(), Offset::new(5, 40));
        assert_eq!(tree.node(c).offset(), Offset::new(0, 90));
        assert_eq!(tree.node(root).size(), Size::new(200, 110));
    }

    #[test]
    fn extent_resolution() {
        let mut tree = Tree::new();
        let root = tree.new_container(
            ContainerKind::Column,
            LayoutSpec::new(Extent::Exact(150), Extent::Fill),
        );
        let child = tree.new_leaf(LayoutSpec::fill(), Size::ZERO);
        tree.add_child(root, child);
        tree.layout(root, Size::new(400, 300));

        assert_eq!(tree.node(root).size(), Size::new(150, 300));
        // Fill child resolves against the parent's exact width.
        assert_eq!(tree.node(child).size(), Size::new(150, 300));
    }

    #[test]
    fn offset_accumulates_through_ancestors() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let inner = tree.new_container(
            ContainerKind::Column,
            LayoutSpec::wrap().margin(Sides::new(0, 25, 0, 0)),
        );
        let deep = leaf(&mut tree, 10);
        tree.add_child(root, inner);
        tree.add_child(inner, deep);

        tree.layout(root, Size::new(100, 100));
        assert_eq!(tree.offset_to_root(deep).y, 25);
    }

    #[test]
    fn insert_remove_round_trip() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let a = leaf(&mut tree, 1);
        let b = leaf(&mut tree, 2);
        let c = leaf(&mut tree, 3);
        tree.add_child(root, a);
        tree.add_child(root, c);
        tree.insert_child(root, 1, b);

        assert_eq!(tree.children(root), &[a, b, c]);
        assert_eq!(tree.index_of(root, b), Some(1));
        assert_eq!(tree.remove_child(root, b), Some(1));
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.children(root), &[a, c]);
    }

    #[test]
    fn find_element_resolves_through_placeholder() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let overlay = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let element = leaf(&mut tree, 50);
        tree.set_element_id(element, ElementId(7));

        // Element floats: placeholder in the content tree, element in the
        // overlay subtree.
        let placeholder =
            tree.new_placeholder(element, LayoutSpec::wrap(), Size::new(100, 50));
        tree.add_child(root, placeholder);
        tree.add_child(overlay, element);

        assert_eq!(tree.find_element(root, ElementId(7)), Some(element));
        assert_eq!(tree.find_element(root, ElementId(8)), None);
    }
}
