#![forbid(unsafe_code)]

//! Content scanner: sticky discovery and the fill pass.
//!
//! Both walks are pre-order and read tags from two places: the node's own
//! tag set and the external override map (for hosts that cannot set tags
//! on the node directly). Discovery is cached by the coordinator and only
//! re-runs after an explicit invalidation; the fill pass runs on every
//! measurement cycle.

use crate::spec::Extent;
use crate::tree::{NodeId, Tree};
use ahash::AHashMap;
use stickynest_core::tag::{Tag, TagSet};

/// Tag membership registered outside the tree.
///
/// The secondary registration path: entries here are unioned with the
/// tags a node carries itself.
#[derive(Debug, Default)]
pub struct TagOverrides {
    map: AHashMap<NodeId, TagSet>,
}

impl TagOverrides {
    /// Create an empty override map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag for a node.
    pub fn insert(&mut self, node: NodeId, tag: Tag) {
        *self.map.entry(node).or_default() |= tag.into();
    }

    /// Remove a tag from a node.
    pub fn remove(&mut self, node: NodeId, tag: Tag) {
        if let Some(set) = self.map.get_mut(&node) {
            set.remove(tag.into());
            if set.is_empty() {
                self.map.remove(&node);
            }
        }
    }

    /// The overridden tags for a node.
    #[must_use]
    pub fn get(&self, node: NodeId) -> TagSet {
        self.map.get(&node).copied().unwrap_or_default()
    }
}

/// Whether a node carries `tag` through either registration path.
#[must_use]
pub fn is_tagged(tree: &Tree, overrides: &TagOverrides, node: NodeId, tag: Tag) -> bool {
    tree.node(node).tags().has(tag) || overrides.get(node).has(tag)
}

/// Find sticky-tagged nodes under `root`, in document order.
///
/// First match wins per branch: descendants of a sticky node are not
/// registered independently (sticky regions do not nest). Matches are
/// deduplicated by node identity.
#[must_use]
pub fn discover(tree: &Tree, root: NodeId, overrides: &TagOverrides) -> Vec<NodeId> {
    let mut found = Vec::new();
    visit(tree, overrides, root, &mut found);
    found
}

fn visit(tree: &Tree, overrides: &TagOverrides, node: NodeId, found: &mut Vec<NodeId>) {
    if is_tagged(tree, overrides, node, Tag::Sticky) {
        if !found.contains(&node) {
            found.push(node);
        }
        return;
    }
    for &child in tree.children(node) {
        visit(tree, overrides, child, found);
    }
}

/// Force every fill-tagged node's block extent to `available`.
///
/// Recurses into every container regardless of sticky status; fill and
/// sticky are orthogonal. Returns the number of specs adjusted.
pub fn apply_fill(tree: &mut Tree, root: NodeId, available: i32, overrides: &TagOverrides) -> usize {
    let mut adjusted = 0;
    if is_tagged(tree, overrides, root, Tag::Fill) {
        let mut spec = tree.node(root).spec().clone();
        spec.height = Extent::Exact(available);
        tree.set_spec(root, spec);
        adjusted += 1;
    }
    let children: Vec<NodeId> = tree.children(root).to_vec();
    for child in children {
        adjusted += apply_fill(tree, child, available, overrides);
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ContainerKind, LayoutSpec};
    use stickynest_core::geometry::Size;

    fn sticky_leaf(tree: &mut Tree) -> NodeId {
        let id = tree.new_leaf(LayoutSpec::wrap(), Size::new(10, 10));
        tree.set_tags(id, TagSet::STICKY);
        id
    }

    #[test]
    fn discovery_preserves_document_order() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let section = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let first = sticky_leaf(&mut tree);
        let second = sticky_leaf(&mut tree);
        tree.add_child(root, first);
        tree.add_child(root, section);
        tree.add_child(section, second);

        assert_eq!(discover(&tree, root, &TagOverrides::new()), vec![first, second]);
    }

    #[test]
    fn sticky_regions_do_not_nest() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let outer = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        tree.set_tags(outer, TagSet::STICKY);
        let inner = sticky_leaf(&mut tree);
        tree.add_child(root, outer);
        tree.add_child(outer, inner);

        assert_eq!(discover(&tree, root, &TagOverrides::new()), vec![outer]);
    }

    #[test]
    fn override_tags_are_honored() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let plain = tree.new_leaf(LayoutSpec::wrap(), Size::new(10, 10));
        tree.add_child(root, plain);

        let mut overrides = TagOverrides::new();
        assert!(discover(&tree, root, &overrides).is_empty());
        overrides.insert(plain, Tag::Sticky);
        assert_eq!(discover(&tree, root, &overrides), vec![plain]);
        overrides.remove(plain, Tag::Sticky);
        assert!(discover(&tree, root, &overrides).is_empty());
    }

    #[test]
    fn fill_reaches_deeply_nested_nodes() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let level1 = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let level2 = tree.new_container(ContainerKind::Frame, LayoutSpec::wrap());
        let target = tree.new_leaf(LayoutSpec::wrap(), Size::new(10, 10));
        tree.set_tags(target, TagSet::FILL);
        tree.add_child(root, level1);
        tree.add_child(level1, level2);
        tree.add_child(level2, target);

        let adjusted = apply_fill(&mut tree, root, 600, &TagOverrides::new());
        assert_eq!(adjusted, 1);
        assert_eq!(tree.node(target).spec().height, Extent::Exact(600));
    }

    #[test]
    fn fill_recurses_past_sticky_nodes() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let header = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        tree.set_tags(header, TagSet::STICKY);
        let inside = tree.new_leaf(LayoutSpec::wrap(), Size::new(10, 10));
        tree.set_tags(inside, TagSet::FILL);
        tree.add_child(root, header);
        tree.add_child(header, inside);

        // Sticky stops discovery, never the fill pass.
        let adjusted = apply_fill(&mut tree, root, 480, &TagOverrides::new());
        assert_eq!(adjusted, 1);
        assert_eq!(tree.node(inside).spec().height, Extent::Exact(480));
    }

    #[test]
    fn fill_and_sticky_can_share_a_node() {
        let mut tree = Tree::new();
        let root = tree.new_container(ContainerKind::Column, LayoutSpec::wrap());
        let both = tree.new_leaf(LayoutSpec::wrap(), Size::new(10, 10));
        tree.set_tags(both, TagSet::STICKY | TagSet::FILL);
        tree.add_child(root, both);

        let overrides = TagOverrides::new();
        assert_eq!(apply_fill(&mut tree, root, 320, &overrides), 1);
        assert_eq!(discover(&tree, root, &overrides), vec![both]);
        assert_eq!(tree.node(both).spec().height, Extent::Exact(320));
    }
}
