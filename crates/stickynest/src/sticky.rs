#![forbid(unsafe_code)]

//! The sticky coordinator.
//!
//! Owns one [`StickyEntry`] per sticky-tagged node and the float/dock
//! state machine that moves elements between their home position in the
//! content tree and the overlay. Floating state is implicit: an element
//! is floating exactly when its parent is the overlay.
//!
//! Invariant maintained across every transition: at any instant exactly
//! one of {element, placeholder} occupies `original_index` inside
//! `original_parent`. The placeholder is the same size as the element it
//! stands in for, so sibling layout never shifts on a transition.

use crate::scan::{self, TagOverrides};
use crate::spec::{ContainerKind, Extent, LayoutSpec, translate_spec};
use crate::tree::{NodeId, Tree};

/// Callback invoked once per entry per recompute with the entry index
/// and its clamped (non-negative) distance to the viewport's top edge.
pub type ScrollListener = Box<dyn FnMut(usize, i32)>;

/// Bookkeeping for one sticky element.
#[derive(Debug, Clone)]
pub struct StickyEntry {
    node: NodeId,
    original_parent: NodeId,
    original_index: usize,
    original_spec: LayoutSpec,
    saved_extent: i32,
    placeholder: Option<NodeId>,
}

impl StickyEntry {
    /// The sticky element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The element's home parent.
    #[must_use]
    pub fn original_parent(&self) -> NodeId {
        self.original_parent
    }

    /// The element's home index within its parent.
    #[must_use]
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// Layout parameters captured at discovery.
    #[must_use]
    pub fn original_spec(&self) -> &LayoutSpec {
        &self.original_spec
    }

    /// The placeholder node, once one has been created.
    #[must_use]
    pub fn placeholder(&self) -> Option<NodeId> {
        self.placeholder
    }
}

/// The per-container sticky state machine.
pub struct StickyCoordinator {
    overlay: NodeId,
    leading_inset: i32,
    entries: Option<Vec<StickyEntry>>,
    listener: Option<ScrollListener>,
}

impl StickyCoordinator {
    /// Create a coordinator floating elements into `overlay`.
    #[must_use]
    pub fn new(overlay: NodeId, leading_inset: i32) -> Self {
        Self {
            overlay,
            leading_inset,
            entries: None,
            listener: None,
        }
    }

    /// The overlay container elements float into.
    #[must_use]
    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    /// Register the scroll-change listener.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(usize, i32) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the scroll-change listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Discard the cached entries; they are rebuilt lazily on next
    /// access. Any floating element is docked first so the tree is left
    /// in its home configuration.
    pub fn invalidate(&mut self, tree: &mut Tree) {
        if let Some(mut entries) = self.entries.take() {
            for entry in &mut entries {
                if tree.parent(entry.node) == Some(self.overlay) {
                    self.dock(tree, entry);
                }
            }
        }
    }

    /// Entries in document order, empty before the first discovery.
    #[must_use]
    pub fn entries(&self) -> &[StickyEntry] {
        self.entries.as_deref().unwrap_or(&[])
    }

    /// Number of sticky entries, discovering if needed.
    pub fn entry_count(&mut self, tree: &Tree, content: NodeId, overrides: &TagOverrides) -> usize {
        self.ensure(tree, content, overrides);
        self.entries().len()
    }

    /// Whether entry `index` is currently floating.
    #[must_use]
    pub fn is_floating(&self, tree: &Tree, index: usize) -> bool {
        self.entries()
            .get(index)
            .is_some_and(|entry| tree.parent(entry.node) == Some(self.overlay))
    }

    /// Clamped distance-to-top for entry `index`; 0 when out of range.
    pub fn sticky_offset(
        &mut self,
        tree: &Tree,
        content: NodeId,
        overrides: &TagOverrides,
        scroll_offset: i32,
        index: usize,
    ) -> i32 {
        self.ensure(tree, content, overrides);
        let entries = self.entries.as_deref().unwrap_or(&[]);
        if index >= entries.len() {
            return 0;
        }
        self.unclamped_distance(tree, entries, index, scroll_offset)
            .max(0)
    }

    /// The smallest strictly positive distance across entries, if any.
    ///
    /// This is the "time to float" that caps pre-scroll consumption.
    pub fn nearest_positive_distance(
        &mut self,
        tree: &Tree,
        content: NodeId,
        overrides: &TagOverrides,
        scroll_offset: i32,
    ) -> Option<i32> {
        self.ensure(tree, content, overrides);
        let entries = self.entries.as_deref().unwrap_or(&[]);
        (0..entries.len())
            .filter_map(|index| {
                let distance = self.unclamped_distance(tree, entries, index, scroll_offset);
                (distance > 0).then_some(distance)
            })
            .min()
    }

    /// Re-evaluate every entry against the current scroll position,
    /// performing any due transitions, then notify the listener.
    ///
    /// Entries are evaluated in ascending index order: a later entry's
    /// threshold depends on the stacked extent of earlier entries whose
    /// transitions were resolved earlier in the same pass. Re-invoking
    /// with an unchanged position performs no mutation.
    pub fn recompute(
        &mut self,
        tree: &mut Tree,
        content: NodeId,
        overrides: &TagOverrides,
        scroll_offset: i32,
    ) {
        self.ensure(tree, content, overrides);
        let Some(mut entries) = self.entries.take() else {
            return;
        };
        for index in 0..entries.len() {
            let distance = self.unclamped_distance(tree, &entries, index, scroll_offset);
            let floating = tree.parent(entries[index].node) == Some(self.overlay);
            if distance <= 0 && !floating {
                self.float(tree, &mut entries, index);
            } else if distance > 0 && floating {
                self.dock(tree, &mut entries[index]);
            }
        }
        let distances: Vec<i32> = (0..entries.len())
            .map(|index| {
                self.unclamped_distance(tree, &entries, index, scroll_offset)
                    .max(0)
            })
            .collect();
        self.entries = Some(entries);
        if let Some(listener) = self.listener.as_mut() {
            for (index, distance) in distances.into_iter().enumerate() {
                listener(index, distance);
            }
        }
    }

    fn ensure(&mut self, tree: &Tree, content: NodeId, overrides: &TagOverrides) {
        if self.entries.is_some() {
            return;
        }
        let discovered = scan::discover(tree, content, overrides);
        let mut entries = Vec::with_capacity(discovered.len());
        for node in discovered {
            // The content root itself cannot float; it has no home
            // position to leave a placeholder in.
            let Some(parent) = tree.parent(node) else {
                continue;
            };
            let Some(index) = tree.index_of(parent, node) else {
                continue;
            };
            entries.push(StickyEntry {
                node,
                original_parent: parent,
                original_index: index,
                original_spec: tree.node(node).spec().clone(),
                saved_extent: 0,
                placeholder: None,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(count = entries.len(), "sticky discovery");
        self.entries = Some(entries);
    }

    /// Signed distance between entry `index`'s home position and the
    /// viewport's leading edge at the given scroll position.
    fn unclamped_distance(
        &self,
        tree: &Tree,
        entries: &[StickyEntry],
        index: usize,
        scroll_offset: i32,
    ) -> i32 {
        let entry = &entries[index];
        let Some(&anchor) = tree
            .children(entry.original_parent)
            .get(entry.original_index)
        else {
            // Home index no longer exists (parent mutated without an
            // invalidation request); treat as far away.
            return i32::MAX;
        };
        let mut top = tree.offset_to_root(anchor).y;
        top = top.saturating_sub(tree.node(anchor).spec().margin.top);
        top = top.saturating_sub(scroll_offset);
        top = top.saturating_add(self.leading_inset);
        top.saturating_sub(self.stacked_extent_before(tree, entries, index))
    }

    /// Viewport space consumed by floating entries with a lower index:
    /// their measured extent plus block-axis margins.
    fn stacked_extent_before(&self, tree: &Tree, entries: &[StickyEntry], index: usize) -> i32 {
        entries[..index]
            .iter()
            .filter(|entry| tree.parent(entry.node) == Some(self.overlay))
            .map(|entry| {
                let node = tree.node(entry.node);
                node.size()
                    .height
                    .saturating_add(node.spec().margin.vertical())
            })
            .fold(0i32, i32::saturating_add)
    }

    /// `DOCKED -> FLOATING`: swap the element for a same-size
    /// placeholder and move it into the overlay with a translated spec.
    fn float(&self, tree: &mut Tree, entries: &mut [StickyEntry], index: usize) {
        let insert_at = entries[..index]
            .iter()
            .filter(|entry| tree.parent(entry.node) == Some(self.overlay))
            .count();
        let entry = &mut entries[index];
        let measured = tree.node(entry.node).size();
        let home_offset = tree.node(entry.node).offset();
        entry.saved_extent = measured.height;

        let removed = tree.remove_child(entry.original_parent, entry.node);
        debug_assert_eq!(removed, Some(entry.original_index));

        let mut placeholder_spec = entry.original_spec.clone();
        placeholder_spec.height = Extent::Exact(entry.saved_extent);
        let placeholder = match entry.placeholder {
            Some(existing) => {
                tree.set_spec(existing, placeholder_spec);
                tree.set_intrinsic(existing, measured);
                existing
            }
            None => {
                let created = tree.new_placeholder(entry.node, placeholder_spec, measured);
                entry.placeholder = Some(created);
                created
            }
        };
        tree.insert_child(entry.original_parent, entry.original_index, placeholder);
        // The placeholder takes over the element's arranged position so
        // distance queries stay valid before the next layout pass.
        tree.set_offset(placeholder, home_offset);

        let leading = tree.offset_to_root(entry.original_parent).x;
        let mut overlay_spec = translate_spec(&entry.original_spec, ContainerKind::Column);
        overlay_spec.height = Extent::Exact(entry.saved_extent);
        overlay_spec.margin.left = overlay_spec.margin.left.saturating_add(leading);
        tree.set_spec(entry.node, overlay_spec);
        tree.insert_child(self.overlay, insert_at, entry.node);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, extent = entry.saved_extent, "sticky float");
    }

    /// `FLOATING -> DOCKED`: remove the placeholder, restore the
    /// captured spec, and reinsert the element at its home index.
    fn dock(&self, tree: &mut Tree, entry: &mut StickyEntry) {
        let Some(placeholder) = entry.placeholder else {
            return;
        };
        let position = tree.remove_child(entry.original_parent, placeholder);
        debug_assert_eq!(position, Some(entry.original_index));
        let home_offset = tree.node(placeholder).offset();
        tree.remove_child(self.overlay, entry.node);
        tree.set_spec(entry.node, entry.original_spec.clone());
        tree.insert_child(entry.original_parent, entry.original_index, entry.node);
        tree.set_offset(entry.node, home_offset);

        #[cfg(feature = "tracing")]
        tracing::debug!(index = entry.original_index, "sticky dock");
    }
}
