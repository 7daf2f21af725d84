#![forbid(unsafe_code)]

//! The scroll-container shell.
//!
//! [`StickyScroll`] is a pass-through wrapper owning exactly one content
//! subtree, one scrollable region, and one overlay container painted in
//! front of it. It forwards nested-scroll deltas to the coordinator's
//! pre-scroll hook so floating is scroll-synchronized, and it cancels
//! inertial momentum the instant a new pointer goes down.

use crate::scan::{self, TagOverrides};
use crate::scrollable::{Fling, ScrollRegion};
use crate::spec::{ContainerKind, Extent, LayoutSpec};
use crate::sticky::StickyCoordinator;
use crate::tree::{ElementId, NodeId, Tree};
use std::fmt;
use stickynest_core::event::{PointerEvent, PointerPhase, ScrollSource};
use stickynest_core::geometry::Size;
use stickynest_core::tag::Tag;

/// Non-recoverable misuse of the container surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    /// A second content child was attached after a successful first.
    AlreadyAttached,
    /// Overlay or scroll-region access was requested before any content
    /// was attached.
    NotAttached,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => write!(f, "container already has a content child"),
            Self::NotAttached => write!(f, "no content child attached"),
        }
    }
}

impl std::error::Error for UsageError {}

/// A block-axis measurement constraint handed down by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConstraint {
    /// The extent in logical pixels.
    pub extent: i32,
    /// Whether the extent is exact or an upper bound.
    pub exact: bool,
}

impl BlockConstraint {
    /// An exact extent.
    #[must_use]
    pub const fn exactly(extent: i32) -> Self {
        Self {
            extent,
            exact: true,
        }
    }

    /// An at-most extent; the container substitutes a bounded exact
    /// value during measurement.
    #[must_use]
    pub const fn at_most(extent: i32) -> Self {
        Self {
            extent,
            exact: false,
        }
    }
}

/// Construction-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyScrollConfig {
    display_extent: i32,
    clip_children: bool,
    leading_inset: i32,
}

impl StickyScrollConfig {
    /// Create a config. `display_extent` bounds inexact block
    /// measurement requests (the device/display extent).
    #[must_use]
    pub const fn new(display_extent: i32) -> Self {
        Self {
            display_extent,
            clip_children: true,
            leading_inset: 0,
        }
    }

    /// Whether the scrollable region clips children to its bounds.
    #[must_use]
    pub const fn clip_children(mut self, clip: bool) -> Self {
        self.clip_children = clip;
        self
    }

    /// Leading inset (top padding) applied ahead of the content.
    #[must_use]
    pub const fn leading_inset(mut self, inset: i32) -> Self {
        self.leading_inset = inset;
        self
    }
}

/// The single-child sticky scroll container.
pub struct StickyScroll {
    config: StickyScrollConfig,
    own_spec: LayoutSpec,
    content: Option<NodeId>,
    scroll: ScrollRegion,
    fling: Fling,
    coordinator: StickyCoordinator,
    overrides: TagOverrides,
    pointer_down: bool,
    needs_layout: bool,
}

impl StickyScroll {
    /// Create a container; its overlay node is allocated in `tree`.
    #[must_use]
    pub fn new(tree: &mut Tree, config: StickyScrollConfig) -> Self {
        let overlay = tree.new_container(
            ContainerKind::Column,
            LayoutSpec::new(Extent::Fill, Extent::Wrap),
        );
        Self {
            config,
            own_spec: LayoutSpec::fill(),
            content: None,
            scroll: ScrollRegion::new(),
            fling: Fling::new(),
            coordinator: StickyCoordinator::new(overlay, config.leading_inset),
            overrides: TagOverrides::new(),
            pointer_down: false,
            needs_layout: true,
        }
    }

    /// Attach the single content child. One-time; a second call fails.
    pub fn attach(&mut self, tree: &Tree, content: NodeId) -> Result<(), UsageError> {
        if self.content.is_some() {
            return Err(UsageError::AlreadyAttached);
        }
        debug_assert!(
            tree.parent(content).is_none(),
            "attach: content must be a subtree root"
        );
        self.content = Some(content);
        self.scroll.set_clip_children(self.config.clip_children);
        self.needs_layout = true;
        Ok(())
    }

    /// The attached content root, if any.
    #[must_use]
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// The container's own layout parameters.
    #[must_use]
    pub fn layout_spec(&self) -> &LayoutSpec {
        &self.own_spec
    }

    /// Set the container's own layout parameters.
    ///
    /// Intrinsic (wrap) requests are rewritten to fill-parent on both
    /// axes; the floating mechanism needs a stable viewport extent.
    pub fn set_layout_spec(&mut self, mut spec: LayoutSpec) {
        if spec.width == Extent::Wrap {
            spec.width = Extent::Fill;
        }
        if spec.height == Extent::Wrap {
            spec.height = Extent::Fill;
        }
        self.own_spec = spec;
    }

    /// Whether a tag change or attach requires a fresh layout pass.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Run a full measurement cycle: fill pass, content and overlay
    /// layout, scroll-span update, then a sticky recompute.
    ///
    /// An inexact block constraint is bounded by the display extent and
    /// treated as exact; unbounded measurement inside a scroll region is
    /// not supported by the scrolling contract.
    pub fn measure_and_layout(&mut self, tree: &mut Tree, width: i32, height: BlockConstraint) {
        let resolved = if height.exact {
            height.extent
        } else {
            height.extent.min(self.config.display_extent)
        };
        let available = Size::new(width, resolved);
        let Some(content) = self.content else {
            self.needs_layout = false;
            return;
        };

        let filled = scan::apply_fill(tree, content, resolved, &self.overrides);
        #[cfg(feature = "tracing")]
        tracing::trace!(filled, viewport = resolved, "fill pass");
        let _ = filled;

        tree.layout(content, available);
        let content_extent = {
            let node = tree.node(content);
            node.size()
                .height
                .saturating_add(node.spec().margin.vertical())
        };
        let viewport = (resolved.saturating_sub(self.config.leading_inset)).max(0);
        self.scroll.set_spans(viewport, content_extent);

        tree.layout(self.coordinator.overlay(), available);
        self.coordinator
            .recompute(tree, content, &self.overrides, self.scroll.offset());
        // Transitions may have moved elements between the subtrees;
        // refresh geometry so both reflect the final child lists.
        tree.layout(content, available);
        tree.layout(self.coordinator.overlay(), available);
        self.needs_layout = false;
    }

    /// Re-evaluate sticky state against the current scroll position.
    pub fn recompute(&mut self, tree: &mut Tree) {
        if let Some(content) = self.content {
            self.coordinator
                .recompute(tree, content, &self.overrides, self.scroll.offset());
        }
    }

    /// Feed a pointer event. A down halts momentum instantly.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => {
                self.pointer_down = true;
                self.fling.stop();
            }
            PointerPhase::Move => {}
            PointerPhase::Up | PointerPhase::Cancel => {
                self.pointer_down = false;
            }
        }
    }

    /// Pre-scroll hook: offered a delta before an ancestor consumes it,
    /// returns the portion consumed here.
    ///
    /// A forward delta is consumed while forward travel remains, capped
    /// by the nearest positive sticky distance (so floating is
    /// delta-accurate, not snapped) or, with no applicable threshold, by
    /// the region's own remaining forward extent.
    pub fn nested_pre_scroll(&mut self, tree: &mut Tree, delta: i32, source: ScrollSource) -> i32 {
        if self.pointer_down && source == ScrollSource::Momentum {
            return 0;
        }
        let Some(content) = self.content else {
            return 0;
        };
        if delta <= 0 || !self.scroll.can_scroll_forward() {
            return 0;
        }
        let cap = self
            .coordinator
            .nearest_positive_distance(tree, content, &self.overrides, self.scroll.offset())
            .unwrap_or_else(|| self.scroll.remaining_forward());
        let applied = self.scroll.scroll_by(delta.min(cap));
        #[cfg(feature = "tracing")]
        tracing::trace!(delta, applied, "pre-scroll");
        self.coordinator
            .recompute(tree, content, &self.overrides, self.scroll.offset());
        applied
    }

    /// Apply a scroll delta, returning the portion actually applied.
    ///
    /// Momentum-sourced deltas are dropped while a pointer is down.
    pub fn nested_scroll(&mut self, tree: &mut Tree, delta: i32, source: ScrollSource) -> i32 {
        if self.pointer_down && source == ScrollSource::Momentum {
            return 0;
        }
        let Some(content) = self.content else {
            return 0;
        };
        let applied = self.scroll.scroll_by(delta);
        self.coordinator
            .recompute(tree, content, &self.overrides, self.scroll.offset());
        applied
    }

    /// Begin coasting at `velocity` px/s. Ignored while a pointer is
    /// down.
    pub fn fling(&mut self, velocity: f32) {
        if !self.pointer_down {
            self.fling.start(velocity);
        }
    }

    /// Advance momentum by `dt_ms`, returning the scroll applied.
    ///
    /// Momentum ends at either decay or the end of the scroll range.
    pub fn tick_fling(&mut self, tree: &mut Tree, dt_ms: u32) -> i32 {
        if self.pointer_down {
            return 0;
        }
        let delta = self.fling.tick(dt_ms);
        if delta == 0 {
            return 0;
        }
        let applied = self.nested_scroll(tree, delta, ScrollSource::Momentum);
        if applied != delta {
            self.fling.stop();
        }
        applied
    }

    /// Clamped distance-to-top for sticky entry `index`; 0 when no such
    /// entry exists or nothing is attached.
    pub fn sticky_offset(&mut self, tree: &Tree, index: usize) -> i32 {
        let Some(content) = self.content else {
            return 0;
        };
        self.coordinator
            .sticky_offset(tree, content, &self.overrides, self.scroll.offset(), index)
    }

    /// Register the scroll-change listener, invoked once per entry per
    /// recompute in ascending index order.
    pub fn set_scroll_listener<F>(&mut self, listener: F)
    where
        F: FnMut(usize, i32) + 'static,
    {
        self.coordinator.set_listener(listener);
    }

    /// Remove the scroll-change listener.
    pub fn clear_scroll_listener(&mut self) {
        self.coordinator.clear_listener();
    }

    /// Register a tag for a node the host could not tag directly.
    ///
    /// Discards cached discovery and requests a fresh layout pass.
    pub fn tag_node(&mut self, tree: &mut Tree, node: NodeId, tag: Tag) {
        self.overrides.insert(node, tag);
        self.coordinator.invalidate(tree);
        self.needs_layout = true;
    }

    /// The overlay container, for host styling (background, padding).
    pub fn overlay(&self) -> Result<NodeId, UsageError> {
        if self.content.is_none() {
            return Err(UsageError::NotAttached);
        }
        Ok(self.coordinator.overlay())
    }

    /// The inner scrollable region, read-only.
    pub fn scroll_region(&self) -> Result<&ScrollRegion, UsageError> {
        if self.content.is_none() {
            return Err(UsageError::NotAttached);
        }
        Ok(&self.scroll)
    }

    /// The inner scrollable region, for programmatic scrolling. Call
    /// [`StickyScroll::recompute`] after direct mutation.
    pub fn scroll_region_mut(&mut self) -> Result<&mut ScrollRegion, UsageError> {
        if self.content.is_none() {
            return Err(UsageError::NotAttached);
        }
        Ok(&mut self.scroll)
    }

    /// Find a node by host element id within the content, resolving
    /// through placeholders to floating elements.
    #[must_use]
    pub fn find_element(&self, tree: &Tree, id: ElementId) -> Option<NodeId> {
        let content = self.content?;
        tree.find_element(content, id)
    }
}
