#![forbid(unsafe_code)]

//! StickyNest: a sticky-header engine for nested scrolling.
//!
//! A single-child scrollable container in which descendants tagged
//! `sticky` detach from normal flow and pin to the viewport's leading
//! edge as the user scrolls past them, then release back into place on
//! the way up. Any number of independent sticky regions stack in
//! document order. Descendants tagged `fill` are stretched to the
//! viewport's block extent on every measurement pass.
//!
//! The engine is headless and host-agnostic: the host adapts its
//! pointer/scroll machinery to the event types in `stickynest-core`,
//! builds its content in the element [`Tree`], and drives
//! [`StickyScroll`] from its layout and gesture callbacks.
//!
//! ```
//! use stickynest::{
//!     BlockConstraint, ContainerKind, Extent, LayoutSpec, StickyScroll, StickyScrollConfig,
//!     Tree,
//! };
//! use stickynest_core::geometry::Size;
//! use stickynest_core::tag::TagSet;
//!
//! let mut tree = Tree::new();
//! let mut container = StickyScroll::new(&mut tree, StickyScrollConfig::new(800));
//!
//! let content = tree.new_container(
//!     ContainerKind::Column,
//!     LayoutSpec::new(Extent::Fill, Extent::Wrap),
//! );
//! let header = tree.new_leaf(
//!     LayoutSpec::new(Extent::Fill, Extent::Wrap),
//!     Size::new(320, 48),
//! );
//! tree.set_tags(header, TagSet::STICKY);
//! tree.add_child(content, header);
//!
//! container.attach(&tree, content).unwrap();
//! container.measure_and_layout(&mut tree, 320, BlockConstraint::exactly(480));
//! assert_eq!(container.sticky_offset(&tree, 0), 0);
//! ```

pub mod container;
pub mod scan;
pub mod scrollable;
pub mod spec;
pub mod sticky;
pub mod tree;

pub use container::{BlockConstraint, StickyScroll, StickyScrollConfig, UsageError};
pub use scan::TagOverrides;
pub use scrollable::{Fling, ScrollRegion};
pub use spec::{ContainerKind, Extent, Gravity, LayoutSpec, SpecParams, translate_spec};
pub use sticky::{ScrollListener, StickyCoordinator, StickyEntry};
pub use tree::{ElementId, Node, NodeId, NodeKind, Tree};
