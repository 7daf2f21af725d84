//! The container's usage contract: one content child for its lifetime,
//! and cheap, memoized behavior when no sticky content exists.

use stickynest::{
    BlockConstraint, ContainerKind, Extent, LayoutSpec, StickyScroll, StickyScrollConfig,
    UsageError, Tree,
};
use stickynest_core::event::ScrollSource;
use stickynest_core::geometry::Size;

#[test]
fn second_attach_always_fails() {
    let mut tree = Tree::new();
    let mut container = StickyScroll::new(&mut tree, StickyScrollConfig::new(800));
    let first = tree.new_container(
        ContainerKind::Column,
        LayoutSpec::new(Extent::Fill, Extent::Wrap),
    );
    let second = tree.new_container(
        ContainerKind::Column,
        LayoutSpec::new(Extent::Fill, Extent::Wrap),
    );

    assert!(container.attach(&tree, first).is_ok());
    assert_eq!(
        container.attach(&tree, second),
        Err(UsageError::AlreadyAttached)
    );
    // The first child was not silently replaced.
    assert_eq!(container.content(), Some(first));
    // And retrying does not help; the error is not transient.
    assert_eq!(
        container.attach(&tree, second),
        Err(UsageError::AlreadyAttached)
    );
}

#[test]
fn region_accessors_error_until_attached() {
    let mut tree = Tree::new();
    let mut container = StickyScroll::new(&mut tree, StickyScrollConfig::new(800));
    assert_eq!(container.overlay().unwrap_err(), UsageError::NotAttached);
    assert_eq!(
        container.scroll_region().unwrap_err(),
        UsageError::NotAttached
    );

    let content = tree.new_container(
        ContainerKind::Column,
        LayoutSpec::new(Extent::Fill, Extent::Wrap),
    );
    container.attach(&tree, content).unwrap();
    assert!(container.overlay().is_ok());
    assert!(container.scroll_region_mut().is_ok());
}

#[test]
fn usage_errors_format_for_display() {
    assert_eq!(
        UsageError::AlreadyAttached.to_string(),
        "container already has a content child"
    );
    assert_eq!(
        UsageError::NotAttached.to_string(),
        "no content child attached"
    );
}

#[test]
fn no_sticky_content_reports_zero_for_every_index() {
    let mut tree = Tree::new();
    let mut container = StickyScroll::new(&mut tree, StickyScrollConfig::new(800));
    let content = tree.new_container(
        ContainerKind::Column,
        LayoutSpec::new(Extent::Fill, Extent::Wrap),
    );
    for height in [120, 300, 240] {
        let leaf = tree.new_leaf(
            LayoutSpec::new(Extent::Fill, Extent::Wrap),
            Size::new(320, height),
        );
        tree.add_child(content, leaf);
    }
    container.attach(&tree, content).unwrap();
    container.measure_and_layout(&mut tree, 320, BlockConstraint::exactly(200));

    for index in 0..4 {
        assert_eq!(container.sticky_offset(&tree, index), 0);
    }
    // Scrolling changes nothing about the degenerate state.
    container.nested_scroll(&mut tree, 250, ScrollSource::Touch);
    for index in 0..4 {
        assert_eq!(container.sticky_offset(&tree, index), 0);
    }
    assert!(container.overlay().map(|o| tree.children(o).is_empty()).unwrap());
}
