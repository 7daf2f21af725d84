#![forbid(unsafe_code)]

//! The tag model.
//!
//! Elements opt into engine behavior by carrying tags: `Sticky` pins an
//! element to the viewport's leading edge once scrolled past, `Fill`
//! stretches an element's block extent to the viewport on every
//! measurement pass. The two are orthogonal; a node may carry either,
//! both, or neither.

use bitflags::bitflags;

/// A behavior tag an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Pin to the viewport's leading edge when scrolled past.
    Sticky,
    /// Stretch the block extent to the viewport every measurement pass.
    Fill,
}

bitflags! {
    /// Set of tags carried by one node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TagSet: u8 {
        /// See [`Tag::Sticky`].
        const STICKY = 1 << 0;
        /// See [`Tag::Fill`].
        const FILL = 1 << 1;
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Sticky => TagSet::STICKY,
            Tag::Fill => TagSet::FILL,
        }
    }
}

impl TagSet {
    /// Check membership of a single tag.
    #[must_use]
    pub fn has(&self, tag: Tag) -> bool {
        self.contains(tag.into())
    }
}
