#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! StickyNest is host-agnostic: the host adapts whatever pointer and
//! scroll machinery it has to these enums. All events derive `Clone`,
//! `PartialEq`, and `Eq` for use in tests and pattern matching.

use crate::geometry::Offset;

/// The phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Initial contact. Cancels any in-flight momentum.
    Down,
    /// Movement while in contact.
    Move,
    /// Contact released normally.
    Up,
    /// Gesture aborted by the host (focus loss, palm rejection, ...).
    Cancel,
}

/// A pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Gesture phase.
    pub phase: PointerPhase,
    /// Position relative to the container origin.
    pub position: Offset,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Offset) -> Self {
        Self { phase, position }
    }

    /// A down event at the given position.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::new(PointerPhase::Down, Offset::new(x, y))
    }

    /// An up event at the given position.
    #[must_use]
    pub const fn up(x: i32, y: i32) -> Self {
        Self::new(PointerPhase::Up, Offset::new(x, y))
    }
}

/// What produced a scroll delta.
///
/// Deltas driven by an active touch gesture and deltas driven by decaying
/// momentum obey different rules: momentum deltas are dropped while a new
/// pointer is down, touch deltas are always honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    /// The user's finger (or equivalent) is driving the delta.
    Touch,
    /// A fling is coasting; no contact is present.
    Momentum,
}
