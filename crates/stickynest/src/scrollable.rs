#![forbid(unsafe_code)]

//! The scrollable-region adapter.
//!
//! A minimal abstraction over whatever scrolling primitive the host has:
//! it reports a scroll position, applies clamped deltas, and answers
//! whether more forward travel remains. Composition instead of
//! inheritance; the container shell drives it and the coordinator reads
//! it.
//!
//! [`Fling`] models inertial momentum as a velocity decayed by explicit
//! `tick(dt)` calls, so tests stay deterministic and no wall clock is
//! needed. The contract that matters: a pointer-down stops it instantly.

/// Scroll state of the inner region along the block axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollRegion {
    offset: i32,
    viewport: i32,
    content: i32,
    clip_children: bool,
}

impl ScrollRegion {
    /// Create a region with empty spans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the viewport and content extents after a measurement pass.
    ///
    /// The current offset is re-clamped into the new range.
    pub fn set_spans(&mut self, viewport: i32, content: i32) {
        self.viewport = viewport.max(0);
        self.content = content.max(0);
        self.offset = self.offset.clamp(0, self.max_offset());
    }

    /// Current scroll position.
    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// The viewport extent along the scroll axis.
    #[must_use]
    pub fn viewport(&self) -> i32 {
        self.viewport
    }

    /// The content extent along the scroll axis.
    #[must_use]
    pub fn content_extent(&self) -> i32 {
        self.content
    }

    /// The largest reachable offset.
    #[must_use]
    pub fn max_offset(&self) -> i32 {
        (self.content.saturating_sub(self.viewport)).max(0)
    }

    /// Whether any forward travel remains.
    #[must_use]
    pub fn can_scroll_forward(&self) -> bool {
        self.offset < self.max_offset()
    }

    /// Forward travel remaining before the end of content.
    #[must_use]
    pub fn remaining_forward(&self) -> i32 {
        self.max_offset().saturating_sub(self.offset)
    }

    /// Scroll by a delta, clamped to the valid range.
    ///
    /// Returns the delta actually applied.
    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        let target = self.offset.saturating_add(delta);
        self.scroll_to(target)
    }

    /// Scroll to an absolute position, clamped to the valid range.
    ///
    /// Returns the delta actually applied.
    pub fn scroll_to(&mut self, position: i32) -> i32 {
        let clamped = position.clamp(0, self.max_offset());
        let applied = clamped - self.offset;
        self.offset = clamped;
        applied
    }

    /// Whether children are clipped to the region bounds.
    #[must_use]
    pub fn clip_children(&self) -> bool {
        self.clip_children
    }

    /// Set child clipping; propagated from the container on attach.
    pub fn set_clip_children(&mut self, clip: bool) {
        self.clip_children = clip;
    }
}

/// Per-millisecond velocity retention while coasting.
const DECAY_PER_MS: f32 = 0.998;

/// Below this speed (px/s) the fling is considered finished.
const MIN_VELOCITY: f32 = 40.0;

/// Inertial momentum stepper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fling {
    velocity: f32,
}

impl Fling {
    /// Create an idle fling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start coasting at `velocity` px/s (positive scrolls forward).
    pub fn start(&mut self, velocity: f32) {
        self.velocity = if velocity.abs() < MIN_VELOCITY {
            0.0
        } else {
            velocity
        };
    }

    /// Halt momentum immediately.
    pub fn stop(&mut self) {
        self.velocity = 0.0;
    }

    /// Whether momentum is still being delivered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity != 0.0
    }

    /// Advance by `dt_ms` and return the scroll delta for the step.
    pub fn tick(&mut self, dt_ms: u32) -> i32 {
        if !self.is_active() || dt_ms == 0 {
            return 0;
        }
        let decayed = self.velocity * DECAY_PER_MS.powi(dt_ms as i32);
        // Trapezoidal step: average of entry and exit velocity.
        let delta = (self.velocity + decayed) * 0.5 * (dt_ms as f32 / 1000.0);
        self.velocity = if decayed.abs() < MIN_VELOCITY {
            0.0
        } else {
            decayed
        };
        delta.round() as i32
    }
}
