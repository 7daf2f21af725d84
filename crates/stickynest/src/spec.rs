#![forbid(unsafe_code)]

//! Layout specifications and cross-container translation.
//!
//! A [`LayoutSpec`] is what a parent container reads to size and place a
//! child: an extent request per axis, margins, and container-specific
//! parameters. When the engine floats an element into the overlay it must
//! carry the spec across a container-type boundary; [`translate_spec`] is
//! the pure function that performs that conversion so it can be tested
//! without a tree.

use bitflags::bitflags;
use stickynest_core::geometry::Sides;

/// The kind of a container node, which decides how children are arranged
/// and which [`SpecParams`] variant their specs should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Children stack on top of each other at the container origin.
    Frame,
    /// Children flow top to bottom.
    Column,
    /// Children flow left to right.
    Row,
}

/// An extent request along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Fill the available extent of the parent.
    Fill,
    /// Size to content (intrinsic extent).
    Wrap,
    /// An exact extent in logical pixels.
    Exact(i32),
}

bitflags! {
    /// Placement of a child within extra space granted by its container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Gravity: u8 {
        /// Pull toward the leading horizontal edge.
        const LEFT = 1 << 0;
        /// Pull toward the leading vertical edge.
        const TOP = 1 << 1;
        /// Pull toward the trailing horizontal edge.
        const RIGHT = 1 << 2;
        /// Pull toward the trailing vertical edge.
        const BOTTOM = 1 << 3;
        /// Center on the horizontal axis.
        const CENTER_HORIZONTAL = 1 << 4;
        /// Center on the vertical axis.
        const CENTER_VERTICAL = 1 << 5;
    }
}

/// Container-specific layout parameters.
///
/// `Plain` is the minimal generic form: margins and extents only. It is
/// also the fallback the translation function degrades to when a source
/// kind carries nothing the target understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecParams {
    /// No container-specific fields.
    Plain,
    /// Parameters for a [`ContainerKind::Frame`] parent.
    Frame {
        /// Placement within the frame.
        gravity: Gravity,
    },
    /// Parameters for a linear ([`ContainerKind::Column`] /
    /// [`ContainerKind::Row`]) parent.
    Linear {
        /// Placement on the cross axis.
        gravity: Gravity,
        /// Share of leftover main-axis space. Zero means none.
        weight: f32,
    },
}

impl SpecParams {
    /// The gravity carried by these parameters, if any.
    #[must_use]
    pub fn gravity(&self) -> Option<Gravity> {
        match self {
            SpecParams::Plain => None,
            SpecParams::Frame { gravity } | SpecParams::Linear { gravity, .. } => Some(*gravity),
        }
    }
}

/// A child's layout parameters as read by its parent container.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSpec {
    /// Inline-axis extent request.
    pub width: Extent,
    /// Block-axis extent request.
    pub height: Extent,
    /// Outer margins.
    pub margin: Sides,
    /// Container-specific parameters.
    pub params: SpecParams,
}

impl LayoutSpec {
    /// Create a spec with the given extents and no margins.
    #[must_use]
    pub const fn new(width: Extent, height: Extent) -> Self {
        Self {
            width,
            height,
            margin: Sides::ZERO,
            params: SpecParams::Plain,
        }
    }

    /// Fill both axes.
    #[must_use]
    pub const fn fill() -> Self {
        Self::new(Extent::Fill, Extent::Fill)
    }

    /// Wrap both axes.
    #[must_use]
    pub const fn wrap() -> Self {
        Self::new(Extent::Wrap, Extent::Wrap)
    }

    /// Set the margins.
    #[must_use]
    pub const fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    /// Set the container-specific parameters.
    #[must_use]
    pub const fn params(mut self, params: SpecParams) -> Self {
        self.params = params;
        self
    }
}

/// Translate a spec for insertion under a container of `target` kind.
///
/// Extents and margins always survive. Gravity survives whenever the
/// source carried one; everything else container-specific is adapted or
/// dropped. A source the target kind cannot interpret degrades to the
/// target's parameters with default placement, never an error: sticky
/// visual placement is best-effort.
#[must_use]
pub fn translate_spec(spec: &LayoutSpec, target: ContainerKind) -> LayoutSpec {
    let gravity = spec.params.gravity().unwrap_or_default();
    let params = match target {
        ContainerKind::Frame => SpecParams::Frame { gravity },
        ContainerKind::Column | ContainerKind::Row => {
            let weight = match spec.params {
                SpecParams::Linear { weight, .. } => weight,
                _ => 0.0,
            };
            SpecParams::Linear { gravity, weight }
        }
    };
    LayoutSpec {
        width: spec.width,
        height: spec.height,
        margin: spec.margin,
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_preserves_margins_and_gravity() {
        let spec = LayoutSpec::new(Extent::Fill, Extent::Exact(48))
            .margin(Sides::new(8, 4, 8, 4))
            .params(SpecParams::Frame {
                gravity: Gravity::RIGHT,
            });
        let out = translate_spec(&spec, ContainerKind::Column);
        assert_eq!(out.width, Extent::Fill);
        assert_eq!(out.height, Extent::Exact(48));
        assert_eq!(out.margin, Sides::new(8, 4, 8, 4));
        assert_eq!(
            out.params,
            SpecParams::Linear {
                gravity: Gravity::RIGHT,
                weight: 0.0,
            }
        );
    }

    #[test]
    fn translate_linear_to_frame_keeps_gravity_drops_weight() {
        let spec = LayoutSpec::new(Extent::Wrap, Extent::Wrap).params(SpecParams::Linear {
            gravity: Gravity::CENTER_HORIZONTAL,
            weight: 2.0,
        });
        let out = translate_spec(&spec, ContainerKind::Frame);
        assert_eq!(
            out.params,
            SpecParams::Frame {
                gravity: Gravity::CENTER_HORIZONTAL,
            }
        );
    }

    #[test]
    fn translate_plain_falls_back_to_default_placement() {
        let spec = LayoutSpec::new(Extent::Exact(10), Extent::Exact(20)).margin(Sides::uniform(2));
        let out = translate_spec(&spec, ContainerKind::Column);
        assert_eq!(out.margin, Sides::uniform(2));
        assert_eq!(
            out.params,
            SpecParams::Linear {
                gravity: Gravity::default(),
                weight: 0.0,
            }
        );
    }
}
