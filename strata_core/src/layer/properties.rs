// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small value types describing how a layer behaves.

/// Per-layer boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// Content and descendants are clipped to the layer's bounds.
    pub masks_to_bounds: bool,
    /// The layer has a mask layer.
    pub has_mask_layer: bool,
    /// The layer draws into its own render surface.
    pub has_render_surface: bool,
    /// Fixed-position descendants are positioned relative to this layer.
    pub is_container_for_fixed_position_layers: bool,
    /// The layer scrolls its content.
    pub scrollable: bool,
    /// Descendants flatten this layer's 3-D transform.
    pub should_flatten_transform: bool,
}

/// Fixed-position constraint of a layer.
///
/// A fixed-position layer is positioned relative to the nearest container
/// for fixed-position layers instead of its structural parent, so it does
/// not move when intervening layers scroll. The edge flags say which
/// viewport edge it sticks to when that viewport resizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PositionConstraint {
    /// The layer is fixed-position.
    pub is_fixed_position: bool,
    /// The layer sticks to the right edge.
    pub is_fixed_to_right_edge: bool,
    /// The layer sticks to the bottom edge.
    pub is_fixed_to_bottom_edge: bool,
}

impl PositionConstraint {
    /// A fixed-position constraint anchored to the top-left corner.
    pub const FIXED: Self = Self {
        is_fixed_position: true,
        is_fixed_to_right_edge: false,
        is_fixed_to_bottom_edge: false,
    };

    /// Anchors to the right edge.
    #[must_use]
    pub const fn to_right_edge(mut self) -> Self {
        self.is_fixed_to_right_edge = true;
        self
    }

    /// Anchors to the bottom edge.
    #[must_use]
    pub const fn to_bottom_edge(mut self) -> Self {
        self.is_fixed_to_bottom_edge = true;
        self
    }
}

/// How a layer's pixels combine with what is already in its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source-over alpha compositing.
    #[default]
    Normal,
    /// Multiply blend.
    Multiply,
    /// Screen blend.
    Screen,
    /// Overlay blend.
    Overlay,
    /// Darken blend.
    Darken,
    /// Lighten blend.
    Lighten,
}
