// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect tree: opacity and render-surface boundaries.

use super::tree::{INVALID_NODE, Node, NodeId, PropertyTree};

/// Per-node data of the effect tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectData {
    /// The owning layer's own opacity.
    pub opacity: f32,
    /// Product of `opacity` with every ancestor effect node's opacity.
    pub screen_space_opacity: f32,
    /// Whether the owning layer draws into its own render surface.
    pub has_render_surface: bool,
    /// Transform node the surface's content is positioned by.
    pub transform_id: NodeId,
    /// Clip node bounding the surface.
    pub clip_id: NodeId,
}

impl Default for EffectData {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            screen_space_opacity: 1.0,
            has_render_surface: false,
            transform_id: INVALID_NODE,
            clip_id: INVALID_NODE,
        }
    }
}

/// A node in the [`EffectTree`].
pub type EffectNode = Node<EffectData>;

/// The effect tree.
pub type EffectTree = PropertyTree<EffectData>;
