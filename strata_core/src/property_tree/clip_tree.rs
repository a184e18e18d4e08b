// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip tree: rectangular clip boundaries and how they combine.
//!
//! Only the local clip rectangle and the combination flags are produced
//! while building. Combined and accumulated rectangles are filled in by a
//! later pass, which is why a freshly built clip tree reports
//! [`needs_update`](PropertyTree::needs_update).

use kurbo::Rect;

use super::tree::{INVALID_NODE, Node, NodeId, PropertyTree};

/// Per-node data of the clip tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipData {
    /// Local clip rectangle, in the space of `transform_id`.
    pub clip: Rect,
    /// Transform node whose space `clip` is expressed in.
    pub transform_id: NodeId,
    /// Transform node of the render target this clip is applied in.
    pub target_id: NodeId,
    /// Whether layers in this subtree end up geometrically clipped.
    pub layers_are_clipped: bool,
    /// This node exists only to re-express the parent's clip in its own space.
    pub use_only_parent_clip: bool,
    /// When drawing a layer, ignore ancestor clips (set at surface boundaries).
    pub layer_clipping_uses_only_local_clip: bool,
    /// When computing visible regions, ignore ancestor clips.
    pub layer_visibility_uses_only_local_clip: bool,
    /// The surface owning this node is clipped by its ancestors.
    pub render_surface_is_clipped: bool,
    /// Intersection of `clip` with the applicable ancestor clips.
    ///
    /// Computed by a later pass; equals [`Rect::ZERO`] after a build.
    pub combined_clip: Rect,
}

impl Default for ClipData {
    fn default() -> Self {
        Self {
            clip: Rect::ZERO,
            transform_id: INVALID_NODE,
            target_id: INVALID_NODE,
            layers_are_clipped: false,
            use_only_parent_clip: false,
            layer_clipping_uses_only_local_clip: false,
            layer_visibility_uses_only_local_clip: false,
            render_surface_is_clipped: false,
            combined_clip: Rect::ZERO,
        }
    }
}

/// A node in the [`ClipTree`].
pub type ClipNode = Node<ClipData>;

/// The clip tree.
pub type ClipTree = PropertyTree<ClipData>;
