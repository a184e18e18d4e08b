// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ambient state threaded down the build walk.

use kurbo::Vec2;

use crate::property_tree::NodeId;
use crate::transform::Transform3d;

/// What a layer inherits from the layers above it.
///
/// Each visit copies the context it was given, edits the copy for its
/// children, and hands that same copy to every child. Siblings therefore
/// never see each other's edits.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DataForRecursion<L> {
    /// Layer whose transform index and offset position ordinary children.
    pub(crate) transform_tree_parent: Option<L>,
    /// Layer whose transform index positions fixed-position children.
    pub(crate) transform_fixed_parent: Option<L>,
    /// Effect node of the render surface content currently draws into.
    pub(crate) render_target: NodeId,
    /// Clip node children are clipped by.
    pub(crate) clip_tree_parent: NodeId,
    /// Effect node children's effects compose with.
    pub(crate) effect_tree_parent: NodeId,
    pub(crate) page_scale_layer: Option<L>,
    pub(crate) inner_viewport_scroll_layer: Option<L>,
    pub(crate) outer_viewport_scroll_layer: Option<L>,
    pub(crate) page_scale_factor: f32,
    pub(crate) device_scale_factor: f32,
    pub(crate) device_transform: Transform3d,
    /// Scrolling that fixed-position descendants must undo.
    pub(crate) scroll_compensation_adjustment: Vec2,
    pub(crate) in_subtree_of_page_scale_layer: bool,
    /// Children flatten the transform they inherit.
    pub(crate) should_flatten: bool,
    /// Fixed-position descendants follow the inner viewport's bounds delta.
    pub(crate) affected_by_inner_viewport_bounds_delta: bool,
    /// Fixed-position descendants follow the outer viewport's bounds delta.
    pub(crate) affected_by_outer_viewport_bounds_delta: bool,
    pub(crate) sequence_number: u64,
}
