// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform tree: local, parent-relative, target-relative and screen-space
//! transforms.
//!
//! Unlike the clip tree, every node's matrices are resolved as soon as it is
//! inserted. Descendants inserted later in the same build read their
//! parent's `to_screen` immediately, and parents always have smaller ids
//! than their children, so a single in-order sweep is always sufficient to
//! recompute the whole tree.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use super::tree::{INVALID_NODE, Node, NodeId, PropertyTree, ROOT_NODE};
use crate::transform::{Point3, Transform3d};

/// One of the two viewports a fixed-position layer can be anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Viewport {
    /// The visual viewport (inside page scale).
    Inner,
    /// The layout viewport.
    Outer,
}

/// How a fixed-position node follows a viewport's bounds delta.
///
/// When the viewport resizes without a rebuild (for example as browser
/// controls slide in), nodes fixed to the right or bottom edge are shifted by
/// the delta on the corresponding axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundsDeltaSensitivity {
    /// Which viewport's delta applies.
    pub viewport: Viewport,
    /// Follow the delta's x component (fixed to the right edge).
    pub x: bool,
    /// Follow the delta's y component (fixed to the bottom edge).
    pub y: bool,
}

/// Per-node data of the transform tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformData {
    /// The owning layer's own transform, applied about its origin.
    pub local: Transform3d,
    /// Moves the transform origin to the layer origin.
    pub pre_local: Transform3d,
    /// Scales and positions the layer within its parent node's space.
    pub post_local: Transform3d,
    /// Uniform scale folded into `post_local` (device and/or page scale).
    pub post_local_scale_factor: f32,
    /// Resolved transform into the parent node's space.
    pub to_parent: Transform3d,
    /// Resolved transform into screen space.
    pub to_screen: Transform3d,
    /// Resolved transform into the space of `target_id`.
    pub to_target: Transform3d,
    /// Transform node of the render target this node draws into.
    pub target_id: NodeId,
    /// Transform node of the render target this node's content draws into.
    ///
    /// Differs from `target_id` only on the node of a render-surface layer.
    pub content_target_id: NodeId,
    /// Node the accumulated `source_offset` is expressed relative to.
    pub source_node_id: NodeId,
    /// Offset accumulated from layers between the source node and this one
    /// that did not get nodes of their own.
    pub source_offset: Vec2,
    /// Translation from `source_node_id` to the parent node.
    pub source_to_parent: Vec2,
    /// Current scroll offset, subtracted when positioning content.
    pub scroll_offset: Vec2,
    /// Whether the owning layer scrolls.
    pub scrolls: bool,
    /// Flatten the parent's screen transform to 2-D before composing.
    pub flattens_inherited_transform: bool,
    /// A transform animation is potentially running.
    pub is_animated: bool,
    /// Every transform animation only translates.
    pub has_only_translation_animations: bool,
    /// Largest scale any transform animation reaches.
    pub local_maximum_animation_target_scale: Option<f32>,
    /// Starting scale of the transform animations.
    pub local_starting_animation_scale: Option<f32>,
    /// Content of this node's render surface is rasterized at
    /// `sublayer_scale`.
    pub needs_sublayer_scale: bool,
    /// Raster scale for the surface's content.
    pub sublayer_scale: f32,
    /// Viewport bounds-delta sensitivity of a fixed-position node.
    pub bounds_delta: Option<BoundsDeltaSensitivity>,
    /// `to_screen` has an inverse.
    pub is_invertible: bool,
    /// Every ancestor's `to_screen` has an inverse.
    pub ancestors_are_invertible: bool,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            local: Transform3d::IDENTITY,
            pre_local: Transform3d::IDENTITY,
            post_local: Transform3d::IDENTITY,
            post_local_scale_factor: 1.0,
            to_parent: Transform3d::IDENTITY,
            to_screen: Transform3d::IDENTITY,
            to_target: Transform3d::IDENTITY,
            target_id: INVALID_NODE,
            content_target_id: INVALID_NODE,
            source_node_id: INVALID_NODE,
            source_offset: Vec2::ZERO,
            source_to_parent: Vec2::ZERO,
            scroll_offset: Vec2::ZERO,
            scrolls: false,
            flattens_inherited_transform: false,
            is_animated: false,
            has_only_translation_animations: true,
            local_maximum_animation_target_scale: None,
            local_starting_animation_scale: None,
            needs_sublayer_scale: false,
            sublayer_scale: 1.0,
            bounds_delta: None,
            is_invertible: true,
            ancestors_are_invertible: true,
        }
    }
}

impl TransformData {
    /// Recomputes `pre_local` from the layer's transform origin.
    pub fn update_pre_local_transform(&mut self, origin: Point3) {
        self.pre_local = Transform3d::from_translation(-origin.x, -origin.y, -origin.z);
    }

    /// Recomputes `post_local` from the layer's position and transform
    /// origin, using the current `post_local_scale_factor` and
    /// `source_offset`.
    pub fn update_post_local_transform(&mut self, position: Point, origin: Point3) {
        let offset = position.to_vec2() + self.source_offset + origin.to_vec2();
        self.post_local = Transform3d::from_scale_2d(f64::from(self.post_local_scale_factor))
            * Transform3d::from_translation(offset.x, offset.y, origin.z);
    }
}

/// A node in the [`TransformTree`].
pub type TransformNode = Node<TransformData>;

/// The transform tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformTree {
    nodes: PropertyTree<TransformData>,
    page_scale_factor: f32,
    inner_viewport_bounds_delta: Vec2,
    outer_viewport_bounds_delta: Vec2,
    affected_by_inner_viewport_bounds_delta: Vec<NodeId>,
    affected_by_outer_viewport_bounds_delta: Vec<NodeId>,
}

impl Default for TransformTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformTree {
    /// Creates an empty transform tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: PropertyTree::new(),
            page_scale_factor: 1.0,
            inner_viewport_bounds_delta: Vec2::ZERO,
            outer_viewport_bounds_delta: Vec2::ZERO,
            affected_by_inner_viewport_bounds_delta: Vec::new(),
            affected_by_outer_viewport_bounds_delta: Vec::new(),
        }
    }

    /// Appends a node, resolves its matrices, and returns its id.
    ///
    /// Nodes whose [`bounds_delta`](TransformData::bounds_delta) follows at
    /// least one axis are registered for
    /// [`set_inner_viewport_bounds_delta`](Self::set_inner_viewport_bounds_delta)
    /// / [`set_outer_viewport_bounds_delta`](Self::set_outer_viewport_bounds_delta).
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`PropertyTree::insert`].
    pub fn insert(&mut self, data: TransformData, parent_id: NodeId, owner_id: u32) -> NodeId {
        let sensitivity = data.bounds_delta;
        let id = self.nodes.insert(data, parent_id, owner_id);
        if let Some(s) = sensitivity.filter(|s| s.x || s.y) {
            match s.viewport {
                Viewport::Inner => self.affected_by_inner_viewport_bounds_delta.push(id),
                Viewport::Outer => self.affected_by_outer_viewport_bounds_delta.push(id),
            }
        }
        self.update_transforms(id);
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TransformNode {
        self.nodes.node(id)
    }

    /// Returns the underlying node storage.
    #[must_use]
    pub fn nodes(&self) -> &PropertyTree<TransformData> {
        &self.nodes
    }

    /// Iterates over nodes in id order.
    pub fn iter(&self) -> core::slice::Iter<'_, TransformNode> {
        self.nodes.iter()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The id the next [`insert`](Self::insert) will hand out.
    #[must_use]
    pub fn next_available_id(&self) -> NodeId {
        self.nodes.next_available_id()
    }

    /// Removes every node and every viewport registration, and resets the
    /// page scale factor to 1.
    ///
    /// The viewport bounds deltas are host state and survive a clear.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.page_scale_factor = 1.0;
        self.affected_by_inner_viewport_bounds_delta.clear();
        self.affected_by_outer_viewport_bounds_delta.clear();
    }

    /// Whether matrices still have to be recomputed.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.nodes.needs_update()
    }

    /// Sets the deferred-update flag.
    pub fn set_needs_update(&mut self, needs_update: bool) {
        self.nodes.set_needs_update(needs_update);
    }

    /// Page scale applied at the page-scale layer's node.
    #[must_use]
    pub fn page_scale_factor(&self) -> f32 {
        self.page_scale_factor
    }

    /// Records the page scale applied at the page-scale layer's node.
    pub fn set_page_scale_factor(&mut self, page_scale_factor: f32) {
        self.page_scale_factor = page_scale_factor;
    }

    /// Nodes registered as following the inner viewport's bounds delta.
    #[must_use]
    pub fn nodes_affected_by_inner_viewport_bounds_delta(&self) -> &[NodeId] {
        &self.affected_by_inner_viewport_bounds_delta
    }

    /// Nodes registered as following the outer viewport's bounds delta.
    #[must_use]
    pub fn nodes_affected_by_outer_viewport_bounds_delta(&self) -> &[NodeId] {
        &self.affected_by_outer_viewport_bounds_delta
    }

    /// Current inner viewport bounds delta.
    #[must_use]
    pub fn inner_viewport_bounds_delta(&self) -> Vec2 {
        self.inner_viewport_bounds_delta
    }

    /// Current outer viewport bounds delta.
    #[must_use]
    pub fn outer_viewport_bounds_delta(&self) -> Vec2 {
        self.outer_viewport_bounds_delta
    }

    /// Sets the inner viewport bounds delta and re-resolves every node that
    /// follows it, along with everything inserted after the first of them.
    pub fn set_inner_viewport_bounds_delta(&mut self, delta: Vec2) {
        if self.inner_viewport_bounds_delta == delta {
            return;
        }
        self.inner_viewport_bounds_delta = delta;
        if let Some(&first) = self.affected_by_inner_viewport_bounds_delta.iter().min() {
            self.update_transforms_from(first);
        }
    }

    /// Outer-viewport counterpart of
    /// [`set_inner_viewport_bounds_delta`](Self::set_inner_viewport_bounds_delta).
    pub fn set_outer_viewport_bounds_delta(&mut self, delta: Vec2) {
        if self.outer_viewport_bounds_delta == delta {
            return;
        }
        self.outer_viewport_bounds_delta = delta;
        if let Some(&first) = self.affected_by_outer_viewport_bounds_delta.iter().min() {
            self.update_transforms_from(first);
        }
    }

    /// Re-resolves nodes `first..len` in order.
    fn update_transforms_from(&mut self, first: NodeId) {
        for id in first..self.nodes.next_available_id() {
            self.update_transforms(id);
        }
    }

    /// Resolves `to_parent`, `to_screen` and `to_target` for `id`.
    ///
    /// The parent, source and target nodes must already be resolved.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn update_transforms(&mut self, id: NodeId) {
        let node = self.nodes.node(id);
        let parent_id = node.parent_id;
        let data = node.data;
        debug_assert!(
            data.target_id == INVALID_NODE || data.target_id <= id,
            "transform node {id} targets later node {}",
            data.target_id
        );

        let source_to_parent = if parent_id != INVALID_NODE
            && data.source_node_id != INVALID_NODE
            && data.source_node_id != parent_id
        {
            self.translation_between(data.source_node_id, parent_id)
        } else {
            Vec2::ZERO
        };

        let to_parent = data.post_local
            * Transform3d::from_vec2(
                source_to_parent - data.scroll_offset + self.fixed_position_adjustment(&data),
            )
            * data.local
            * data.pre_local;

        let (to_screen, ancestors_are_invertible) = if parent_id == INVALID_NODE {
            (to_parent, true)
        } else {
            let parent = &self.nodes.node(parent_id).data;
            let inherited = if data.flattens_inherited_transform {
                parent.to_screen.flatten_to_2d()
            } else {
                parent.to_screen
            };
            (
                inherited * to_parent,
                parent.ancestors_are_invertible && parent.is_invertible,
            )
        };
        let screen_inverse = to_screen.inverse();

        let to_target = if data.target_id == INVALID_NODE
            || data.target_id == ROOT_NODE
            || data.target_id == id
        {
            to_screen
        } else {
            let target = &self.nodes.node(data.target_id).data;
            target.to_screen.inverse().map_or(Transform3d::IDENTITY, |inv| {
                Transform3d::from_scale_2d(f64::from(target.sublayer_scale)) * inv * to_screen
            })
        };

        let data = &mut self.nodes.node_mut(id).data;
        data.source_to_parent = source_to_parent;
        data.to_parent = to_parent;
        data.to_screen = to_screen;
        data.to_target = to_target;
        data.is_invertible = screen_inverse.is_some();
        data.ancestors_are_invertible = ancestors_are_invertible;
    }

    /// 2-D translation taking content in `source`'s space to `dest`'s space.
    fn translation_between(&self, source: NodeId, dest: NodeId) -> Vec2 {
        let source = &self.nodes.node(source).data;
        let dest = &self.nodes.node(dest).data;
        dest.to_screen
            .inverse()
            .map_or(Vec2::ZERO, |inv| (inv * source.to_screen).to_2d_translation())
    }

    fn fixed_position_adjustment(&self, data: &TransformData) -> Vec2 {
        let Some(s) = data.bounds_delta else {
            return Vec2::ZERO;
        };
        let delta = match s.viewport {
            Viewport::Inner => self.inner_viewport_bounds_delta,
            Viewport::Outer => self.outer_viewport_bounds_delta,
        };
        Vec2::new(
            if s.x { delta.x } else { 0.0 },
            if s.y { delta.y } else { 0.0 },
        )
    }
}
