// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability interface between a layer tree and the property-tree builder.
//!
//! The builder never sees a concrete layer type. Anything that can answer
//! [`SceneGraph`] and [`AnimationQuery`] questions and accept
//! [`PropertyTreeOutputs`] write-backs can be built from, which lets an
//! authoring-side tree and a render-side tree share one algorithm.
//! [`LayerStore`](crate::layer::LayerStore) is the in-crate implementation.

use core::fmt::Debug;

use kurbo::{Point, Size, Vec2};

use crate::animation::TargetProperty;
use crate::layer::{BlendMode, PositionConstraint};
use crate::property_tree::NodeId;
use crate::transform::{Point3, Transform3d};

/// Read access to topology and authored layer properties.
pub trait SceneGraph {
    /// Handle naming one layer.
    type Layer: Copy + Eq + Debug;

    /// Numeric id recorded as a node's owner.
    fn layer_id(&self, layer: Self::Layer) -> u32;

    /// Structural parent; for a replica layer, the layer that owns it.
    ///
    /// A layer without a parent is a root.
    fn parent(&self, layer: Self::Layer) -> Option<Self::Layer>;

    /// Ordered structural children.
    fn children(&self, layer: Self::Layer) -> impl Iterator<Item = Self::Layer> + '_;

    /// The layer whose scrolling positions this one, if not its parent.
    fn scroll_parent(&self, layer: Self::Layer) -> Option<Self::Layer>;

    /// Layers that name this one as their scroll parent.
    fn scroll_children(&self, layer: Self::Layer) -> impl Iterator<Item = Self::Layer> + '_;

    /// Replica drawn in addition to this layer's subtree, if any.
    fn replica(&self, layer: Self::Layer) -> Option<Self::Layer>;

    /// Position within the parent.
    fn position(&self, layer: Self::Layer) -> Point;

    /// Size of the layer's content rectangle.
    fn bounds(&self, layer: Self::Layer) -> Size;

    /// Local transform, applied about [`transform_origin`](Self::transform_origin).
    fn transform(&self, layer: Self::Layer) -> Transform3d;

    /// Point the local transform is applied about.
    fn transform_origin(&self, layer: Self::Layer) -> Point3;

    /// Current scroll offset.
    fn scroll_offset(&self, layer: Self::Layer) -> Vec2;

    /// Offset fixed-position descendants must absorb to stay put while this
    /// layer scrolls.
    fn scroll_compensation_adjustment(&self, layer: Self::Layer) -> Vec2;

    /// Local opacity.
    fn opacity(&self, layer: Self::Layer) -> f32;

    /// Authored blend mode.
    fn blend_mode(&self, layer: Self::Layer) -> BlendMode;

    /// Fixed-position constraint.
    fn position_constraint(&self, layer: Self::Layer) -> PositionConstraint;

    /// Content is clipped to the layer's bounds.
    fn masks_to_bounds(&self, layer: Self::Layer) -> bool;

    /// The layer has a mask layer.
    fn has_mask_layer(&self, layer: Self::Layer) -> bool;

    /// The layer draws into its own render surface.
    fn has_render_surface(&self, layer: Self::Layer) -> bool;

    /// Fixed-position descendants are positioned relative to this layer.
    fn is_container_for_fixed_position_layers(&self, layer: Self::Layer) -> bool;

    /// The layer scrolls its content.
    fn is_scrollable(&self, layer: Self::Layer) -> bool;

    /// Descendants flatten this layer's 3-D transform.
    fn should_flatten_transform(&self, layer: Self::Layer) -> bool;

    /// Number of descendants that escape this layer's clip.
    fn num_unclipped_descendants(&self, layer: Self::Layer) -> u32;
}

/// Animation questions the builder asks about a layer.
pub trait AnimationQuery: SceneGraph {
    /// An animation on `property` may still be running.
    fn has_potentially_running_animation(
        &self,
        layer: Self::Layer,
        property: TargetProperty,
    ) -> bool;

    /// Any animation targets `property`, including finished ones.
    fn has_any_animation_targeting(&self, layer: Self::Layer, property: TargetProperty) -> bool;

    /// Largest scale reached by the layer's transform animations.
    fn maximum_target_scale(&self, layer: Self::Layer) -> Option<f32>;

    /// Starting scale of the layer's transform animations.
    fn animation_start_scale(&self, layer: Self::Layer) -> Option<f32>;

    /// Every transform animation only translates.
    fn has_only_translation_transforms(&self, layer: Self::Layer) -> bool;
}

/// Per-layer results written back by the builder.
pub trait PropertyTreeOutputs: SceneGraph {
    /// Build sequence number this layer was last visited in.
    fn property_tree_sequence_number(&self, layer: Self::Layer) -> u64;
    /// Stamps the layer with a build sequence number.
    fn set_property_tree_sequence_number(&mut self, layer: Self::Layer, sequence_number: u64);

    /// Transform node that positions this layer.
    fn transform_tree_index(&self, layer: Self::Layer) -> NodeId;
    /// Sets the transform node that positions this layer.
    fn set_transform_tree_index(&mut self, layer: Self::Layer, id: NodeId);

    /// Clip node that clips this layer.
    fn clip_tree_index(&self, layer: Self::Layer) -> NodeId;
    /// Sets the clip node that clips this layer.
    fn set_clip_tree_index(&mut self, layer: Self::Layer, id: NodeId);

    /// Effect node that applies to this layer.
    fn effect_tree_index(&self, layer: Self::Layer) -> NodeId;
    /// Sets the effect node that applies to this layer.
    fn set_effect_tree_index(&mut self, layer: Self::Layer, id: NodeId);

    /// Offset from this layer to its transform node's space.
    fn offset_to_transform_parent(&self, layer: Self::Layer) -> Vec2;
    /// Sets the offset from this layer to its transform node's space.
    fn set_offset_to_transform_parent(&mut self, layer: Self::Layer, offset: Vec2);

    /// Whether the layer must flatten its inherited transform itself.
    fn should_flatten_transform_from_property_tree(&self, layer: Self::Layer) -> bool;
    /// Sets whether the layer must flatten its inherited transform itself.
    fn set_should_flatten_transform_from_property_tree(&mut self, layer: Self::Layer, flatten: bool);

    /// Blend mode used when drawing the layer into its target.
    fn draw_blend_mode(&self, layer: Self::Layer) -> BlendMode;
    /// Sets the blend mode used when drawing the layer into its target.
    fn set_draw_blend_mode(&mut self, layer: Self::Layer, mode: BlendMode);
}

/// Everything the property-tree builder needs from a layer tree.
pub trait PropertyTreeLayers: AnimationQuery + PropertyTreeOutputs {}

impl<T: AnimationQuery + PropertyTreeOutputs> PropertyTreeLayers for T {}
