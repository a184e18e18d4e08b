// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`SceneGraph`], [`AnimationQuery`], and [`PropertyTreeOutputs`] for
//! [`LayerStore`].
//!
//! Every accessor validates its handle, so a stale [`LayerId`] panics here
//! just as it does in the mutation API.

use kurbo::{Point, Size, Vec2};

use crate::animation::{self, TargetProperty};
use crate::property_tree::NodeId;
use crate::scene::{AnimationQuery, PropertyTreeOutputs, SceneGraph};
use crate::transform::{Point3, Transform3d};

use super::id::{INVALID, LayerId};
use super::properties::{BlendMode, PositionConstraint};
use super::store::LayerStore;
use super::traverse::Children;

impl SceneGraph for LayerStore {
    type Layer = LayerId;

    fn layer_id(&self, layer: LayerId) -> u32 {
        self.validate(layer);
        layer.idx
    }

    fn parent(&self, layer: LayerId) -> Option<LayerId> {
        self.validate(layer);
        let i = layer.idx as usize;
        let p = self.parent[i];
        self.get(if p == INVALID { self.replica_owner[i] } else { p })
    }

    fn children(&self, layer: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        self.validate(layer);
        Children::new(self, self.first_child[layer.idx as usize])
    }

    fn scroll_parent(&self, layer: LayerId) -> Option<LayerId> {
        self.validate(layer);
        self.get(self.scroll_parent[layer.idx as usize])
    }

    fn scroll_children(&self, layer: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        self.validate(layer);
        self.scroll_children[layer.idx as usize]
            .iter()
            .map(|&c| self.handle(c))
    }

    fn replica(&self, layer: LayerId) -> Option<LayerId> {
        self.validate(layer);
        self.get(self.replica[layer.idx as usize])
    }

    fn position(&self, layer: LayerId) -> Point {
        self.validate(layer);
        self.position[layer.idx as usize]
    }

    fn bounds(&self, layer: LayerId) -> Size {
        self.validate(layer);
        self.bounds[layer.idx as usize]
    }

    fn transform(&self, layer: LayerId) -> Transform3d {
        self.validate(layer);
        self.local_transform[layer.idx as usize]
    }

    fn transform_origin(&self, layer: LayerId) -> Point3 {
        self.validate(layer);
        self.transform_origin[layer.idx as usize]
    }

    fn scroll_offset(&self, layer: LayerId) -> Vec2 {
        self.validate(layer);
        self.scroll_offset[layer.idx as usize]
    }

    fn scroll_compensation_adjustment(&self, layer: LayerId) -> Vec2 {
        self.validate(layer);
        self.scroll_compensation[layer.idx as usize]
    }

    fn opacity(&self, layer: LayerId) -> f32 {
        self.validate(layer);
        self.local_opacity[layer.idx as usize]
    }

    fn blend_mode(&self, layer: LayerId) -> BlendMode {
        self.validate(layer);
        self.blend_mode[layer.idx as usize]
    }

    fn position_constraint(&self, layer: LayerId) -> PositionConstraint {
        self.validate(layer);
        self.position_constraint[layer.idx as usize]
    }

    fn masks_to_bounds(&self, layer: LayerId) -> bool {
        self.flags(layer).masks_to_bounds
    }

    fn has_mask_layer(&self, layer: LayerId) -> bool {
        self.flags(layer).has_mask_layer
    }

    fn has_render_surface(&self, layer: LayerId) -> bool {
        self.flags(layer).has_render_surface
    }

    fn is_container_for_fixed_position_layers(&self, layer: LayerId) -> bool {
        self.flags(layer).is_container_for_fixed_position_layers
    }

    fn is_scrollable(&self, layer: LayerId) -> bool {
        self.flags(layer).scrollable
    }

    fn should_flatten_transform(&self, layer: LayerId) -> bool {
        self.flags(layer).should_flatten_transform
    }

    fn num_unclipped_descendants(&self, layer: LayerId) -> u32 {
        self.validate(layer);
        self.unclipped_descendants[layer.idx as usize]
    }
}

impl AnimationQuery for LayerStore {
    fn has_potentially_running_animation(&self, layer: LayerId, property: TargetProperty) -> bool {
        animation::has_potentially_running(self.animations(layer), property)
    }

    fn has_any_animation_targeting(&self, layer: LayerId, property: TargetProperty) -> bool {
        animation::has_any_targeting(self.animations(layer), property)
    }

    fn maximum_target_scale(&self, layer: LayerId) -> Option<f32> {
        animation::maximum_target_scale(self.animations(layer))
    }

    fn animation_start_scale(&self, layer: LayerId) -> Option<f32> {
        animation::starting_scale(self.animations(layer))
    }

    fn has_only_translation_transforms(&self, layer: LayerId) -> bool {
        animation::has_only_translation_transforms(self.animations(layer))
    }
}

impl PropertyTreeOutputs for LayerStore {
    fn property_tree_sequence_number(&self, layer: LayerId) -> u64 {
        self.outputs(layer).property_tree_sequence_number
    }

    fn set_property_tree_sequence_number(&mut self, layer: LayerId, sequence_number: u64) {
        self.validate(layer);
        self.outputs[layer.idx as usize].property_tree_sequence_number = sequence_number;
    }

    fn transform_tree_index(&self, layer: LayerId) -> NodeId {
        self.outputs(layer).transform_tree_index
    }

    fn set_transform_tree_index(&mut self, layer: LayerId, id: NodeId) {
        self.validate(layer);
        self.outputs[layer.idx as usize].transform_tree_index = id;
    }

    fn clip_tree_index(&self, layer: LayerId) -> NodeId {
        self.outputs(layer).clip_tree_index
    }

    fn set_clip_tree_index(&mut self, layer: LayerId, id: NodeId) {
        self.validate(layer);
        self.outputs[layer.idx as usize].clip_tree_index = id;
    }

    fn effect_tree_index(&self, layer: LayerId) -> NodeId {
        self.outputs(layer).effect_tree_index
    }

    fn set_effect_tree_index(&mut self, layer: LayerId, id: NodeId) {
        self.validate(layer);
        self.outputs[layer.idx as usize].effect_tree_index = id;
    }

    fn offset_to_transform_parent(&self, layer: LayerId) -> Vec2 {
        self.outputs(layer).offset_to_transform_parent
    }

    fn set_offset_to_transform_parent(&mut self, layer: LayerId, offset: Vec2) {
        self.validate(layer);
        self.outputs[layer.idx as usize].offset_to_transform_parent = offset;
    }

    fn should_flatten_transform_from_property_tree(&self, layer: LayerId) -> bool {
        self.outputs(layer)
            .should_flatten_transform_from_property_tree
    }

    fn set_should_flatten_transform_from_property_tree(&mut self, layer: LayerId, flatten: bool) {
        self.validate(layer);
        self.outputs[layer.idx as usize].should_flatten_transform_from_property_tree = flatten;
    }

    fn draw_blend_mode(&self, layer: LayerId) -> BlendMode {
        self.outputs(layer).draw_blend_mode
    }

    fn set_draw_blend_mode(&mut self, layer: LayerId, mode: BlendMode) {
        self.validate(layer);
        self.outputs[layer.idx as usize].draw_blend_mode = mode;
    }
}
