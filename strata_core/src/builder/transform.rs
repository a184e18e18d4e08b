// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform-node decision.
//!
//! A layer that needs no node of its own is positioned by an offset from
//! the node of its transform parent. That offset is written back to the
//! layer (`offset_to_transform_parent`), so descendants, and the clip rect
//! built for the layer itself, can be placed without one.
//!
//! A new node starts from whatever offset its parent layer had accumulated
//! (the *source offset*). Fixed-position layers and scroll children are
//! parented somewhere other than their structural parent, so their source
//! offset is measured from a different node (the *source node*), and the
//! transform tree translates between the two when it resolves the node.

use kurbo::Vec2;

use crate::animation::TargetProperty;
use crate::property_tree::{BoundsDeltaSensitivity, INVALID_NODE, NodeId, TransformData, Viewport};
use crate::scene::PropertyTreeLayers;
use crate::trace::TreeKind;
use crate::transform::Transform3d;

use super::Builder;
use super::context::DataForRecursion;

impl<S: PropertyTreeLayers> Builder<'_, '_, S> {
    /// Creates a transform node for `layer` if it needs one.
    ///
    /// Returns whether a node was created.
    pub(super) fn add_transform_node_if_needed(
        &mut self,
        layer: S::Layer,
        data_from_ancestor: &DataForRecursion<S::Layer>,
        data_for_children: &mut DataForRecursion<S::Layer>,
        created_render_surface: bool,
    ) -> bool {
        let scene = &*self.scene;
        let is_root = scene.parent(layer).is_none();
        let is_page_scale_layer = data_from_ancestor.page_scale_layer == Some(layer);
        let is_scrollable = scene.is_scrollable(layer);
        let constraint = scene.position_constraint(layer);
        let is_fixed = constraint.is_fixed_position;
        let local = scene.transform(layer);
        let has_significant_transform = !local.is_identity_or_2d_translation();
        let has_potentially_animated_transform =
            scene.has_potentially_running_animation(layer, TargetProperty::Transform);
        // Finished animations still count; the compositor may not have
        // observed the finish yet.
        let has_any_transform_animation =
            scene.has_any_animation_targeting(layer, TargetProperty::Transform);

        let requires_node = is_root
            || is_scrollable
            || has_significant_transform
            || has_any_transform_animation
            || created_render_surface
            || is_fixed
            || is_page_scale_layer;

        let transform_parent = if is_fixed {
            data_from_ancestor.transform_fixed_parent
        } else {
            data_from_ancestor.transform_tree_parent
        };
        let parent_index = transform_parent.map_or(INVALID_NODE, |p| scene.transform_tree_index(p));

        let mut source_index = parent_index;
        let mut source_offset = Vec2::ZERO;
        if let Some(transform_parent) = transform_parent {
            if scene.scroll_parent(layer).is_some() {
                if let Some(source) = scene.parent(layer) {
                    source_offset = scene.offset_to_transform_parent(source);
                    source_index = scene.transform_tree_index(source);
                }
            } else if !is_fixed {
                source_offset = scene.offset_to_transform_parent(transform_parent);
            } else {
                if let Some(tree_parent) = data_from_ancestor.transform_tree_parent
                    && data_from_ancestor.transform_fixed_parent != Some(tree_parent)
                {
                    source_offset = scene.offset_to_transform_parent(tree_parent);
                    source_index = scene.transform_tree_index(tree_parent);
                }
                source_offset += data_from_ancestor.scroll_compensation_adjustment;
            }
        }

        if scene.is_container_for_fixed_position_layers(layer) || is_root {
            data_for_children.affected_by_inner_viewport_bounds_delta =
                data_from_ancestor.inner_viewport_scroll_layer == Some(layer);
            data_for_children.affected_by_outer_viewport_bounds_delta =
                data_from_ancestor.outer_viewport_scroll_layer == Some(layer);
            // A scrolling container's fixed descendants must not scroll with
            // it, so they hang off the container's parent.
            data_for_children.transform_fixed_parent = if is_scrollable && !is_root {
                scene.parent(layer)
            } else {
                Some(layer)
            };
        }
        data_for_children.transform_tree_parent = Some(layer);
        if scene.is_container_for_fixed_position_layers(layer) || is_fixed {
            data_for_children.scroll_compensation_adjustment = Vec2::ZERO;
        }

        if !requires_node {
            let own_flatten = scene.should_flatten_transform(layer);
            let local_offset = scene.position(layer).to_vec2() + local.to_2d_translation();
            self.scene
                .set_offset_to_transform_parent(layer, source_offset + local_offset);
            self.scene.set_should_flatten_transform_from_property_tree(
                layer,
                data_from_ancestor.should_flatten,
            );
            self.scene.set_transform_tree_index(layer, parent_index);
            data_for_children.should_flatten |= own_flatten;
            return false;
        }

        let mut data = TransformData {
            local,
            scrolls: is_scrollable,
            flattens_inherited_transform: data_from_ancestor.should_flatten,
            target_id: self.target_transform_id(data_from_ancestor.render_target),
            content_target_id: self.target_transform_id(data_for_children.render_target),
            source_node_id: source_index,
            is_animated: has_potentially_animated_transform,
            ..TransformData::default()
        };
        // Surfaces flatten the content drawn into them.
        data_for_children.should_flatten =
            self.scene.should_flatten_transform(layer) || created_render_surface;

        if has_potentially_animated_transform {
            data.local_maximum_animation_target_scale = self.scene.maximum_target_scale(layer);
            data.local_starting_animation_scale = self.scene.animation_start_scale(layer);
            data.has_only_translation_animations =
                self.scene.has_only_translation_transforms(layer);
        }

        let mut post_local_scale_factor = 1.0_f32;
        if is_root {
            post_local_scale_factor = data_from_ancestor.device_scale_factor;
        }
        if is_page_scale_layer {
            post_local_scale_factor *= data_from_ancestor.page_scale_factor;
            self.trees
                .transform_tree
                .set_page_scale_factor(data_from_ancestor.page_scale_factor);
        }

        if created_render_surface && !is_root {
            data.needs_sublayer_scale = true;
            data.sublayer_scale = data_from_ancestor.device_scale_factor;
            if data_from_ancestor.in_subtree_of_page_scale_layer {
                data.sublayer_scale *= data_from_ancestor.page_scale_factor;
            }
        }

        let position = self.scene.position(layer);
        let origin = self.scene.transform_origin(layer);
        if is_root {
            let offset = position.to_vec2() + origin.to_vec2();
            data.post_local = data_from_ancestor.device_transform
                * Transform3d::from_scale_2d(f64::from(post_local_scale_factor))
                * Transform3d::from_translation(offset.x, offset.y, origin.z);
            data.post_local_scale_factor = post_local_scale_factor;
        } else {
            data.post_local_scale_factor = post_local_scale_factor;
            data.source_offset = source_offset;
            data.update_post_local_transform(position, origin);
        }
        data.update_pre_local_transform(origin);

        if is_scrollable {
            data.scroll_offset = self.scene.scroll_offset(layer);
        }

        if is_fixed {
            let viewport = if data_from_ancestor.affected_by_inner_viewport_bounds_delta {
                Some(Viewport::Inner)
            } else if data_from_ancestor.affected_by_outer_viewport_bounds_delta {
                Some(Viewport::Outer)
            } else {
                None
            };
            data.bounds_delta = viewport.map(|viewport| BoundsDeltaSensitivity {
                viewport,
                x: constraint.is_fixed_to_right_edge,
                y: constraint.is_fixed_to_bottom_edge,
            });
        }

        let owner_id = self.scene.layer_id(layer);
        let id = self.trees.transform_tree.insert(data, parent_index, owner_id);
        self.tracer
            .node_created(TreeKind::Transform, id, owner_id, parent_index);

        self.scene.set_transform_tree_index(layer, id);
        self.scene.set_offset_to_transform_parent(layer, Vec2::ZERO);
        // The node flattens, so the layer does not have to.
        self.scene
            .set_should_flatten_transform_from_property_tree(layer, false);
        data_for_children.scroll_compensation_adjustment +=
            self.scene.scroll_compensation_adjustment(layer);
        true
    }

    /// Transform node that the effect node `render_target` draws in.
    fn target_transform_id(&self, render_target: NodeId) -> NodeId {
        self.trees.effect_tree.node(render_target).data.transform_id
    }
}
