// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip-node decision.

use kurbo::{Point, Rect};

use crate::property_tree::{ClipData, ROOT_NODE};
use crate::scene::PropertyTreeLayers;
use crate::trace::TreeKind;

use super::Builder;
use super::context::DataForRecursion;

impl<S: PropertyTreeLayers> Builder<'_, '_, S> {
    /// Creates a clip node for `layer` if it needs one.
    ///
    /// Runs after the effect and transform decisions for the same layer and
    /// may redirect the effect node they produced.
    pub(super) fn add_clip_node_if_needed(
        &mut self,
        layer: S::Layer,
        data_from_ancestor: &DataForRecursion<S::Layer>,
        data_for_children: &mut DataForRecursion<S::Layer>,
        created_render_surface: bool,
        created_transform_node: bool,
    ) {
        let is_root = self.scene.parent(layer).is_none();
        let layer_clips_subtree =
            self.scene.masks_to_bounds(layer) || self.scene.has_mask_layer(layer);
        let bounds = self.scene.bounds(layer);

        if is_root {
            // The root shares the viewport clip node.
            if layer_clips_subtree {
                let node = self.trees.clip_tree.node_mut(ROOT_NODE);
                node.data.clip = node
                    .data
                    .clip
                    .intersect(Rect::from_origin_size(Point::ORIGIN, bounds));
            }
            self.scene.set_clip_tree_index(layer, ROOT_NODE);
            data_for_children.clip_tree_parent = ROOT_NODE;
            return;
        }

        let mut parent_id = data_from_ancestor.clip_tree_parent;
        let ancestor_clips_subtree = self.trees.clip_tree.node(parent_id).data.layers_are_clipped;
        let has_render_surface = self.scene.has_render_surface(layer);
        let num_unclipped_descendants = self.scene.num_unclipped_descendants(layer);

        let mut layers_are_clipped = false;
        let mut has_unclipped_surface = false;
        if has_render_surface {
            has_unclipped_surface = ancestor_clips_subtree && num_unclipped_descendants > 0;
        } else {
            layers_are_clipped = ancestor_clips_subtree;
        }
        if layer_clips_subtree {
            layers_are_clipped = true;
        }

        if has_unclipped_surface {
            // Descendants escape the ancestor clip, so the surface draws
            // unclipped and restarts from the root clip.
            let effect_id = self.scene.effect_tree_index(layer);
            self.trees.effect_tree.node_mut(effect_id).data.clip_id = ROOT_NODE;
            parent_id = ROOT_NODE;
        }

        let requires_node = layer_clips_subtree
            || (has_render_surface && num_unclipped_descendants > 0)
            || (has_render_surface && ancestor_clips_subtree);

        if !requires_node {
            self.scene.set_clip_tree_index(layer, parent_id);
            data_for_children.clip_tree_parent = parent_id;
            return;
        }

        // The transform decision has run, so this is the layer's own node
        // when it made one and its transform parent's node otherwise.
        let transform_id = self.scene.transform_tree_index(layer);
        debug_assert!(
            !created_transform_node || transform_id + 1 == self.trees.transform_tree.next_available_id(),
            "clip for transform node {transform_id} built after later transform nodes"
        );
        let render_target = data_for_children.render_target;
        let data = ClipData {
            clip: Rect::from_origin_size(
                Point::ORIGIN + self.scene.offset_to_transform_parent(layer),
                bounds,
            ),
            transform_id,
            target_id: self.trees.effect_tree.node(render_target).data.transform_id,
            layers_are_clipped,
            use_only_parent_clip: !layer_clips_subtree
                && ancestor_clips_subtree
                && !created_render_surface,
            layer_clipping_uses_only_local_clip: created_render_surface,
            layer_visibility_uses_only_local_clip: has_render_surface
                && num_unclipped_descendants > 0,
            render_surface_is_clipped: has_render_surface
                && ancestor_clips_subtree
                && num_unclipped_descendants == 0,
            ..ClipData::default()
        };

        let owner_id = self.scene.layer_id(layer);
        let id = self.trees.clip_tree.insert(data, parent_id, owner_id);
        self.tracer.node_created(TreeKind::Clip, id, owner_id, parent_id);
        self.scene.set_clip_tree_index(layer, id);
        data_for_children.clip_tree_parent = id;
    }
}
