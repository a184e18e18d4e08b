// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect-node decision.

use crate::animation::TargetProperty;
use crate::property_tree::{EffectData, INVALID_NODE, ROOT_NODE};
use crate::scene::PropertyTreeLayers;
use crate::trace::TreeKind;

use super::Builder;
use super::context::DataForRecursion;

impl<S: PropertyTreeLayers> Builder<'_, '_, S> {
    /// Creates an effect node for `layer` if it needs one.
    ///
    /// Returns whether the layer has a render surface, which makes its node
    /// the render target of its subtree.
    pub(super) fn add_effect_node_if_needed(
        &mut self,
        layer: S::Layer,
        data_from_ancestor: &DataForRecursion<S::Layer>,
        data_for_children: &mut DataForRecursion<S::Layer>,
    ) -> bool {
        let is_root = self.scene.parent(layer).is_none();
        let opacity = self.scene.opacity(layer);
        let has_animated_opacity = self
            .scene
            .has_potentially_running_animation(layer, TargetProperty::Opacity);
        let has_render_surface = self.scene.has_render_surface(layer);

        let requires_node = is_root || opacity != 1.0 || has_animated_opacity || has_render_surface;

        let parent_id = data_from_ancestor.effect_tree_parent;
        if !requires_node {
            self.scene.set_effect_tree_index(layer, parent_id);
            return false;
        }

        let tree = &mut self.trees.effect_tree;
        let parent_opacity = if parent_id == INVALID_NODE {
            1.0
        } else {
            tree.node(parent_id).data.screen_space_opacity
        };
        let (transform_id, clip_id) = if is_root {
            (ROOT_NODE, ROOT_NODE)
        } else {
            (
                self.trees.transform_tree.next_available_id(),
                data_from_ancestor.clip_tree_parent,
            )
        };
        let data = EffectData {
            opacity,
            screen_space_opacity: opacity * parent_opacity,
            has_render_surface,
            transform_id,
            clip_id,
        };

        let owner_id = self.scene.layer_id(layer);
        let id = tree.insert(data, parent_id, owner_id);
        self.tracer
            .node_created(TreeKind::Effect, id, owner_id, parent_id);
        self.scene.set_effect_tree_index(layer, id);
        data_for_children.effect_tree_parent = id;
        has_render_surface
    }
}
