// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-tree construction.
//!
//! [`build_property_trees`] walks the layer tree once, depth-first, and
//! appends nodes to the transform, clip and effect trees of a
//! [`PropertyTrees`]. Each visited layer runs three decisions in a fixed
//! order:
//!
//! 1. **Effect**: a node is needed for the root, for non-opaque layers,
//!    for layers with a potentially running opacity animation and for
//!    render surfaces. A surface becomes the render target of its subtree.
//! 2. **Transform**: a node is needed for the root, for scrolling,
//!    fixed-position and page-scale layers, for layers with a non-translation
//!    transform or any transform animation, and for surfaces. Other layers
//!    fold their position into an offset carried to their descendants.
//! 3. **Clip**: a node is needed for layers that mask to bounds or have a
//!    mask layer, and for surfaces that either sit under a clip or own
//!    descendants that escape one. A surface exempted from its ancestor's
//!    clip has its effect node redirected to the unclipped root.
//!
//! Layers that need no node in a tree share their parent's node there. Every
//! visited layer is stamped with the build's sequence number and gets an
//! index into each tree.
//!
//! Children are visited in order, skipping those that have a scroll parent.
//! Scroll children are visited from their scroll parent instead, after its
//! ordinary children, and a replica is visited last as though it were one
//! more child.
//!
//! Nothing is built while [`PropertyTrees::needs_rebuild`] is `false`.

mod clip;
mod context;
mod effect;
mod transform;

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::layer::BlendMode;
use crate::property_tree::{ClipData, INVALID_NODE, NodeId, PropertyTrees, ROOT_NODE};
use crate::scene::PropertyTreeLayers;
use crate::trace::{BuildBeginEvent, BuildEndEvent, BuildSkippedEvent, TraceSink, TreeKind, Tracer};
use crate::transform::Transform3d;

use context::DataForRecursion;

/// Host-supplied inputs to a build.
#[derive(Clone, Copy, Debug)]
pub struct BuildInputs<L> {
    /// Layer the walk starts from. It must not have a parent.
    pub root: L,
    /// Layer whose subtree is scaled by `page_scale_factor`.
    pub page_scale_layer: Option<L>,
    /// Scroll layer of the visual viewport.
    pub inner_viewport_scroll_layer: Option<L>,
    /// Scroll layer of the layout viewport.
    pub outer_viewport_scroll_layer: Option<L>,
    /// User zoom applied at the page-scale layer.
    pub page_scale_factor: f32,
    /// Physical pixels per layout pixel.
    pub device_scale_factor: f32,
    /// Clip of the root clip node.
    pub viewport: Rect,
    /// Transform applied above the root, before device scale.
    pub device_transform: Transform3d,
}

impl<L> BuildInputs<L> {
    /// Inputs with unit scales, no special layers, and an identity device
    /// transform.
    #[must_use]
    pub fn new(root: L, viewport: Rect) -> Self {
        Self {
            root,
            page_scale_layer: None,
            inner_viewport_scroll_layer: None,
            outer_viewport_scroll_layer: None,
            page_scale_factor: 1.0,
            device_scale_factor: 1.0,
            viewport,
            device_transform: Transform3d::IDENTITY,
        }
    }
}

/// Rebuilds `trees` from the layer tree under `inputs.root`.
///
/// Does nothing unless [`PropertyTrees::needs_rebuild`] is set. On a rebuild
/// the sequence number is incremented, all three trees are cleared and
/// rebuilt, and every visited layer's outputs are rewritten.
///
/// # Panics
///
/// Panics if the root has a parent, if a layer is reached twice (for example
/// through a scroll-parent cycle), or if a scroll child is reached from a
/// layer other than its scroll parent.
pub fn build_property_trees<S: PropertyTreeLayers>(
    scene: &mut S,
    inputs: &BuildInputs<S::Layer>,
    trees: &mut PropertyTrees,
) {
    build_property_trees_traced(scene, inputs, trees, &mut Tracer::none());
}

/// Like [`build_property_trees`], reporting progress to `tracer`.
pub fn build_property_trees_traced<S: PropertyTreeLayers>(
    scene: &mut S,
    inputs: &BuildInputs<S::Layer>,
    trees: &mut PropertyTrees,
    tracer: &mut Tracer<'_>,
) {
    if !trees.needs_rebuild {
        tracer.build_skipped(&BuildSkippedEvent {
            sequence_number: trees.sequence_number,
        });
        return;
    }
    assert!(
        scene.parent(inputs.root).is_none(),
        "root layer {:?} has a parent",
        inputs.root
    );

    trees.sequence_number += 1;
    trees.clear();
    let sequence_number = trees.sequence_number;
    let root_id = scene.layer_id(inputs.root);
    tracer.build_begin(&BuildBeginEvent {
        sequence_number,
        root_layer_id: root_id,
    });

    let viewport_clip = ClipData {
        clip: inputs.viewport,
        transform_id: ROOT_NODE,
        target_id: ROOT_NODE,
        layers_are_clipped: true,
        ..ClipData::default()
    };
    let clip_root = trees.clip_tree.insert(viewport_clip, INVALID_NODE, root_id);
    tracer.node_created(TreeKind::Clip, clip_root, root_id, INVALID_NODE);

    let data = root_context(inputs, clip_root, sequence_number);
    let mut builder = Builder::new(&mut *scene, &mut *trees, &mut *tracer);
    builder.visit(inputs.root, &data);
    let layers_visited = builder.layers_visited;

    trees.needs_rebuild = false;
    trees.transform_tree.set_needs_update(false);
    // Combined clip rects are left for a later pass.
    trees.clip_tree.set_needs_update(true);
    trees.effect_tree.set_needs_update(false);

    tracer.build_end(&BuildEndEvent {
        sequence_number,
        transform_nodes: trees.transform_tree.len(),
        clip_nodes: trees.clip_tree.len(),
        effect_nodes: trees.effect_tree.len(),
        layers_visited,
    });
}

/// Context the root is visited with.
fn root_context<L: Copy>(
    inputs: &BuildInputs<L>,
    clip_root: NodeId,
    sequence_number: u64,
) -> DataForRecursion<L> {
    DataForRecursion {
        transform_tree_parent: None,
        transform_fixed_parent: None,
        render_target: ROOT_NODE,
        clip_tree_parent: clip_root,
        effect_tree_parent: INVALID_NODE,
        page_scale_layer: inputs.page_scale_layer,
        inner_viewport_scroll_layer: inputs.inner_viewport_scroll_layer,
        outer_viewport_scroll_layer: inputs.outer_viewport_scroll_layer,
        page_scale_factor: inputs.page_scale_factor,
        device_scale_factor: inputs.device_scale_factor,
        device_transform: inputs.device_transform,
        scroll_compensation_adjustment: Vec2::ZERO,
        in_subtree_of_page_scale_layer: false,
        should_flatten: false,
        affected_by_inner_viewport_bounds_delta: false,
        affected_by_outer_viewport_bounds_delta: false,
        sequence_number,
    }
}

/// Mutable state of one build.
pub(crate) struct Builder<'a, 't, S: PropertyTreeLayers> {
    pub(crate) scene: &'a mut S,
    pub(crate) trees: &'a mut PropertyTrees,
    pub(crate) tracer: &'a mut Tracer<'t>,
    pub(crate) layers_visited: usize,
    /// Layers reached so far in this build, indexed by layer id.
    visited: Vec<bool>,
}

impl<S: PropertyTreeLayers> core::fmt::Debug for Builder<'_, '_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builder")
            .field("sequence_number", &self.trees.sequence_number)
            .field("layers_visited", &self.layers_visited)
            .finish_non_exhaustive()
    }
}

impl<'a, 't, S: PropertyTreeLayers> Builder<'a, 't, S> {
    fn new(scene: &'a mut S, trees: &'a mut PropertyTrees, tracer: &'a mut Tracer<'t>) -> Self {
        Self {
            scene,
            trees,
            tracer,
            layers_visited: 0,
            visited: Vec::new(),
        }
    }

    fn is_visited(&self, layer: S::Layer) -> bool {
        let idx = self.scene.layer_id(layer) as usize;
        self.visited.get(idx).copied().unwrap_or(false)
    }

    /// Records `layer` as reached.
    ///
    /// # Panics
    ///
    /// Panics if it was already reached in this build.
    fn mark_visited(&mut self, layer: S::Layer, sequence_number: u64) {
        let idx = self.scene.layer_id(layer) as usize;
        if idx >= self.visited.len() {
            self.visited.resize(idx + 1, false);
        }
        assert!(
            !self.visited[idx],
            "layer {layer:?} visited twice in build {sequence_number}"
        );
        self.visited[idx] = true;
    }

    fn visit(&mut self, layer: S::Layer, data_from_parent: &DataForRecursion<S::Layer>) {
        let sequence_number = data_from_parent.sequence_number;
        self.mark_visited(layer, sequence_number);
        self.scene
            .set_property_tree_sequence_number(layer, sequence_number);
        self.layers_visited += 1;

        let mut data_for_children = *data_from_parent;

        let created_render_surface =
            self.add_effect_node_if_needed(layer, data_from_parent, &mut data_for_children);
        if created_render_surface {
            data_for_children.render_target = self.scene.effect_tree_index(layer);
            // The surface blends as a whole when it is drawn into its target.
            self.scene.set_draw_blend_mode(layer, BlendMode::Normal);
        } else {
            let mode = self.scene.blend_mode(layer);
            self.scene.set_draw_blend_mode(layer, mode);
        }

        let created_transform_node = self.add_transform_node_if_needed(
            layer,
            data_from_parent,
            &mut data_for_children,
            created_render_surface,
        );
        self.sync_effect_transform(layer, data_from_parent, created_render_surface);

        self.add_clip_node_if_needed(
            layer,
            data_from_parent,
            &mut data_for_children,
            created_render_surface,
            created_transform_node,
        );

        if data_from_parent.page_scale_layer == Some(layer) {
            data_for_children.in_subtree_of_page_scale_layer = true;
        }

        let children: Vec<S::Layer> = self.scene.children(layer).collect();
        for child in children {
            if self.scene.scroll_parent(child).is_none() {
                self.visit(child, &data_for_children);
            }
        }

        let scroll_children: Vec<S::Layer> = self.scene.scroll_children(layer).collect();
        for child in scroll_children {
            assert!(
                self.scene.scroll_parent(child) == Some(layer),
                "scroll child {child:?} reached from {layer:?}, which is not its scroll parent"
            );
            if let Some(structural_parent) = self.scene.parent(child) {
                debug_assert!(
                    self.is_visited(structural_parent),
                    "scroll child {child:?} reached before its parent {structural_parent:?}"
                );
            }
            self.visit(child, &data_for_children);
        }

        if let Some(replica) = self.scene.replica(layer) {
            self.visit(replica, &data_for_children);
        }
    }

    /// Points a freshly created effect node at the transform node of its
    /// layer.
    ///
    /// A surface's effect node was given the next transform id before the
    /// transform decision ran; that decision always creates a node for a
    /// surface, so the id must match.
    fn sync_effect_transform(
        &mut self,
        layer: S::Layer,
        data_from_parent: &DataForRecursion<S::Layer>,
        created_render_surface: bool,
    ) {
        let effect_id = self.scene.effect_tree_index(layer);
        let is_root = data_from_parent.effect_tree_parent == INVALID_NODE;
        if is_root || effect_id == data_from_parent.effect_tree_parent {
            return;
        }
        let transform_id = self.scene.transform_tree_index(layer);
        let node = self.trees.effect_tree.node_mut(effect_id);
        debug_assert!(
            !created_render_surface || node.data.transform_id == transform_id,
            "surface effect node {effect_id} expected transform node {}, got {transform_id}",
            node.data.transform_id
        );
        node.data.transform_id = transform_id;
    }
}

/// Builds with a sink directly, for callers that own one.
pub fn build_property_trees_with_sink<S: PropertyTreeLayers>(
    scene: &mut S,
    inputs: &BuildInputs<S::Layer>,
    trees: &mut PropertyTrees,
    sink: &mut dyn TraceSink,
) {
    build_property_trees_traced(scene, inputs, trees, &mut Tracer::new(sink));
}
