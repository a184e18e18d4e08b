// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::animation::{Animation, TargetProperty};
use crate::dirty;
use crate::property_tree::{INVALID_NODE, NodeId};
use crate::transform::{Point3, Transform3d};

use super::id::{INVALID, LayerId};
use super::properties::{BlendMode, LayerFlags, PositionConstraint};

/// Per-layer results of the most recent property-tree build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerOutputs {
    /// Sequence number of the build that last visited the layer.
    pub property_tree_sequence_number: u64,
    /// Transform node positioning the layer.
    pub transform_tree_index: NodeId,
    /// Clip node clipping the layer.
    pub clip_tree_index: NodeId,
    /// Effect node applying to the layer.
    pub effect_tree_index: NodeId,
    /// Offset from the layer to its transform node's space.
    pub offset_to_transform_parent: Vec2,
    /// The layer flattens its inherited transform itself.
    pub should_flatten_transform_from_property_tree: bool,
    /// Blend mode used to draw the layer into its target.
    pub draw_blend_mode: BlendMode,
}

impl LayerOutputs {
    /// Outputs of a layer no build has visited.
    pub const UNBUILT: Self = Self {
        property_tree_sequence_number: 0,
        transform_tree_index: INVALID_NODE,
        clip_tree_index: INVALID_NODE,
        effect_tree_index: INVALID_NODE,
        offset_to_transform_parent: Vec2::ZERO,
        should_flatten_transform_from_property_tree: false,
        draw_blend_mode: BlendMode::Normal,
    };
}

impl Default for LayerOutputs {
    fn default() -> Self {
        Self::UNBUILT
    }
}

/// Struct-of-arrays storage for all layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Besides the structural tree, a layer may name a *scroll parent* (a layer
/// other than its parent whose scrolling positions it) and a *replica* (a
/// parentless layer drawn as a copy of its subtree). The store keeps both
/// sides of these relations consistent.
#[derive(Debug)]
pub struct LayerStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Non-structural relations --
    pub(crate) scroll_parent: Vec<u32>,
    pub(crate) scroll_children: Vec<Vec<u32>>,
    pub(crate) replica: Vec<u32>,
    pub(crate) replica_owner: Vec<u32>,

    // -- Authored properties --
    pub(crate) position: Vec<Point>,
    pub(crate) bounds: Vec<Size>,
    pub(crate) local_transform: Vec<Transform3d>,
    pub(crate) transform_origin: Vec<Point3>,
    pub(crate) local_opacity: Vec<f32>,
    pub(crate) blend_mode: Vec<BlendMode>,
    pub(crate) scroll_offset: Vec<Vec2>,
    pub(crate) scroll_compensation: Vec<Vec2>,
    pub(crate) position_constraint: Vec<PositionConstraint>,
    pub(crate) flags: Vec<LayerFlags>,
    pub(crate) unclipped_descendants: Vec<u32>,
    pub(crate) animations: Vec<Vec<Animation>>,

    // -- Written back by property-tree builds --
    pub(crate) outputs: Vec<LayerOutputs>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            scroll_parent: Vec::new(),
            scroll_children: Vec::new(),
            replica: Vec::new(),
            replica_owner: Vec::new(),
            position: Vec::new(),
            bounds: Vec::new(),
            local_transform: Vec::new(),
            transform_origin: Vec::new(),
            local_opacity: Vec::new(),
            blend_mode: Vec::new(),
            scroll_offset: Vec::new(),
            scroll_compensation: Vec::new(),
            position_constraint: Vec::new(),
            flags: Vec::new(),
            unclipped_descendants: Vec::new(),
            animations: Vec::new(),
            outputs: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts at the origin with empty bounds, an identity
    /// transform, full opacity, default flags, no animations, and no parent.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.reset_slot(idx);
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.push_slot();
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        self.handle(idx)
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// Scroll-parent and replica relations that involve the layer are
    /// dissolved on both sides.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );

        let p = self.parent[idx as usize];
        if p != INVALID {
            self.unlink_from_parent(idx);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        let sp = self.scroll_parent[idx as usize];
        if sp != INVALID {
            self.scroll_children[sp as usize].retain(|&c| c != idx);
            self.dirty.mark(sp, dirty::TOPOLOGY);
        }
        for c in core::mem::take(&mut self.scroll_children[idx as usize]) {
            self.scroll_parent[c as usize] = INVALID;
            self.dirty.mark(c, dirty::TOPOLOGY);
        }
        let replica = self.replica[idx as usize];
        if replica != INVALID {
            self.replica_owner[replica as usize] = INVALID;
            self.dirty.mark(replica, dirty::TOPOLOGY);
        }
        let owner = self.replica_owner[idx as usize];
        if owner != INVALID {
            self.replica[owner as usize] = INVALID;
            self.dirty.mark(owner, dirty::TOPOLOGY);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child` is another layer's replica.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            self.replica_owner[c as usize] == INVALID,
            "replica layer cannot have a parent"
        );
        self.link_last(parent.idx, c);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            self.replica_owner[c as usize] == INVALID,
            "replica layer cannot have a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.attach_dirty(c, p);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "layer has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.detach_dirty(c, p);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` is a replica.
    pub fn reparent(&mut self, child: LayerId, new_parent: LayerId) {
        self.validate(child);
        self.validate(new_parent);
        let c = child.idx;
        assert!(
            self.replica_owner[c as usize] == INVALID,
            "replica layer cannot have a parent"
        );

        let old_p = self.parent[c as usize];
        if old_p != INVALID {
            self.unlink_from_parent(c);
            self.detach_dirty(c, old_p);
        }
        self.link_last(new_parent.idx, c);
    }

    /// Returns the live layers that have neither a parent nor a replica owner.
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        (0..self.len)
            .filter(|&idx| {
                self.parent[idx as usize] == INVALID
                    && self.replica_owner[idx as usize] == INVALID
                    && !self.free_list.contains(&idx)
            })
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// Sets or clears the layer whose scrolling positions `child`.
    ///
    /// The scroll parent's list of scroll children is updated to match.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale or `child` would be its own scroll parent.
    pub fn set_scroll_parent(&mut self, child: LayerId, scroll_parent: Option<LayerId>) {
        self.validate(child);
        let c = child.idx;
        let new = match scroll_parent {
            Some(sp) => {
                self.validate(sp);
                assert!(sp.idx != c, "layer cannot be its own scroll parent");
                sp.idx
            }
            None => INVALID,
        };
        let old = self.scroll_parent[c as usize];
        if old == new {
            return;
        }

        if old != INVALID {
            self.scroll_children[old as usize].retain(|&x| x != c);
            self.dirty.mark(old, dirty::TOPOLOGY);
        }
        self.scroll_parent[c as usize] = new;
        if new != INVALID {
            self.scroll_children[new as usize].push(c);
            self.dirty.mark(new, dirty::TOPOLOGY);
        }
        self.dirty.mark(c, dirty::TOPOLOGY);
        self.mark_subtree_inherited_dirty(c);
    }

    /// Sets or clears the replica drawn for `owner`'s subtree.
    ///
    /// A replica has no structural parent; during a build it is visited as
    /// though it were `owner`'s last child.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale, if `replica` has a parent, or if it is
    /// already the replica of a different layer.
    pub fn set_replica(&mut self, owner: LayerId, replica: Option<LayerId>) {
        self.validate(owner);
        let o = owner.idx;
        let new = match replica {
            Some(r) => {
                self.validate(r);
                assert!(r.idx != o, "layer cannot be its own replica");
                assert!(
                    self.parent[r.idx as usize] == INVALID,
                    "replica layer cannot have a parent"
                );
                let current = self.replica_owner[r.idx as usize];
                assert!(
                    current == INVALID || current == o,
                    "layer is already the replica of another layer"
                );
                r.idx
            }
            None => INVALID,
        };
        let old = self.replica[o as usize];
        if old == new {
            return;
        }

        if old != INVALID {
            self.replica_owner[old as usize] = INVALID;
            self.detach_dirty(old, o);
        }
        self.replica[o as usize] = new;
        if new != INVALID {
            self.replica_owner[new as usize] = o;
            self.attach_dirty(new, o);
        }
    }

    /// Returns the layer `replica` is a replica of, if any.
    #[must_use]
    pub fn replica_owner(&self, replica: LayerId) -> Option<LayerId> {
        self.validate(replica);
        self.get(self.replica_owner[replica.idx as usize])
    }

    // -- Property getters without a `SceneGraph` counterpart --

    /// Returns the flags of a layer.
    #[must_use]
    pub fn flags(&self, id: LayerId) -> LayerFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the animations attached to a layer.
    #[must_use]
    pub fn animations(&self, id: LayerId) -> &[Animation] {
        self.validate(id);
        &self.animations[id.idx as usize]
    }

    /// Returns what the last property-tree build wrote back for a layer.
    #[must_use]
    pub fn outputs(&self, id: LayerId) -> LayerOutputs {
        self.validate(id);
        self.outputs[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the position of a layer within its parent.
    pub fn set_position(&mut self, id: LayerId, position: Point) {
        self.validate(id);
        self.position[id.idx as usize] = position;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the size of a layer's content rectangle.
    pub fn set_bounds(&mut self, id: LayerId, bounds: Size) {
        self.validate(id);
        self.bounds[id.idx as usize] = bounds;
        self.dirty.mark(id.idx, dirty::CLIP);
    }

    /// Sets the local transform of a layer.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform3d) {
        self.validate(id);
        self.local_transform[id.idx as usize] = transform;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the point the local transform is applied about.
    pub fn set_transform_origin(&mut self, id: LayerId, origin: Point3) {
        self.validate(id);
        self.transform_origin[id.idx as usize] = origin;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the local opacity of a layer.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        self.validate(id);
        self.local_opacity[id.idx as usize] = opacity;
        self.dirty.mark_with(id.idx, dirty::OPACITY, &EagerPolicy);
    }

    /// Sets the blend mode of a layer.
    ///
    /// Whether the mode applies per layer or to a whole surface depends on
    /// the layer's surface state, so this records a surface change.
    pub fn set_blend_mode(&mut self, id: LayerId, mode: BlendMode) {
        self.validate(id);
        self.blend_mode[id.idx as usize] = mode;
        self.dirty.mark(id.idx, dirty::SURFACE);
    }

    /// Sets the scroll offset of a layer.
    pub fn set_scroll_offset(&mut self, id: LayerId, offset: Vec2) {
        self.validate(id);
        self.scroll_offset[id.idx as usize] = offset;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the offset fixed-position descendants absorb while this layer
    /// scrolls.
    pub fn set_scroll_compensation_adjustment(&mut self, id: LayerId, adjustment: Vec2) {
        self.validate(id);
        self.scroll_compensation[id.idx as usize] = adjustment;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the fixed-position constraint of a layer.
    pub fn set_position_constraint(&mut self, id: LayerId, constraint: PositionConstraint) {
        self.validate(id);
        self.position_constraint[id.idx as usize] = constraint;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the flags of a layer.
    ///
    /// Only the channels whose flags actually changed are marked.
    pub fn set_flags(&mut self, id: LayerId, flags: LayerFlags) {
        self.validate(id);
        let idx = id.idx;
        let old = core::mem::replace(&mut self.flags[idx as usize], flags);

        if old.masks_to_bounds != flags.masks_to_bounds {
            self.dirty.mark(idx, dirty::CLIP);
        }
        if old.has_render_surface != flags.has_render_surface
            || old.has_mask_layer != flags.has_mask_layer
        {
            self.dirty.mark(idx, dirty::SURFACE);
        }
        if old.is_container_for_fixed_position_layers
            != flags.is_container_for_fixed_position_layers
            || old.scrollable != flags.scrollable
            || old.should_flatten_transform != flags.should_flatten_transform
        {
            self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        }
    }

    /// Sets how many descendants escape this layer's clip.
    pub fn set_num_unclipped_descendants(&mut self, id: LayerId, count: u32) {
        self.validate(id);
        self.unclipped_descendants[id.idx as usize] = count;
        self.dirty.mark(id.idx, dirty::CLIP);
    }

    /// Attaches an animation to a layer.
    pub fn add_animation(&mut self, id: LayerId, animation: Animation) {
        self.validate(id);
        self.animations[id.idx as usize].push(animation);
        self.mark_animated(id.idx, animation.property);
    }

    /// Removes every animation from a layer.
    pub fn clear_animations(&mut self, id: LayerId) {
        self.validate(id);
        let removed = core::mem::take(&mut self.animations[id.idx as usize]);
        if removed.iter().any(|a| a.property == TargetProperty::Transform) {
            self.mark_animated(id.idx, TargetProperty::Transform);
        }
        if removed.iter().any(|a| a.property == TargetProperty::Opacity) {
            self.mark_animated(id.idx, TargetProperty::Opacity);
        }
    }

    // -- Internal helpers --

    /// Returns the current handle for slot `idx`.
    pub(crate) fn handle(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns the handle for `idx`, or `None` for [`INVALID`].
    pub(crate) fn get(&self, idx: u32) -> Option<LayerId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn push_slot(&mut self) {
        self.parent.push(INVALID);
        self.first_child.push(INVALID);
        self.next_sibling.push(INVALID);
        self.prev_sibling.push(INVALID);
        self.scroll_parent.push(INVALID);
        self.scroll_children.push(Vec::new());
        self.replica.push(INVALID);
        self.replica_owner.push(INVALID);
        self.position.push(Point::ZERO);
        self.bounds.push(Size::ZERO);
        self.local_transform.push(Transform3d::IDENTITY);
        self.transform_origin.push(Point3::ZERO);
        self.local_opacity.push(1.0);
        self.blend_mode.push(BlendMode::Normal);
        self.scroll_offset.push(Vec2::ZERO);
        self.scroll_compensation.push(Vec2::ZERO);
        self.position_constraint.push(PositionConstraint::default());
        self.flags.push(LayerFlags::default());
        self.unclipped_descendants.push(0);
        self.animations.push(Vec::new());
        self.outputs.push(LayerOutputs::UNBUILT);
        self.generation.push(0);
    }

    fn reset_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.scroll_parent[i] = INVALID;
        self.scroll_children[i].clear();
        self.replica[i] = INVALID;
        self.replica_owner[i] = INVALID;
        self.position[i] = Point::ZERO;
        self.bounds[i] = Size::ZERO;
        self.local_transform[i] = Transform3d::IDENTITY;
        self.transform_origin[i] = Point3::ZERO;
        self.local_opacity[i] = 1.0;
        self.blend_mode[i] = BlendMode::Normal;
        self.scroll_offset[i] = Vec2::ZERO;
        self.scroll_compensation[i] = Vec2::ZERO;
        self.position_constraint[i] = PositionConstraint::default();
        self.flags[i] = LayerFlags::default();
        self.unclipped_descendants[i] = 0;
        self.animations[i].clear();
        self.outputs[i] = LayerOutputs::UNBUILT;
    }

    /// Appends `c` to the end of `p`'s child list.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.attach_dirty(c, p);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Adds dependency edges from `c` to `p` and marks the change.
    fn attach_dirty(&mut self, c: u32, p: u32) {
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(c, p, dirty::OPACITY);
        self.mark_subtree_inherited_dirty(c);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes dependency edges from `c` to `p` and marks the change.
    fn detach_dirty(&mut self, c: u32, p: u32) {
        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(c, p, dirty::OPACITY);
        self.mark_subtree_inherited_dirty(c);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::OPACITY, &EagerPolicy);
    }

    fn mark_animated(&mut self, idx: u32, property: TargetProperty) {
        let channel = match property {
            TargetProperty::Transform => dirty::TRANSFORM,
            TargetProperty::Opacity => dirty::OPACITY,
        };
        self.dirty.mark_with(idx, channel, &EagerPolicy);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::animation::RunState;
    use crate::scene::SceneGraph;

    #[test]
    fn create_and_destroy() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        assert!(store.is_alive(id));
        assert_eq!(store.layer_count(), 1);
        store.destroy_layer(id);
        assert!(!store.is_alive(id));
        assert_eq!(store.layer_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = LayerStore::new();
        let id1 = store.create_layer();
        store.destroy_layer(id1);
        let id2 = store.create_layer();
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn reused_slot_starts_fresh() {
        let mut store = LayerStore::new();
        let id1 = store.create_layer();
        store.set_opacity(id1, 0.25);
        store.set_bounds(id1, Size::new(10.0, 10.0));
        store.add_animation(id1, Animation::opacity(RunState::Running));
        store.destroy_layer(id1);

        let id2 = store.create_layer();
        assert_eq!(store.opacity(id2), 1.0);
        assert_eq!(store.bounds(id2), Size::ZERO);
        assert!(store.animations(id2).is_empty());
        assert_eq!(store.outputs(id2), LayerOutputs::UNBUILT);
    }

    #[test]
    fn add_child_and_query() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child1 = store.create_layer();
        let child2 = store.create_layer();

        store.add_child(parent, child1);
        store.add_child(parent, child2);

        assert_eq!(store.parent(child1), Some(parent));
        assert_eq!(store.parent(child2), Some(parent));

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();

        store.add_child(parent, child);
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn insert_before_works() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        let c = store.create_layer();

        store.add_child(parent, a);
        store.add_child(parent, c);
        store.insert_before(b, c);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
    }

    #[test]
    fn reparent_works() {
        let mut store = LayerStore::new();
        let p1 = store.create_layer();
        let p2 = store.create_layer();
        let child = store.create_layer();

        store.add_child(p1, child);
        store.reparent(child, p2);
        assert_eq!(store.parent(child), Some(p2));
        assert!(store.children(p1).next().is_none());
    }

    #[test]
    fn roots_skip_children_and_replicas() {
        let mut store = LayerStore::new();
        let a = store.create_layer();
        let b = store.create_layer();
        let c = store.create_layer();
        let r = store.create_layer();

        store.add_child(a, c);
        store.set_replica(a, Some(r));

        let roots = store.roots();
        assert_eq!(roots, vec![a, b]);
    }

    #[test]
    fn scroll_parent_keeps_both_sides() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let scroller = store.create_layer();
        let other = store.create_layer();
        let child = store.create_layer();
        store.add_child(root, scroller);
        store.add_child(root, other);
        store.add_child(other, child);

        store.set_scroll_parent(child, Some(scroller));
        assert_eq!(store.scroll_parent(child), Some(scroller));
        assert_eq!(store.scroll_children(scroller).collect::<Vec<_>>(), vec![child]);

        store.set_scroll_parent(child, Some(other));
        assert!(store.scroll_children(scroller).next().is_none());
        assert_eq!(store.scroll_children(other).collect::<Vec<_>>(), vec![child]);

        store.set_scroll_parent(child, None);
        assert_eq!(store.scroll_parent(child), None);
        assert!(store.scroll_children(other).next().is_none());
    }

    #[test]
    fn replica_parent_is_its_owner() {
        let mut store = LayerStore::new();
        let owner = store.create_layer();
        let replica = store.create_layer();
        store.set_replica(owner, Some(replica));

        assert_eq!(store.replica(owner), Some(replica));
        assert_eq!(store.replica_owner(replica), Some(owner));
        assert_eq!(store.parent(replica), Some(owner));

        store.set_replica(owner, None);
        assert_eq!(store.replica(owner), None);
        assert_eq!(store.parent(replica), None);
    }

    #[test]
    fn destroy_dissolves_relations() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let scroller = store.create_layer();
        let child = store.create_layer();
        let replica = store.create_layer();
        store.add_child(root, scroller);
        store.add_child(root, child);
        store.set_scroll_parent(child, Some(scroller));
        store.set_replica(scroller, Some(replica));

        store.destroy_layer(replica);
        assert_eq!(store.replica(scroller), None);

        store.remove_from_parent(scroller);
        store.destroy_layer(scroller);
        assert_eq!(store.scroll_parent(child), None);
    }

    #[test]
    #[should_panic(expected = "cannot destroy layer with children")]
    fn destroy_with_children_panics() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        store.destroy_layer(parent);
    }

    #[test]
    #[should_panic(expected = "replica layer cannot have a parent")]
    fn replica_cannot_be_added_as_child() {
        let mut store = LayerStore::new();
        let owner = store.create_layer();
        let replica = store.create_layer();
        let other = store.create_layer();
        store.set_replica(owner, Some(replica));
        store.add_child(other, replica);
    }

    #[test]
    #[should_panic(expected = "layer cannot be its own scroll parent")]
    fn self_scroll_parent_panics() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.set_scroll_parent(id, Some(id));
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_get() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.destroy_layer(id);
        let _ = store.transform(id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_set_transform() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.destroy_layer(id);
        store.set_transform(id, Transform3d::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let id = store.create_layer();
        store.destroy_layer(id);
        store.add_child(root, id);
    }

    #[test]
    fn setters_store_values() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.set_position(id, Point::new(3.0, 4.0));
        store.set_transform(id, Transform3d::from_scale(2.0, 2.0, 1.0));
        store.set_scroll_offset(id, Vec2::new(0.0, 5.0));
        store.set_blend_mode(id, BlendMode::Multiply);
        store.set_position_constraint(id, PositionConstraint::FIXED.to_bottom_edge());

        assert_eq!(store.position(id), Point::new(3.0, 4.0));
        assert_eq!(store.transform(id), Transform3d::from_scale(2.0, 2.0, 1.0));
        assert_eq!(store.scroll_offset(id), Vec2::new(0.0, 5.0));
        assert_eq!(store.blend_mode(id), BlendMode::Multiply);
        assert!(store.position_constraint(id).is_fixed_to_bottom_edge);
        assert!(!store.position_constraint(id).is_fixed_to_right_edge);
    }
}
