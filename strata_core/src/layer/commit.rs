// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Committing authored changes to a set of property trees.
//!
//! A commit drains every dirty channel in one pass:
//!
//! 1. **TRANSFORM** / **OPACITY**: drained with `affected()`, so each list
//!    holds the marked layers plus every descendant that inherits from them.
//! 2. **CLIP** / **SURFACE**: drained as marked; only the layers whose own
//!    bounds, clip flags, or surface state changed.
//! 3. **TOPOLOGY**: any entry means the tree shape changed.
//!
//! Property trees are rebuilt wholesale, so the lists are informational; the
//! commit's only effect on the trees is to request that rebuild when anything
//! changed. [`TreeChanges`] uses raw slot indices (`u32`), matching the
//! owner ids recorded on property-tree nodes.

use alloc::vec::Vec;

use super::store::LayerStore;
use crate::dirty;
use crate::property_tree::PropertyTrees;

/// The set of changes produced by a single [`LayerStore::commit`] call.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Layers whose screen-space transform may have moved.
    pub transforms: Vec<u32>,
    /// Layers whose accumulated opacity may have changed.
    pub opacities: Vec<u32>,
    /// Layers whose bounds or clip flags changed.
    pub clips: Vec<u32>,
    /// Layers whose render-surface state changed.
    pub surfaces: Vec<u32>,
    /// Layers created since the last commit.
    pub added: Vec<u32>,
    /// Layers destroyed since the last commit.
    pub removed: Vec<u32>,
    /// Whether the tree topology or a scroll-parent / replica relation changed.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.opacities.clear();
        self.clips.clear();
        self.surfaces.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.opacities.is_empty()
            && self.clips.is_empty()
            && self.surfaces.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl LayerStore {
    /// Drains recorded changes and requests a rebuild of `trees` if there
    /// were any.
    pub fn commit(&mut self, trees: &mut PropertyTrees) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.commit_into(trees, &mut changes);
        changes
    }

    /// Like [`commit`](Self::commit), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn commit_into(&mut self, trees: &mut PropertyTrees, changes: &mut TreeChanges) {
        changes.clear();

        changes.transforms = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        changes.opacities = self
            .dirty
            .drain(dirty::OPACITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        changes.clips = self
            .dirty
            .drain(dirty::CLIP)
            .deterministic()
            .run()
            .collect();
        changes.surfaces = self
            .dirty
            .drain(dirty::SURFACE)
            .deterministic()
            .run()
            .collect();
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);

        if !changes.is_empty() {
            trees.set_needs_rebuild();
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::layer::{BlendMode, LayerFlags};

    fn committed(store: &mut LayerStore) -> PropertyTrees {
        let mut trees = PropertyTrees::new();
        let _ = store.commit(&mut trees);
        trees.needs_rebuild = false;
        trees
    }

    #[test]
    fn creation_is_reported() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let mut trees = PropertyTrees::new();
        trees.needs_rebuild = false;

        let changes = store.commit(&mut trees);
        assert_eq!(changes.added, [id.idx]);
        assert!(changes.topology_changed);
        assert!(trees.needs_rebuild());
    }

    #[test]
    fn quiet_commit_leaves_trees_alone() {
        let mut store = LayerStore::new();
        let _ = store.create_layer();
        let mut trees = committed(&mut store);

        let changes = store.commit(&mut trees);
        assert!(changes.is_empty());
        assert!(!trees.needs_rebuild());
    }

    #[test]
    fn transform_change_reaches_descendants() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let child = store.create_layer();
        let grandchild = store.create_layer();
        store.add_child(root, child);
        store.add_child(child, grandchild);
        let mut trees = committed(&mut store);

        store.set_position(child, Point::new(5.0, 5.0));
        let changes = store.commit(&mut trees);
        assert!(changes.transforms.contains(&child.idx));
        assert!(changes.transforms.contains(&grandchild.idx));
        assert!(!changes.transforms.contains(&root.idx));
        assert!(trees.needs_rebuild());
    }

    #[test]
    fn opacity_change_is_reported() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let mut trees = committed(&mut store);

        store.set_opacity(id, 0.5);
        let changes = store.commit(&mut trees);
        assert!(changes.opacities.contains(&id.idx));
    }

    #[test]
    fn bounds_change_is_local() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let child = store.create_layer();
        store.add_child(root, child);
        let mut trees = committed(&mut store);

        store.set_bounds(root, Size::new(10.0, 10.0));
        let changes = store.commit(&mut trees);
        assert_eq!(changes.clips, [root.idx]);
        assert!(changes.transforms.is_empty());
    }

    #[test]
    fn flags_mark_only_what_changed() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let mut trees = committed(&mut store);

        store.set_flags(
            id,
            LayerFlags {
                has_render_surface: true,
                ..LayerFlags::default()
            },
        );
        let changes = store.commit(&mut trees);
        assert_eq!(changes.surfaces, [id.idx]);
        assert!(changes.clips.is_empty());
        assert!(changes.transforms.is_empty());
    }

    #[test]
    fn blend_mode_counts_as_surface_change() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let mut trees = committed(&mut store);

        store.set_blend_mode(id, BlendMode::Overlay);
        let changes = store.commit(&mut trees);
        assert_eq!(changes.surfaces, [id.idx]);
    }

    #[test]
    fn scroll_parent_change_is_topology() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        store.add_child(root, a);
        store.add_child(root, b);
        let mut trees = committed(&mut store);

        store.set_scroll_parent(b, Some(a));
        let changes = store.commit(&mut trees);
        assert!(changes.topology_changed);
        assert!(changes.transforms.contains(&b.idx));
    }

    #[test]
    fn destroy_is_reported() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let mut trees = committed(&mut store);

        store.destroy_layer(id);
        let changes = store.commit(&mut trees);
        assert_eq!(changes.removed, [id.idx]);
        assert!(trees.needs_rebuild());
    }
}
