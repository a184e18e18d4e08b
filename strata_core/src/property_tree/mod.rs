// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, id-indexed property trees derived from the layer tree.
//!
//! A renderer resolves any layer's effective transform, clip and opacity by
//! walking a short ancestor chain in one of three trees instead of the whole
//! layer tree:
//!
//! - [`TransformTree`]: positioning, scrolling, and render-target spaces.
//! - [`ClipTree`]: rectangular clips and how they combine at surfaces.
//! - [`EffectTree`]: opacity and render-surface boundaries.
//!
//! All three are owned by [`PropertyTrees`], which also carries the
//! rebuild flag and the sequence number that stamps every build.

mod clip_tree;
mod effect_tree;
mod transform_tree;
mod tree;

pub use clip_tree::{ClipData, ClipNode, ClipTree};
pub use effect_tree::{EffectData, EffectNode, EffectTree};
pub use transform_tree::{
    BoundsDeltaSensitivity, TransformData, TransformNode, TransformTree, Viewport,
};
pub use tree::{INVALID_NODE, Node, NodeId, PropertyTree, ROOT_NODE};

/// The three property trees plus rebuild bookkeeping.
///
/// A fresh instance needs a rebuild. Building clears the flag and bumps
/// [`sequence_number`](Self::sequence_number); further builds are no-ops
/// until [`set_needs_rebuild`](Self::set_needs_rebuild) is called again.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTrees {
    /// The transform tree.
    pub transform_tree: TransformTree,
    /// The clip tree.
    pub clip_tree: ClipTree,
    /// The effect tree.
    pub effect_tree: EffectTree,
    pub(crate) sequence_number: u64,
    pub(crate) needs_rebuild: bool,
}

impl Default for PropertyTrees {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTrees {
    /// Creates empty trees that need a rebuild.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transform_tree: TransformTree::new(),
            clip_tree: ClipTree::new(),
            effect_tree: EffectTree::new(),
            sequence_number: 0,
            needs_rebuild: true,
        }
    }

    /// Number of completed rebuilds.
    ///
    /// Layers visited by a build are stamped with this value, so a layer
    /// whose stamp differs holds indices from an older build.
    #[must_use]
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Whether the next build call will rebuild.
    #[must_use]
    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// Requests a full rebuild on the next build call.
    pub fn set_needs_rebuild(&mut self) {
        self.needs_rebuild = true;
    }

    pub(crate) fn clear(&mut self) {
        self.transform_tree.clear();
        self.clip_tree.clear();
        self.effect_tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trees_need_rebuild() {
        let trees = PropertyTrees::new();
        assert!(trees.needs_rebuild());
        assert_eq!(trees.sequence_number(), 0);
        assert!(trees.transform_tree.is_empty());
        assert!(trees.clip_tree.is_empty());
        assert!(trees.effect_tree.is_empty());
    }
}
