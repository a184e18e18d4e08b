// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for property-tree builds.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! builder calls as it runs. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`NodeCreated`] events, one per
//!   node appended to any tree, plus the corresponding `TraceSink` method.

use crate::property_tree::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which property tree an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// The transform tree.
    Transform,
    /// The clip tree.
    Clip,
    /// The effect tree.
    Effect,
}

impl TreeKind {
    /// Short lowercase name, suitable for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Clip => "clip",
            Self::Effect => "effect",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a rebuild starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildBeginEvent {
    /// Sequence number this build stamps onto visited layers.
    pub sequence_number: u64,
    /// Numeric id of the root layer.
    pub root_layer_id: u32,
}

/// Emitted when a rebuild finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildEndEvent {
    /// Sequence number of the finished build.
    pub sequence_number: u64,
    /// Nodes in the transform tree.
    pub transform_nodes: usize,
    /// Nodes in the clip tree.
    pub clip_nodes: usize,
    /// Nodes in the effect tree.
    pub effect_nodes: usize,
    /// Layers visited, replicas included.
    pub layers_visited: usize,
}

/// Emitted when a build is requested while the trees are up to date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildSkippedEvent {
    /// Sequence number of the build that is still current.
    pub sequence_number: u64,
}

/// A node appended to one of the property trees.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeCreated {
    /// Tree the node was appended to.
    pub tree: TreeKind,
    /// Id of the new node.
    pub node_id: NodeId,
    /// Numeric id of the layer that caused it.
    pub owner_id: u32,
    /// Parent node id, or [`INVALID_NODE`](crate::property_tree::INVALID_NODE)
    /// for a root.
    pub parent_id: NodeId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the property-tree builder.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a rebuild starts.
    fn on_build_begin(&mut self, e: &BuildBeginEvent) {
        _ = e;
    }

    /// Called when a rebuild finishes.
    fn on_build_end(&mut self, e: &BuildEndEvent) {
        _ = e;
    }

    /// Called when a build is skipped because nothing changed.
    fn on_build_skipped(&mut self, e: &BuildSkippedEvent) {
        _ = e;
    }

    /// Called for every node appended to a tree (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_created(&mut self, e: &NodeCreated) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`BuildBeginEvent`].
    #[inline]
    pub fn build_begin(&mut self, e: &BuildBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_build_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BuildEndEvent`].
    #[inline]
    pub fn build_end(&mut self, e: &BuildEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_build_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BuildSkippedEvent`].
    #[inline]
    pub fn build_skipped(&mut self, e: &BuildSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_build_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a node-creation record.
    ///
    /// Without the `trace-rich` feature this is a no-op, so callers need no
    /// feature gate of their own.
    #[inline]
    pub fn node_created(&mut self, tree: TreeKind, node_id: NodeId, owner_id: u32, parent_id: NodeId) {
        #[cfg(feature = "trace-rich")]
        if let Some(s) = &mut self.sink {
            s.on_node_created(&NodeCreated {
                tree,
                node_id,
                owner_id,
                parent_id,
            });
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (tree, node_id, owner_id, parent_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
