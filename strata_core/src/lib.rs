// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-tree construction for layer-based compositing.
//!
//! `strata_core` turns a tree of compositing layers into three flat,
//! id-indexed *property trees* (transform, clip and effect). A renderer
//! resolves any layer's screen transform, clip and opacity by walking a
//! short ancestor chain in those trees instead of the whole layer tree. It
//! is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   LayerStore mutations ──► dirty channels
//!                                 │
//!                                 ▼
//!   LayerStore::commit() ──► TreeChanges + PropertyTrees::needs_rebuild
//!                                 │
//!                                 ▼
//!   build_property_trees() ──► transform / clip / effect trees
//!                         └──► per-layer indices written back
//! ```
//!
//! **[`scene`]**: The capability traits the builder is generic over. Any
//! layer representation that implements them can be built from.
//!
//! **[`layer`]**: Struct-of-arrays layer tree with generational handles,
//! scroll-parent and replica relations, and the written-back build outputs.
//! Implements the [`scene`] traits.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel.
//!
//! **[`builder`]**: The single depth-first walk that creates effect,
//! transform and clip nodes.
//!
//! **[`property_tree`]**: The three trees and their owning
//! [`PropertyTrees`](property_tree::PropertyTrees) aggregate.
//!
//! **[`animation`]**: Animation records and the queries the builder makes.
//!
//! **[`transform`]**: 3D affine transform type for layer positioning.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! build instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use strata_core::builder::{BuildInputs, build_property_trees};
//! use strata_core::layer::LayerStore;
//! use strata_core::property_tree::PropertyTrees;
//! use strata_core::scene::PropertyTreeOutputs;
//!
//! let mut store = LayerStore::new();
//! let root = store.create_layer();
//! let child = store.create_layer();
//! store.add_child(root, child);
//! store.set_bounds(root, Size::new(800.0, 600.0));
//! store.set_position(child, Point::new(10.0, 20.0));
//! store.set_opacity(child, 0.5);
//!
//! let mut trees = PropertyTrees::new();
//! let _ = store.commit(&mut trees);
//! let inputs = BuildInputs::new(root, Rect::new(0.0, 0.0, 800.0, 600.0));
//! build_property_trees(&mut store, &inputs, &mut trees);
//!
//! assert_eq!(trees.effect_tree.len(), 2);
//! assert_eq!(store.transform_tree_index(child), 0);
//! let effect = trees.effect_tree.node(store.effect_tree_index(child));
//! assert_eq!(effect.data.screen_space_opacity, 0.5);
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   creation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod builder;
pub mod dirty;
pub mod layer;
pub mod property_tree;
pub mod scene;
pub mod trace;
pub mod transform;
