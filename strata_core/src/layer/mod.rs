// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in a compositing tree. Each layer has:
//!
//! - An identity ([`LayerId`]), a generational handle that becomes stale when
//!   the layer is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree, plus an optional scroll parent and replica.
//! - **Authored properties** set by the caller, such as
//!   [`position`](LayerStore::set_position),
//!   [`transform`](LayerStore::set_transform),
//!   [`opacity`](LayerStore::set_opacity), and
//!   [`flags`](LayerStore::set_flags).
//! - **Outputs** written back by a property-tree build
//!   ([`LayerOutputs`]).
//!
//! Layers are stored in struct-of-arrays layout with index-based handles.
//! Reads go through the [`SceneGraph`](crate::scene::SceneGraph) family of
//! traits, which [`LayerStore`] implements.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)). [`LayerStore::commit`] drains them into
//! [`TreeChanges`] and flags the property trees for rebuild.

mod access;
mod commit;
mod id;
mod properties;
mod store;
mod traverse;

pub use commit::TreeChanges;
pub use id::{INVALID, LayerId};
pub use properties::{BlendMode, LayerFlags, PositionConstraint};
pub use store::{LayerOutputs, LayerStore};
