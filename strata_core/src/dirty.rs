// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`LayerStore`](crate::layer::LayerStore) records every authored change in
//! one of these channels (via [`understory_dirty`]). Property trees are always
//! rebuilt from scratch, so the channels do not drive incremental updates;
//! they decide *whether* a rebuild is needed and report *what* changed.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`TRANSFORM`] and [`OPACITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) over child-to-parent
//!   dependency edges. Marking a layer marks its whole subtree, because
//!   every descendant's screen-space transform or opacity moves with it.
//!
//! - **Local-only**: [`CLIP`] and [`SURFACE`] are marked with the default
//!   policy. Only the explicitly marked layer appears in the drain output.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on tree mutations, scroll-parent
//!   and replica changes, and layer creation or destruction.
//!
//! # Consumption
//!
//! [`LayerStore::commit`](crate::layer::LayerStore::commit) drains every
//! channel into [`TreeChanges`](crate::layer::TreeChanges) and requests a
//! rebuild of the property trees when anything was recorded.

use understory_dirty::Channel;

/// Position, transform, scroll, or fixed-position state changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// Opacity or blend mode changed.
pub const OPACITY: Channel = Channel::new(1);

/// Bounds or clipping flags changed.
pub const CLIP: Channel = Channel::new(2);

/// Render-surface flag changed.
pub const SURFACE: Channel = Channel::new(3);

/// Tree topology or a scroll-parent / replica relation changed.
pub const TOPOLOGY: Channel = Channel::new(4);
