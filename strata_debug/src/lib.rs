// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and snapshots for strata property-tree builds.
//!
//! - [`pretty::PrettyPrintSink`] is a [`TraceSink`](strata_core::trace::TraceSink)
//!   that writes one human-readable line per build event.
//! - [`dump`] renders finished [`PropertyTrees`](strata_core::property_tree::PropertyTrees)
//!   as JSON or as an indented text listing.

pub mod dump;
pub mod pretty;
