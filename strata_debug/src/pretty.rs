// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::property_tree::{INVALID_NODE, NodeId};
use strata_core::trace::{
    BuildBeginEvent, BuildEndEvent, BuildSkippedEvent, NodeCreated, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    node_events: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("node_events", &self.node_events)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Per-node lines are on; see [`without_node_events`](Self::without_node_events).
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            node_events: true,
        }
    }

    /// Suppresses the line written for every created node.
    #[must_use]
    pub fn without_node_events(mut self) -> Self {
        self.node_events = false;
        self
    }

    /// Consumes the sink, returning its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn parent_label(parent_id: NodeId) -> String {
    if parent_id == INVALID_NODE {
        "-".to_owned()
    } else {
        parent_id.to_string()
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_build_begin(&mut self, e: &BuildBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[build:begin] seq={} root={}",
            e.sequence_number, e.root_layer_id,
        );
    }

    fn on_build_end(&mut self, e: &BuildEndEvent) {
        let _ = writeln!(
            self.writer,
            "[build:end] seq={} transform={} clip={} effect={} layers={}",
            e.sequence_number, e.transform_nodes, e.clip_nodes, e.effect_nodes, e.layers_visited,
        );
    }

    fn on_build_skipped(&mut self, e: &BuildSkippedEvent) {
        let _ = writeln!(self.writer, "[build:skipped] seq={}", e.sequence_number);
    }

    fn on_node_created(&mut self, e: &NodeCreated) {
        if !self.node_events {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[node] {} #{} owner={} parent={}",
            e.tree.name(),
            e.node_id,
            e.owner_id,
            parent_label(e.parent_id),
        );
    }
}
