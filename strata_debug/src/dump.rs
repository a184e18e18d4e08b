// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshots of built property trees.
//!
//! [`to_json`] and [`write_json`] produce a JSON document with one array per
//! tree, node ids in order. [`write_text`] prints the same trees as an
//! indented listing, one line per node, nested under its parent.
//!
//! Matrices are written column-major, as four arrays of four numbers.

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::property_tree::{
    BoundsDeltaSensitivity, ClipNode, EffectNode, INVALID_NODE, Node, NodeId, PropertyTrees,
    TransformNode, Viewport,
};
use strata_core::transform::Transform3d;

/// Builds a JSON snapshot of `trees`.
#[must_use]
pub fn to_json(trees: &PropertyTrees) -> Value {
    let transform = &trees.transform_tree;
    json!({
        "sequence_number": trees.sequence_number(),
        "needs_rebuild": trees.needs_rebuild(),
        "transform_tree": {
            "page_scale_factor": transform.page_scale_factor(),
            "inner_viewport_bounds_delta": [
                transform.inner_viewport_bounds_delta().x,
                transform.inner_viewport_bounds_delta().y,
            ],
            "outer_viewport_bounds_delta": [
                transform.outer_viewport_bounds_delta().x,
                transform.outer_viewport_bounds_delta().y,
            ],
            "nodes": transform.iter().map(transform_node).collect::<Vec<_>>(),
        },
        "clip_tree": {
            "needs_update": trees.clip_tree.needs_update(),
            "nodes": trees.clip_tree.iter().map(clip_node).collect::<Vec<_>>(),
        },
        "effect_tree": {
            "nodes": trees.effect_tree.iter().map(effect_node).collect::<Vec<_>>(),
        },
    })
}

/// Writes [`to_json`] to `writer`, pretty-printed.
pub fn write_json(trees: &PropertyTrees, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(trees))?;
    writeln!(writer)
}

/// Writes an indented listing of all three trees to `writer`.
pub fn write_text(trees: &PropertyTrees, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(
        writer,
        "property trees seq={} needs_rebuild={}",
        trees.sequence_number(),
        trees.needs_rebuild()
    )?;

    let nodes: Vec<&TransformNode> = trees.transform_tree.iter().collect();
    write_tree(writer, "transform", &nodes, |n| {
        let t = n.data.to_screen.to_2d_translation();
        let mut line = format!("to_screen=({}, {})", t.x, t.y);
        if n.data.scrolls {
            let s = n.data.scroll_offset;
            line.push_str(&format!(" scroll=({}, {})", s.x, s.y));
        }
        if n.data.needs_sublayer_scale {
            line.push_str(&format!(" sublayer_scale={}", n.data.sublayer_scale));
        }
        if let Some(delta) = n.data.bounds_delta {
            line.push_str(&format!(" fixed={}", bounds_delta_label(delta)));
        }
        line
    })?;

    let nodes: Vec<&ClipNode> = trees.clip_tree.iter().collect();
    write_tree(writer, "clip", &nodes, |n| {
        let r = n.data.clip;
        format!(
            "clip=({}, {}, {}, {}) transform={} clipped={}",
            r.x0, r.y0, r.x1, r.y1, n.data.transform_id, n.data.layers_are_clipped
        )
    })?;

    let nodes: Vec<&EffectNode> = trees.effect_tree.iter().collect();
    write_tree(writer, "effect", &nodes, |n| {
        let mut line = format!(
            "opacity={} screen_opacity={} transform={} clip={}",
            n.data.opacity, n.data.screen_space_opacity, n.data.transform_id, n.data.clip_id
        );
        if n.data.has_render_surface {
            line.push_str(" surface");
        }
        line
    })
}

/// Writes one tree. Parents precede children, so depths are filled in a
/// single forward pass.
fn write_tree<T>(
    writer: &mut dyn Write,
    name: &str,
    nodes: &[&Node<T>],
    describe: impl Fn(&Node<T>) -> String,
) -> io::Result<()> {
    writeln!(writer, "{name} tree ({} nodes)", nodes.len())?;
    let mut depths: Vec<usize> = Vec::with_capacity(nodes.len());
    for &node in nodes {
        let depth = if node.parent_id == INVALID_NODE {
            0
        } else {
            depths.get(node.parent_id as usize).map_or(0, |d| d + 1)
        };
        depths.push(depth);
        writeln!(
            writer,
            "{:indent$}#{} owner={} {}",
            "",
            node.id,
            node.owner_id,
            describe(node),
            indent = 2 * (depth + 1),
        )?;
    }
    Ok(())
}

fn parent_value(parent_id: NodeId) -> Value {
    if parent_id == INVALID_NODE {
        Value::Null
    } else {
        json!(parent_id)
    }
}

fn matrix(t: &Transform3d) -> Value {
    json!([t.col(0), t.col(1), t.col(2), t.col(3)])
}

fn viewport_name(viewport: Viewport) -> &'static str {
    match viewport {
        Viewport::Inner => "inner",
        Viewport::Outer => "outer",
    }
}

fn bounds_delta_label(delta: BoundsDeltaSensitivity) -> String {
    let axes = match (delta.x, delta.y) {
        (true, true) => "xy",
        (true, false) => "x",
        (false, true) => "y",
        (false, false) => "none",
    };
    format!("{}:{axes}", viewport_name(delta.viewport))
}

fn transform_node(node: &TransformNode) -> Value {
    let d = &node.data;
    json!({
        "id": node.id,
        "parent_id": parent_value(node.parent_id),
        "owner_id": node.owner_id,
        "local": matrix(&d.local),
        "to_parent": matrix(&d.to_parent),
        "to_screen": matrix(&d.to_screen),
        "to_target": matrix(&d.to_target),
        "target_id": d.target_id,
        "content_target_id": d.content_target_id,
        "source_node_id": parent_value(d.source_node_id),
        "source_offset": [d.source_offset.x, d.source_offset.y],
        "scroll_offset": [d.scroll_offset.x, d.scroll_offset.y],
        "scrolls": d.scrolls,
        "flattens_inherited_transform": d.flattens_inherited_transform,
        "post_local_scale_factor": d.post_local_scale_factor,
        "needs_sublayer_scale": d.needs_sublayer_scale,
        "sublayer_scale": d.sublayer_scale,
        "is_animated": d.is_animated,
        "is_invertible": d.is_invertible,
        "ancestors_are_invertible": d.ancestors_are_invertible,
        "bounds_delta": d.bounds_delta.map(|b| json!({
            "viewport": viewport_name(b.viewport),
            "x": b.x,
            "y": b.y,
        })),
    })
}

fn clip_node(node: &ClipNode) -> Value {
    let d = &node.data;
    json!({
        "id": node.id,
        "parent_id": parent_value(node.parent_id),
        "owner_id": node.owner_id,
        "clip": [d.clip.x0, d.clip.y0, d.clip.x1, d.clip.y1],
        "transform_id": d.transform_id,
        "target_id": d.target_id,
        "layers_are_clipped": d.layers_are_clipped,
        "use_only_parent_clip": d.use_only_parent_clip,
        "layer_clipping_uses_only_local_clip": d.layer_clipping_uses_only_local_clip,
        "layer_visibility_uses_only_local_clip": d.layer_visibility_uses_only_local_clip,
        "render_surface_is_clipped": d.render_surface_is_clipped,
    })
}

fn effect_node(node: &EffectNode) -> Value {
    let d = &node.data;
    json!({
        "id": node.id,
        "parent_id": parent_value(node.parent_id),
        "owner_id": node.owner_id,
        "opacity": d.opacity,
        "screen_space_opacity": d.screen_space_opacity,
        "has_render_surface": d.has_render_surface,
        "transform_id": d.transform_id,
        "clip_id": d.clip_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect, Size, Vec2};
    use strata_core::builder::{BuildInputs, build_property_trees};
    use strata_core::layer::{LayerFlags, LayerStore};

    fn built_trees() -> PropertyTrees {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let scroller = store.create_layer();
        store.add_child(root, scroller);
        store.set_flags(
            scroller,
            LayerFlags {
                scrollable: true,
                masks_to_bounds: true,
                ..LayerFlags::default()
            },
        );
        store.set_bounds(scroller, Size::new(200.0, 100.0));
        store.set_position(scroller, Point::new(10.0, 20.0));
        store.set_scroll_offset(scroller, Vec2::new(0.0, 5.0));
        let faded = store.create_layer();
        store.add_child(scroller, faded);
        store.set_opacity(faded, 0.25);

        let mut trees = PropertyTrees::new();
        build_property_trees(
            &mut store,
            &BuildInputs::new(root, Rect::new(0.0, 0.0, 640.0, 480.0)),
            &mut trees,
        );
        trees
    }

    #[test]
    fn json_snapshot_lists_every_node() {
        let trees = built_trees();
        let value = to_json(&trees);

        assert_eq!(value["sequence_number"], 1);
        assert_eq!(value["needs_rebuild"], false);
        let transforms = value["transform_tree"]["nodes"].as_array().unwrap();
        assert_eq!(transforms.len(), trees.transform_tree.len());
        assert_eq!(transforms[0]["parent_id"], Value::Null);
        assert_eq!(transforms[1]["parent_id"], 0);
        assert_eq!(transforms[1]["scrolls"], true);
        assert_eq!(transforms[1]["scroll_offset"], json!([0.0, 5.0]));
        assert_eq!(transforms[1]["to_screen"][3], json!([10.0, 15.0, 0.0, 1.0]));

        let clips = value["clip_tree"]["nodes"].as_array().unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0]["clip"], json!([0.0, 0.0, 640.0, 480.0]));
        assert_eq!(clips[1]["transform_id"], 1);

        let effects = value["effect_tree"]["nodes"].as_array().unwrap();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1]["screen_space_opacity"], 0.25);
    }

    #[test]
    fn written_json_parses_back() {
        let trees = built_trees();
        let mut out = Vec::new();
        write_json(&trees, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, to_json(&trees));
    }

    #[test]
    fn text_listing_nests_children() {
        let trees = built_trees();
        let mut out = Vec::new();
        write_text(&trees, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("property trees seq=1 needs_rebuild=false\n"), "got: {text}");
        assert!(text.contains("transform tree (2 nodes)\n  #0 owner=0"), "got: {text}");
        assert!(
            text.contains("    #1 owner=1 to_screen=(10, 15) scroll=(0, 5)"),
            "got: {text}"
        );
        assert!(text.contains("effect tree (2 nodes)"), "got: {text}");
        assert!(text.contains("    #1 owner=2 opacity=0.25"), "got: {text}");
    }

    #[test]
    fn empty_trees_dump_cleanly() {
        let trees = PropertyTrees::new();
        let value = to_json(&trees);
        assert_eq!(value["needs_rebuild"], true);
        assert!(value["clip_tree"]["nodes"].as_array().unwrap().is_empty());

        let mut out = Vec::new();
        write_text(&trees, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("transform tree (0 nodes)"), "got: {text}");
    }
}
