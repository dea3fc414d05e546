// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact packing and detail cascades on a wide, deep tree.
//!
//! The same tree is laid out three ways: natural, compact, and compact with
//! cascades from tower 3 on. Compare the bounding widths.
//!
//! Run:
//! - `RUST_LOG=arbor_layout=trace cargo run -p arbor_demos --example compact_fanout`

use arbor_demos::{ascii_map, describe, init_tracing};
use arbor_layout::{LayoutConfig, LayoutEngine, TreeNode};

fn fan_out(label: &str, depth: u32, width: usize) -> TreeNode {
    let node = TreeNode::new(label);
    if depth == 0 {
        return node;
    }
    node.with_children((0..width).map(|i| fan_out(&format!("{label}.{i}"), depth - 1, width - 1)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let spec = fan_out("n", 4, 4);
    let configs = [
        ("natural", LayoutConfig::default()),
        ("compact", LayoutConfig::default().compact(true)),
        (
            "compact + cascade",
            LayoutConfig::default()
                .compact(true)
                .with_detail_start_tower(3),
        ),
    ];

    for (name, config) in configs {
        let mut engine = LayoutEngine::new(config)?;
        let tree = engine.update_layout(spec.clone());
        let width = tree.bounds().map_or(0.0, |b| b.width());
        println!("== {name}: {} nodes, {width:.0} wide", tree.iter().count());
        println!("{}", ascii_map(tree, 120, 20)?);
        if name == "compact + cascade" {
            println!("{}", describe(tree));
        }
    }
    Ok(())
}
