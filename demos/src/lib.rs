// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Arbor demos.
//!
//! Run a demo with, for example:
//! - `cargo run -p arbor_demos --example natural_tree`
//! - `RUST_LOG=arbor_layout=trace cargo run -p arbor_demos --example compact_fanout`

use std::fmt::Write as _;

use arbor_layout::{LayoutTree, NodeFlags, TreeNode};
use arbor_viewport::{Viewport, ViewportError};
use kurbo::{Point, Size};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `debug`
/// for the Arbor crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arbor_layout=debug,arbor_viewport=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// A small organisation chart with one deep branch.
pub fn sample_tree() -> TreeNode {
    let team = |lead: &str, members: &[&str]| {
        TreeNode::new(lead).with_children(members.iter().map(|m| TreeNode::new(*m)))
    };
    TreeNode::new("CEO").with_children([
        TreeNode::new("CTO").with_children([
            team("Platform", &["Runtime", "Storage", "Build"]),
            team("Product", &["Web", "Mobile"]),
        ]),
        team("CFO", &["Payroll"]),
        TreeNode::new("COO").with_children([team("Ops", &["EMEA", "APAC", "Americas"])
            .with_children([team("Support", &["Tier 1", "Tier 2"])])]),
    ])
}

/// One line per visible node, indented by depth.
pub fn describe<E>(tree: &LayoutTree<E>) -> String {
    let mut out = String::new();
    for (_, node) in tree.iter() {
        let indent = "  ".repeat(node.depth() as usize);
        let mut marks = String::new();
        if node.flags().contains(NodeFlags::DETAIL) {
            marks.push_str(" detail");
        }
        if node.flags().contains(NodeFlags::CASCADED) {
            marks.push_str(" cascaded");
        }
        if node.is_folded() {
            marks.push_str(" folded");
        }
        let _ = writeln!(
            out,
            "{indent}{} {:?} at ({:.1}, {:.1}) {}x{}{marks}",
            node.path(),
            node.label(),
            node.x(),
            node.y(),
            node.size().width,
            node.size().height,
        );
    }
    out
}

/// Rasterise the visible labels into a `cols` x `rows` character grid,
/// scaled to fit.
pub fn ascii_map<E>(
    tree: &LayoutTree<E>,
    cols: usize,
    rows: usize,
) -> Result<String, ViewportError> {
    let Some(bounds) = tree.bounds() else {
        return Ok(String::new());
    };
    let mut viewport =
        Viewport::new(Size::new(cols as f64, rows as f64)).with_scale_extent(0.001, 1.0)?;
    viewport.fit(bounds);
    debug!(cols, rows, k = viewport.transform().k, "ascii map: fitted");

    let mut grid = vec![vec![' '; cols]; rows];
    for (_, node) in tree.iter() {
        let label: Vec<char> = format!("[{}]", node.label()).chars().collect();
        let Point { x, y } = viewport.world_to_screen(node.position());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "screen coordinates are bounded by the grid size"
        )]
        let (row, start) = (
            y.round() as isize,
            x.round() as isize - (label.len() / 2) as isize,
        );
        let Some(line) = usize::try_from(row).ok().and_then(|r| grid.get_mut(r)) else {
            continue;
        };
        for (i, ch) in label.into_iter().enumerate() {
            if let Some(cell) = usize::try_from(start + i as isize)
                .ok()
                .and_then(|c| line.get_mut(c))
            {
                *cell = ch;
            }
        }
    }

    let mut out = String::new();
    for line in grid {
        let text: String = line.into_iter().collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }
    Ok(out)
}
