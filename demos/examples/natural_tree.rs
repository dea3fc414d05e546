// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Natural layout of a small organisation chart.
//!
//! Every child gets a slot as wide as its subtree, so the chart is
//! symmetric and spacious.
//!
//! Run:
//! - `cargo run -p arbor_demos --example natural_tree`

use arbor_demos::{ascii_map, describe, init_tracing, sample_tree};
use arbor_layout::{LayoutConfig, LayoutEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut engine = LayoutEngine::new(LayoutConfig::default())?;
    let tree = engine.update_layout(sample_tree());

    println!("{}", describe(tree));
    if let Some(bounds) = tree.bounds() {
        println!("bounds: {:.0} x {:.0}", bounds.width(), bounds.height());
    }
    println!("{}", ascii_map(tree, 120, 16)?);
    Ok(())
}
