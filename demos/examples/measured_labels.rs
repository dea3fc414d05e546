// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measured node sizes, with configuration and tree loaded from JSON.
//!
//! A fake text shaper stands in for a renderer: it "measures" labels
//! asynchronously from their character count. Labels that fail to measure
//! keep the configured minimum size.
//!
//! Run:
//! - `cargo run -p arbor_demos --example measured_labels`

use arbor_demos::{describe, init_tracing};
use arbor_layout::{
    AsyncMeasure, LayoutConfig, LayoutEngine, MeasureError, MeasureRequest, TreeNode,
};
use kurbo::Size;

const CONFIG: &str = r#"{
    "strategy": "Compact",
    "node_sizing": { "Measured": { "minimum": { "width": 60.0, "height": 28.0 } } },
    "spacing": { "x": 16.0, "y": 48.0 }
}"#;

const TREE: &str = r#"{
    "label": "Arbor",
    "children": [
        { "label": "Layout engine", "children": [
            { "label": "Metrics" },
            { "label": "Footprint" },
            { "label": "Natural and compact placement" }
        ] },
        { "label": "Viewport" },
        { "label": "\u0000" }
    ]
}"#;

/// Eight units per character, one line per forty characters.
struct TextShaper;

impl AsyncMeasure for TextShaper {
    async fn measure(&self, request: &MeasureRequest) -> Result<Size, MeasureError> {
        if request.label.contains('\u{0}') {
            return Err(MeasureError::Unavailable(format!(
                "no glyphs for {:?}",
                request.label
            )));
        }
        let chars = request.label.chars().count() as f64;
        let lines = (chars / 40.0).ceil().max(1.0);
        Ok(Size::new(chars.min(40.0) * 8.0 + 16.0, lines * 20.0 + 8.0))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config: LayoutConfig = serde_json::from_str(CONFIG)?;
    let spec: TreeNode = serde_json::from_str(TREE)?;

    let mut engine = LayoutEngine::new(config)?;
    let tree = pollster::block_on(engine.update_layout_measured(spec, &TextShaper))?;
    println!("{}", describe(tree));

    // Sizes are memoised by path and label; nothing is left to measure.
    println!("pending after layout: {}", engine.pending_measurements().len());
    Ok(())
}
