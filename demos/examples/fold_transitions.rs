// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folding, adding children, and the transitions a renderer would animate.
//!
//! After every mutation the viewport is refitted to the new layout, the way
//! a host would after an animation settles.
//!
//! Run:
//! - `cargo run -p arbor_demos --example fold_transitions`

use arbor_demos::{init_tracing, sample_tree};
use arbor_layout::{LayoutConfig, LayoutEngine, Path, Transition, TransitionPlan, TreeNode};
use arbor_viewport::{DEFAULT_ZOOM_STRIPE, Viewport};
use kurbo::Size;
use tracing::info;

fn report(step: &str, plan: &TransitionPlan) {
    let exits = plan
        .transitions()
        .iter()
        .filter(|t| matches!(t, Transition::Exit { .. }))
        .count();
    info!(step, transitions = plan.len(), exits, "transition plan ready");
    println!("== {step}: {} transitions", plan.len());
    for transition in plan.transitions() {
        let (from, to) = transition.frames();
        let kind = match transition {
            Transition::Enter { .. } => "enter",
            Transition::Move { .. } => "move",
            Transition::Exit { .. } => "exit",
        };
        println!(
            "  {kind:5} {:12} ({:7.1}, {:5.1}) -> ({:7.1}, {:5.1})",
            transition.path().to_string(),
            from.center.x,
            from.center.y,
            to.center.x,
            to.center.y,
        );
    }
    if let Some(dirty) = plan.union_rect() {
        println!("  repaint {dirty:?}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut engine = LayoutEngine::new(LayoutConfig::default())?;
    let mut viewport = Viewport::new(Size::new(1280.0, 720.0));

    let tree = engine.update_layout(sample_tree());
    let mut before = tree.snapshot();
    if let Some(bounds) = tree.bounds() {
        viewport.fit(bounds);
    }

    let cto: Path = "0-0".parse()?;
    if let Some(toggled) = engine.toggle_fold(&cto) {
        let plan = TransitionPlan::between(&before, toggled.tree);
        report("fold CTO", &plan);
        before = toggled.tree.snapshot();
        if let Some(bounds) = toggled.tree.bounds() {
            viewport.fit(bounds);
        }
    }

    let cfo: Path = "0-1".parse()?;
    let hires = vec![TreeNode::new("Treasury"), TreeNode::new("Audit")];
    if let Some(added) = engine.add_children(&cfo, hires) {
        println!("added {:?}", added.paths.iter().map(ToString::to_string).collect::<Vec<_>>());
        let plan = TransitionPlan::between(&before, added.tree);
        report("hire under CFO", &plan);
        before = added.tree.snapshot();
    }

    if let Some(tree) = engine.reset() {
        let plan = TransitionPlan::between(&before, tree);
        report("reset", &plan);
        if let Some(bounds) = tree.bounds() {
            viewport.fit(bounds);
        }
    }

    viewport.zoom_in(DEFAULT_ZOOM_STRIPE)?;
    info!(k = viewport.transform().k, "zoomed in");
    println!("viewport after zoom in: {:?}", viewport.transform());
    Ok(())
}
