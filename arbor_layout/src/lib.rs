// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Layout: an incremental layout engine for collapsible tree diagrams.
//!
//! Arbor Layout assigns every node of a tree a centre and a box, keeps sibling
//! subtrees apart, and keeps parents centred over their children. Layouts are
//! recomputed after local edits (fold, unfold, reset, add children) while node
//! identity, the [`Path`], stays stable so a renderer can animate between
//! layouts.
//!
//! ## Pipeline
//!
//! Every entry point runs the same passes over the visible part of the tree:
//!
//! 1. Metrics: intrinsic size (fixed, or measured with a minimum), visible
//!    subtree height, and cascade flags.
//! 2. Footprint: the horizontal room each subtree needs.
//! 3. Position: one of two [`Strategy`] values. `Natural` gives every child a
//!    slot as wide as its footprint; `Compact` packs each tier densely and
//!    corrects parents toward their children's centroid.
//! 4. Centering, then normalisation so the root sits at the origin.
//!
//! Nodes at or beyond [`LayoutConfig::detail_start_tower`] stack their children
//! vertically as a staircase instead of a row, which keeps deep chains narrow.
//!
//! ## Not a renderer
//!
//! This crate computes coordinates only. Drawing boxes and connectors, easing,
//! and input handling belong to the caller. [`TransitionPlan`] describes, per
//! path, how nodes enter, move, and exit between two layouts; `arbor_viewport`
//! covers the fit and zoom math.
//!
//! ## API overview
//!
//! - [`LayoutEngine`]: owns the current [`LayoutTree`], the measurement cache,
//!   and the generation counter.
//! - [`LayoutTree`] / [`LayoutNode`]: the laid-out tree; nodes live in one arena
//!   and are addressed by [`NodeId`] or [`Path`].
//! - [`TreeNode`]: the input tree.
//! - [`LayoutConfig`]: strategy, sizing, spacing, detail threshold, sub-tree gap.
//!
//! Key operations:
//! - [`LayoutEngine::update_layout`] → [`LayoutTree`]
//! - [`LayoutEngine::toggle_fold`] / [`LayoutEngine::reset`] /
//!   [`LayoutEngine::add_children`]
//! - [`LayoutEngine::pending_measurements`] → [`PendingMeasurements::resolve`] or
//!   [`PendingMeasurements::resolve_async`] → [`LayoutEngine::apply_measurements`]
//! - [`LayoutTree::snapshot`] and [`TransitionPlan::between`]
//!
//! ## Example
//!
//! ```rust
//! use arbor_layout::{LayoutConfig, LayoutEngine, TreeNode};
//!
//! let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
//! engine.update_layout(TreeNode::new("root").with_children([
//!     TreeNode::new("a").with_children([TreeNode::new("a0"), TreeNode::new("a1")]),
//!     TreeNode::new("b"),
//! ]));
//!
//! let folded = engine.toggle_fold(&"0-0".parse().unwrap()).unwrap();
//! assert!(folded.folded);
//! assert_eq!(folded.tree.iter().count(), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod center;
mod config;
mod engine;
pub mod error;
mod footprint;
mod measure;
mod metrics;
mod path;
mod pipeline;
mod strategy;
mod transition;
mod tree;
mod types;
mod util;

pub use config::{LayoutConfig, NodeSizing, Spacing, Strategy};
pub use engine::{Added, LayoutEngine, Toggled};
pub use error::{ConfigError, LayoutError, MeasureError, PathParseError};
pub use measure::{
    AsyncMeasure, Measure, MeasureRequest, Measured, MeasuredBatch, PendingMeasurements,
};
pub use path::Path;
pub use transition::{Frame, Snapshot, Transition, TransitionPlan};
pub use tree::{Branch, LayoutNode, LayoutTree};
pub use types::{NodeFlags, NodeId, TreeNode};
