// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry pipeline shared by every engine entry point.

use tracing::debug;

use crate::center;
use crate::config::{LayoutConfig, Strategy};
use crate::footprint;
use crate::measure::MeasureCache;
use crate::metrics;
use crate::strategy::{Compact, Natural, Placement, TierBands};
use crate::tree::LayoutTree;

/// Metrics, footprint, position (with centering), then root normalisation.
pub(crate) fn run<E>(tree: &mut LayoutTree<E>, config: &LayoutConfig, cache: &MeasureCache) {
    metrics::annotate(tree, config, cache);
    footprint::compute(tree, config.spacing);
    let bands = TierBands::compute(tree, config.spacing);
    match config.strategy {
        Strategy::Natural => Natural::new(config).place(tree, &bands),
        Strategy::Compact => Compact::new(config).place(tree, &bands),
    }
    center::normalize(tree);

    debug!(
        strategy = ?config.strategy,
        tiers = bands.len(),
        nodes = tree.len(),
        generation = tree.generation(),
        "layout pass complete"
    );
}
