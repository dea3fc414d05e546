// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position pass.
//!
//! Both strategies share the metrics and footprint front end and the tier
//! bands computed here; they differ only in how `x` is chosen.

use alloc::vec::Vec;

use crate::config::Spacing;
use crate::tree::LayoutTree;
use crate::types::NodeFlags;

pub(crate) mod cascade;
mod compact;
mod natural;

pub(crate) use compact::Compact;
pub(crate) use natural::Natural;

/// A swappable position stage. Implementations assign a centre to every
/// visible node and apply whatever centering they need; root normalisation
/// happens afterwards.
pub(crate) trait Placement {
    fn place<E>(&mut self, tree: &mut LayoutTree<E>, bands: &TierBands);
}

/// Vertical centre of every tier band.
///
/// Band `d` sits at least `spacing.y` below band `d - 1`, and far enough that
/// the tallest boxes of the two tiers cannot touch. Cascaded nodes are not on
/// a band and do not count.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TierBands {
    y: Vec<f64>,
}

impl TierBands {
    pub(crate) fn compute<E>(tree: &LayoutTree<E>, spacing: Spacing) -> Self {
        let mut tallest: Vec<f64> = Vec::new();
        for (_, node) in tree.iter() {
            if node.flags.contains(NodeFlags::CASCADED) {
                continue;
            }
            let depth = node.depth() as usize;
            if tallest.len() <= depth {
                tallest.resize(depth + 1, 0.0);
            }
            tallest[depth] = tallest[depth].max(node.size.height);
        }

        let mut y = Vec::with_capacity(tallest.len());
        for depth in 0..tallest.len() {
            let band = match depth.checked_sub(1) {
                None => 0.0,
                Some(above) => {
                    y[above] + spacing.y.max((tallest[above] + tallest[depth]) / 2.0)
                }
            };
            y.push(band);
        }
        Self { y }
    }

    /// Number of tiers that hold at least one band node.
    pub(crate) fn len(&self) -> usize {
        self.y.len()
    }

    /// Centre line of tier `depth`.
    pub(crate) fn y(&self, depth: usize) -> f64 {
        self.y[depth]
    }
}
