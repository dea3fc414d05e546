// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use tracing::trace;

use super::{Placement, TierBands, cascade};
use crate::config::LayoutConfig;
use crate::tree::LayoutTree;
use crate::types::{NodeFlags, NodeId};

/// Left edge of everything placed so far on a tier.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Frontier {
    left: f64,
    /// Parent of the node that set the edge; crossing to another parent adds
    /// the sub-tree gap.
    parent: Option<NodeId>,
}

/// Dense packing.
///
/// Nodes are placed children first, rightmost subtree first, each as close
/// as possible to the left edge of its tier. A parent then snaps to the
/// centroid of its children if that is free; otherwise its placed children
/// shift left until it is. Nothing ever moves right, so earlier placements
/// stay valid without re-packing.
#[derive(Clone, Debug)]
pub(crate) struct Compact {
    spacing_x: f64,
    sub_tree_gap: f64,
    gap: f64,
    frontiers: Vec<Option<Frontier>>,
}

impl Compact {
    pub(crate) fn new(config: &LayoutConfig) -> Self {
        Self {
            spacing_x: config.spacing.x,
            sub_tree_gap: config.sub_tree_gap,
            gap: cascade::gap(config.spacing),
            frontiers: Vec::new(),
        }
    }

    /// Rightmost centre that keeps a node with right reach `reach` clear of
    /// the frontier at `depth`.
    fn limit(&self, depth: usize, parent: Option<NodeId>, reach: f64) -> Option<f64> {
        self.frontiers[depth].map(|f| {
            let gap = if f.parent == parent {
                0.0
            } else {
                self.sub_tree_gap
            };
            f.left - self.spacing_x - gap - reach
        })
    }

    /// Starting point for a node on an empty tier: next to the nearest
    /// shallower frontier, or the origin.
    fn guess(&self, depth: usize, reach: f64) -> f64 {
        self.frontiers[..depth]
            .iter()
            .rev()
            .flatten()
            .next()
            .map_or(0.0, |f| f.left - self.spacing_x - reach)
    }

    /// Record a placed band node. A detail node's cascade hangs below its
    /// own band, where no band node can exist, so its whole span counts
    /// against its own tier only.
    fn register<E>(&mut self, tree: &LayoutTree<E>, id: NodeId) {
        let node = tree.node(id);
        let left = node.position.x + node.span.left;
        let slot = &mut self.frontiers[node.depth() as usize];
        if slot.is_none_or(|f| left < f.left) {
            *slot = Some(Frontier {
                left,
                parent: node.parent,
            });
        }
    }

    /// Move everything below `id` left by `delta` and pull the affected
    /// frontiers along.
    fn shift_children<E>(&mut self, tree: &mut LayoutTree<E>, id: NodeId, delta: f64) {
        trace!(path = %tree.node(id).path(), delta, "compact: shifting placed children left");
        for c in tree.node(id).children().to_vec() {
            tree.translate_subtree(c, -delta);
            for m in tree.subtree(c) {
                if !tree.node(m).flags.contains(NodeFlags::CASCADED) {
                    self.register(tree, m);
                }
            }
        }
    }
}

impl Placement for Compact {
    fn place<E>(&mut self, tree: &mut LayoutTree<E>, bands: &TierBands) {
        self.frontiers = vec![None; bands.len()];

        // Reversed pre-order is post-order with siblings right to left.
        let mut order = tree.subtree(tree.root());
        order.reverse();

        for id in order {
            let node = tree.node(id);
            if node.flags.contains(NodeFlags::CASCADED) {
                continue;
            }
            let depth = node.depth() as usize;
            let parent = node.parent;
            let reach = node.span.right;
            let detail = node.flags.contains(NodeFlags::DETAIL);
            let centroid = match node.children() {
                [first, .., last] if !detail => {
                    Some((tree.node(*first).x() + tree.node(*last).x()) / 2.0)
                }
                [only] if !detail => Some(tree.node(*only).x()),
                _ => None,
            };

            tree.node_mut(id).position.y = bands.y(depth);
            let limit = self.limit(depth, parent, reach);

            let x = match (centroid, limit) {
                (Some(centroid), Some(limit)) if limit < centroid => {
                    let delta = centroid - limit;
                    self.shift_children(tree, id, delta);
                    tree.node_mut(id).offset = -delta;
                    limit
                }
                (Some(centroid), _) => centroid,
                (None, Some(limit)) => limit,
                (None, None) => self.guess(depth, reach),
            };
            tree.node_mut(id).position.x = x;

            if detail {
                cascade::arrange(tree, id, self.gap);
            }
            self.register(tree, id);
        }
    }
}
