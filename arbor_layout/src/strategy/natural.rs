// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

use super::{Placement, TierBands, cascade};
use crate::center;
use crate::config::LayoutConfig;
use crate::tree::LayoutTree;
use crate::types::NodeFlags;

/// Footprint slots: every child owns a slot as wide as its subtree, and the
/// row of slots is centred under the parent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Natural {
    spacing_x: f64,
    gap: f64,
}

impl Natural {
    pub(crate) fn new(config: &LayoutConfig) -> Self {
        Self {
            spacing_x: config.spacing.x,
            gap: cascade::gap(config.spacing),
        }
    }
}

impl Placement for Natural {
    fn place<E>(&mut self, tree: &mut LayoutTree<E>, bands: &TierBands) {
        let root = tree.root();
        tree.node_mut(root).position = Point::new(0.0, bands.y(0));

        for id in tree.subtree(root) {
            let node = tree.node(id);
            if node.flags.contains(NodeFlags::DETAIL) {
                cascade::stack_children(tree, id, self.gap);
                continue;
            }
            let children = node.children().to_vec();
            if children.is_empty() {
                continue;
            }

            let row: f64 = children.iter().map(|&c| tree.node(c).footprint).sum::<f64>()
                + self.spacing_x * (children.len() - 1) as f64;
            let mut cursor = node.position.x - row / 2.0;
            for c in children {
                let child = tree.node_mut(c);
                let y = bands.y(child.depth() as usize);
                child.position = Point::new(cursor + child.footprint / 2.0, y);
                cursor += child.footprint + self.spacing_x;
            }
        }

        center::center_subtrees(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint;
    use crate::measure::MeasureCache;
    use crate::metrics;
    use crate::types::TreeNode;

    fn placed(spec: TreeNode, config: &LayoutConfig) -> LayoutTree {
        let mut tree = LayoutTree::from_spec(spec, 1);
        metrics::annotate(&mut tree, config, &MeasureCache::default());
        footprint::compute(&mut tree, config.spacing);
        let bands = TierBands::compute(&tree, config.spacing);
        Natural::new(config).place(&mut tree, &bands);
        tree
    }

    fn x(tree: &LayoutTree, path: &str) -> f64 {
        tree.node_at(&path.parse().unwrap()).unwrap().x()
    }

    #[test]
    fn slots_follow_subtree_footprints() {
        // r
        // ├── a (three leaves)
        // └── b
        let spec = TreeNode::new("r").with_children([
            TreeNode::new("a").with_children([
                TreeNode::new("a0"),
                TreeNode::new("a1"),
                TreeNode::new("a2"),
            ]),
            TreeNode::new("b"),
        ]);
        let tree = placed(spec, &LayoutConfig::default());
        // a's slot is 324 wide, b's is 100; the row is 436 wide.
        assert_eq!(x(&tree, "0-0"), -218.0 + 162.0);
        assert_eq!(x(&tree, "0-1"), 218.0 - 50.0);
        assert_eq!(x(&tree, "0-0-0"), -56.0 - 112.0);
        assert_eq!(x(&tree, "0-0-2"), -56.0 + 112.0);
    }

    #[test]
    fn single_child_inherits_parent_x() {
        let spec = TreeNode::new("r")
            .with_children([TreeNode::new("a").with_children([TreeNode::new("a0")])]);
        let tree = placed(spec, &LayoutConfig::default());
        assert_eq!(x(&tree, "0-0"), 0.0);
        assert_eq!(x(&tree, "0-0-0"), 0.0);
    }

    #[test]
    fn detail_subtree_is_centred_in_its_slot() {
        let config = LayoutConfig::default().with_detail_start_tower(2);
        let spec = TreeNode::new("r").with_children([
            TreeNode::new("d").with_children([TreeNode::new("d0"), TreeNode::new("d1")]),
            TreeNode::new("b"),
        ]);
        let tree = placed(spec, &config);
        let d = tree.node_at(&"0-0".parse().unwrap()).unwrap();
        // Footprint 125, slot centre -56; the cascade reaches 75 right of d.
        assert_eq!(d.footprint(), 125.0);
        let slot = -(125.0 + 12.0 + 100.0) / 2.0 + 62.5;
        assert_eq!(d.x() + (d.span.left + d.span.right) / 2.0, slot);
        assert_eq!(d.offset(), -12.5);
        assert_eq!(x(&tree, "0-0-0"), d.x() + 25.0);
    }
}
