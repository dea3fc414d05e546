// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detail cascades: children stacked below their parent as a staircase.

use kurbo::Point;

use crate::config::Spacing;
use crate::tree::LayoutTree;
use crate::types::{NodeFlags, NodeId};

/// Vertical gap between consecutive entries of a cascade.
pub(crate) fn gap(spacing: Spacing) -> f64 {
    spacing.y / 2.0
}

/// Horizontal step from a detail node's centre to its cascaded children.
pub(crate) fn indent(width: f64) -> f64 {
    width / 4.0
}

/// Stack the children of detail node `id` below it.
///
/// Each child's own cascade is left room for but not placed.
pub(crate) fn stack_children<E>(tree: &mut LayoutTree<E>, id: NodeId, gap: f64) {
    let parent = tree.node(id);
    let x = parent.position.x + indent(parent.size.width);
    let mut top = parent.position.y + parent.size.height / 2.0 + gap;
    for c in parent.children().to_vec() {
        let child = tree.node_mut(c);
        child.position = Point::new(x, top + child.size.height / 2.0);
        top += child.stack + gap;
    }
}

/// Place the whole cascade below detail node `id`.
pub(crate) fn arrange<E>(tree: &mut LayoutTree<E>, id: NodeId, gap: f64) {
    for m in tree.subtree(id) {
        if tree.node(m).flags.contains(NodeFlags::DETAIL) {
            stack_children(tree, m, gap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::footprint;
    use crate::measure::MeasureCache;
    use crate::metrics;
    use crate::tree::LayoutNode;
    use crate::types::TreeNode;

    /// Lowest point reached by a node's box and everything cascaded below it.
    fn bottom<E>(node: &LayoutNode<E>) -> f64 {
        node.position.y - node.size.height / 2.0 + node.stack
    }

    #[test]
    fn staircase_nests_below_each_entry() {
        let config = LayoutConfig::default().with_detail_start_tower(1);
        let spec = TreeNode::new("d").with_children([
            TreeNode::new("a").with_children([TreeNode::new("a0")]),
            TreeNode::new("b"),
        ]);
        let mut tree = LayoutTree::from_spec(spec, 1);
        metrics::annotate(&mut tree, &config, &MeasureCache::default());
        footprint::compute(&mut tree, config.spacing);

        let root = tree.root();
        arrange(&mut tree, root, gap(config.spacing));

        let at = |p: &str| tree.node_at(&p.parse().unwrap()).unwrap().position();
        assert_eq!(at("0-0"), Point::new(25.0, 60.0));
        assert_eq!(at("0-0-0"), Point::new(50.0, 120.0));
        assert_eq!(at("0-1"), Point::new(25.0, 180.0));
        assert_eq!(bottom(tree.node(root)), 200.0);
    }
}
