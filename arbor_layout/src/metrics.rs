// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metrics pass: intrinsic size, visible height, and cascade flags.

use kurbo::Size;

use crate::config::{LayoutConfig, NodeSizing};
use crate::measure::MeasureCache;
use crate::path::Path;
use crate::tree::LayoutTree;
use crate::types::NodeFlags;

/// Annotate every visible node. Hidden nodes keep whatever they had when they
/// were last visible.
pub(crate) fn annotate<E>(tree: &mut LayoutTree<E>, config: &LayoutConfig, cache: &MeasureCache) {
    let pre_order = tree.subtree(tree.root());

    for &id in &pre_order {
        let cascaded = tree
            .node(id)
            .parent
            .is_some_and(|p| tree.node(p).flags.contains(NodeFlags::DETAIL));

        let node = tree.node_mut(id);
        let (size, measured) = intrinsic_size(config.node_sizing, cache, node.path(), node.label());
        let detail = !node.children().is_empty() && config.is_detail_tower(node.tower());

        node.size = size;
        node.offset = 0.0;
        node.flags = NodeFlags::empty();
        node.flags.set(NodeFlags::MEASURED, measured);
        node.flags.set(NodeFlags::DETAIL, detail);
        node.flags.set(NodeFlags::CASCADED, cascaded);
    }

    for &id in pre_order.iter().rev() {
        let height = tree
            .node(id)
            .children()
            .iter()
            .map(|&c| tree.node(c).height + 1)
            .max()
            .unwrap_or(0);
        tree.node_mut(id).height = height;
    }
}

fn intrinsic_size(
    sizing: NodeSizing,
    cache: &MeasureCache,
    path: &Path,
    label: &str,
) -> (Size, bool) {
    match sizing {
        NodeSizing::Fixed(size) => (size, false),
        NodeSizing::Measured { minimum } => match cache.get(path, label) {
            Some(measured) => (
                Size::new(
                    measured.width.max(minimum.width),
                    measured.height.max(minimum.height),
                ),
                true,
            ),
            None => (minimum, false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TreeNode;
    use alloc::string::ToString;

    fn chain(depth: usize) -> TreeNode {
        let mut node = TreeNode::new("leaf");
        for _ in 0..depth {
            node = TreeNode::new("link").with_children([node]);
        }
        node
    }

    #[test]
    fn heights_count_visible_levels() {
        let mut tree = LayoutTree::from_spec(
            TreeNode::new("r").with_children([chain(2), TreeNode::new("b")]),
            1,
        );
        annotate(&mut tree, &LayoutConfig::default(), &MeasureCache::default());
        let root = tree.root();
        assert_eq!(tree.node(root).height(), 3);
        let a = tree.resolve(&"0-0".parse().unwrap()).unwrap();
        assert_eq!(tree.node(a).height(), 2);

        tree.node_mut(a).branch.fold();
        annotate(&mut tree, &LayoutConfig::default(), &MeasureCache::default());
        assert_eq!(tree.node(a).height(), 0, "folded nodes count as leaves");
        assert_eq!(tree.node(root).height(), 1);
    }

    #[test]
    fn detail_tower_flags_cascade() {
        let config = LayoutConfig::default().with_detail_start_tower(2);
        let mut tree = LayoutTree::from_spec(chain(3), 1);
        annotate(&mut tree, &config, &MeasureCache::default());

        let flags = |p: &str| tree.node_at(&p.parse().unwrap()).unwrap().flags();
        assert_eq!(flags("0"), NodeFlags::empty());
        assert_eq!(flags("0-0"), NodeFlags::DETAIL);
        assert_eq!(flags("0-0-0"), NodeFlags::DETAIL | NodeFlags::CASCADED);
        assert_eq!(flags("0-0-0-0"), NodeFlags::CASCADED, "leaves are never detail nodes");
    }

    #[test]
    fn measured_sizes_respect_minimum_and_label() {
        let minimum = Size::new(50.0, 20.0);
        let config = LayoutConfig::default().with_measured_minimum(minimum);
        let mut cache = MeasureCache::default();
        cache.insert("0".parse().unwrap(), "r".to_string(), Size::new(80.0, 10.0));
        cache.insert("0-0".parse().unwrap(), "stale".to_string(), Size::new(300.0, 90.0));

        let mut tree = LayoutTree::from_spec(TreeNode::new("r").with_children([chain(0)]), 1);
        annotate(&mut tree, &config, &cache);

        let root = tree.node(tree.root());
        assert_eq!(root.size(), Size::new(80.0, 20.0));
        assert!(root.flags().contains(NodeFlags::MEASURED));

        let leaf = tree.node_at(&"0-0".parse().unwrap()).unwrap();
        assert_eq!(leaf.size(), minimum, "relabelled nodes fall back to the minimum");
        assert!(!leaf.flags().contains(NodeFlags::MEASURED));
    }
}
