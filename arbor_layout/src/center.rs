// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centering and root normalisation.

use crate::tree::LayoutTree;
use crate::types::NodeFlags;
use crate::util::Span;

/// Recentre every band subtree over the extent of its node and children.
///
/// Runs top-down so a parent's correction is applied before its children
/// compute theirs. Row children count with their nominal slot (`x ±
/// footprint / 2`), cascaded children with their actual reach. The
/// correction is stored in `offset`; the subtree is translated by it.
pub(crate) fn center_subtrees<E>(tree: &mut LayoutTree<E>) {
    for id in tree.subtree(tree.root()) {
        let node = tree.node(id);
        if node.flags.contains(NodeFlags::CASCADED) || node.children().is_empty() {
            continue;
        }
        let x = node.position.x;
        let mut extent = Span::of_width(node.size.width);
        for &c in node.children() {
            let child = tree.node(c);
            if child.flags.contains(NodeFlags::CASCADED) {
                extent.include(child.span, child.position.x - x);
            } else {
                extent.include(Span::of_width(child.footprint), child.position.x - x);
            }
        }

        let offset = -extent.mid();
        tree.node_mut(id).offset = offset;
        if offset != 0.0 {
            tree.translate_subtree(id, offset);
        }
    }
}

/// Translate every visible node so the root sits at the origin.
pub(crate) fn normalize<E>(tree: &mut LayoutTree<E>) {
    let origin = tree.node(tree.root()).position.to_vec2();
    if origin.x == 0.0 && origin.y == 0.0 {
        return;
    }
    for id in tree.subtree(tree.root()) {
        tree.node_mut(id).position -= origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TreeNode;
    use alloc::vec::Vec;
    use kurbo::{Point, Size};

    #[test]
    fn normalize_moves_root_to_origin() {
        let spec = TreeNode::new("r").with_children([TreeNode::new("a")]);
        let mut tree = LayoutTree::from_spec(spec, 1);
        let root = tree.root();
        let a = tree.resolve(&"0-0".parse().unwrap()).unwrap();
        tree.node_mut(root).position = Point::new(-56.0, 3.0);
        tree.node_mut(a).position = Point::new(10.0, 43.0);

        normalize(&mut tree);
        assert_eq!(tree.node(root).position(), Point::ZERO);
        assert_eq!(tree.node(a).position(), Point::new(66.0, 40.0));
    }

    #[test]
    fn band_parent_with_centred_row_needs_no_offset() {
        let mut tree = LayoutTree::from_spec(
            TreeNode::new("r").with_children([TreeNode::new("a"), TreeNode::new("b")]),
            1,
        );
        for id in tree.ids().collect::<Vec<_>>() {
            let node = tree.node_mut(id);
            node.size = Size::new(100.0, 40.0);
            node.footprint = 100.0;
            node.span = Span::of_width(100.0);
        }
        let a = tree.resolve(&"0-0".parse().unwrap()).unwrap();
        let b = tree.resolve(&"0-1".parse().unwrap()).unwrap();
        tree.node_mut(a).position.x = -56.0;
        tree.node_mut(b).position.x = 56.0;

        center_subtrees(&mut tree);
        assert_eq!(tree.node(tree.root()).offset(), 0.0);
        assert_eq!(tree.node(a).x(), -56.0);

        // An off-centre row drags the whole subtree back under the parent.
        tree.node_mut(b).position.x = 80.0;
        center_subtrees(&mut tree);
        assert_eq!(tree.node(tree.root()).offset(), -12.0);
        assert_eq!(tree.node(tree.root()).x(), -12.0);
        assert_eq!(tree.node(a).x(), -68.0);
    }
}
