// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Footprint pass: the horizontal room each visible subtree needs.

use crate::config::Spacing;
use crate::strategy::cascade;
use crate::tree::LayoutTree;
use crate::types::NodeFlags;
use crate::util::Span;

/// Bottom-up over visible nodes.
///
/// Row parents add their children's footprints plus the gaps between them.
/// Detail nodes take the reach of their cascade, which for uniform sizes is
/// `width + height * width / 4`. Every node also records its rigid `span`
/// (own box plus cascade) and, for cascades, its vertical `stack`.
pub(crate) fn compute<E>(tree: &mut LayoutTree<E>, spacing: Spacing) {
    let gap = cascade::gap(spacing);
    for id in tree.post_order() {
        let node = tree.node(id);
        let size = node.size;
        let children = node.children();

        let mut span = Span::of_width(size.width);
        let mut stack = size.height;
        let footprint = if children.is_empty() {
            size.width
        } else if node.flags.contains(NodeFlags::DETAIL) {
            let indent = cascade::indent(size.width);
            for &c in children {
                let child = tree.node(c);
                span.include(child.span, indent);
                stack += gap + child.stack;
            }
            span.width()
        } else {
            let row: f64 = children.iter().map(|&c| tree.node(c).footprint).sum();
            size.width.max(row + (children.len() - 1) as f64 * spacing.x)
        };

        let node = tree.node_mut(id);
        node.footprint = footprint;
        node.span = span;
        node.stack = stack;
    }
}
