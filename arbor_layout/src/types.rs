// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: node identifiers, flags, and the input tree.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in a [`LayoutTree`](crate::LayoutTree) (generational).
///
/// The generation is the engine generation of the tree that allocated the
/// node. Replacing the tree with [`LayoutEngine::update_layout`](crate::LayoutEngine::update_layout)
/// makes every previously handed-out id stale. Long-lived references should
/// hold a [`Path`](crate::Path) instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the tree this id belongs to.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node layout annotations.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The node stacks its children as a vertical cascade instead of a row.
        const DETAIL   = 0b0000_0001;
        /// The node was placed by an ancestor's cascade, not on a tier band.
        const CASCADED = 0b0000_0010;
        /// The node's size comes from a measurement rather than configuration.
        const MEASURED = 0b0000_0100;
    }
}

/// Input tree handed to the engine.
///
/// `extra` is an opaque payload carried through to the laid-out node and to
/// measurement requests.
///
/// ```rust
/// use arbor_layout::TreeNode;
///
/// let tree = TreeNode::new("root")
///     .with_children([TreeNode::new("a"), TreeNode::new("b")]);
/// assert_eq!(tree.children.len(), 2);
/// assert!(tree.children[0].is_leaf());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "E: serde::Serialize",
        deserialize = "E: serde::Deserialize<'de> + Default"
    ))
)]
pub struct TreeNode<E = ()> {
    /// Text shown for the node; also part of the measurement memo key.
    pub label: String,
    /// Ordered children. Empty means leaf.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Self>,
    /// Caller payload.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra: E,
}

impl TreeNode {
    /// Create a leaf with no payload.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_extra(label, ())
    }
}

impl<E> TreeNode<E> {
    /// Create a leaf carrying `extra`.
    pub fn with_extra(label: impl Into<String>, extra: E) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            extra,
        }
    }

    /// Append children, returning `self` for chaining.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}
