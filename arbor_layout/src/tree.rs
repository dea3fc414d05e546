// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed tree model: structure, fold state, addressing, traversal.

use alloc::string::String;
use alloc::{vec, vec::Vec};

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};

use crate::path::Path;
use crate::types::{NodeFlags, NodeId, TreeNode};
use crate::util::{Span, centered_rect};

/// Fold state of a node together with the children it owns.
///
/// A node either shows its children or hides them, never a mix. A leaf is an
/// expanded node with no children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Branch {
    /// Children are laid out and visible.
    Expanded(Vec<NodeId>),
    /// Children are kept, with their last geometry, but not laid out.
    Folded(Vec<NodeId>),
}

impl Branch {
    /// Children that take part in layout.
    pub fn visible(&self) -> &[NodeId] {
        match self {
            Self::Expanded(children) => children,
            Self::Folded(_) => &[],
        }
    }

    /// Children hidden by a fold.
    pub fn hidden(&self) -> &[NodeId] {
        match self {
            Self::Expanded(_) => &[],
            Self::Folded(children) => children,
        }
    }

    /// All children regardless of fold state.
    pub fn all(&self) -> &[NodeId] {
        match self {
            Self::Expanded(children) | Self::Folded(children) => children,
        }
    }

    /// Whether the node currently hides its children.
    pub fn is_folded(&self) -> bool {
        matches!(self, Self::Folded(_))
    }

    fn push(&mut self, child: NodeId) {
        match self {
            Self::Expanded(children) | Self::Folded(children) => children.push(child),
        }
    }

    /// Swap to the folded state. Returns `false` if there was nothing to hide.
    pub(crate) fn fold(&mut self) -> bool {
        match self {
            Self::Expanded(children) if !children.is_empty() => {
                *self = Self::Folded(core::mem::take(children));
                true
            }
            _ => false,
        }
    }

    /// Swap to the expanded state. Returns `false` if already expanded.
    pub(crate) fn unfold(&mut self) -> bool {
        match self {
            Self::Folded(children) => {
                *self = Self::Expanded(core::mem::take(children));
                true
            }
            Self::Expanded(_) => false,
        }
    }
}

impl Default for Branch {
    fn default() -> Self {
        Self::Expanded(Vec::new())
    }
}

/// A laid-out node.
///
/// Positions are box centres in diagram space. After a pass the root sits at
/// the origin and `y` grows downward.
#[derive(Clone, Debug)]
pub struct LayoutNode<E = ()> {
    pub(crate) path: Path,
    pub(crate) parent: Option<NodeId>,
    pub(crate) branch: Branch,
    pub(crate) height: u32,
    pub(crate) size: Size,
    pub(crate) footprint: f64,
    pub(crate) span: Span,
    /// Vertical extent of the node box plus everything it stacks below it
    /// when it is part of a cascade.
    pub(crate) stack: f64,
    pub(crate) position: Point,
    pub(crate) offset: f64,
    pub(crate) flags: NodeFlags,
    label: String,
    extra: E,
}

impl<E> LayoutNode<E> {
    fn new(path: Path, parent: Option<NodeId>, label: String, extra: E) -> Self {
        Self {
            path,
            parent,
            branch: Branch::default(),
            height: 0,
            size: Size::ZERO,
            footprint: 0.0,
            span: Span::default(),
            stack: 0.0,
            position: Point::ZERO,
            offset: 0.0,
            flags: NodeFlags::empty(),
            label,
            extra,
        }
    }

    /// Stable address of this node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Centre of the node box.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Horizontal centre.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical centre.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Intrinsic box size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The node box in diagram space.
    pub fn rect(&self) -> Rect {
        centered_rect(self.position, self.size)
    }

    /// Horizontal span required by the visible subtree; at least `size().width`.
    pub fn footprint(&self) -> f64 {
        self.footprint
    }

    /// Correction applied by the centering pass (zero for most nodes).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Distance from the root; the root is at depth 0.
    pub fn depth(&self) -> u32 {
        self.path.depth()
    }

    /// One-based generation level: the root is tower 1.
    pub fn tower(&self) -> u32 {
        self.path.depth() + 1
    }

    /// Height of the visible subtree; leaves and folded nodes are 0.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fold state and owned children.
    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    /// Whether this node hides its children.
    pub fn is_folded(&self) -> bool {
        self.branch.is_folded()
    }

    /// Visible children, in order.
    pub fn children(&self) -> &[NodeId] {
        self.branch.visible()
    }

    /// Children hidden by a fold, in order.
    pub fn hidden_children(&self) -> &[NodeId] {
        self.branch.hidden()
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Layout annotations.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Label copied from the input tree.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Payload copied from the input tree.
    pub fn extra(&self) -> &E {
        &self.extra
    }
}

/// A laid-out tree, owned by a [`LayoutEngine`](crate::LayoutEngine).
///
/// Nodes live in one arena; parent links are ids, so there are no reference
/// cycles. A path index maps every [`Path`] (visible or hidden) to its node.
///
/// ## Example
///
/// ```rust
/// use arbor_layout::{LayoutConfig, LayoutEngine, Path, TreeNode};
///
/// let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
/// let tree = engine.update_layout(
///     TreeNode::new("root").with_children([TreeNode::new("a"), TreeNode::new("b")]),
/// );
///
/// let a = tree.node_at(&"0-0".parse::<Path>().unwrap()).unwrap();
/// assert_eq!(a.label(), "a");
/// assert_eq!(tree.iter().count(), 3);
/// ```
pub struct LayoutTree<E = ()> {
    nodes: Vec<LayoutNode<E>>,
    generation: u32,
    index: HashMap<Path, NodeId>,
}

impl<E> core::fmt::Debug for LayoutTree<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let visible = self.iter().count();
        f.debug_struct("LayoutTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_visible", &visible)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<E> LayoutTree<E> {
    /// Wrap an input tree. Children are inserted in order, so paths follow
    /// the input's child indices.
    pub(crate) fn from_spec(spec: TreeNode<E>, generation: u32) -> Self {
        let TreeNode {
            label,
            children,
            extra,
        } = spec;
        let mut tree = Self {
            nodes: Vec::new(),
            generation,
            index: HashMap::new(),
        };
        let root = tree.insert(None, Path::root(), label, extra);
        tree.graft(root, children);
        tree
    }

    /// Append `specs` (recursively) after `parent`'s existing children.
    ///
    /// Returns the ids of the top-level nodes that were added.
    pub(crate) fn graft(&mut self, parent: NodeId, specs: Vec<TreeNode<E>>) -> Vec<NodeId> {
        let mut added = Vec::with_capacity(specs.len());
        let mut pending = vec![(parent, specs)];
        let mut top_level = true;
        while let Some((parent, specs)) = pending.pop() {
            let base = self.node(parent).branch.all().len();
            for (i, spec) in specs.into_iter().enumerate() {
                let TreeNode {
                    label,
                    children,
                    extra,
                } = spec;
                let path = self.node(parent).path.child(base + i);
                let id = self.insert(Some(parent), path, label, extra);
                if top_level {
                    added.push(id);
                }
                if !children.is_empty() {
                    pending.push((id, children));
                }
            }
            top_level = false;
        }
        added
    }

    fn insert(&mut self, parent: Option<NodeId>, path: Path, label: String, extra: E) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32, self.generation);
        self.index.insert(path.clone(), id);
        self.nodes.push(LayoutNode::new(path, parent, label, extra));
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    /// The root node. Every tree has one.
    pub fn root(&self) -> NodeId {
        NodeId::new(0, self.generation)
    }

    /// Generation of the engine pass that built this tree.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns true if `id` was allocated by this tree.
    ///
    /// Ids from a tree that has since been replaced carry an older generation
    /// and are rejected.
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.1 == self.generation && id.idx() < self.nodes.len()
    }

    /// Access a node if `id` is live.
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode<E>> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes.get(id.idx())
    }

    /// Resolve a path to the node currently at that address.
    pub fn resolve(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    /// Access the node at `path`.
    pub fn node_at(&self, path: &Path) -> Option<&LayoutNode<E>> {
        self.resolve(path).map(|id| self.node(id))
    }

    /// Whether `id` is live and no ancestor of it is folded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut cursor = self.node(id).parent;
        while let Some(p) = cursor {
            let parent = self.node(p);
            if parent.branch.is_folded() {
                return false;
            }
            cursor = parent.parent;
        }
        true
    }

    /// Like [`resolve`](Self::resolve), but only for nodes not hidden by a fold.
    pub fn resolve_visible(&self, path: &Path) -> Option<NodeId> {
        self.resolve(path).filter(|&id| self.is_visible(id))
    }

    /// Returns the parent of a node if live, or `None` for the root or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Visible children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.branch.visible()).unwrap_or(&[])
    }

    /// Hidden children of a node, or an empty slice if the node is stale.
    pub fn hidden_children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.branch.hidden()).unwrap_or(&[])
    }

    /// Total number of nodes, including those hidden by folds.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visible nodes in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LayoutNode<E>)> + '_ {
        let mut next = Some(self.root());
        core::iter::from_fn(move || {
            let current = next?;
            next = self.next_in_order(current);
            Some((current, self.node(current)))
        })
    }

    /// Union of all visible node boxes, or `None` if it has no area.
    pub fn bounds(&self) -> Option<Rect> {
        let mut it = self.iter().map(|(_, n)| n.rect());
        let first = it.next()?;
        let bounds = it.fold(first, |acc, r| acc.union(r));
        (bounds.width() > 0.0 || bounds.height() > 0.0).then_some(bounds)
    }

    /// Get the next visible node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        self.next_in_order(current)
    }

    /// Get the previous visible node in depth-first traversal order.
    ///
    /// Returns `None` if no previous node exists or if the current node is stale.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        self.prev_in_order(current)
    }

    // --- internals ---

    /// Access a node; panics if `id` does not belong to this tree.
    pub(crate) fn node(&self, id: NodeId) -> &LayoutNode<E> {
        debug_assert_eq!(id.1, self.generation, "NodeId from another tree");
        &self.nodes[id.idx()]
    }

    /// Access a node mutably; panics if `id` does not belong to this tree.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode<E> {
        debug_assert_eq!(id.1, self.generation, "NodeId from another tree");
        &mut self.nodes[id.idx()]
    }

    /// Every node id, visible or hidden, in allocation order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32, self.generation))
    }

    /// Visible nodes, children before parents, siblings left to right.
    pub(crate) fn post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).branch.visible().iter().copied());
        }
        // Reverse pre-order with reversed siblings is post-order.
        out.reverse();
        out
    }

    /// Visible nodes of the subtree rooted at `id`, parents before children.
    pub(crate) fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).branch.visible().iter().rev().copied());
        }
        out
    }

    /// Move the visible subtree rooted at `id` horizontally by `dx`.
    pub(crate) fn translate_subtree(&mut self, id: NodeId, dx: f64) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id);
            node.position.x += dx;
            stack.extend(node.branch.visible().iter().copied());
        }
    }

    fn next_in_order(&self, current: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.node(current).branch.visible().first() {
            return Some(first_child);
        }

        let mut node = current;
        while let Some(parent) = self.node(node).parent {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    fn prev_in_order(&self, current: NodeId) -> Option<NodeId> {
        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }
        self.node(current).parent
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.node(node).parent?;
        let siblings = self.node(parent).branch.visible();
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.node(node).parent?;
        let siblings = self.node(parent).branch.visible();
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    fn last_in_subtree(&self, mut node: NodeId) -> NodeId {
        while let Some(&last_child) = self.node(node).branch.visible().last() {
            node = last_child;
        }
        node
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).branch.push(id);
        self.node_mut(id).parent = Some(parent);
    }
}
