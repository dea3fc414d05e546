// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition plans: how each node moves between two layouts.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};

use crate::path::Path;
use crate::tree::LayoutTree;
use crate::util::centered_rect;

/// Where a node box sits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Centre of the box.
    pub center: Point,
    /// Size of the box; zero for the collapsed end of an enter or exit.
    pub size: Size,
}

impl Frame {
    /// The box in diagram space.
    pub fn rect(&self) -> Rect {
        centered_rect(self.center, self.size)
    }

    fn collapsed(center: Point) -> Self {
        Self {
            center,
            size: Size::ZERO,
        }
    }
}

/// The visible frames of a layout, keyed by path, in pre-order.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    frames: Vec<(Path, Frame)>,
    index: HashMap<Path, usize>,
}

impl Snapshot {
    /// Frame of the node at `path`, if it was visible.
    pub fn get(&self, path: &Path) -> Option<Frame> {
        self.index.get(path).map(|&i| self.frames[i].1)
    }

    /// Visible frames in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, Frame)> + '_ {
        self.frames.iter().map(|(path, frame)| (path, *frame))
    }

    /// Number of visible nodes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was visible.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Centre of the nearest strict ancestor of `path` present here.
    fn anchor(&self, path: &Path) -> Option<Point> {
        let mut cursor = path.parent();
        while let Some(p) = cursor {
            if let Some(frame) = self.get(&p) {
                return Some(frame.center);
            }
            cursor = p.parent();
        }
        None
    }
}

impl<E> LayoutTree<E> {
    /// Record the frame of every visible node.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (_, node) in self.iter() {
            let frame = Frame {
                center: node.position(),
                size: node.size(),
            };
            snapshot
                .index
                .insert(node.path().clone(), snapshot.frames.len());
            snapshot.frames.push((node.path().clone(), frame));
        }
        snapshot
    }
}

/// How one node gets from the old layout to the new one.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Newly visible; grows out of its nearest previously visible ancestor.
    Enter {
        /// Node address.
        path: Path,
        /// Collapsed frame at the ancestor's old centre.
        from: Frame,
        /// Final frame.
        to: Frame,
    },
    /// Visible in both layouts with a different frame.
    Move {
        /// Node address.
        path: Path,
        /// Old frame.
        from: Frame,
        /// New frame.
        to: Frame,
    },
    /// No longer visible; collapses into its nearest visible ancestor.
    Exit {
        /// Node address.
        path: Path,
        /// Old frame.
        from: Frame,
        /// Collapsed frame at the ancestor's new centre.
        to: Frame,
    },
}

impl Transition {
    /// Address of the node this transition animates.
    pub fn path(&self) -> &Path {
        match self {
            Self::Enter { path, .. } | Self::Move { path, .. } | Self::Exit { path, .. } => path,
        }
    }

    /// Start and end frames.
    pub fn frames(&self) -> (Frame, Frame) {
        match *self {
            Self::Enter { from, to, .. }
            | Self::Move { from, to, .. }
            | Self::Exit { from, to, .. } => (from, to),
        }
    }
}

/// Every transition between two layouts.
///
/// Enters and moves come in the new layout's pre-order, followed by exits in
/// the old layout's pre-order. Nodes whose frame did not change are omitted.
///
/// ```rust
/// use arbor_layout::{LayoutConfig, LayoutEngine, Transition, TransitionPlan, TreeNode};
///
/// let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
/// let before = engine.update_layout(TreeNode::new("root")).snapshot();
///
/// let root = "0".parse().unwrap();
/// let added = engine.add_children(&root, vec![TreeNode::new("child")]).unwrap();
/// let plan = TransitionPlan::between(&before, added.tree);
///
/// assert_eq!(plan.len(), 1);
/// assert!(matches!(plan.transitions()[0], Transition::Enter { .. }));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionPlan {
    transitions: Vec<Transition>,
}

impl TransitionPlan {
    /// Diff a snapshot of the old layout against the current tree.
    pub fn between<E>(before: &Snapshot, after: &LayoutTree<E>) -> Self {
        Self::diff(before, &after.snapshot())
    }

    /// Diff two snapshots.
    pub fn diff(before: &Snapshot, after: &Snapshot) -> Self {
        let mut transitions = Vec::new();
        for (path, to) in after.iter() {
            match before.get(path) {
                Some(from) if from == to => {}
                Some(from) => transitions.push(Transition::Move {
                    path: path.clone(),
                    from,
                    to,
                }),
                None => {
                    let origin = before.anchor(path).unwrap_or(to.center);
                    transitions.push(Transition::Enter {
                        path: path.clone(),
                        from: Frame::collapsed(origin),
                        to,
                    });
                }
            }
        }
        for (path, from) in before.iter() {
            if after.get(path).is_some() {
                continue;
            }
            let target = after.anchor(path).unwrap_or(from.center);
            transitions.push(Transition::Exit {
                path: path.clone(),
                from,
                to: Frame::collapsed(target),
            });
        }
        Self { transitions }
    }

    /// All transitions in order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether the two layouts are identical.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the union of every start and end frame.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.transitions.iter().flat_map(|t| {
            let (from, to) = t.frames();
            [from.rect(), to.rect()]
        });
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
