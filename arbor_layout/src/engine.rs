// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine: owns the tree, the measurement cache, and the
//! generation counter, and re-runs the pipeline after every mutation.

use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::config::{LayoutConfig, NodeSizing};
use crate::error::{ConfigError, LayoutError};
use crate::measure::{
    AsyncMeasure, MeasureCache, MeasureRequest, Measured, MeasuredBatch, PendingMeasurements,
};
use crate::path::Path;
use crate::pipeline;
use crate::tree::LayoutTree;
use crate::types::{NodeId, TreeNode};

/// Result of [`LayoutEngine::toggle_fold`].
#[derive(Debug)]
pub struct Toggled<'a, E = ()> {
    /// The re-laid-out tree.
    pub tree: &'a LayoutTree<E>,
    /// The node that changed state.
    pub node: NodeId,
    /// `true` if the node is now folded.
    pub folded: bool,
}

/// Result of [`LayoutEngine::add_children`].
#[derive(Debug)]
pub struct Added<'a, E = ()> {
    /// The re-laid-out tree.
    pub tree: &'a LayoutTree<E>,
    /// The node that received the children.
    pub node: NodeId,
    /// Paths of the newly added top-level children, in order.
    pub paths: Vec<Path>,
}

/// Computes and maintains the layout of one tree.
///
/// All state lives in the instance: there are no globals, and every mutation
/// takes `&mut self`, so two passes can never run against the same tree.
///
/// ```rust
/// use arbor_layout::{LayoutConfig, LayoutEngine, TreeNode};
///
/// let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
/// let tree = engine.update_layout(
///     TreeNode::new("root").with_children([TreeNode::new("a"), TreeNode::new("b")]),
/// );
/// let xs: Vec<f64> = tree.iter().map(|(_, n)| n.x()).collect();
/// assert_eq!(xs, [0.0, -56.0, 56.0]);
///
/// let a = "0-0".parse().unwrap();
/// assert!(engine.toggle_fold(&a).is_none(), "leaves cannot fold");
/// ```
pub struct LayoutEngine<E = ()> {
    config: LayoutConfig,
    tree: Option<LayoutTree<E>>,
    measurements: MeasureCache,
    generation: u32,
}

impl<E> core::fmt::Debug for LayoutEngine<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("measurements", &self.measurements.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl<E> LayoutEngine<E> {
    /// Create an engine with no tree.
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tree: None,
            measurements: MeasureCache::default(),
            generation: 0,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration and lay the current tree out again.
    ///
    /// On error the previous configuration stays in effect.
    pub fn configure(&mut self, config: LayoutConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        if let Some(tree) = self.tree.as_mut() {
            pipeline::run(tree, &self.config, &self.measurements);
        }
        Ok(())
    }

    /// Generation of the current tree. Bumped by every
    /// [`update_layout`](Self::update_layout); folds and additions keep it.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The current layout, if a tree has been supplied.
    pub fn layout(&self) -> Option<&LayoutTree<E>> {
        self.tree.as_ref()
    }

    /// Lay out a new tree, replacing the current one.
    ///
    /// Ids from the previous tree become stale; paths carry over.
    pub fn update_layout(&mut self, root: TreeNode<E>) -> &LayoutTree<E> {
        self.generation = self.generation.wrapping_add(1);
        let mut tree = LayoutTree::from_spec(root, self.generation);
        pipeline::run(&mut tree, &self.config, &self.measurements);
        self.tree.insert(tree)
    }

    /// Fold an expanded node or unfold a folded one, then lay out again.
    ///
    /// Unknown paths, nodes hidden under a folded ancestor, and leaves are a
    /// no-op and return `None`.
    pub fn toggle_fold(&mut self, path: &Path) -> Option<Toggled<'_, E>> {
        let tree = self.tree.as_mut()?;
        let Some(node) = tree.resolve_visible(path) else {
            debug!(%path, "toggle_fold: no visible node at path");
            return None;
        };
        let branch = &mut tree.node_mut(node).branch;
        let folded = if branch.unfold() {
            false
        } else if branch.fold() {
            true
        } else {
            debug!(%path, "toggle_fold: leaf has nothing to fold");
            return None;
        };
        pipeline::run(tree, &self.config, &self.measurements);
        Some(Toggled {
            tree,
            node,
            folded,
        })
    }

    /// Unfold every node and lay out once.
    pub fn reset(&mut self) -> Option<&LayoutTree<E>> {
        let tree = self.tree.as_mut()?;
        let ids: Vec<NodeId> = tree.ids().collect();
        for id in ids {
            tree.node_mut(id).branch.unfold();
        }
        pipeline::run(tree, &self.config, &self.measurements);
        Some(tree)
    }

    /// Append `children` after the existing children of the node at `path`.
    ///
    /// A folded target is unfolded first so the additions are visible. New
    /// nodes get paths continuing the parent's child indices. Unknown paths
    /// and nodes hidden under a folded ancestor are a no-op and return `None`.
    pub fn add_children(
        &mut self,
        path: &Path,
        children: Vec<TreeNode<E>>,
    ) -> Option<Added<'_, E>> {
        let tree = self.tree.as_mut()?;
        let Some(node) = tree.resolve_visible(path) else {
            debug!(%path, "add_children: no visible node at path");
            return None;
        };
        if tree.node_mut(node).branch.unfold() {
            debug!(%path, "add_children: unfolded target");
        }
        let paths = tree
            .graft(node, children)
            .into_iter()
            .map(|id| tree.node(id).path().clone())
            .collect();
        pipeline::run(tree, &self.config, &self.measurements);
        Some(Added { tree, node, paths })
    }

    /// Forget every memoised measurement. Takes effect at the next pass.
    pub fn invalidate_measurements(&mut self) {
        self.measurements.clear();
    }

    /// Store measured sizes and lay out again.
    ///
    /// A batch taken before the latest [`update_layout`](Self::update_layout)
    /// is discarded with [`LayoutError::Superseded`]. Failed measurements are
    /// logged and the node keeps the minimum size until a later batch
    /// succeeds.
    pub fn apply_measurements(
        &mut self,
        batch: MeasuredBatch,
    ) -> Result<&LayoutTree<E>, LayoutError> {
        if batch.generation != self.generation {
            debug!(
                batch = batch.generation,
                current = self.generation,
                "discarding superseded measurements"
            );
            return Err(LayoutError::Superseded {
                batch: batch.generation,
                current: self.generation,
            });
        }
        let tree = self.tree.as_mut().ok_or(LayoutError::Empty)?;
        for Measured {
            path,
            label,
            result,
        } in batch.results
        {
            match result {
                Ok(size) => self.measurements.insert(path, label, size),
                Err(error) => warn!(%path, %error, "measurement failed; using minimum size"),
            }
        }
        pipeline::run(tree, &self.config, &self.measurements);
        Ok(tree)
    }
}

impl<E: Clone> LayoutEngine<E> {
    /// Every node (visible or folded away) that has no memoised size yet.
    ///
    /// Empty unless sizing is [`NodeSizing::Measured`].
    pub fn pending_measurements(&self) -> PendingMeasurements<E> {
        let requests = match (&self.tree, self.config.node_sizing) {
            (Some(tree), NodeSizing::Measured { minimum }) => tree
                .ids()
                .map(|id| tree.node(id))
                .filter(|node| self.measurements.get(node.path(), node.label()).is_none())
                .map(|node| MeasureRequest {
                    path: node.path().clone(),
                    label: node.label().into(),
                    extra: node.extra().clone(),
                    minimum,
                })
                .collect(),
            _ => Vec::new(),
        };
        PendingMeasurements {
            generation: self.generation,
            requests,
        }
    }

    /// [`update_layout`](Self::update_layout), then measure whatever is
    /// missing concurrently and lay out again with the results.
    pub async fn update_layout_measured(
        &mut self,
        root: TreeNode<E>,
        measurer: &impl AsyncMeasure<E>,
    ) -> Result<&LayoutTree<E>, LayoutError> {
        self.update_layout(root);
        let pending = self.pending_measurements();
        if pending.is_empty() {
            return self.tree.as_ref().ok_or(LayoutError::Empty);
        }
        let batch = pending.resolve_async(measurer).await;
        self.apply_measurements(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Spacing;
    use crate::error::MeasureError;
    use crate::types::NodeFlags;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use kurbo::{Point, Size};

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default()).unwrap()
    }

    fn geometry(tree: &LayoutTree) -> Vec<(String, Point, f64)> {
        tree.iter()
            .map(|(_, n)| (n.path().to_string(), n.position(), n.footprint()))
            .collect()
    }

    fn fan(label: &str, leaves: usize) -> TreeNode {
        TreeNode::new(label).with_children((0..leaves).map(|i| TreeNode::new(i.to_string())))
    }

    #[test]
    fn scenario_two_leaves_sit_one_tier_down() {
        let mut engine = engine();
        let tree = engine.update_layout(fan("root", 2));
        let at = |p: &str| tree.node_at(&path(p)).unwrap().position();
        assert_eq!(at("0"), Point::ZERO);
        assert_eq!(at("0-0"), Point::new(-56.0, 40.0));
        assert_eq!(at("0-1"), Point::new(56.0, 40.0));
    }

    #[test]
    fn scenario_fold_then_unfold_restores_leaves() {
        let mut engine = engine();
        let spec = TreeNode::new("root").with_children([fan("a", 3)]);
        let before = geometry(engine.update_layout(spec));

        let toggled = engine.toggle_fold(&path("0-0")).unwrap();
        assert!(toggled.folded);
        let a = toggled.tree.get(toggled.node).unwrap();
        assert!(a.is_folded());
        assert!(a.children().is_empty());
        assert_eq!(a.hidden_children().len(), 3);
        assert_eq!(toggled.tree.iter().count(), 2);

        let toggled = engine.toggle_fold(&path("0-0")).unwrap();
        assert!(!toggled.folded);
        assert_eq!(geometry(toggled.tree), before);
    }

    #[test]
    fn scenario_add_children_to_leaf() {
        let mut engine = engine();
        engine.update_layout(fan("root", 2));
        let added = engine
            .add_children(&path("0-1"), vec![TreeNode::new("x"), TreeNode::new("y")])
            .unwrap();
        assert_eq!(added.paths, [path("0-1-0"), path("0-1-1")]);
        assert_eq!(added.tree.children_of(added.node).len(), 2);
        assert_eq!(added.tree.get(added.node).unwrap().height(), 1);

        // Appending again continues the numbering.
        let added = engine
            .add_children(&path("0-1"), vec![TreeNode::new("z")])
            .unwrap();
        assert_eq!(added.paths, [path("0-1-2")]);
    }

    #[test]
    fn scenario_compact_asymmetric_tree() {
        let mut engine = LayoutEngine::new(LayoutConfig::default().compact(true)).unwrap();
        let spec = TreeNode::new("root").with_children([
            TreeNode::new("a").with_children([fan("a0", 3), TreeNode::new("a1")]),
            TreeNode::new("b"),
            fan("c", 1),
        ]);
        let tree = engine.update_layout(spec);

        let mut tiers: Vec<Vec<(f64, f64)>> = Vec::new();
        for (id, node) in tree.iter() {
            let depth = node.depth() as usize;
            if tiers.len() <= depth {
                tiers.resize(depth + 1, Vec::new());
            }
            let rect = node.rect();
            tiers[depth].push((rect.x0, rect.x1));

            let xs: Vec<f64> = tree
                .children_of(id)
                .iter()
                .map(|&c| tree.get(c).unwrap().x())
                .collect();
            if let (Some(lo), Some(hi)) = (
                xs.iter().copied().reduce(f64::min),
                xs.iter().copied().reduce(f64::max),
            ) {
                assert!(
                    lo <= node.x() && node.x() <= hi,
                    "{} at {} outside [{lo}, {hi}]",
                    node.path(),
                    node.x()
                );
            }
        }
        for tier in &mut tiers {
            tier.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in tier.windows(2) {
                assert!(pair[0].1 + 12.0 <= pair[1].0, "boxes overlap: {pair:?}");
            }
        }
        assert_eq!(tree.node_at(&path("0")).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn add_children_unfolds_folded_target() {
        let mut engine = engine();
        engine.update_layout(TreeNode::new("root").with_children([fan("a", 2)]));
        engine.toggle_fold(&path("0-0")).unwrap();
        let added = engine
            .add_children(&path("0-0"), vec![TreeNode::new("c")])
            .unwrap();
        assert_eq!(added.paths, [path("0-0-2")]);
        assert_eq!(added.tree.children_of(added.node).len(), 3);
    }

    #[test]
    fn unknown_paths_are_no_ops() {
        let mut engine = engine();
        assert!(engine.toggle_fold(&path("0")).is_none(), "no tree yet");
        assert!(engine.reset().is_none());

        engine.update_layout(fan("root", 2));
        let before = geometry(engine.layout().unwrap());
        assert!(engine.toggle_fold(&path("0-9")).is_none());
        assert!(engine.add_children(&path("0-0-4"), vec![TreeNode::new("x")]).is_none());
        assert_eq!(geometry(engine.layout().unwrap()), before);
    }

    #[test]
    fn hidden_nodes_ignore_mutations() {
        let mut engine = engine();
        engine.update_layout(TreeNode::new("root").with_children([fan("a", 2)]));
        engine.toggle_fold(&path("0-0")).unwrap();
        let before = geometry(engine.layout().unwrap());
        let total = engine.layout().unwrap().len();

        let hidden = path("0-0-0");
        assert!(engine.toggle_fold(&hidden).is_none());
        assert!(engine.add_children(&hidden, vec![TreeNode::new("x")]).is_none());

        let tree = engine.layout().unwrap();
        assert_eq!(tree.len(), total, "nothing was grafted");
        assert_eq!(geometry(tree), before);
        let id = tree.resolve(&hidden).unwrap();
        assert!(!tree.is_visible(id));
        assert_eq!(tree.resolve_visible(&hidden), None);
        assert_eq!(tree.resolve_visible(&path("0-0")), tree.resolve(&path("0-0")));
    }

    #[test]
    fn reset_unfolds_everything() {
        let mut engine = engine();
        let spec = TreeNode::new("root").with_children([fan("a", 2), fan("b", 3)]);
        let before = geometry(engine.update_layout(spec));
        engine.toggle_fold(&path("0-0")).unwrap();
        engine.toggle_fold(&path("0-1")).unwrap();
        engine.toggle_fold(&path("0")).unwrap();
        assert_eq!(engine.layout().unwrap().iter().count(), 1);

        let tree = engine.reset().unwrap();
        assert_eq!(geometry(tree), before);
    }

    #[test]
    fn path_stability_across_updates() {
        let mut engine = engine();
        let spec = TreeNode::new("root").with_children([fan("a", 2), fan("b", 3)]);
        let first = geometry(engine.update_layout(spec.clone()));
        let old_root = engine.layout().unwrap().root();
        let second = geometry(engine.update_layout(spec));
        assert_eq!(first, second);
        assert_eq!(engine.generation(), 2);
        assert!(!engine.layout().unwrap().is_alive(old_root));
    }

    #[test]
    fn configure_validates_and_relayouts() {
        let mut engine = engine();
        engine.update_layout(fan("root", 2));
        let bad = LayoutConfig::default().with_sub_tree_gap(-1.0);
        assert!(engine.configure(bad).is_err());
        assert_eq!(engine.config(), &LayoutConfig::default());

        let wider = LayoutConfig::default().with_spacing(Spacing::new(20.0, 40.0));
        engine.configure(wider).unwrap();
        let leaf = engine.layout().unwrap().node_at(&path("0-1")).unwrap();
        assert_eq!(leaf.x(), 60.0);
    }

    fn measured_engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default().with_measured_minimum(Size::new(40.0, 20.0)))
            .unwrap()
    }

    fn by_label(request: &MeasureRequest) -> Result<Size, MeasureError> {
        match request.label.as_str() {
            "broken" => Err(MeasureError::Unavailable("no renderer".to_string())),
            label => Ok(Size::new(label.len() as f64 * 10.0, 30.0)),
        }
    }

    #[test]
    fn measurements_apply_and_memoise() {
        let mut engine = measured_engine();
        engine.update_layout(
            TreeNode::new("root")
                .with_children([TreeNode::new("wide label"), TreeNode::new("broken")]),
        );
        let pending = engine.pending_measurements();
        assert_eq!(pending.len(), 3);

        let tree = engine.apply_measurements(pending.resolve(&by_label)).unwrap();
        let size = |p: &str| tree.node_at(&path(p)).unwrap().size();
        assert_eq!(size("0"), Size::new(40.0, 30.0));
        assert_eq!(size("0-0"), Size::new(100.0, 30.0));
        assert_eq!(size("0-1"), Size::new(40.0, 20.0), "failures use the minimum");
        let broken = tree.node_at(&path("0-1")).unwrap();
        assert!(!broken.flags().contains(NodeFlags::MEASURED));

        // Only the failed node is asked for again.
        let retry = engine.pending_measurements();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry.requests()[0].path, path("0-1"));
    }

    #[test]
    fn superseded_batch_is_discarded() {
        let mut engine = measured_engine();
        engine.update_layout(TreeNode::new("old"));
        let stale = engine.pending_measurements().resolve(&by_label);
        engine.update_layout(TreeNode::new("new"));

        let err = engine.apply_measurements(stale).unwrap_err();
        assert_eq!(err, LayoutError::Superseded { batch: 1, current: 2 });
        let root = engine.layout().unwrap().node_at(&path("0")).unwrap();
        assert_eq!(root.size(), Size::new(40.0, 20.0));
    }

    #[test]
    fn folds_do_not_supersede_measurements() {
        let mut engine = measured_engine();
        engine.update_layout(TreeNode::new("root").with_children([fan("a", 2)]));
        let pending = engine.pending_measurements();
        engine.toggle_fold(&path("0-0")).unwrap();
        assert!(engine.apply_measurements(pending.resolve(&by_label)).is_ok());
        assert!(engine.pending_measurements().is_empty());
    }

    struct Rendered;

    impl AsyncMeasure for Rendered {
        async fn measure(&self, request: &MeasureRequest) -> Result<Size, MeasureError> {
            by_label(request)
        }
    }

    #[test]
    fn measured_update_resolves_concurrently() {
        let mut engine = measured_engine();
        let spec = TreeNode::new("root").with_children([TreeNode::new("a much wider label")]);
        let tree =
            pollster::block_on(engine.update_layout_measured(spec.clone(), &Rendered)).unwrap();
        assert_eq!(tree.node_at(&path("0-0")).unwrap().size().width, 180.0);

        // Memoised: a second pass over the same tree measures nothing.
        let tree = engine.update_layout(spec);
        assert_eq!(tree.node_at(&path("0-0")).unwrap().size().width, 180.0);
        assert!(engine.pending_measurements().is_empty());

        engine.invalidate_measurements();
        assert_eq!(engine.pending_measurements().len(), 2);
    }

    #[test]
    fn fixed_sizing_never_requests_measurements() {
        let mut engine = engine();
        engine.update_layout(fan("root", 3));
        assert!(engine.pending_measurements().is_empty());
    }
}
