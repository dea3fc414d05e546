// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use kurbo::Size;

use crate::error::ConfigError;

/// Which placement strategy positions the nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Every child gets a slot as wide as its subtree; parents are centred over
    /// their children. Wide for bushy trees, never overlapping by construction.
    #[default]
    Natural,
    /// Tier-by-tier dense packing with a centroid correction per parent. Used
    /// for very bushy trees.
    Compact,
}

/// Gaps between node boxes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacing {
    /// Horizontal gap between adjacent sibling slots.
    pub x: f64,
    /// Minimum distance between the centres of consecutive tiers.
    pub y: f64,
}

impl Spacing {
    /// Create spacing from horizontal and vertical components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self { x: 12.0, y: 40.0 }
    }
}

/// How intrinsic node sizes are obtained.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeSizing {
    /// Every node has this size.
    Fixed(Size),
    /// Sizes come from a measurer; each axis is at least `minimum`.
    ///
    /// Nodes that have not been measured yet (or whose measurement failed)
    /// use `minimum`.
    Measured {
        /// Lower bound for both axes, and the fallback size.
        minimum: Size,
    },
}

impl NodeSizing {
    /// The configured size (fixed) or lower bound (measured).
    pub fn base(&self) -> Size {
        match *self {
            Self::Fixed(size) => size,
            Self::Measured { minimum } => minimum,
        }
    }

    /// Whether sizes come from a measurer.
    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured { .. })
    }
}

impl Default for NodeSizing {
    fn default() -> Self {
        Self::Fixed(Size::new(100.0, 40.0))
    }
}

/// Layout options recognized by [`LayoutEngine`](crate::LayoutEngine).
///
/// ```rust
/// use arbor_layout::{LayoutConfig, Spacing, Strategy};
///
/// let config = LayoutConfig::default()
///     .compact(true)
///     .with_spacing(Spacing::new(8.0, 32.0))
///     .with_detail_start_tower(4);
/// assert_eq!(config.strategy, Strategy::Compact);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Placement strategy.
    pub strategy: Strategy,
    /// Intrinsic node size policy.
    pub node_sizing: NodeSizing,
    /// Gaps between boxes.
    pub spacing: Spacing,
    /// Towers (depth + 1) at or beyond this value lay their children out as a
    /// vertical cascade. `None` disables cascades.
    pub detail_start_tower: Option<u32>,
    /// Extra horizontal gap inserted in compact mode where one parent's
    /// children end and the next parent's begin.
    pub sub_tree_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Natural,
            node_sizing: NodeSizing::default(),
            spacing: Spacing::default(),
            detail_start_tower: None,
            sub_tree_gap: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Select [`Strategy::Compact`] when `compact` is true, else [`Strategy::Natural`].
    #[must_use]
    pub fn compact(mut self, compact: bool) -> Self {
        self.strategy = if compact {
            Strategy::Compact
        } else {
            Strategy::Natural
        };
        self
    }

    /// Use a fixed size for every node.
    #[must_use]
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_sizing = NodeSizing::Fixed(size);
        self
    }

    /// Measure nodes, never going below `minimum`.
    #[must_use]
    pub fn with_measured_minimum(mut self, minimum: Size) -> Self {
        self.node_sizing = NodeSizing::Measured { minimum };
        self
    }

    /// Set the spacing between boxes.
    #[must_use]
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Start cascading children at `tower`.
    #[must_use]
    pub fn with_detail_start_tower(mut self, tower: u32) -> Self {
        self.detail_start_tower = Some(tower);
        self
    }

    /// Set the compact-mode gap between sibling groups.
    #[must_use]
    pub fn with_sub_tree_gap(mut self, gap: f64) -> Self {
        self.sub_tree_gap = gap;
        self
    }

    /// Check that every number is usable as geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Spacing { x, y } = self.spacing;
        if !non_negative(x) || !non_negative(y) {
            return Err(ConfigError::Spacing { x, y });
        }
        let base = self.node_sizing.base();
        if !non_negative(base.width) || !non_negative(base.height) {
            return Err(ConfigError::NodeSize {
                width: base.width,
                height: base.height,
            });
        }
        if !non_negative(self.sub_tree_gap) {
            return Err(ConfigError::SubTreeGap(self.sub_tree_gap));
        }
        if self.detail_start_tower == Some(0) {
            return Err(ConfigError::DetailStartTower);
        }
        Ok(())
    }

    /// Whether a node at `tower` cascades its children.
    pub(crate) fn is_detail_tower(&self, tower: u32) -> bool {
        self.detail_start_tower.is_some_and(|start| tower >= start)
    }
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}
