// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Unknown paths are not errors: mutations that target a node which no longer
//! exists return `None` instead. The types here cover malformed input and
//! stale asynchronous work.

use alloc::string::String;

/// A [`LayoutConfig`](crate::LayoutConfig) that cannot produce finite geometry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Horizontal or vertical spacing is negative or not finite.
    #[error("node spacing must be finite and non-negative, got ({x}, {y})")]
    Spacing {
        /// Horizontal spacing.
        x: f64,
        /// Vertical spacing.
        y: f64,
    },
    /// A fixed or minimum node size is negative or not finite.
    #[error("node size must be finite and non-negative, got {width}x{height}")]
    NodeSize {
        /// Configured width.
        width: f64,
        /// Configured height.
        height: f64,
    },
    /// The extra gap between sibling groups in compact mode is invalid.
    #[error("sub-tree gap must be finite and non-negative, got {0}")]
    SubTreeGap(f64),
    /// Towers are counted from 1; a threshold of 0 is meaningless.
    #[error("detail start tower must be at least 1")]
    DetailStartTower,
}

/// Failure to parse a [`Path`](crate::Path) from its string form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    /// The input was empty.
    #[error("path is empty")]
    Empty,
    /// Two separators in a row, or a leading/trailing separator.
    #[error("path has an empty segment at position {0}")]
    EmptySegment(usize),
    /// A segment is not a base-10 child index.
    #[error("path segment {segment:?} at position {position} is not a child index")]
    InvalidSegment {
        /// Offending segment text.
        segment: String,
        /// Zero-based segment position.
        position: usize,
    },
    /// Every path starts at the root, which is always `0`.
    #[error("path must start at root `0`")]
    NotRooted,
}

/// Failure reported by a [`Measure`](crate::Measure) or
/// [`AsyncMeasure`](crate::AsyncMeasure) implementation.
///
/// A failed measurement never aborts layout; the node falls back to the
/// configured minimum size.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeasureError {
    /// The content could not be mounted or measured.
    #[error("content could not be measured: {0}")]
    Unavailable(String),
    /// The measurer produced a size that cannot be used as geometry.
    #[error("measured size {width}x{height} is not finite and non-negative")]
    Invalid {
        /// Reported width.
        width: f64,
        /// Reported height.
        height: f64,
    },
}

/// Errors from the layout engine's multi-step entry points.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A measurement batch was resolved against a tree that has since been
    /// replaced. Its results were discarded.
    #[error("measurement batch for generation {batch} superseded by generation {current}")]
    Superseded {
        /// Generation the batch was created for.
        batch: u32,
        /// Current engine generation.
        current: u32,
    },
    /// There is no tree to lay out.
    #[error("no tree has been laid out yet")]
    Empty,
}
