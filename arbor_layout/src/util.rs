// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

/// Horizontal reach of a subtree relative to its root's centre.
///
/// `left` is non-positive and `right` non-negative for any subtree whose
/// root box is non-empty.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Span {
    pub(crate) left: f64,
    pub(crate) right: f64,
}

impl Span {
    /// Reach of a single box of width `width`, centred on its node.
    pub(crate) fn of_width(width: f64) -> Self {
        Self {
            left: -width / 2.0,
            right: width / 2.0,
        }
    }

    pub(crate) fn width(self) -> f64 {
        self.right - self.left
    }

    /// Grow to include `other` shifted by `dx`.
    pub(crate) fn include(&mut self, other: Self, dx: f64) {
        self.left = self.left.min(other.left + dx);
        self.right = self.right.max(other.right + dx);
    }

    /// Midpoint relative to the node centre.
    pub(crate) fn mid(self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

/// Axis-aligned box of `size` centred on `center`.
pub(crate) fn centered_rect(center: Point, size: Size) -> Rect {
    Rect::from_center_size(center, size)
}
