// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan, zoom, and scale-to-fit math for tree diagrams.
//!
//! A [`Viewport`] maps diagram ("world") coordinates to screen coordinates
//! with a uniform scale and a translation, the same `translate(x, y)
//! scale(k)` a renderer applies to its root group. It knows nothing about
//! input events or drawing: hosts call [`Viewport::fit`] after a layout,
//! [`Viewport::zoom_in`] / [`Viewport::zoom_out`] from buttons, and read
//! [`Viewport::affine`] when painting.
//!
//! Degenerate geometry never produces `NaN` or infinite transforms: fitting
//! zero-area content or an empty viewport keeps the current scale and only
//! recentres, and zoom factors must be finite and positive.
//!
//! ```rust
//! use arbor_viewport::Viewport;
//! use kurbo::{Point, Rect, Size};
//!
//! let mut viewport = Viewport::new(Size::new(400.0, 200.0));
//! viewport.fit(Rect::new(-100.0, 0.0, 100.0, 100.0));
//! assert_eq!(viewport.transform().k, 2.0);
//! assert_eq!(viewport.world_to_screen(Point::new(-100.0, 0.0)), Point::ZERO);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Affine, Point, Rect, Size, Vec2};
use tracing::debug;

/// Errors from viewport configuration and zooming.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// Scale bounds must be finite, positive, and ordered.
    #[error("scale extent must satisfy 0 < min <= max < inf, got [{min}, {max}]")]
    InvalidScaleExtent {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// Zoom factors must be finite and positive.
    #[error("zoom factor must be finite and positive, got {0}")]
    InvalidZoomFactor(f64),
}

/// Uniform scale followed by a translation: `screen = world * k + (x, y)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewTransform {
    /// Horizontal translation in screen units.
    pub x: f64,
    /// Vertical translation in screen units.
    pub y: f64,
    /// Scale factor.
    pub k: f64,
}

impl ViewTransform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// The transform as a kurbo [`Affine`].
    pub fn affine(&self) -> Affine {
        Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inclusive bounds on the scale factor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleExtent {
    min: f64,
    max: f64,
}

impl ScaleExtent {
    /// Create bounds, rejecting non-finite, non-positive, or inverted values.
    pub fn new(min: f64, max: f64) -> Result<Self, ViewportError> {
        let valid = min.is_finite() && max.is_finite() && min > 0.0 && min <= max;
        if !valid {
            return Err(ViewportError::InvalidScaleExtent { min, max });
        }
        Ok(Self { min, max })
    }

    /// Smallest allowed scale.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest allowed scale.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp `k` into the bounds.
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self { min: 0.1, max: 3.0 }
    }
}

/// Default relative step for [`Viewport::zoom_in`] and [`Viewport::zoom_out`].
pub const DEFAULT_ZOOM_STRIPE: f64 = 0.1;

/// A screen-sized window onto the diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    size: Size,
    transform: ViewTransform,
    scale_extent: ScaleExtent,
}

impl Viewport {
    /// A viewport of `size` screen units with the identity transform.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: ViewTransform::IDENTITY,
            scale_extent: ScaleExtent::default(),
        }
    }

    /// Replace the scale bounds; the current scale is clamped into them.
    pub fn with_scale_extent(mut self, min: f64, max: f64) -> Result<Self, ViewportError> {
        self.scale_extent = ScaleExtent::new(min, max)?;
        self.transform.k = self.scale_extent.clamp(self.transform.k);
        Ok(self)
    }

    /// Screen size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the screen area. The transform is left alone.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Current transform.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Scale bounds.
    pub fn scale_extent(&self) -> ScaleExtent {
        self.scale_extent
    }

    /// The world-to-screen transform as a kurbo [`Affine`].
    pub fn affine(&self) -> Affine {
        self.transform.affine()
    }

    /// Scale `content` to fill the viewport and centre it.
    ///
    /// Zero-area content or an empty viewport keeps the current scale.
    pub fn fit(&mut self, content: Rect) {
        let (cw, ch) = (content.width(), content.height());
        let Size { width, height } = self.size;
        let k = if positive(cw) && positive(ch) && positive(width) && positive(height) {
            self.scale_extent.clamp((width / cw).min(height / ch))
        } else {
            self.transform.k
        };
        self.transform.k = k;
        self.center_at(content.center());
        debug!(k, x = self.transform.x, y = self.transform.y, "viewport: fit");
    }

    /// Translate so `point` sits at the centre of the viewport.
    pub fn center_at(&mut self, point: Point) {
        let k = self.transform.k;
        self.transform.x = self.size.width / 2.0 - point.x * k;
        self.transform.y = self.size.height / 2.0 - point.y * k;
    }

    /// Move the view by `delta` screen units.
    pub fn pan(&mut self, delta: Vec2) {
        self.transform.x += delta.x;
        self.transform.y += delta.y;
    }

    /// Multiply the scale by `factor` about the viewport centre, clamped.
    pub fn zoom_by(&mut self, factor: f64) -> Result<(), ViewportError> {
        if !positive(factor) {
            return Err(ViewportError::InvalidZoomFactor(factor));
        }
        let center = self.size.to_rect().center();
        let anchor = self.screen_to_world(center);
        let k = self.scale_extent.clamp(self.transform.k * factor);
        self.transform = ViewTransform {
            x: center.x - anchor.x * k,
            y: center.y - anchor.y * k,
            k,
        };
        Ok(())
    }

    /// Zoom in by `1 + stripe`.
    pub fn zoom_in(&mut self, stripe: f64) -> Result<(), ViewportError> {
        self.zoom_by(1.0 + stripe)
    }

    /// Zoom out by `1 - stripe`.
    pub fn zoom_out(&mut self, stripe: f64) -> Result<(), ViewportError> {
        self.zoom_by(1.0 - stripe)
    }

    /// Map a diagram point to screen space.
    pub fn world_to_screen(&self, point: Point) -> Point {
        let ViewTransform { x, y, k } = self.transform;
        Point::new(point.x * k + x, point.y * k + y)
    }

    /// Map a screen point back to diagram space.
    pub fn screen_to_world(&self, point: Point) -> Point {
        let ViewTransform { x, y, k } = self.transform;
        Point::new((point.x - x) / k, (point.y - y) / k)
    }

    /// The part of the diagram currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(self.size.width, self.size.height)),
        )
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot2() < 1e-18
    }

    fn viewport() -> Viewport {
        Viewport::new(Size::new(400.0, 200.0))
    }

    #[test]
    fn fit_scales_and_centres() {
        let mut v = viewport();
        v.fit(Rect::new(-100.0, 0.0, 100.0, 100.0));
        assert_eq!(
            v.transform(),
            ViewTransform {
                x: 200.0,
                y: 0.0,
                k: 2.0
            }
        );
        assert_eq!(
            v.world_to_screen(Point::new(100.0, 100.0)),
            Point::new(400.0, 200.0)
        );
    }

    #[test]
    fn fit_clamps_to_scale_extent() {
        let mut v = viewport();
        v.fit(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(v.transform().k, 3.0, "20x would exceed the default max");
        assert_eq!(
            v.world_to_screen(Point::new(5.0, 5.0)),
            Point::new(200.0, 100.0)
        );
    }

    #[test]
    fn fit_zero_area_only_centres() {
        let mut v = viewport();
        v.fit(Rect::new(5.0, 5.0, 5.0, 5.0));
        let t = v.transform();
        assert_eq!(t.k, 1.0);
        assert_eq!((t.x, t.y), (195.0, 95.0));

        let mut empty = Viewport::new(Size::ZERO);
        empty.fit(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(empty.transform().x.is_finite() && empty.transform().k == 1.0);
    }

    #[test]
    fn zoom_keeps_centre_fixed() {
        let mut v = viewport();
        let center = Point::new(200.0, 100.0);
        let before = v.screen_to_world(center);
        v.zoom_in(DEFAULT_ZOOM_STRIPE).unwrap();
        assert!((v.transform().k - 1.1).abs() < 1e-12);
        assert!(close(v.screen_to_world(center), before));

        v.zoom_out(DEFAULT_ZOOM_STRIPE).unwrap();
        assert!(close(v.world_to_screen(before), center));
    }

    #[test]
    fn zoom_clamps_and_rejects_bad_factors() {
        let mut v = viewport();
        for _ in 0..20 {
            v.zoom_out(0.5).unwrap();
        }
        assert_eq!(v.transform().k, 0.1);

        assert_eq!(v.zoom_out(1.0), Err(ViewportError::InvalidZoomFactor(0.0)));
        assert!(v.zoom_by(f64::NAN).is_err());
        assert!(v.zoom_by(f64::INFINITY).is_err());
        assert_eq!(v.transform().k, 0.1, "rejected zooms leave the transform alone");
    }

    #[test]
    fn center_pan_and_round_trip() {
        let mut v = viewport();
        v.zoom_by(2.0).unwrap();
        v.center_at(Point::new(50.0, 50.0));
        assert_eq!(
            v.transform(),
            ViewTransform {
                x: 100.0,
                y: 0.0,
                k: 2.0
            }
        );

        v.pan(Vec2::new(10.0, -5.0));
        let p = Point::new(-33.0, 12.5);
        assert!(close(v.screen_to_world(v.world_to_screen(p)), p));
        assert!(close(v.affine() * p, v.world_to_screen(p)));
        assert_eq!(v.visible_world_rect(), Rect::new(-55.0, 2.5, 145.0, 102.5));
    }

    #[test]
    fn scale_extent_validation() {
        assert!(ScaleExtent::new(0.0, 1.0).is_err());
        assert!(ScaleExtent::new(2.0, 1.0).is_err());
        assert!(ScaleExtent::new(f64::NAN, 1.0).is_err());
        assert!(ScaleExtent::new(0.5, f64::INFINITY).is_err());

        let v = viewport().with_scale_extent(1.5, 4.0).unwrap();
        assert_eq!(v.transform().k, 1.5, "current scale is pulled into range");
        assert_eq!(
            viewport().with_scale_extent(-1.0, 2.0),
            Err(ViewportError::InvalidScaleExtent {
                min: -1.0,
                max: 2.0
            })
        );
    }
}
