// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::bitmap::Bitmap;
use crate::fit::{DEFAULT_MAX_ZOOM_FACTOR, ZoomBounds, base_transform, is_usable};

/// Default multiplier for [`TransformEngine::zoom_in`] / [`TransformEngine::zoom_out`].
pub const DEFAULT_SCALE_RATE: f64 = 1.25;

/// Centering corrections smaller than this are treated as already centered.
const CENTER_EPSILON: f64 = 1e-9;

/// Transform state of a zoomable image.
///
/// The engine owns the bitmap and two transforms:
/// - the **base** transform, fitting the image into the viewport, recomputed
///   whenever the image or viewport changes;
/// - the **user** transform, accumulating zoom and pan, reset to identity
///   whenever a new image is installed.
///
/// The composed transform (base, then user) maps image pixels to viewport
/// pixels. It is cached; [`TransformEngine::revision`] increases exactly when
/// it changes, which is the signal to repaint.
///
/// The user transform is always a uniform scale plus a translation, and its
/// scale stays within `[1.0, max_zoom]` after every public zoom operation.
#[derive(Clone, Debug)]
pub struct TransformEngine<B> {
    image: Option<B>,
    pending: Option<Option<B>>,
    viewport: Size,
    base: Affine,
    user: Affine,
    composed: Affine,
    bounds: ZoomBounds,
    max_zoom_factor: f64,
    revision: u64,
}

impl<B: Bitmap> Default for TransformEngine<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bitmap> TransformEngine<B> {
    /// Creates an engine without image or layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            image: None,
            pending: None,
            viewport: Size::ZERO,
            base: Affine::IDENTITY,
            user: Affine::IDENTITY,
            composed: Affine::IDENTITY,
            bounds: ZoomBounds::UNIT,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            revision: 0,
        }
    }

    /// Sets the ratio between maximum zoom and the image/viewport size ratio.
    #[must_use]
    pub fn with_max_zoom_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.max_zoom_factor = factor;
        }
        self
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The installed bitmap.
    #[must_use]
    pub fn image(&self) -> Option<&B> {
        self.image.as_ref()
    }

    /// Returns `true` if a bitmap is installed.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Returns `true` if a `set_image` is waiting for a layout.
    #[must_use]
    pub fn has_pending_image(&self) -> bool {
        self.pending.is_some()
    }

    /// Installs `image` (or removes the current one with `None`).
    ///
    /// Without a usable viewport width the call is deferred until the next
    /// [`TransformEngine::on_layout`]; only the latest deferred call is kept.
    /// Returns `true` if the image was installed now.
    pub fn set_image(&mut self, image: Option<B>) -> bool {
        if self.viewport.width <= 0.0 {
            self.pending = Some(image);
            return false;
        }
        self.pending = None;

        self.base = match &image {
            Some(b) => base_transform(b.size(), self.viewport),
            None => Affine::IDENTITY,
        };
        self.image = image;
        self.user = Affine::IDENTITY;
        self.publish();
        self.refresh_bounds();
        self.zoom_to(self.bounds.default_zoom);
        true
    }

    /// Updates the viewport size.
    ///
    /// Runs a deferred [`TransformEngine::set_image`] once, then refits the
    /// current image. The user transform is kept, except that its scale is
    /// brought down to the new maximum; the image is then re-centered.
    pub fn on_layout(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
        if let Some(image) = self.pending.take() {
            self.set_image(image);
        }
        if let Some(size) = self.image.as_ref().map(Bitmap::size) {
            self.base = base_transform(size, self.viewport);
            self.refresh_bounds();
            self.publish();
            let max = self.bounds.max_zoom;
            if self.scale() > max {
                self.zoom_to(max);
            } else {
                self.center(true, true);
            }
        }
    }

    /// Releases the bitmap and resets both transforms.
    pub fn clear(&mut self) -> Option<B> {
        self.pending = None;
        let image = self.image.take();
        self.base = Affine::IDENTITY;
        self.user = Affine::IDENTITY;
        self.refresh_bounds();
        self.publish();
        image
    }

    /// Increases whenever the composed transform changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Transform fitting the image into the viewport.
    #[must_use]
    pub fn base_transform(&self) -> Affine {
        self.base
    }

    /// Accumulated user zoom and pan.
    #[must_use]
    pub fn user_transform(&self) -> Affine {
        self.user
    }

    /// Image pixels to viewport pixels: base, then user.
    #[must_use]
    pub fn composed_transform(&self) -> Affine {
        self.composed
    }

    /// Viewport-space bounds of the transformed image.
    #[must_use]
    pub fn image_rect(&self) -> Option<Rect> {
        let size = self.image.as_ref()?.size();
        let top_left = self.composed * Point::ORIGIN;
        let bottom_right = self.composed * Point::new(size.width, size.height);
        Some(Rect::from_points(top_left, bottom_right))
    }

    /// Current zoom range.
    #[must_use]
    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// User scale at rest for the current image and viewport.
    #[must_use]
    pub fn default_zoom(&self) -> f64 {
        self.bounds.default_zoom
    }

    /// Largest user scale for the current image and viewport.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.bounds.max_zoom
    }

    /// Scale component of the user transform; `1.0` without an image.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.image.is_none() {
            return 1.0;
        }
        self.user.as_coeffs()[0]
    }

    /// Zooms to `scale` about the viewport center.
    pub fn zoom_to(&mut self, scale: f64) {
        let center = self.viewport_center();
        self.zoom_to_about(scale, center);
    }

    /// Zooms to `scale`, keeping `center` (viewport space) fixed, then
    /// re-centers.
    ///
    /// `scale` is clamped into `[1.0, max_zoom]`; NaN is ignored.
    pub fn zoom_to_about(&mut self, scale: f64, center: Point) {
        if self.image.is_none() || scale.is_nan() {
            return;
        }
        let target = self.bounds.clamp(scale);
        let delta = target / self.scale();
        self.user = scale_about_pinned(self.user, target, delta, center);
        self.publish();
        self.center(true, true);
    }

    /// Zooms in by [`DEFAULT_SCALE_RATE`].
    pub fn zoom_in(&mut self) {
        self.zoom_in_by(DEFAULT_SCALE_RATE);
    }

    /// Zooms out by [`DEFAULT_SCALE_RATE`].
    pub fn zoom_out(&mut self) {
        self.zoom_out_by(DEFAULT_SCALE_RATE);
    }

    /// Multiplies the scale by `rate` about the viewport center.
    pub fn zoom_in_by(&mut self, rate: f64) {
        if self.image.is_none() || rate.is_nan() || rate <= 0.0 {
            return;
        }
        self.zoom_to(self.scale() * rate);
    }

    /// Divides the scale by `rate` about the viewport center.
    ///
    /// When that would go below `1.0`, the user transform snaps back to
    /// identity instead.
    pub fn zoom_out_by(&mut self, rate: f64) {
        if self.image.is_none() || rate.is_nan() || rate <= 0.0 {
            return;
        }
        let scale = self.scale() / rate;
        if scale < 1.0 {
            self.user = Affine::IDENTITY;
            self.publish();
            self.center(true, true);
        } else {
            self.zoom_to(scale);
        }
    }

    /// Pans by `delta` in viewport space without any bounds check.
    pub fn post_translate(&mut self, delta: Vec2) {
        if self.image.is_none() {
            return;
        }
        self.user = self.user.then_translate(delta);
        self.publish();
    }

    /// Moves the image back into place along the requested axes.
    ///
    /// On each axis, an image smaller than the viewport is centered; a larger
    /// one is shifted so neither edge leaves a gap inside the viewport.
    /// Returns the translation applied.
    pub fn center(&mut self, vertical: bool, horizontal: bool) -> Vec2 {
        let Some(rect) = self.image_rect() else {
            return Vec2::ZERO;
        };
        let dx = if horizontal {
            axis_correction(rect.x0, rect.x1, self.viewport.width)
        } else {
            0.0
        };
        let dy = if vertical {
            axis_correction(rect.y0, rect.y1, self.viewport.height)
        } else {
            0.0
        };
        let delta = Vec2::new(dx, dy);
        if delta != Vec2::ZERO {
            self.post_translate(delta);
        }
        delta
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn refresh_bounds(&mut self) {
        let image = self.image.as_ref().map(Bitmap::size);
        let viewport = if is_usable(self.viewport) {
            self.viewport
        } else {
            Size::ZERO
        };
        self.bounds = ZoomBounds::compute(image, viewport, self.max_zoom_factor);
    }

    fn publish(&mut self) {
        let composed = self.user * self.base;
        if composed != self.composed {
            self.composed = composed;
            self.revision += 1;
        }
    }
}

/// `user.then_scale_about(delta, center)` with the scale coefficient pinned to
/// `target`, so repeated zooms land exactly on their target.
fn scale_about_pinned(user: Affine, target: f64, delta: f64, center: Point) -> Affine {
    let [_, _, _, _, tx, ty] = user.as_coeffs();
    let c = center.to_vec2();
    let t = (Vec2::new(tx, ty) - c) * delta + c;
    Affine::new([target, 0.0, 0.0, target, t.x, t.y])
}

/// Translation along one axis bringing `[lo, hi]` into place in `[0, extent]`.
fn axis_correction(lo: f64, hi: f64, extent: f64) -> f64 {
    let len = hi - lo;
    let d = if len < extent {
        (extent - len) / 2.0 - lo
    } else if lo > 0.0 {
        -lo
    } else if hi < extent {
        extent - hi
    } else {
        0.0
    };
    if d.abs() < CENTER_EPSILON { 0.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Pixels(u32, u32);

    impl Bitmap for Pixels {
        fn width(&self) -> u32 {
            self.0
        }
        fn height(&self) -> u32 {
            self.1
        }
    }

    fn engine(vw: f64, vh: f64, image: Pixels) -> TransformEngine<Pixels> {
        let mut e = TransformEngine::new();
        e.on_layout(vw, vh);
        e.set_image(Some(image));
        e
    }

    #[test]
    fn set_image_without_layout_is_deferred() {
        let mut e = TransformEngine::new();
        assert!(!e.set_image(Some(Pixels(800, 800))));
        assert!(!e.has_image());
        assert!(e.has_pending_image());
        assert_eq!(e.max_zoom(), 1.0);

        e.on_layout(400.0, 800.0);
        assert!(e.has_image());
        assert!(!e.has_pending_image());
        assert_eq!(e.max_zoom(), 32.0);
    }

    #[test]
    fn only_latest_deferred_image_is_kept() {
        let mut e = TransformEngine::new();
        e.set_image(Some(Pixels(10, 10)));
        e.set_image(Some(Pixels(800, 600)));
        e.on_layout(400.0, 300.0);
        assert_eq!(e.image(), Some(&Pixels(800, 600)));
    }

    #[test]
    fn initial_transform_fits_and_centers() {
        let e = engine(400.0, 800.0, Pixels(800, 800));
        assert_eq!(e.scale(), 1.0);
        assert_eq!(e.default_zoom(), 1.0);
        assert_eq!(e.image_rect(), Some(Rect::new(0.0, 200.0, 400.0, 600.0)));
    }

    #[test]
    fn small_image_rests_at_default_zoom() {
        let e = engine(400.0, 400.0, Pixels(100, 50));
        assert_eq!(e.default_zoom(), 4.0);
        assert_eq!(e.scale(), 4.0);
        // Fills the width, centered vertically.
        let rect = e.image_rect().unwrap();
        assert!((rect.x0 - 0.0).abs() < 1e-9);
        assert!((rect.x1 - 400.0).abs() < 1e-9);
        assert!((rect.y0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped_and_lands_exactly() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(1000.0);
        assert_eq!(e.scale(), 32.0);
        e.zoom_to(0.01);
        assert_eq!(e.scale(), 1.0);
        e.zoom_to(f64::NAN);
        assert_eq!(e.scale(), 1.0);
        e.zoom_to(2.5);
        assert_eq!(e.scale(), 2.5);
    }

    #[test]
    fn zoom_about_point_keeps_point_fixed_when_not_clamped() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(2.0);
        let anchor = Point::new(100.0, 400.0);
        let image_pt = e.composed_transform().inverse() * anchor;
        e.zoom_to_about(3.0, anchor);
        let after = e.composed_transform() * image_pt;
        assert!((after - anchor).hypot() < 1e-9);
    }

    #[test]
    fn zoom_out_snaps_to_identity() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(1.2);
        e.zoom_out();
        assert_eq!(e.scale(), 1.0);
        assert_eq!(e.user_transform(), Affine::IDENTITY);

        e.zoom_in();
        assert_eq!(e.scale(), 1.25);
        e.zoom_in_by(2.0);
        assert_eq!(e.scale(), 2.5);
        e.zoom_out_by(2.0);
        assert_eq!(e.scale(), 1.25);
    }

    #[test]
    fn center_clamps_pan_of_zoomed_image() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(4.0);
        // Image is 1600x1600 on screen; try to drag its left edge inwards.
        e.post_translate(Vec2::new(5000.0, 0.0));
        let applied = e.center(true, true);
        assert!(applied.x < 0.0);
        let rect = e.image_rect().unwrap();
        assert!(rect.x0.abs() < 1e-9);
        assert!(rect.y0 <= 0.0 && rect.y1 >= 800.0);
    }

    #[test]
    fn center_is_idempotent() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(3.0);
        e.post_translate(Vec2::new(-123.4, 56.7));
        e.center(true, true);
        assert_eq!(e.center(true, true), Vec2::ZERO);
    }

    #[test]
    fn center_respects_axis_flags() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.post_translate(Vec2::new(30.0, 40.0));
        assert_eq!(e.center(false, true), Vec2::new(-30.0, 0.0));
        assert_eq!(e.center(true, false), Vec2::new(0.0, -40.0));
    }

    #[test]
    fn revision_bumps_only_on_change() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        let r = e.revision();
        e.center(true, true);
        assert_eq!(e.revision(), r);
        e.zoom_to(2.0);
        assert!(e.revision() > r);
    }

    #[test]
    fn layout_change_refits_but_keeps_user_transform() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(2.0);
        e.on_layout(800.0, 400.0);
        assert_eq!(e.scale(), 2.0);
        assert_eq!(e.max_zoom(), 32.0);
        assert_eq!(
            e.base_transform(),
            base_transform(Size::new(800.0, 800.0), Size::new(800.0, 400.0))
        );
    }

    #[test]
    fn layout_change_clamps_scale_to_new_maximum() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(32.0);
        e.post_translate(Vec2::new(-3000.0, 0.0));
        e.on_layout(1600.0, 1600.0);
        assert_eq!(e.max_zoom(), 8.0);
        assert_eq!(e.scale(), 8.0);
        let rect = e.image_rect().unwrap();
        assert!(rect.x0 <= 0.0 && rect.x1 >= 1600.0);
        assert!(rect.y0 <= 0.0 && rect.y1 >= 1600.0);
        assert_eq!(e.center(true, true), Vec2::ZERO);
    }

    #[test]
    fn missing_image_is_identity() {
        let mut e = engine(400.0, 800.0, Pixels(800, 800));
        e.zoom_to(5.0);
        assert_eq!(e.clear(), Some(Pixels(800, 800)));
        assert_eq!(e.scale(), 1.0);
        assert_eq!(e.composed_transform(), Affine::IDENTITY);
        e.zoom_in();
        e.post_translate(Vec2::new(10.0, 10.0));
        assert_eq!(e.composed_transform(), Affine::IDENTITY);
        assert_eq!(e.center(true, true), Vec2::ZERO);
    }
}
