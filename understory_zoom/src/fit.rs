// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Size, Vec2};

/// Default ratio between the maximum zoom and the image/viewport size ratio.
pub const DEFAULT_MAX_ZOOM_FACTOR: f64 = 16.0;

/// Returns `true` if both dimensions are strictly positive and finite.
pub(crate) fn is_usable(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0 && size.is_finite()
}

/// Transform fitting an image into a viewport: scaled down (never up) to fit,
/// then centered.
///
/// Returns identity when either size is empty.
#[must_use]
pub fn base_transform(image: Size, viewport: Size) -> Affine {
    if !is_usable(image) || !is_usable(viewport) {
        return Affine::IDENTITY;
    }
    let width_scale = (viewport.width / image.width).min(1.0);
    let height_scale = (viewport.height / image.height).min(1.0);
    let scale = width_scale.min(height_scale);
    let offset = Vec2::new(
        (viewport.width - image.width * scale) / 2.0,
        (viewport.height - image.height * scale) / 2.0,
    );
    Affine::scale(scale).then_translate(offset)
}

/// Zoom range for the user transform of one image in one viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    /// User scale at rest: `max(1, min(vw / iw, vh / ih))`.
    pub default_zoom: f64,
    /// Largest user scale: `max_factor * max(iw / vw, ih / vh)`, never below
    /// `default_zoom`.
    pub max_zoom: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::UNIT
    }
}

impl ZoomBounds {
    /// Bounds without an image or layout: no zoom at all.
    pub const UNIT: Self = Self {
        default_zoom: 1.0,
        max_zoom: 1.0,
    };

    /// Computes the bounds for `image` shown in `viewport`.
    #[must_use]
    pub fn compute(image: Option<Size>, viewport: Size, max_factor: f64) -> Self {
        let Some(image) = image.filter(|s| is_usable(*s)) else {
            return Self::UNIT;
        };
        if !is_usable(viewport) {
            return Self::UNIT;
        }
        let fit = (viewport.width / image.width).min(viewport.height / image.height);
        let default_zoom = fit.max(1.0);
        let ratio = (image.width / viewport.width).max(image.height / viewport.height);
        Self {
            default_zoom,
            max_zoom: (max_factor * ratio).max(default_zoom),
        }
    }

    /// Clamps a user scale into `[1.0, max_zoom]`.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(1.0, self.max_zoom.max(1.0))
    }
}
