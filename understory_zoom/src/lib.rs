// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom --heading-base-level=0

//! Understory Zoom: the transform engine behind a pannable, zoomable image.
//!
//! Given a bitmap and a viewport, [`TransformEngine`] maintains the affine
//! transform from image pixels to viewport pixels as two parts:
//!
//! - A **base** transform that fits the image into the viewport (scaling
//!   down, never up) and centers it. See [`base_transform`].
//! - A **user** transform accumulating zoom and pan. Its scale is kept in
//!   `[1.0, max_zoom]`, where both the resting ("default") zoom and the
//!   maximum come from [`ZoomBounds`].
//!
//! The renderer only ever sees the composed transform (base, then user).
//!
//! It does **not** own any input handling, animation clock or rendering
//! backend. Callers are expected to:
//! - Feed layout changes through [`TransformEngine::on_layout`].
//! - Translate gestures into zoom and pan calls at a higher layer.
//! - Watch [`TransformEngine::revision`] to know when to repaint.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_zoom::{Bitmap, TransformEngine};
//!
//! struct Photo;
//! impl Bitmap for Photo {
//!     fn width(&self) -> u32 { 800 }
//!     fn height(&self) -> u32 { 800 }
//! }
//!
//! let mut engine = TransformEngine::new();
//!
//! // No layout yet: installing the image waits for one.
//! engine.set_image(Some(Photo));
//! engine.on_layout(400.0, 800.0);
//! assert_eq!(engine.scale(), 1.0);
//! assert_eq!(engine.max_zoom(), 32.0);
//!
//! // Zoom about a point, then try to drag the image out of view.
//! engine.zoom_to_about(3.0, Point::new(100.0, 400.0));
//! engine.post_translate(Vec2::new(10_000.0, 0.0));
//! engine.center(true, true);
//! let rect = engine.image_rect().unwrap();
//! assert!(rect.x0.abs() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - Zoom is uniform; the user transform is always scale plus translation.
//! - Out-of-range requests are clamped rather than rejected, and every
//!   operation is a no-op without an image.
//! - Transforms are [`kurbo::Affine`] values; each operation replaces them.
//!
//! This crate is `no_std`.

#![no_std]

mod bitmap;
mod engine;
mod fit;

pub use bitmap::Bitmap;
pub use engine::{DEFAULT_SCALE_RATE, TransformEngine};
pub use fit::{DEFAULT_MAX_ZOOM_FACTOR, ZoomBounds, base_transform};
