// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom_view --heading-base-level=0

//! Understory Zoom View: a headless, pannable and zoomable image view.
//!
//! [`ZoomView`] ties together three pieces:
//!
//! - **Transform**: an [`understory_zoom::TransformEngine`] fitting the image
//!   into the viewport and tracking the user's zoom and pan.
//! - **Gesture routing**: touch events go to a pinch detector first and to a
//!   tap/scroll/fling classifier only while no pinch is running
//!   (see [`understory_event_state`]). Pinches zoom about their focus, drags
//!   pan a zoomed image, flings scroll with an ease-out, double taps toggle
//!   between rest and a closer zoom.
//! - **Rendering**: [`ZoomView::render`] draws through the composed transform
//!   onto a [`RenderSurface`]. Without hardware compositing, filtered paints
//!   are rate limited and drafts schedule one deferred repaint.
//!
//! Nothing here owns a clock or a thread. Time is passed in as milliseconds;
//! animations and deferred work are keyed tasks in an
//! [`understory_timing::TimerQueue`] that the host drives with
//! [`ZoomView::tick`]. Outputs are [`ViewEvent`]s the host drains.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_zoom_view::{Bitmap, TouchEvent, ViewEvent, ZoomView};
//!
//! struct Photo;
//! impl Bitmap for Photo {
//!     fn width(&self) -> u32 { 800 }
//!     fn height(&self) -> u32 { 800 }
//! }
//!
//! let mut view = ZoomView::default();
//! view.on_layout(400.0, 800.0);
//! view.set_image(Some(Photo));
//!
//! // Double tap: zooms to 3x over 200 ms.
//! let at = Point::new(200.0, 400.0);
//! view.on_touch_event(&TouchEvent::down(at, 0));
//! view.on_touch_event(&TouchEvent::up(at, 50));
//! view.on_touch_event(&TouchEvent::down(at, 150));
//! view.on_touch_event(&TouchEvent::up(at, 180));
//!
//! while let Some(deadline) = view.next_deadline() {
//!     view.tick(deadline);
//! }
//! assert_eq!(view.scale(), 3.0);
//! assert!(view
//!     .drain_events()
//!     .any(|e| matches!(e, ViewEvent::TransformChanged(_))));
//! ```
//!
//! Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animation;
mod config;
mod event;
mod render;
mod router;
mod view;

pub use animation::{Fling, ZoomAnimation, ease_out};
pub use config::ZoomViewConfig;
pub use event::ViewEvent;
pub use render::{RenderPass, RenderSurface};
pub use view::{TaskKey, ZoomView};

pub use understory_event_state::touch::{TouchEvent, TouchPhase};
pub use understory_zoom::Bitmap;
