// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Vec2};

/// Output of a [`ZoomView`](crate::ZoomView), drained by the host with
/// [`ZoomView::drain_events`](crate::ZoomView::drain_events).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// The composed image transform changed; the host should repaint.
    TransformChanged(Affine),
    /// A single tap was confirmed on the image.
    ImageTouched,
    /// A deferred filtered repaint is due; the host should repaint.
    RepaintRequested,
    /// Centering moved the image; the host may animate the jump by drawing
    /// with an extra offset easing from `from_offset` to zero.
    SettleAnimation {
        /// Offset at the start of the animation, in view pixels.
        from_offset: Vec2,
        /// Animation length in milliseconds.
        duration: u64,
    },
}
