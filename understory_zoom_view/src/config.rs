// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_event_state::gesture::GestureConfig;
use understory_event_state::pinch::DEFAULT_MIN_SPAN;
use understory_zoom::{DEFAULT_MAX_ZOOM_FACTOR, DEFAULT_SCALE_RATE};

/// Tuning knobs for a [`ZoomView`](crate::ZoomView).
///
/// Times are in milliseconds, velocities in view pixels per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomViewConfig {
    /// Multiplier used by `zoom_in` / `zoom_out`.
    pub scale_rate: f64,
    /// Maximum zoom relative to the image/viewport size ratio.
    pub max_zoom_factor: f64,
    /// A double tap at rest zooms to this multiple of the default zoom.
    pub double_tap_zoom: f64,
    /// Duration of the double-tap zoom animation.
    pub double_tap_duration: u64,
    /// Release speed on either axis above which a fling scrolls.
    pub fling_velocity_threshold: f64,
    /// Duration of the fling scroll.
    pub fling_duration: u64,
    /// Minimum time between two filtered software paints.
    pub paint_delay: u64,
    /// Duration of the animated centering hint.
    pub settle_duration: u64,
    /// Delay between steps of self-rescheduling animations.
    pub frame_interval: u64,
    /// Bitmaps taller than this prefer software compositing.
    pub software_layer_min_height: Option<u32>,
    /// Tap, scroll and fling classification.
    pub gesture: GestureConfig,
    /// Minimum contact spread for a pinch.
    pub pinch_min_span: f64,
}

impl Default for ZoomViewConfig {
    fn default() -> Self {
        Self {
            scale_rate: DEFAULT_SCALE_RATE,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            double_tap_zoom: 3.0,
            double_tap_duration: 200,
            fling_velocity_threshold: 800.0,
            fling_duration: 300,
            paint_delay: 250,
            settle_duration: 250,
            frame_interval: 16,
            software_layer_min_height: Some(1800),
            gesture: GestureConfig::default(),
            pinch_min_span: DEFAULT_MIN_SPAN,
        }
    }
}
