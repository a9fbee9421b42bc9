// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch intake: the pinch detector sees every event, the gesture detector
//! only the ones arriving while no pinch is in progress.

use kurbo::Vec2;
use understory_event_state::gesture::Gesture;
use understory_event_state::pinch::PinchEvent;
use understory_event_state::touch::{Contact, TouchEvent};
use understory_zoom::Bitmap;

use crate::view::{Task, TaskKey, ZoomView};

impl<B: Bitmap> ZoomView<B> {
    /// Feeds one touch event through the pinch and gesture detectors.
    ///
    /// Returns `true` if the event was consumed, which is always the case
    /// while an image is installed.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.engine.has_image() {
            return false;
        }
        if let Some(pinch) = self.pinch.on_touch(event) {
            self.on_pinch(pinch);
        }
        if !self.pinch.is_in_progress() {
            if let Some(gesture) = self.gestures.on_touch(event) {
                self.on_gesture(gesture, event.time);
            }
        }
        self.sync();
        true
    }

    fn on_pinch(&mut self, event: PinchEvent) {
        match event {
            PinchEvent::Begin { focus, span } => {
                log::debug!("pinch begin at {focus:?}, span {span}");
                // The pinch owns the scale until it ends.
                self.tasks.cancel(TaskKey::ZoomAnimation);
                self.tasks.cancel(TaskKey::Fling);
            }
            PinchEvent::Scale(update) => {
                let target = self.zoom_bounds().clamp(self.scale() * update.scale_factor);
                self.engine.zoom_to_about(target, update.focus);
            }
            PinchEvent::End => log::debug!("pinch end at scale {}", self.scale()),
        }
    }

    fn on_gesture(&mut self, gesture: Gesture, now: u64) {
        match gesture {
            Gesture::SingleTapUp { confirm_at, .. } => {
                self.tasks
                    .post(TaskKey::TapConfirm, confirm_at, Task::ConfirmTap);
            }
            Gesture::DoubleTap { position } => {
                self.tasks.cancel(TaskKey::TapConfirm);
                let default_zoom = self.default_zoom();
                if self.scale() > default_zoom {
                    log::debug!("double tap: back to rest");
                    self.tasks.cancel(TaskKey::ZoomAnimation);
                    self.engine.zoom_to(default_zoom);
                } else {
                    log::debug!("double tap: zoom in at {position:?}");
                    let target = default_zoom * self.config.double_tap_zoom;
                    let duration = self.config.double_tap_duration;
                    self.zoom_to_animated(target, position, duration, now);
                }
            }
            Gesture::Scroll {
                start,
                current,
                distance,
            } => {
                if !self.owns_drag(&start, &current) || self.scale() <= self.default_zoom() {
                    return;
                }
                self.tasks.cancel(TaskKey::Fling);
                self.engine.post_translate(-distance);
                self.engine.center(true, true);
            }
            Gesture::Fling {
                start,
                end,
                velocity,
            } => {
                if !self.owns_drag(&start, &end) {
                    return;
                }
                let threshold = self.config.fling_velocity_threshold;
                if velocity.x.abs() <= threshold && velocity.y.abs() <= threshold {
                    return;
                }
                let distance: Vec2 = (end.position - start.position) / 2.0;
                log::debug!("fling at {velocity:?}");
                self.scroll_by(distance, self.config.fling_duration, now);
            }
        }
    }

    /// Single contact at both ends and no pinch running.
    fn owns_drag(&self, start: &Contact, end: &Contact) -> bool {
        !start.is_multi_touch() && !end.is_multi_touch() && !self.pinch.is_in_progress()
    }
}
