// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::{Drain, Vec};

use kurbo::{Affine, Point, Vec2};
use peniko::ImageData;
use understory_event_state::gesture::GestureState;
use understory_event_state::pinch::PinchState;
use understory_timing::TimerQueue;
use understory_zoom::{Bitmap, TransformEngine, ZoomBounds};

use crate::animation::{Fling, ZoomAnimation};
use crate::config::ZoomViewConfig;
use crate::event::ViewEvent;

/// Purpose a scheduled task is posted under.
///
/// At most one task per key is pending; posting replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Animated zoom from [`ZoomView::zoom_to_animated`].
    ZoomAnimation,
    /// Decelerating scroll from [`ZoomView::scroll_by`].
    Fling,
    /// Deferred filtered repaint after a draft paint.
    RepaintDebounce,
    /// Confirmation of a single tap once no double tap can follow.
    TapConfirm,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Task {
    Zoom(ZoomAnimation),
    Fling(Fling),
    Repaint,
    ConfirmTap,
}

/// A headless zoomable image view.
///
/// Owns a [`TransformEngine`], the pinch and gesture detectors and a queue of
/// scheduled tasks. The host:
/// - forwards layout with [`ZoomView::on_layout`] and input with
///   [`ZoomView::on_touch_event`];
/// - calls [`ZoomView::tick`] whenever its clock reaches
///   [`ZoomView::next_deadline`];
/// - drains [`ViewEvent`]s and calls [`ZoomView::render`] when asked to
///   repaint.
#[derive(Debug)]
pub struct ZoomView<B = ImageData> {
    pub(crate) engine: TransformEngine<B>,
    pub(crate) pinch: PinchState,
    pub(crate) gestures: GestureState,
    pub(crate) tasks: TimerQueue<TaskKey, Task>,
    pub(crate) events: Vec<ViewEvent>,
    pub(crate) config: ZoomViewConfig,
    pub(crate) last_filtered: Option<u64>,
    pub(crate) prefers_software: bool,
    published: u64,
}

impl<B: Bitmap> Default for ZoomView<B> {
    fn default() -> Self {
        Self::new(ZoomViewConfig::default())
    }
}

impl<B: Bitmap> ZoomView<B> {
    /// Creates an empty view.
    #[must_use]
    pub fn new(config: ZoomViewConfig) -> Self {
        let engine = TransformEngine::new().with_max_zoom_factor(config.max_zoom_factor);
        let published = engine.revision();
        Self {
            engine,
            pinch: PinchState::with_min_span(config.pinch_min_span),
            gestures: GestureState::new(config.gesture),
            tasks: TimerQueue::new(),
            events: Vec::new(),
            config,
            last_filtered: None,
            prefers_software: false,
            published,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ZoomViewConfig {
        &self.config
    }

    /// The underlying transform state.
    #[must_use]
    pub fn engine(&self) -> &TransformEngine<B> {
        &self.engine
    }

    /// Installs `image`, or removes the current one with `None`.
    ///
    /// Deferred until the first layout with a usable width. Any running zoom
    /// animation or fling is cancelled. Returns `true` if installed now.
    pub fn set_image(&mut self, image: Option<B>) -> bool {
        self.tasks.cancel(TaskKey::ZoomAnimation);
        self.tasks.cancel(TaskKey::Fling);
        self.prefers_software = match (&image, self.config.software_layer_min_height) {
            (Some(b), Some(limit)) => b.height() > limit,
            _ => false,
        };
        self.last_filtered = None;
        let installed = self.engine.set_image(image);
        if !installed {
            log::debug!("image deferred until layout");
        }
        self.sync();
        installed
    }

    /// Updates the viewport size, running a deferred `set_image` if any.
    pub fn on_layout(&mut self, width: f64, height: f64) {
        log::debug!("layout {width}x{height}");
        self.engine.on_layout(width, height);
        self.sync();
    }

    /// Releases the bitmap, cancels every task and resets the detectors.
    pub fn clear(&mut self) -> Option<B> {
        self.tasks.clear();
        self.pinch.reset();
        self.gestures.reset();
        self.prefers_software = false;
        self.last_filtered = None;
        let image = self.engine.clear();
        self.sync();
        image
    }

    /// The installed bitmap.
    #[must_use]
    pub fn image(&self) -> Option<&B> {
        self.engine.image()
    }

    /// Current user scale; `1.0` without an image.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.engine.scale()
    }

    /// User scale at rest.
    #[must_use]
    pub fn default_zoom(&self) -> f64 {
        self.engine.default_zoom()
    }

    /// Largest user scale.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.engine.max_zoom()
    }

    /// Composed image-to-view transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.engine.composed_transform()
    }

    /// Returns `true` if the installed bitmap is tall enough that software
    /// compositing is used even on accelerated surfaces.
    #[must_use]
    pub fn prefers_software_rendering(&self) -> bool {
        self.prefers_software
    }

    /// Zooms to `scale` about the viewport center.
    pub fn zoom_to(&mut self, scale: f64) {
        self.engine.zoom_to(scale);
        self.sync();
    }

    /// Zooms to `scale` keeping `center` fixed, then re-centers.
    pub fn zoom_to_about(&mut self, scale: f64, center: Point) {
        self.engine.zoom_to_about(scale, center);
        self.sync();
    }

    /// Animates the scale linearly to `scale` about `center` over `duration`
    /// milliseconds, starting at host time `now`.
    ///
    /// Replaces any running zoom animation. A zero duration zooms at once.
    pub fn zoom_to_animated(&mut self, scale: f64, center: Point, duration: u64, now: u64) {
        if !self.engine.has_image() || scale.is_nan() {
            return;
        }
        if duration == 0 {
            self.tasks.cancel(TaskKey::ZoomAnimation);
            self.zoom_to_about(scale, center);
            return;
        }
        let anim = ZoomAnimation {
            from: self.scale(),
            to: self.engine.zoom_bounds().clamp(scale),
            center,
            start: now,
            duration,
        };
        log::debug!("zoom animation {} -> {} over {duration}ms", anim.from, anim.to);
        self.tasks.post(TaskKey::ZoomAnimation, now, Task::Zoom(anim));
    }

    /// The running zoom animation.
    #[must_use]
    pub fn zoom_animation(&self) -> Option<&ZoomAnimation> {
        match self.tasks.get(TaskKey::ZoomAnimation)? {
            Task::Zoom(anim) => Some(anim),
            _ => None,
        }
    }

    /// Zooms in by the configured rate.
    pub fn zoom_in(&mut self) {
        self.zoom_in_by(self.config.scale_rate);
    }

    /// Zooms out by the configured rate.
    pub fn zoom_out(&mut self) {
        self.zoom_out_by(self.config.scale_rate);
    }

    /// Multiplies the scale by `rate`.
    pub fn zoom_in_by(&mut self, rate: f64) {
        self.engine.zoom_in_by(rate);
        self.sync();
    }

    /// Divides the scale by `rate`, snapping back to rest below `1.0`.
    pub fn zoom_out_by(&mut self, rate: f64) {
        self.engine.zoom_out_by(rate);
        self.sync();
    }

    /// Pans by `delta` without any bounds check.
    pub fn post_translate(&mut self, delta: Vec2) {
        self.engine.post_translate(delta);
        self.sync();
    }

    /// Moves the image back into place along the requested axes.
    ///
    /// With `animate`, a nonzero correction also emits
    /// [`ViewEvent::SettleAnimation`] so the host can ease the jump.
    pub fn center(&mut self, vertical: bool, horizontal: bool, animate: bool) -> Vec2 {
        let delta = self.engine.center(vertical, horizontal);
        if animate && delta != Vec2::ZERO {
            self.events.push(ViewEvent::SettleAnimation {
                from_offset: -delta,
                duration: self.config.settle_duration,
            });
        }
        self.sync();
        delta
    }

    /// Scrolls by `distance` with a cubic ease-out over `duration`
    /// milliseconds, re-centering after every step.
    ///
    /// Replaces any running fling. A zero duration scrolls at once.
    pub fn scroll_by(&mut self, distance: Vec2, duration: u64, now: u64) {
        if !self.engine.has_image() || !distance.is_finite() {
            return;
        }
        if duration == 0 {
            self.tasks.cancel(TaskKey::Fling);
            self.engine.post_translate(distance);
            self.engine.center(true, true);
            self.sync();
            return;
        }
        log::debug!("scroll by {distance:?} over {duration}ms");
        self.tasks
            .post(TaskKey::Fling, now, Task::Fling(Fling::new(distance, now, duration)));
    }

    /// The running fling.
    #[must_use]
    pub fn fling(&self) -> Option<&Fling> {
        match self.tasks.get(TaskKey::Fling)? {
            Task::Fling(fling) => Some(fling),
            _ => None,
        }
    }

    /// Returns `true` if a task is pending under `key`.
    #[must_use]
    pub fn is_task_pending(&self, key: TaskKey) -> bool {
        self.tasks.is_pending(key)
    }

    /// Host time at which [`ZoomView::tick`] should next be called.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.next_deadline()
    }

    /// Runs every task due at host time `now`.
    ///
    /// Animations step once and re-post themselves one frame interval later
    /// until they finish.
    pub fn tick(&mut self, now: u64) {
        while let Some(fired) = self.tasks.pop_due(now) {
            self.run(fired.task, now);
        }
        self.sync();
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Drain<'_, ViewEvent> {
        self.events.drain(..)
    }

    fn run(&mut self, task: Task, now: u64) {
        // A zero interval would re-post at `now` and never leave `tick`.
        let next = now + self.config.frame_interval.max(1);
        match task {
            Task::Zoom(anim) => {
                let scale = anim.scale_at(now);
                log::trace!("zoom step {scale}");
                self.engine.zoom_to_about(scale, anim.center);
                if !anim.is_finished(now) {
                    self.tasks.post(TaskKey::ZoomAnimation, next, Task::Zoom(anim));
                }
            }
            Task::Fling(mut fling) => {
                let delta = fling.advance(now);
                log::trace!("fling step {delta:?}");
                self.engine.post_translate(delta);
                self.engine.center(true, true);
                if !fling.is_finished(now) {
                    self.tasks.post(TaskKey::Fling, next, Task::Fling(fling));
                }
            }
            Task::Repaint => self.events.push(ViewEvent::RepaintRequested),
            Task::ConfirmTap => {
                if self.gestures.confirm_tap(now).is_some() {
                    log::debug!("image touched");
                    self.events.push(ViewEvent::ImageTouched);
                }
            }
        }
    }

    pub(crate) fn zoom_bounds(&self) -> ZoomBounds {
        self.engine.zoom_bounds()
    }

    /// Emits [`ViewEvent::TransformChanged`] if the engine published a new
    /// transform since the last call.
    pub(crate) fn sync(&mut self) {
        let revision = self.engine.revision();
        if revision != self.published {
            self.published = revision;
            self.events
                .push(ViewEvent::TransformChanged(self.engine.composed_transform()));
        }
    }
}
