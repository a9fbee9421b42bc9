// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch state: turn multi-contact spans into incremental scale factors.
//!
//! ## Usage
//!
//! Feed every [`TouchEvent`] to [`PinchState::on_touch`]. While two or more
//! contacts are down and spread at least [`PinchState::min_span`] apart, the
//! pinch is *in progress* and each move yields a [`PinchEvent::Scale`] whose
//! factor is the ratio of the current span to the previous one.
//!
//! Whenever the contact count changes the span baseline is reset, so adding
//! or lifting a finger never produces a jump.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::pinch::{PinchEvent, PinchState};
//! use understory_event_state::touch::{TouchEvent, TouchPhase};
//!
//! let mut pinch = PinchState::new();
//! let two = |a: f64, b: f64, phase, t| {
//!     TouchEvent::new(phase, [Point::new(a, 100.0), Point::new(b, 100.0)], t)
//! };
//!
//! pinch.on_touch(&TouchEvent::down(Point::new(100.0, 100.0), 0));
//! assert!(matches!(
//!     pinch.on_touch(&two(100.0, 200.0, TouchPhase::Down, 10)),
//!     Some(PinchEvent::Begin { .. })
//! ));
//! assert!(pinch.is_in_progress());
//!
//! // Span grows from 100 to 200: scale factor 2.
//! let Some(PinchEvent::Scale(update)) = pinch.on_touch(&two(50.0, 250.0, TouchPhase::Move, 20))
//! else {
//!     panic!("expected a scale update");
//! };
//! assert_eq!(update.scale_factor, 2.0);
//! assert_eq!(update.focus, Point::new(150.0, 100.0));
//! ```

use kurbo::Point;

use crate::touch::{TouchEvent, TouchPhase};

/// Default minimum contact spread, in view pixels, for a pinch to start.
pub const DEFAULT_MIN_SPAN: f64 = 16.0;

/// One step of an in-progress pinch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchUpdate {
    /// Current span divided by the previous span.
    pub scale_factor: f64,
    /// Centroid of the contacts.
    pub focus: Point,
}

/// Transitions reported by [`PinchState::on_touch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinchEvent {
    /// A pinch started.
    Begin {
        /// Centroid of the contacts.
        focus: Point,
        /// Initial span.
        span: f64,
    },
    /// The span changed during a pinch.
    Scale(PinchUpdate),
    /// The pinch ended.
    End,
}

/// Tracks whether a pinch is in progress and its span baseline.
#[derive(Clone, Copy, Debug)]
pub struct PinchState {
    in_progress: bool,
    prev_span: Option<f64>,
    min_span: f64,
}

impl Default for PinchState {
    fn default() -> Self {
        Self::new()
    }
}

impl PinchState {
    /// Creates an idle pinch tracker with [`DEFAULT_MIN_SPAN`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_span(DEFAULT_MIN_SPAN)
    }

    /// Creates an idle pinch tracker requiring at least `min_span` pixels.
    #[must_use]
    pub fn with_min_span(min_span: f64) -> Self {
        Self {
            in_progress: false,
            prev_span: None,
            min_span: min_span.max(f64::MIN_POSITIVE),
        }
    }

    /// Minimum span for a pinch to start or continue scaling.
    #[must_use]
    pub fn min_span(&self) -> f64 {
        self.min_span
    }

    /// Returns `true` while a pinch owns the contacts.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Ends any pinch and forgets the baseline.
    pub fn reset(&mut self) {
        self.in_progress = false;
        self.prev_span = None;
    }

    /// Processes one event, returning a transition if one happened.
    pub fn on_touch(&mut self, event: &TouchEvent) -> Option<PinchEvent> {
        let count = event.pointer_count();
        match event.phase {
            TouchPhase::Cancel => self.end(),
            TouchPhase::Down => {
                if self.in_progress {
                    // Another contact joined; its position shifts the span.
                    self.prev_span = Some(event.span());
                    None
                } else if count >= 2 {
                    self.try_begin(event)
                } else {
                    None
                }
            }
            TouchPhase::Move => {
                if count < 2 {
                    return self.end();
                }
                if !self.in_progress {
                    return self.try_begin(event);
                }
                let span = event.span();
                let Some(prev) = self.prev_span else {
                    self.prev_span = Some(span);
                    return None;
                };
                if span < self.min_span {
                    return None;
                }
                self.prev_span = Some(span);
                Some(PinchEvent::Scale(PinchUpdate {
                    scale_factor: span / prev,
                    focus: event.focus()?,
                }))
            }
            TouchPhase::Up => {
                if !self.in_progress {
                    return None;
                }
                if count > 2 {
                    // Unknown which contact lifted: rebaseline on the next move.
                    self.prev_span = None;
                    None
                } else {
                    self.end()
                }
            }
        }
    }

    fn try_begin(&mut self, event: &TouchEvent) -> Option<PinchEvent> {
        let span = event.span();
        if span < self.min_span {
            return None;
        }
        self.in_progress = true;
        self.prev_span = Some(span);
        Some(PinchEvent::Begin {
            focus: event.focus()?,
            span,
        })
    }

    fn end(&mut self) -> Option<PinchEvent> {
        let was = self.in_progress;
        self.reset();
        was.then_some(PinchEvent::End)
    }
}
