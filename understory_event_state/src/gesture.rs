// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture state: classify a contact stream into taps, double taps, scrolls
//! and flings.
//!
//! ## Usage
//!
//! 1) Feed each [`TouchEvent`] to [`GestureState::on_touch`] and act on the
//!    returned [`Gesture`].
//! 2) A [`Gesture::SingleTapUp`] is only a candidate: a second tap may still
//!    turn it into a double tap. Once the host clock reaches its
//!    `confirm_at`, call [`GestureState::confirm_tap`]; it yields the tap
//!    position only if no second tap intervened.
//!
//! Time is supplied by the caller through event timestamps, so the state
//! machine never reads a clock.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::gesture::{Gesture, GestureState};
//! use understory_event_state::touch::TouchEvent;
//!
//! let mut gestures = GestureState::default();
//!
//! gestures.on_touch(&TouchEvent::down(Point::new(10.0, 10.0), 0));
//! let Some(Gesture::SingleTapUp { confirm_at, .. }) =
//!     gestures.on_touch(&TouchEvent::up(Point::new(11.0, 10.0), 60))
//! else {
//!     panic!("expected a tap");
//! };
//!
//! // A second tap arrives in time: double tap, and the first tap is dropped.
//! let second = gestures.on_touch(&TouchEvent::down(Point::new(12.0, 11.0), 200));
//! assert!(matches!(second, Some(Gesture::DoubleTap { .. })));
//! assert_eq!(gestures.confirm_tap(confirm_at), None);
//! ```

use kurbo::{Point, Vec2};

use crate::touch::{Contact, TouchEvent, TouchPhase};
use crate::velocity::{DEFAULT_HORIZON_MS, VelocityTracker};

/// Distances and timeouts used to classify gestures.
///
/// Distances are in view pixels, times in milliseconds, velocities in pixels
/// per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Movement from the down position beyond which a touch stops being a tap.
    pub touch_slop: f64,
    /// Maximum distance between the two downs of a double tap.
    pub double_tap_slop: f64,
    /// Maximum gap between the first up and the second down of a double tap;
    /// also how long a single tap waits before being confirmed.
    pub double_tap_timeout: u64,
    /// Minimum gap between the first up and the second down of a double tap.
    pub double_tap_min_time: u64,
    /// Presses held longer than this are not taps.
    pub long_press_timeout: u64,
    /// Minimum release speed on either axis for a fling.
    pub min_fling_velocity: f64,
    /// How far back release velocity looks.
    pub velocity_horizon: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            double_tap_slop: 100.0,
            double_tap_timeout: 300,
            double_tap_min_time: 40,
            long_press_timeout: 500,
            min_fling_velocity: 50.0,
            velocity_horizon: DEFAULT_HORIZON_MS,
        }
    }
}

/// A classified gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A tap ended; confirm it with [`GestureState::confirm_tap`] at
    /// `confirm_at`.
    SingleTapUp {
        /// Where the tap ended.
        position: Point,
        /// Host time after which the tap counts as a single tap.
        confirm_at: u64,
    },
    /// The second down of a double tap.
    DoubleTap {
        /// Where the second tap went down.
        position: Point,
    },
    /// The contact moved since the last report.
    Scroll {
        /// The down that started the gesture.
        start: Contact,
        /// The current event.
        current: Contact,
        /// Previous focus minus current focus.
        distance: Vec2,
    },
    /// The contact lifted while moving fast.
    Fling {
        /// The down that started the gesture.
        start: Contact,
        /// The final up.
        end: Contact,
        /// Release velocity in pixels per second.
        velocity: Vec2,
    },
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    confirm_at: u64,
}

/// Classifies single-contact motion into [`Gesture`]s.
#[derive(Clone, Debug)]
pub struct GestureState {
    config: GestureConfig,
    down: Option<Contact>,
    last_focus: Option<Point>,
    in_tap_region: bool,
    double_tapping: bool,
    previous_tap: Option<(Contact, Contact)>,
    pending_tap: Option<PendingTap>,
    velocity: VelocityTracker,
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureState {
    /// Creates an idle classifier.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            down: None,
            last_focus: None,
            in_tap_region: false,
            double_tapping: false,
            previous_tap: None,
            pending_tap: None,
            velocity: VelocityTracker::new(config.velocity_horizon),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Returns `true` between a down and its final up.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.down.is_some()
    }

    /// Forgets the current gesture and any tap awaiting confirmation.
    pub fn reset(&mut self) {
        self.down = None;
        self.last_focus = None;
        self.in_tap_region = false;
        self.double_tapping = false;
        self.previous_tap = None;
        self.pending_tap = None;
        self.velocity.clear();
    }

    /// Confirms the pending single tap if `now` reached its deadline.
    ///
    /// Returns the tap position at most once per tap.
    pub fn confirm_tap(&mut self, now: u64) -> Option<Point> {
        let tap = self.pending_tap?;
        if now < tap.confirm_at || self.down.is_some() {
            return None;
        }
        self.pending_tap = None;
        Some(tap.position)
    }

    /// Processes one event.
    pub fn on_touch(&mut self, event: &TouchEvent) -> Option<Gesture> {
        match event.phase {
            TouchPhase::Down => self.on_down(event),
            TouchPhase::Move => self.on_move(event),
            TouchPhase::Up => self.on_up(event),
            TouchPhase::Cancel => {
                self.reset();
                None
            }
        }
    }

    fn on_down(&mut self, event: &TouchEvent) -> Option<Gesture> {
        let contact = Contact::of(event)?;
        if contact.is_multi_touch() {
            // An extra finger: no longer a tap, and the focus jumps.
            self.in_tap_region = false;
            self.last_focus = None;
            self.previous_tap = None;
            self.pending_tap = None;
            return None;
        }

        self.pending_tap = None;
        self.velocity.clear();
        self.velocity.add(contact.time, contact.position);
        self.down = Some(contact);
        self.last_focus = Some(contact.position);
        self.in_tap_region = true;

        if let Some((first_down, first_up)) = self.previous_tap.take() {
            if self.is_double_tap(&first_down, &first_up, &contact) {
                self.double_tapping = true;
                return Some(Gesture::DoubleTap {
                    position: contact.position,
                });
            }
        }
        None
    }

    fn on_move(&mut self, event: &TouchEvent) -> Option<Gesture> {
        let start = self.down?;
        let current = Contact::of(event)?;
        self.velocity.add(current.time, current.position);

        let Some(last) = self.last_focus else {
            self.last_focus = Some(current.position);
            return None;
        };
        if self.double_tapping {
            return None;
        }

        let distance = last - current.position;
        if self.in_tap_region {
            let travelled = current.position - start.position;
            if travelled.hypot() <= self.config.touch_slop {
                return None;
            }
            self.in_tap_region = false;
        } else if distance.x.abs() < 1.0 && distance.y.abs() < 1.0 {
            return None;
        }

        self.last_focus = Some(current.position);
        Some(Gesture::Scroll {
            start,
            current,
            distance,
        })
    }

    fn on_up(&mut self, event: &TouchEvent) -> Option<Gesture> {
        let start = self.down?;
        let end = Contact::of(event)?;
        if end.is_multi_touch() {
            // Not the last contact: keep tracking, rebaseline the focus.
            self.in_tap_region = false;
            self.last_focus = None;
            self.velocity.clear();
            return None;
        }

        self.down = None;
        self.last_focus = None;
        self.velocity.add(end.time, end.position);

        let gesture = if self.double_tapping {
            self.double_tapping = false;
            None
        } else if self.in_tap_region {
            if end.time.saturating_sub(start.time) < self.config.long_press_timeout {
                let confirm_at = end.time + self.config.double_tap_timeout;
                self.previous_tap = Some((start, end));
                self.pending_tap = Some(PendingTap {
                    position: end.position,
                    confirm_at,
                });
                Some(Gesture::SingleTapUp {
                    position: end.position,
                    confirm_at,
                })
            } else {
                None
            }
        } else {
            self.velocity
                .velocity()
                .filter(|v| {
                    v.x.abs() > self.config.min_fling_velocity
                        || v.y.abs() > self.config.min_fling_velocity
                })
                .map(|velocity| Gesture::Fling {
                    start,
                    end,
                    velocity,
                })
        };

        self.in_tap_region = false;
        self.velocity.clear();
        gesture
    }

    fn is_double_tap(&self, first_down: &Contact, first_up: &Contact, second: &Contact) -> bool {
        let Some(gap) = second.time.checked_sub(first_up.time) else {
            return false;
        };
        if gap < self.config.double_tap_min_time || gap > self.config.double_tap_timeout {
            return false;
        }
        (second.position - first_down.position).hypot() < self.config.double_tap_slop
    }
}
