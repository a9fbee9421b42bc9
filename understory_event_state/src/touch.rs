// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input model shared by the state machines in this crate.
//!
//! A [`TouchEvent`] is a snapshot of every contact that is down while the
//! event happens, plus what happened:
//!
//! - [`TouchPhase::Down`]: a contact touched; `pointers` includes it.
//! - [`TouchPhase::Move`]: one or more contacts moved.
//! - [`TouchPhase::Up`]: one contact lifted; `pointers` still includes it, so
//!   an `Up` with a single pointer ends the whole gesture.
//! - [`TouchPhase::Cancel`]: the platform took the stream away.
//!
//! Contacts are anonymous. Multi-touch state machines only ever look at the
//! centroid ([`TouchEvent::focus`]) and spread ([`TouchEvent::span`]) of the
//! contacts, and rebaseline whenever the contact count changes.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// What happened to the contacts in a [`TouchEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// A contact went down.
    Down,
    /// Contacts moved.
    Move,
    /// A contact lifted.
    Up,
    /// The stream was cancelled.
    Cancel,
}

/// A batch of touch contacts at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// What happened.
    pub phase: TouchPhase,
    /// Positions of every contact that is down during this event, in view
    /// coordinates.
    pub pointers: SmallVec<[Point; 2]>,
    /// Host timestamp in milliseconds.
    pub time: u64,
}

impl TouchEvent {
    /// Creates an event from any set of contact positions.
    pub fn new(phase: TouchPhase, pointers: impl IntoIterator<Item = Point>, time: u64) -> Self {
        Self {
            phase,
            pointers: pointers.into_iter().collect(),
            time,
        }
    }

    /// Single-contact `Down` at `pos`.
    pub fn down(pos: Point, time: u64) -> Self {
        Self::new(TouchPhase::Down, [pos], time)
    }

    /// Single-contact `Move` to `pos`.
    pub fn moved(pos: Point, time: u64) -> Self {
        Self::new(TouchPhase::Move, [pos], time)
    }

    /// Single-contact `Up` at `pos`.
    pub fn up(pos: Point, time: u64) -> Self {
        Self::new(TouchPhase::Up, [pos], time)
    }

    /// Number of contacts down during this event.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Centroid of the contacts, or `None` for an empty event.
    #[must_use]
    pub fn focus(&self) -> Option<Point> {
        if self.pointers.is_empty() {
            return None;
        }
        let sum = self
            .pointers
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        Some((sum / self.pointers.len() as f64).to_point())
    }

    /// Diameter-like spread of the contacts around their focus.
    ///
    /// Average absolute deviation per axis, doubled, then combined. For two
    /// contacts this is exactly their distance.
    #[must_use]
    pub fn span(&self) -> f64 {
        let Some(focus) = self.focus() else {
            return 0.0;
        };
        let n = self.pointers.len() as f64;
        let dev = self.pointers.iter().fold(Vec2::ZERO, |acc, p| {
            let d = *p - focus;
            acc + Vec2::new(d.x.abs(), d.y.abs())
        }) / n;
        (dev * 2.0).hypot()
    }
}

/// Snapshot of one end of a gesture: where, with how many contacts, and when.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Focus of the contacts.
    pub position: Point,
    /// Number of contacts down at that moment.
    pub pointer_count: usize,
    /// Host timestamp in milliseconds.
    pub time: u64,
}

impl Contact {
    /// Captures the focus, contact count and time of `event`.
    #[must_use]
    pub fn of(event: &TouchEvent) -> Option<Self> {
        Some(Self {
            position: event.focus()?,
            pointer_count: event.pointer_count(),
            time: event.time,
        })
    }

    /// Returns `true` if more than one contact was down.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.pointer_count > 1
    }
}
