// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation from recent pointer samples.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Default time window, in milliseconds, considered for velocity.
pub const DEFAULT_HORIZON_MS: u64 = 100;

const MAX_SAMPLES: usize = 20;

/// Keeps the last few timestamped positions of a contact.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: SmallVec<[(u64, Point); MAX_SAMPLES]>,
    horizon: u64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_MS)
    }
}

impl VelocityTracker {
    /// Creates an empty tracker that only looks `horizon` milliseconds back.
    #[must_use]
    pub fn new(horizon: u64) -> Self {
        Self {
            samples: SmallVec::new(),
            horizon,
        }
    }

    /// Records a position. Samples older than the horizon are dropped.
    ///
    /// A sample earlier than the newest one restarts tracking.
    pub fn add(&mut self, time: u64, pos: Point) {
        if self.samples.last().is_some_and(|&(t, _)| time < t) {
            self.samples.clear();
        }
        let cutoff = time.saturating_sub(self.horizon);
        self.samples.retain(|(t, _)| *t >= cutoff);
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push((time, pos));
    }

    /// Forgets all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Velocity in pixels per second between the oldest and newest sample.
    ///
    /// Returns `None` with fewer than two samples or when they share a
    /// timestamp.
    #[must_use]
    pub fn velocity(&self) -> Option<Vec2> {
        let &(t0, p0) = self.samples.first()?;
        let &(t1, p1) = self.samples.last()?;
        let dt = t1.checked_sub(t0).filter(|dt| *dt > 0)?;
        Some((p1 - p0) * (1000.0 / dt as f64))
    }
}
