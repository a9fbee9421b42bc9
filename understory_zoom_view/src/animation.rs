// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Cubic ease-out: cumulative share of `distance` covered after `elapsed`.
///
/// `f(t) = distance * ((t / duration - 1)^3 + 1)`, starting at exactly `0`
/// and ending at exactly `distance`.
#[must_use]
pub fn ease_out(elapsed: f64, distance: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return distance;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0) - 1.0;
    distance * (t * t * t + 1.0)
}

/// A zoom animated linearly from one scale to another about a fixed point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomAnimation {
    /// Scale when the animation started.
    pub from: f64,
    /// Scale to reach.
    pub to: f64,
    /// Fixed point in view coordinates.
    pub center: Point,
    /// Host time the animation started at.
    pub start: u64,
    /// Length in milliseconds.
    pub duration: u64,
}

impl ZoomAnimation {
    /// Scale at host time `now`; exactly `to` once the duration has elapsed.
    #[must_use]
    pub fn scale_at(&self, now: u64) -> f64 {
        let elapsed = now.saturating_sub(self.start);
        if elapsed >= self.duration {
            return self.to;
        }
        self.from + (self.to - self.from) * (elapsed as f64 / self.duration as f64)
    }

    /// Returns `true` once `now` is at or past the end.
    #[must_use]
    pub fn is_finished(&self, now: u64) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

/// A decelerating scroll over a fixed distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fling {
    /// Total displacement in view pixels.
    pub distance: Vec2,
    /// Host time the fling started at.
    pub start: u64,
    /// Length in milliseconds.
    pub duration: u64,
    applied: Vec2,
}

impl Fling {
    /// Creates a fling that has not moved yet.
    #[must_use]
    pub fn new(distance: Vec2, start: u64, duration: u64) -> Self {
        Self {
            distance,
            start,
            duration,
            applied: Vec2::ZERO,
        }
    }

    /// Cumulative offset at host time `now`.
    #[must_use]
    pub fn offset_at(&self, now: u64) -> Vec2 {
        let elapsed = now.saturating_sub(self.start).min(self.duration) as f64;
        let duration = self.duration as f64;
        Vec2::new(
            ease_out(elapsed, self.distance.x, duration),
            ease_out(elapsed, self.distance.y, duration),
        )
    }

    /// Offset already handed out by [`Fling::advance`].
    #[must_use]
    pub fn applied(&self) -> Vec2 {
        self.applied
    }

    /// Moves to `now`, returning the increment since the previous call.
    pub fn advance(&mut self, now: u64) -> Vec2 {
        let offset = self.offset_at(now);
        let delta = offset - self.applied;
        self.applied = offset;
        delta
    }

    /// Returns `true` once `now` is at or past the end.
    #[must_use]
    pub fn is_finished(&self, now: u64) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_endpoints_are_exact() {
        assert_eq!(ease_out(0.0, 60.0, 300.0), 0.0);
        assert_eq!(ease_out(300.0, 60.0, 300.0), 60.0);
        assert_eq!(ease_out(900.0, 60.0, 300.0), 60.0);
        assert_eq!(ease_out(10.0, 60.0, 0.0), 60.0);
    }

    #[test]
    fn ease_out_decelerates() {
        let a = ease_out(100.0, 60.0, 300.0);
        let b = ease_out(200.0, 60.0, 300.0) - a;
        let c = ease_out(300.0, 60.0, 300.0) - a - b;
        assert!(a > b && b > c && c > 0.0);
    }

    #[test]
    fn zoom_animation_is_linear_and_lands_on_target() {
        let anim = ZoomAnimation {
            from: 1.0,
            to: 3.0,
            center: Point::ORIGIN,
            start: 1000,
            duration: 200,
        };
        assert_eq!(anim.scale_at(1000), 1.0);
        assert_eq!(anim.scale_at(1100), 2.0);
        assert_eq!(anim.scale_at(1200), 3.0);
        assert_eq!(anim.scale_at(5000), 3.0);
        assert!(!anim.is_finished(1199));
        assert!(anim.is_finished(1200));
    }

    #[test]
    fn fling_increments_sum_to_distance() {
        let mut fling = Fling::new(Vec2::new(60.0, -30.0), 0, 300);
        let mut total = Vec2::ZERO;
        for now in [0, 16, 50, 120, 299, 300] {
            total += fling.advance(now);
        }
        assert!((total - Vec2::new(60.0, -30.0)).hypot() < 1e-9);
        assert_eq!(fling.applied(), Vec2::new(60.0, -30.0));
        assert_eq!(fling.advance(400), Vec2::ZERO);
    }
}
