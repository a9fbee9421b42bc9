// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI runtimes usually have a single cooperative event loop. Animations,
//! flings and debounced repaints are not blocking loops there; they are tasks
//! that re-post themselves until a deadline passes. This crate models that
//! pattern without owning a clock or a thread:
//!
//! - Every task is posted under a **key** naming its purpose.
//! - Posting under a key that already has a pending task **replaces** it, so
//!   two competing instances of the same kind can never coexist.
//! - Cancellation is by key and returns the cancelled task.
//! - The host drives time: it calls [`TimerQueue::pop_due`] with its own
//!   monotonic timestamp (milliseconds) and runs whatever comes out.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Purpose {
//!     Repaint,
//!     Animate,
//! }
//!
//! let mut timers = TimerQueue::new();
//! timers.post(Purpose::Animate, 16, "frame");
//! timers.post(Purpose::Repaint, 250, "repaint");
//!
//! // Re-posting the repaint replaces the pending one.
//! timers.post(Purpose::Repaint, 350, "repaint again");
//! assert_eq!(timers.len(), 2);
//!
//! let fired = timers.pop_due(20).unwrap();
//! assert_eq!(fired.key, Purpose::Animate);
//! assert!(timers.pop_due(300).is_none());
//! assert_eq!(timers.pop_due(350).unwrap().task, "repaint again");
//! ```
//!
//! Tasks that re-post themselves from inside a drain loop must use a deadline
//! strictly after the `now` they were fired at, otherwise the loop would see
//! them again immediately.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// A task that became due and was removed from a [`TimerQueue`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<K, T> {
    /// The purpose the task was posted under.
    pub key: K,
    /// The deadline the task was posted for, in milliseconds.
    pub due: u64,
    /// The task payload.
    pub task: T,
}

#[derive(Clone, Debug)]
struct Entry<K, T> {
    key: K,
    due: u64,
    seq: u64,
    task: T,
}

/// A queue of pending tasks keyed by purpose, with at most one task per key.
#[derive(Clone, Debug)]
pub struct TimerQueue<K, T> {
    entries: Vec<Entry<K, T>>,
    next_seq: u64,
}

impl<K, T> Default for TimerQueue<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq, T> TimerQueue<K, T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts `task` under `key` to run once the host clock reaches `due`.
    ///
    /// Any task already pending under `key` is removed first and returned.
    pub fn post(&mut self, key: K, due: u64, task: T) -> Option<T> {
        let replaced = self.cancel(key);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(Entry {
            key,
            due,
            seq,
            task,
        });
        replaced
    }

    /// Removes the task pending under `key`, returning it.
    pub fn cancel(&mut self, key: K) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.swap_remove(idx).task)
    }

    /// Returns `true` if a task is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Returns the deadline of the task pending under `key`.
    #[must_use]
    pub fn due_at(&self, key: K) -> Option<u64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.due)
    }

    /// Returns the task pending under `key`.
    #[must_use]
    pub fn get(&self, key: K) -> Option<&T> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.task)
    }

    /// Returns the earliest deadline among pending tasks.
    ///
    /// Hosts can use this to arm a single platform timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Removes and returns the earliest task whose deadline is `<= now`.
    ///
    /// Tasks with equal deadlines come out in the order they were posted.
    pub fn pop_due(&mut self, now: u64) -> Option<Fired<K, T>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.swap_remove(idx);
        Some(Fired {
            key: entry.key,
            due: entry.due,
            task: entry.task,
        })
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Key {
        A,
        B,
        C,
    }

    #[test]
    fn empty_queue_has_nothing_due() {
        let mut q = TimerQueue::<Key, u32>::new();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
        assert_eq!(q.pop_due(u64::MAX), None);
    }

    #[test]
    fn post_replaces_pending_task_with_same_key() {
        let mut q = TimerQueue::new();
        assert_eq!(q.post(Key::A, 100, 1), None);
        assert_eq!(q.post(Key::A, 200, 2), Some(1));

        assert_eq!(q.len(), 1);
        assert_eq!(q.due_at(Key::A), Some(200));
        assert_eq!(q.get(Key::A), Some(&2));
    }

    #[test]
    fn cancel_removes_only_that_key() {
        let mut q = TimerQueue::new();
        q.post(Key::A, 10, 'a');
        q.post(Key::B, 20, 'b');

        assert_eq!(q.cancel(Key::A), Some('a'));
        assert_eq!(q.cancel(Key::A), None);
        assert!(!q.is_pending(Key::A));
        assert!(q.is_pending(Key::B));
    }

    #[test]
    fn pop_due_respects_deadline_then_post_order() {
        let mut q = TimerQueue::new();
        q.post(Key::C, 30, 3);
        q.post(Key::B, 10, 2);
        q.post(Key::A, 10, 1);

        assert_eq!(q.pop_due(5), None);
        assert_eq!(q.next_deadline(), Some(10));

        let first = q.pop_due(30).unwrap();
        assert_eq!((first.key, first.due, first.task), (Key::B, 10, 2));
        let second = q.pop_due(30).unwrap();
        assert_eq!(second.key, Key::A);
        let third = q.pop_due(30).unwrap();
        assert_eq!(third.key, Key::C);
        assert!(q.is_empty());
    }

    #[test]
    fn reposting_from_a_drain_loop_terminates() {
        let mut q = TimerQueue::new();
        q.post(Key::A, 0, 0_u32);

        let now = 100;
        let mut runs = 0;
        while let Some(fired) = q.pop_due(now) {
            runs += 1;
            // Self-rescheduling task: always after `now`.
            q.post(fired.key, now + 16, fired.task + 1);
        }
        assert_eq!(runs, 1);
        assert_eq!(q.due_at(Key::A), Some(116));
        assert_eq!(q.get(Key::A), Some(&1));
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.post(Key::A, 1, ());
        q.post(Key::B, 2, ());
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
