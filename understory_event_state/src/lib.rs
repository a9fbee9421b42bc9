// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: touch gesture state machines for UI interactions.
//!
//! This crate provides small, focused state machines for touch interactions
//! that need state across multiple events:
//!
//! - [`touch`]: The input model, a [`touch::TouchEvent`] snapshot of every
//!   contact at one instant.
//! - [`pinch`]: Turn multi-contact spread into incremental scale factors.
//! - [`gesture`]: Classify single-contact motion into taps, double taps,
//!   scrolls and flings.
//! - [`velocity`]: Estimate release velocity from recent samples.
//!
//! ## Design Philosophy
//!
//! Each state manager is designed to be:
//!
//! - **Minimal and focused**: Each handles one specific interaction pattern
//! - **Clock-free**: Time only enters through event timestamps and explicit
//!   `now` arguments, so hosts and tests control it completely
//! - **Composable**: Managers do not know about each other; arbitration (for
//!   example, a pinch pre-empting scrolls) belongs to the caller
//!
//! ## Pinch pre-empting scroll
//!
//! The usual arrangement feeds every event to [`pinch::PinchState`] first and
//! only feeds [`gesture::GestureState`] while no pinch is in progress:
//!
//! ```rust
//! use kurbo::Point;
//! use understory_event_state::gesture::GestureState;
//! use understory_event_state::pinch::PinchState;
//! use understory_event_state::touch::{TouchEvent, TouchPhase};
//!
//! let mut pinch = PinchState::new();
//! let mut gestures = GestureState::default();
//!
//! let events = [
//!     TouchEvent::down(Point::new(0.0, 0.0), 0),
//!     TouchEvent::new(TouchPhase::Down, [Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 10),
//!     TouchEvent::new(TouchPhase::Move, [Point::new(0.0, 50.0), Point::new(200.0, 50.0)], 20),
//! ];
//!
//! let mut scrolls = 0;
//! for ev in &events {
//!     pinch.on_touch(ev);
//!     if !pinch.is_in_progress() && gestures.on_touch(ev).is_some() {
//!         scrolls += 1;
//!     }
//! }
//! assert!(pinch.is_in_progress());
//! assert_eq!(scrolls, 0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod gesture;
pub mod pinch;
pub mod touch;
pub mod velocity;
