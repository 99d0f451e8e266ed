//! Core systems for interactive questions.
//!
//! This crate provides the foundations the question component is built on:
//!
//! - **Element Tree**: Retained elements with classes, markup, inline height
//!   style and focus, rendered once attached below a document root
//! - **Clock**: Injectable time source, with a manual clock for tests
//! - **Timers**: Deferred one-shot and repeating payloads, drained by the owner
//! - **Signal/Slot System**: Notifications for clicks, resizes and lifecycle hooks
//!
//! # Deferred Work Example
//!
//! ```
//! use std::time::Duration;
//! use question_core::{Clock, ManualClock, TimerQueue};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Job {
//!     Flush,
//!     Detach,
//! }
//!
//! let clock = ManualClock::new();
//! let mut timers = TimerQueue::new();
//! timers.schedule_once(clock.now(), Duration::from_millis(150), Job::Detach);
//! timers.schedule_once(clock.now(), Duration::ZERO, Job::Flush);
//!
//! assert_eq!(timers.pop_expired(clock.now()).map(|(_, job)| job), Some(Job::Flush));
//! assert!(timers.pop_expired(clock.now()).is_none());
//!
//! clock.advance(Duration::from_millis(150));
//! assert_eq!(timers.pop_expired(clock.now()).map(|(_, job)| job), Some(Job::Detach));
//! ```

mod clock;
pub mod element;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use element::{ElementId, ElementTree, MaxHeight};
pub use error::{CoreError, Result};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerKind, TimerQueue};
