//! Deferred timer queue.
//!
//! [`TimerQueue`] holds payloads that become due at a point in time. It does
//! not run callbacks itself: the owner asks for expired payloads with
//! [`TimerQueue::pop_expired`] and dispatches them, which keeps all mutation
//! on the owner's single logical thread of control.
//!
//! Time is always passed in explicitly, usually from a
//! [`Clock`](crate::Clock), so the queue is fully deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{CoreError, Result};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Smallest interval a repeating timer may use.
const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified delay.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData<T> {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
    /// Delivered to the owner each time the timer fires.
    payload: T,
}

/// An entry in the timer queue (min-heap by fire time, then insertion order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of deferred payloads.
pub struct TimerQueue<T> {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData<T>>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Tie-breaker so timers due at the same instant fire in FIFO order.
    next_seq: u64,
}

impl<T: Clone> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push_entry(&mut self, id: TimerId, fire_time: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(TimerQueueEntry { id, fire_time, seq });
    }

    /// Schedule `payload` to become due `delay` after `now`.
    ///
    /// A zero delay makes the payload due on the next drain, after anything
    /// already due at the same instant.
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        let next_fire = now + delay;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval: delay,
            kind: TimerKind::OneShot,
            payload,
        });
        self.push_entry(id, next_fire);
        tracing::trace!(target: "question_core::timer", ?id, ?delay, "one-shot timer scheduled");
        id
    }

    /// Schedule `payload` to become due every `interval`, first after one interval.
    ///
    /// Intervals shorter than one millisecond are clamped.
    pub fn schedule_repeating(&mut self, now: Instant, interval: Duration, payload: T) -> TimerId {
        let interval = interval.max(MIN_REPEAT_INTERVAL);
        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind: TimerKind::Repeating,
            payload,
        });
        self.push_entry(id, next_fire);
        tracing::trace!(target: "question_core::timer", ?id, ?interval, "repeating timer scheduled");
        id
    }

    /// Cancel a timer.
    pub fn cancel(&mut self, id: TimerId) -> Result<()> {
        self.timers
            .remove(id)
            .map(|_| ())
            .ok_or(CoreError::InvalidTimerId)
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the kind of a pending timer.
    pub fn kind(&self, id: TimerId) -> Option<TimerKind> {
        self.timers.get(id).map(|t| t.kind)
    }

    /// Discard queue entries whose timer is gone or was rescheduled.
    fn prune(&mut self) {
        while let Some(entry) = self.queue.peek() {
            match self.timers.get(entry.id) {
                Some(timer) if timer.next_fire == entry.fire_time => break,
                _ => {
                    self.queue.pop();
                }
            }
        }
    }

    /// Get the duration until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.prune();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Take the next payload that is due at `now`.
    ///
    /// One-shot timers are removed when popped; repeating timers are
    /// rescheduled relative to their previous fire time so they do not drift.
    pub fn pop_expired(&mut self, now: Instant) -> Option<(TimerId, T)> {
        loop {
            self.prune();
            let entry = *self.queue.peek()?;
            if entry.fire_time > now {
                return None;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };

            tracing::trace!(target: "question_core::timer", id = ?entry.id, "timer fired");
            match timer.kind {
                TimerKind::OneShot => {
                    let timer = self.timers.remove(entry.id)?;
                    return Some((entry.id, timer.payload));
                }
                TimerKind::Repeating => {
                    timer.next_fire = entry.fire_time + timer.interval;
                    let next_fire = timer.next_fire;
                    let payload = timer.payload.clone();
                    self.push_entry(entry.id, next_fire);
                    return Some((entry.id, payload));
                }
            }
        }
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
