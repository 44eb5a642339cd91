//! Timer queue - deferred board mutations as data
//!
//! Timers are not threads or sleeps. The caller passes the current time to
//! [`TimerQueue::pop_due`] and gets back every timer whose due time has
//! passed, ordered by (due time, issue order). Each timer carries the session
//! sequence it was scheduled under so stale ones can be recognized.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Instant;

use crate::event::TilePlacement;

/// Source of monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) -> u64 {
        self.now.fetch_add(ms, AtomicOrdering::Relaxed) + ms
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, AtomicOrdering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(AtomicOrdering::Relaxed)
    }
}

/// Which half of a tile's animation a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPhase {
    /// Tile becomes visible as entering
    Enter,
    /// Tile is written to the board model
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub due_ms: u64,
    pub session: u64,
    pub phase: TimerPhase,
    pub placement: TilePlacement,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    order: u64,
    timer: Timer,
}

impl Entry {
    fn key(&self) -> (u64, u64) {
        (self.timer.due_ms, self.order)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of timers keyed by (due time, issue order)
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    issued: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, timer: Timer) {
        let order = self.issued;
        self.issued += 1;
        self.heap.push(Reverse(Entry { order, timer }));
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Timer> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.timer.due_ms <= now_ms => {
                self.heap.pop().map(|Reverse(entry)| entry.timer)
            }
            _ => None,
        }
    }

    /// Drop every timer of `session`. Returns how many were removed.
    pub fn cancel_session(&mut self, session: u64) -> usize {
        let before = self.heap.len();
        self.heap.retain(|Reverse(entry)| entry.timer.session != session);
        before - self.heap.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.timer.due_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending timers in firing order
    pub fn pending(&self) -> Vec<Timer> {
        let mut entries: Vec<Entry> = self.heap.iter().map(|Reverse(e)| *e).collect();
        entries.sort();
        entries.into_iter().map(|e| e.timer).collect()
    }
}
