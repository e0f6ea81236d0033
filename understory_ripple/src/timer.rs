// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative timer queue on an explicit millisecond clock.
//!
//! The queue never sleeps or reads a clock. The renderer asks it for the next
//! due timer with [`TimerQueue::pop_due`]; timers due at the same instant come
//! back in the order they were scheduled. Cancelling is exact, so
//! [`TimerQueue::len`] is always the number of callbacks that could still fire.

use alloc::vec::Vec;

use crate::types::RippleId;

/// What a timer completes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TimerKind {
    /// End of the enter transition.
    EnterComplete,
    /// End of the exit transition.
    ExitComplete,
}

/// A scheduled timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Timer {
    /// Clock value at which the timer fires.
    pub deadline_ms: u64,
    /// Ripple the timer belongs to.
    pub ripple: RippleId,
    /// What the timer completes.
    pub kind: TimerKind,
    seq: u64,
}

/// Pending timers of one host.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.deadline_ms).min()
    }

    /// Schedule a timer.
    pub fn schedule(&mut self, deadline_ms: u64, ripple: RippleId, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            deadline_ms,
            ripple,
            kind,
            seq,
        });
    }

    /// Cancel the timers of `ripple` with the given kind. Returns how many were cancelled.
    pub fn cancel(&mut self, ripple: RippleId, kind: TimerKind) -> usize {
        let before = self.timers.len();
        self.timers
            .retain(|t| !(t.ripple == ripple && t.kind == kind));
        before - self.timers.len()
    }


    /// Cancel everything. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Timer> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.seq))
            .map(|(i, _)| i)?;
        Some(self.timers.swap_remove(idx))
    }
}
