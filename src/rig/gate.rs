//! Motion-settled notification.
//!
//! A single slot holding the generation the motion loop last reported at
//! rest, plus a condition variable. The loop fills the slot on every iteration
//! that finds both axes at rest; a waiter clears it and blocks until a report
//! at least as new as the generation it needs.
//!
//! A report for an older generation never wakes a waiter, so a rest observed
//! before the loop picked up the latest targets cannot satisfy a wait. Several
//! waiters all wake on a sufficient report, but one waiter's clear can make
//! another wait for a further idle iteration.

use parking_lot::{Condvar, Mutex};

/// Set/clear/wait notification for "motion has settled".
#[derive(Debug, Default)]
pub struct SettleGate {
    settled: Mutex<Option<u64>>,
    changed: Condvar,
}

impl SettleGate {
    /// Create a cleared gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the notification. Must happen before [`wait`](Self::wait).
    pub fn clear(&self) {
        *self.settled.lock() = None;
    }

    /// Record a rest report for `generation` and wake every waiter.
    ///
    /// An older report does not replace a newer one.
    pub fn set(&self, generation: u64) {
        let mut settled = self.settled.lock();
        if settled.map_or(true, |g| generation > g) {
            *settled = Some(generation);
            self.changed.notify_all();
        }
    }

    /// Whether any report is currently held.
    pub fn is_set(&self) -> bool {
        self.settled.lock().is_some()
    }

    /// Whether the held report covers `required`.
    pub fn reached(&self, required: u64) -> bool {
        covers(*self.settled.lock(), required)
    }

    /// Block until a report for `required` or newer is held. No timeout.
    pub fn wait(&self, required: u64) {
        let mut settled = self.settled.lock();
        self.changed
            .wait_while(&mut settled, |settled| !covers(*settled, required));
    }

    /// Clear, then wait for a report for `required` or newer.
    pub fn clear_and_wait(&self, required: u64) {
        self.clear();
        self.wait(required);
    }
}

fn covers(settled: Option<u64>, required: u64) -> bool {
    matches!(settled, Some(g) if g >= required)
}
