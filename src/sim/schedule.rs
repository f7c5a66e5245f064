//! Deferred phase transitions
//!
//! Win/complete transitions fire a fixed number of frames after the event
//! that caused them. Each entry carries the level generation it was queued
//! under so a transition left over from an abandoned level is ignored.

use super::state::GamePhase;

/// A transition waiting for its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub due_tick: u64,
    pub generation: u32,
    pub phase: GamePhase,
}

/// Pending transitions, kept in queue order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Deferred>,
}

impl Scheduler {
    pub fn schedule(&mut self, deferred: Deferred) {
        self.pending.push(deferred);
    }

    /// Remove and return every entry due at or before `now`, oldest first
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|d| d.due_tick <= now);
        self.pending = waiting;
        due
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
