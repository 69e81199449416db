#![forbid(unsafe_code)]

//! Coalesced layout scheduling.
//!
//! Every stack mutation *requests* a layout rather than performing one.
//! Requests landing in the same turn merge into a single pending
//! [`Transition`], and [`LayoutScheduler::take_scheduled`] yields at most one
//! transition per turn. The gesture path leans on this: a burst of `Changed`
//! samples collapses to one immediate pass, and the last sample before the
//! take is authoritative.
//!
//! # Invariants
//!
//! 1. At most one transition is pending at a time; merging follows
//!    [`Transition::combined`] (animated dominates immediate, the longer
//!    duration wins).
//! 2. `take_scheduled` clears the pending slot; a second take in the same
//!    turn returns `None`.

use fmenu_core::Transition;

/// Collapses layout requests into at most one pending transition.
#[derive(Debug, Default)]
pub struct LayoutScheduler {
    pending: Option<Transition>,
}

impl LayoutScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a layout pass with the given transition, merging with any
    /// request already pending this turn.
    pub fn request(&mut self, transition: Transition) {
        self.pending = Some(match self.pending {
            Some(pending) => pending.combined(transition),
            None => transition,
        });
    }

    /// Whether a layout pass is owed.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending transition, leaving the scheduler empty.
    #[must_use]
    pub fn take_scheduled(&mut self) -> Option<Transition> {
        self.pending.take()
    }
}
