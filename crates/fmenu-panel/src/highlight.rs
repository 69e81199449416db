#![forbid(unsafe_code)]

//! Highlight state: which row index the selection currently rests on.
//!
//! The tracker holds bare indices; the list node maps them to nodes, flips
//! `set_highlighted`, and fires haptics. Pointer-driven changes go through
//! [`HighlightTracker::set`]; hardware-key stepping goes through the
//! `step_*` methods, which clamp over all rows without filtering by
//! highlightability.
//!
//! # Invariants
//!
//! 1. `set` reports a change for any transition, including to `None`.
//! 2. Stepping from nothing lands on the first row in both directions.
//! 3. Stepping never leaves `[0, row_count)`; with zero rows it stays
//!    `None`.

/// Outcome of a highlight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChange {
    Unchanged,
    Changed {
        previous: Option<usize>,
        current: Option<usize>,
    },
}

impl HighlightChange {
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Index of the highlighted row, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightTracker {
    current: Option<usize>,
}

impl HighlightTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move the highlight to `index`.
    pub fn set(&mut self, index: Option<usize>) -> HighlightChange {
        if self.current == index {
            return HighlightChange::Unchanged;
        }
        let previous = self.current.take();
        self.current = index;
        HighlightChange::Changed {
            previous,
            current: index,
        }
    }

    /// Drop the highlight, returning the index it rested on.
    pub fn clear(&mut self) -> Option<usize> {
        self.current.take()
    }

    /// Step toward the first row.
    pub fn step_decrease(&mut self, row_count: usize) -> HighlightChange {
        self.step(row_count, |index| index.saturating_sub(1))
    }

    /// Step toward the last row.
    pub fn step_increase(&mut self, row_count: usize) -> HighlightChange {
        self.step(row_count, |index| index + 1)
    }

    fn step(&mut self, row_count: usize, advance: impl FnOnce(usize) -> usize) -> HighlightChange {
        if row_count == 0 {
            return HighlightChange::Unchanged;
        }
        let next = match self.current {
            None => 0,
            Some(index) => advance(index).min(row_count - 1),
        };
        self.set(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_every_transition() {
        let mut tracker = HighlightTracker::new();
        assert_eq!(
            tracker.set(Some(2)),
            HighlightChange::Changed {
                previous: None,
                current: Some(2)
            }
        );
        assert_eq!(tracker.set(Some(2)), HighlightChange::Unchanged);
        assert_eq!(
            tracker.set(None),
            HighlightChange::Changed {
                previous: Some(2),
                current: None
            }
        );
        assert_eq!(tracker.set(None), HighlightChange::Unchanged);
    }

    #[test]
    fn stepping_from_nothing_lands_on_first_row() {
        let mut tracker = HighlightTracker::new();
        assert!(tracker.step_decrease(5).is_changed());
        assert_eq!(tracker.current(), Some(0));

        let mut tracker = HighlightTracker::new();
        assert!(tracker.step_increase(5).is_changed());
        assert_eq!(tracker.current(), Some(0));
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        let mut tracker = HighlightTracker::new();
        tracker.set(Some(0));
        assert_eq!(tracker.step_decrease(3), HighlightChange::Unchanged);

        tracker.set(Some(2));
        assert_eq!(tracker.step_increase(3), HighlightChange::Unchanged);

        tracker.set(Some(1));
        assert!(tracker.step_increase(3).is_changed());
        assert_eq!(tracker.current(), Some(2));
    }

    #[test]
    fn zero_rows_stay_unhighlighted() {
        let mut tracker = HighlightTracker::new();
        assert_eq!(tracker.step_increase(0), HighlightChange::Unchanged);
        assert_eq!(tracker.step_decrease(0), HighlightChange::Unchanged);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn clear_returns_previous_index() {
        let mut tracker = HighlightTracker::new();
        tracker.set(Some(4));
        assert_eq!(tracker.clear(), Some(4));
        assert_eq!(tracker.clear(), None);
    }
}
