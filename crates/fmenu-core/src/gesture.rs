#![forbid(unsafe_code)]

//! Interactive pop gesture: pan phases and the fraction tracker.
//!
//! The platform's pan recognizer lives outside this crate; it classifies
//! touches and delivers [`PanPhase`] values. [`PanTracker`] is the pure state
//! machine behind them: it maps horizontal translation to a clamped
//! transition fraction and decides, on release, between committing the pop
//! and springing back. Keeping the recognizer out of the state machine means
//! disabling navigation mid-gesture can never desync the fraction.
//!
//! # State Machine
//!
//! Idle → (`Began`) → Tracking → (`Changed`)* → (`Ended` | `Cancelled`) → Idle
//!
//! # Invariants
//!
//! 1. The fraction is always in [0.0, 1.0].
//! 2. `Began` resets the fraction to 0.0, including a second `Began` while a
//!    gesture is already tracking (treated as a fresh gesture).
//! 3. `Ended` and `Cancelled` are handled identically: both run the same
//!    commit-threshold test and both leave the fraction at 0.0.
//! 4. The pop commits iff the fraction at release exceeds
//!    [`COMMIT_THRESHOLD`]; a release at exactly the threshold settles back.
//! 5. `Changed`/`Ended`/`Cancelled` while idle are no-ops.
//!
//! # Failure Modes
//!
//! - Non-positive width: translation cannot be normalized; the fraction
//!   stays 0.0 and a release settles.
//! - A pan whose allowed directions exclude `RIGHT` never starts tracking.

use bitflags::bitflags;

use crate::geometry::Point;

/// Fraction above which a released gesture commits as a pop. A release at or
/// below it springs back. Contractual, not derived.
pub const COMMIT_THRESHOLD: f32 = 0.2;

bitflags! {
    /// Directions a classified pan may travel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PanDirections: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN = 1 << 2;
    }
}

/// One classified phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanPhase {
    /// Touch recognized as a pan. `directions` is the recognizer's
    /// classification of where this pan may go.
    Began { directions: PanDirections },
    /// Finger moved; `translation` is cumulative from the touch-down point.
    Changed { translation: Point },
    /// Finger lifted.
    Ended,
    /// Recognizer cancelled (touch stolen, navigation disabled, app
    /// backgrounded).
    Cancelled,
}

/// Decision produced when a tracked gesture releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanVerdict {
    /// Fraction cleared the threshold: pop the top panel.
    Commit,
    /// Spring the presented state back to rest.
    Settle,
}

/// What a fed phase did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Nothing observable changed.
    Idle,
    /// The fraction changed; the caller should schedule an immediate layout
    /// so the panel tracks the finger 1:1.
    FractionChanged,
    /// The gesture released. `from_fraction` is the fraction at release,
    /// before the reset to 0.0; it seeds the settle spring.
    Released {
        verdict: PanVerdict,
        from_fraction: f32,
    },
}

/// Pure fraction/commit state machine for the interactive pop.
#[derive(Debug, Clone, Default)]
pub struct PanTracker {
    fraction: f32,
    tracking: bool,
}

impl PanTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current transition fraction in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Whether a gesture is in flight.
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Feed one classified phase. `width` is the panel width the translation
    /// normalizes against, sampled at call time.
    pub fn apply(&mut self, phase: PanPhase, width: f32) -> PanOutcome {
        match phase {
            PanPhase::Began { directions } => {
                if !directions.contains(PanDirections::RIGHT) {
                    return PanOutcome::Idle;
                }
                let had_progress = self.fraction != 0.0;
                self.fraction = 0.0;
                self.tracking = true;
                if had_progress {
                    PanOutcome::FractionChanged
                } else {
                    PanOutcome::Idle
                }
            }
            PanPhase::Changed { translation } => {
                if !self.tracking {
                    return PanOutcome::Idle;
                }
                let fraction = if width > 0.0 {
                    (translation.x / width).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if fraction == self.fraction {
                    PanOutcome::Idle
                } else {
                    self.fraction = fraction;
                    PanOutcome::FractionChanged
                }
            }
            PanPhase::Ended | PanPhase::Cancelled => {
                if !self.tracking {
                    return PanOutcome::Idle;
                }
                let from_fraction = self.fraction;
                self.fraction = 0.0;
                self.tracking = false;
                let verdict = if from_fraction > COMMIT_THRESHOLD {
                    PanVerdict::Commit
                } else {
                    PanVerdict::Settle
                };
                PanOutcome::Released {
                    verdict,
                    from_fraction,
                }
            }
        }
    }

    /// Drop any in-flight gesture without a release decision.
    pub fn reset(&mut self) {
        self.fraction = 0.0;
        self.tracking = false;
    }
}
