#![forbid(unsafe_code)]

//! Layout-change transitions: immediate versus animated.
//!
//! Every layout request carries a [`Transition`] describing how presented
//! state should reach the new target: instantly (gesture tracking, in-place
//! row swaps) or through a timed curve (pushes, pops, settles). The stack's
//! scheduler merges transitions when several requests land in one turn; the
//! merge never downgrades an animated request to immediate.
//!
//! # Invariants
//!
//! 1. `combined()` is commutative and idempotent.
//! 2. An animated transition always survives a merge; between two animated
//!    transitions the longer duration wins.
//! 3. `Immediate.duration() == Duration::ZERO`.

use std::time::Duration;

use crate::animation::{Ease, Easing};

/// Duration for the first push of a fresh stack and for in-place patches.
pub const SPRING_SHORT: Duration = Duration::from_millis(300);

/// Duration for deeper pushes, pops, and the gesture spring-back.
pub const SPRING_LONG: Duration = Duration::from_millis(450);

/// Duration of a tip overlay's fade-in.
pub const TIP_FADE: Duration = Duration::from_millis(200);

/// Curve family for animated transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionCurve {
    /// Symmetric cubic ease.
    EaseInOut,
    /// Decelerating with a slight overshoot, the stack's house curve.
    #[default]
    Spring,
}

impl TransitionCurve {
    /// The closed-form easing backing this curve.
    #[must_use]
    pub fn easing(self) -> Easing {
        match self {
            TransitionCurve::EaseInOut => Easing::InOut,
            TransitionCurve::Spring => Easing::OutBack,
        }
    }
}

/// How a layout change reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Jump to the target state. Used for 1:1 gesture tracking, where any
    /// smoothing would lag the finger.
    #[default]
    Immediate,
    /// Interpolate to the target state.
    Animated {
        duration: Duration,
        curve: TransitionCurve,
    },
}

impl Transition {
    /// Animated transition with the given duration and curve.
    #[must_use]
    pub const fn animated(duration: Duration, curve: TransitionCurve) -> Self {
        Self::Animated { duration, curve }
    }

    /// The short spring: first push of a fresh stack, in-place patches.
    #[must_use]
    pub const fn spring_short() -> Self {
        Self::animated(SPRING_SHORT, TransitionCurve::Spring)
    }

    /// The long spring: deeper pushes, pops, gesture spring-back.
    #[must_use]
    pub const fn spring_long() -> Self {
        Self::animated(SPRING_LONG, TransitionCurve::Spring)
    }

    /// Whether this transition animates.
    #[must_use]
    pub const fn is_animated(&self) -> bool {
        matches!(self, Self::Animated { .. })
    }

    /// Duration of the animated phase; zero when immediate.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::Immediate => Duration::ZERO,
            Self::Animated { duration, .. } => *duration,
        }
    }

    /// Merge two transitions scheduled in the same turn. Animated dominates
    /// immediate; between animated transitions the longer duration wins.
    #[must_use]
    pub fn combined(self, other: Self) -> Self {
        match (self, other) {
            (Self::Immediate, other) => other,
            (this, Self::Immediate) => this,
            (
                Self::Animated { duration: a, curve },
                Self::Animated {
                    duration: b,
                    curve: other_curve,
                },
            ) => {
                if b > a {
                    Self::Animated {
                        duration: b,
                        curve: other_curve,
                    }
                } else {
                    Self::Animated { duration: a, curve }
                }
            }
        }
    }

    /// Build the timed runner for this transition, or `None` when immediate.
    #[must_use]
    pub fn runner(&self) -> Option<Ease> {
        match self {
            Self::Immediate => None,
            Self::Animated { duration, curve } => Some(Ease::new(*duration, curve.easing())),
        }
    }
}
