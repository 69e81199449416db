#![forbid(unsafe_code)]

//! Animation primitives: easing curves, timed progress, and springs.
//!
//! Two kinds of motion drive the menu. Lifecycle animations (panel enter and
//! exit slides, tip fades) run on a fixed clock: an [`Ease`] advances 0→1
//! over a duration through an [`Easing`] curve. The interactive settle after
//! a cancelled pop gesture instead runs on a [`Spring`], because the release
//! point and velocity vary per gesture and the motion must stay continuous
//! when interrupted mid-flight.
//!
//! All primitives implement [`Animation`] and advance only through explicit
//! `tick(dt)` calls, so tests never sleep.
//!
//! # Invariants
//!
//! 1. `value()` is clamped to [0.0, 1.0] for every primitive.
//! 2. A complete animation stays complete until `reset()`.
//! 3. Ticking is deterministic: the same dt sequence yields the same values.
//! 4. Zero-duration eases are complete after the first tick.

use std::time::Duration;

/// A value evolving over explicit time steps.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has finished.
    fn is_complete(&self) -> bool;

    /// Current value in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Time advanced past completion, for chaining without drift.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Back-overshoot magnitude for [`Easing::OutBack`].
const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing curve shapes (closed forms over normalized time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Cubic acceleration from rest.
    In,
    /// Cubic deceleration to rest.
    Out,
    /// Cubic ease on both ends.
    #[default]
    InOut,
    /// Decelerating with a slight overshoot past 1.0 before settling, the
    /// spring feel of stack transitions.
    OutBack,
}

impl Easing {
    /// Map normalized time `t ∈ [0,1]` through the curve.
    ///
    /// [`Easing::OutBack`] may exceed 1.0 mid-flight; all curves hit exactly
    /// 0.0 at `t = 0` and 1.0 at `t = 1`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::In => t * t * t,
            Easing::Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::OutBack => {
                let c1 = BACK_OVERSHOOT;
                let c3 = c1 + 1.0;
                let shifted = t - 1.0;
                1.0 + c3 * shifted * shifted * shifted + c1 * shifted * shifted
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timed progress
// ---------------------------------------------------------------------------

/// A timed 0→1 progress animation through an easing curve.
///
/// Drives every fixed-duration motion in the menu: enter/exit slides of
/// panel containers and tip fades.
#[derive(Debug, Clone)]
pub struct Ease {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Ease {
    /// Create a progress animation over `duration`.
    ///
    /// Zero durations are clamped to 1 ns so progress is defined; such an
    /// ease completes on its first tick.
    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing,
        }
    }

    /// Raw progress in [0.0, 1.0] before easing.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        t.min(1.0) as f32
    }

    /// Eased value; like [`Animation::value`] but without the [0,1] clamp,
    /// so overshooting curves report their excursion.
    #[must_use]
    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    /// Total configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Ease {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.eased().clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Spring
// ---------------------------------------------------------------------------

/// Maximum dt per integration step. Larger deltas subdivide for stability
/// with stiff parameter sets.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring is at rest.
const REST_THRESHOLD: f64 = 0.001;

/// Velocity magnitude below which (with the position threshold) the spring
/// is at rest.
const VELOCITY_THRESHOLD: f64 = 0.01;

const MIN_STIFFNESS: f64 = 0.1;

/// Spring parameters.
///
/// The default (170/26, slightly underdamped) settles a unit displacement in
/// roughly half a second, the feel of the stack's gesture spring-back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Restoring force strength. Higher responds faster.
    pub stiffness: f64,
    /// Velocity drag. Below `2√stiffness` the spring oscillates.
    pub damping: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
        }
    }
}

impl SpringConfig {
    /// Critically damped variant of this config: fastest convergence
    /// without crossing the target.
    #[must_use]
    pub fn critical(self) -> Self {
        Self {
            damping: 2.0 * self.stiffness.sqrt(),
            ..self
        }
    }
}

/// A damped harmonic oscillator:
///
///   F = -stiffness × (position - target) - damping × velocity
///
/// integrated with semi-implicit Euler. Used to settle the presented
/// transition fraction after a gesture releases, where the start point and
/// velocity are whatever the finger left behind.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    config: SpringConfig,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target` with
    /// default parameters.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self::with_config(initial, target, SpringConfig::default())
    }

    /// Create a spring with explicit parameters. Stiffness is clamped to a
    /// small positive minimum; damping to non-negative.
    #[must_use]
    pub fn with_config(initial: f64, target: f64, config: SpringConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            config: SpringConfig {
                stiffness: config.stiffness.max(MIN_STIFFNESS),
                damping: config.damping.max(0.0),
            },
            at_rest: false,
        }
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Change the target. Wakes the spring if the move is meaningful.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > REST_THRESHOLD {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Add to the velocity, carrying gesture momentum into the settle.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration =
            -self.config.stiffness * displacement - self.config.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}

/// Linear interpolation between `a` and `b` by `t`.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
