#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, animation, and gesture foundations for FrankenMenu.
//!
//! # Role in FrankenMenu
//! `fmenu-core` is the foundation layer. It owns the continuous-coordinate
//! geometry the menu is laid out in, the animation primitives that drive
//! transitions, the pan-gesture state machine behind the interactive pop,
//! and the small capability traits (haptics) the upper layers consume.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`/`Size`/`Rect` in `f32` points with hit testing.
//! - **Animation**: the `Animation` trait, easing curves, and springs.
//! - **Transition**: immediate-vs-animated layout change descriptors.
//! - **Gesture**: classified pan phases and the fraction/commit tracker.
//! - **Haptics**: fire-and-forget feedback capability.
//!
//! # How it fits in the system
//! `fmenu-panel` builds row surfaces on these primitives; `fmenu-stack`
//! consumes the gesture tracker and transitions to run the navigation
//! engine. Nothing in this crate renders or performs I/O.

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod haptics;
pub mod identity;
pub mod transition;

pub use animation::{Animation, Ease, Easing, Spring, SpringConfig};
pub use geometry::{Point, Rect, Size};
pub use gesture::{COMMIT_THRESHOLD, PanDirections, PanOutcome, PanPhase, PanTracker, PanVerdict};
#[cfg(feature = "test-helpers")]
pub use haptics::RecordingHaptics;
pub use haptics::{Haptics, NoopHaptics};
pub use identity::Identifier;
pub use transition::{Transition, TransitionCurve};
