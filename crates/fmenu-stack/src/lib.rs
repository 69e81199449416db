#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Navigation engine: the panel stack, containers, tips, and layout.
//!
//! # Role in FrankenMenu
//! `fmenu-stack` is the engine the host embeds. It owns the ordered list of
//! panel containers, the interactive pop gesture, the dismissing set that
//! keeps removed containers alive through their exit animation, tip
//! overlays, and the coalesced layout scheduler.
//!
//! # Primary responsibilities
//! - **NavigationStack**: push/pop/replace, the pan-driven interactive pop,
//!   highlight passthrough to the top entry, and the pure layout pass.
//! - **PanelContainer**: one entry's node, dim overlay, tip, and metadata,
//!   with the depth transform of covered panels.
//! - **TipOverlay**: the secondary surface anchored below the active panel,
//!   swapped by value with a cross-fade, fed by a tip stream.
//! - **LayoutScheduler**: at most one layout pass per turn, last gesture
//!   sample authoritative.
//!
//! # How it fits in the system
//! The host feeds classified gesture phases and pointer locations in,
//! applies the returned [`StackLayout`] to its drawing surfaces, ticks
//! presentation animations, and routes emitted commands back through
//! [`NavigationStack::apply`]. Everything here is single-threaded and
//! event-driven; nothing blocks and nothing renders.

pub mod container;
pub mod layout;
pub mod scheduler;
pub mod stack;
pub mod tip;

pub use container::{ContainerMeasure, DepthTransform, PanelContainer};
pub use layout::{
    DismissingLayout, EntryLayout, LayoutConstraints, MAX_SCALE_OFFSET, MIN_CHROME_HEIGHT,
    Presentation, SHADOW_INSET, STANDARD_MAX_WIDTH, STANDARD_MIN_WIDTH, StackLayout, TIP_SPACING,
    TipLayout,
};
pub use scheduler::LayoutScheduler;
pub use stack::{
    NavigationStack, PopDisposition, ReplaceOutcome, StackConfig, TickOutcome,
};
pub use tip::{OutgoingTip, PlainTipNode, TipNode, TipNodeFactory, TipOverlay};
