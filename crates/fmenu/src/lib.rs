#![forbid(unsafe_code)]

//! FrankenMenu public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use fmenu_core::animation::{Animation, Ease, Easing, Spring, SpringConfig};
pub use fmenu_core::geometry::{Point, Rect, Size};
pub use fmenu_core::gesture::{
    COMMIT_THRESHOLD, PanDirections, PanOutcome, PanPhase, PanTracker, PanVerdict,
};
pub use fmenu_core::haptics::{Haptics, NoopHaptics};
pub use fmenu_core::identity::Identifier;
pub use fmenu_core::transition::{Transition, TransitionCurve};

#[cfg(feature = "test-helpers")]
pub use fmenu_core::haptics::RecordingHaptics;

// --- Panel re-exports ------------------------------------------------------

pub use fmenu_panel::command::{CommandSink, MenuCommand};
pub use fmenu_panel::node::{PanelContext, PanelMeasure, PanelNode, RowNode, RowNodeFactory};
pub use fmenu_panel::row::{ActionRow, Badge, CustomRow, IconToken, RowEntry, RowKind};
pub use fmenu_panel::spec::{
    PanelContent, PanelSpecification, Payload, TipDescriptor, TipSender, TipStream, tip_channel,
};

// --- Stack re-exports ------------------------------------------------------

pub use fmenu_stack::layout::{
    DismissingLayout, EntryLayout, LayoutConstraints, Presentation, StackLayout, TipLayout,
};
pub use fmenu_stack::stack::{
    NavigationStack, PopDisposition, ReplaceOutcome, StackConfig, TickOutcome,
};
pub use fmenu_stack::tip::{TipNode, TipNodeFactory};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for fmenu hosts.
#[derive(Debug)]
pub enum Error {
    /// Installing the global log subscriber failed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Standard result type for fmenu APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Logging ---------------------------------------------------------------

#[cfg(feature = "tracing-json")]
pub mod logging {
    //! JSON logging bootstrap for hosts that want structured output.

    use tracing_subscriber::EnvFilter;

    use crate::{Error, Result};

    /// Install a global JSON-formatted subscriber.
    ///
    /// The level filter comes from the `FMENU_LOG` environment variable,
    /// falling back to `RUST_LOG`, then to `warn`. Fails if a global
    /// subscriber is already installed.
    pub fn init_json() -> Result<()> {
        let filter = EnvFilter::try_from_env("FMENU_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| Error::Logging(err.to_string()))
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionRow, Error, LayoutConstraints, MenuCommand, NavigationStack, PanDirections, PanPhase,
        PanelSpecification, Point, PopDisposition, Presentation, ReplaceOutcome, Result, RowEntry,
        Size, StackConfig, StackLayout, TipDescriptor, Transition,
    };

    pub use crate::{core, panel, stack};
}

pub use fmenu_core as core;
pub use fmenu_panel as panel;
pub use fmenu_stack as stack;
