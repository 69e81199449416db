#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Panel surface layer: rows, diffing, highlight, and panel specifications.
//!
//! # Role in FrankenMenu
//! `fmenu-panel` defines what one menu panel *is*: its rows (actions,
//! separators, custom content), the node contracts a renderer implements for
//! them, the identity-keyed diff engine that mutates a live row list without
//! disturbing untouched rows, and the highlight state machine tracking the
//! active row.
//!
//! # Primary responsibilities
//! - **Row model**: `RowEntry` (action / separator / custom) with stable
//!   identity and content equality that ignores handlers.
//! - **Node contracts**: `RowNode` and `PanelNode`, the measure/highlight/
//!   perform seam between the engine and the host's renderer, plus a plain
//!   fixed-metric reference implementation.
//! - **Diff engine**: minimal deletions/insertions/updates between two row
//!   lists, with move detection over a longest-increasing spine.
//! - **Highlight**: first-geometric-hit pointer tracking and clamped index
//!   stepping.
//! - **Specifications**: `PanelSpecification`, tip descriptors, and the
//!   `MenuCommand` vocabulary action handlers emit.
//!
//! # How it fits in the system
//! `fmenu-stack` consumes `PanelSpecification`s, boxes `PanelNode`s into
//! stack containers, and returns emitted `MenuCommand`s to the owner. This
//! crate never talks to the stack; commands flow out through sinks, never
//! through stored back-references.

pub mod command;
pub mod diff;
pub mod highlight;
pub mod list;
pub mod node;
pub mod row;
pub mod spec;

pub use command::{CommandSink, MenuCommand};
pub use diff::{RowInsertion, RowKey, RowListDiff, RowUpdate, diff_rows};
pub use highlight::{HighlightChange, HighlightTracker};
pub use list::{ListPanelNode, RowLayout, SEPARATOR_HEIGHT};
pub use node::{PanelContext, PanelMeasure, PanelNode, PlainRowNode, RowNode, RowNodeFactory};
pub use row::{ActionHandler, ActionRow, Badge, CustomRow, IconToken, RowEntry, RowKind};
pub use spec::{
    PanelContent, PanelSpecification, Payload, TipDescriptor, TipSender, TipStream, tip_channel,
};
