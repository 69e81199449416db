#![forbid(unsafe_code)]

//! Panel specifications: what a caller hands to `push` / `replace`.
//!
//! A [`PanelSpecification`] is consumed exactly once. Changing a live panel
//! requires either a new specification through `replace` (identity-equal
//! replace patches in place) or an `UpdateAction` command; the specification
//! itself is never mutated after submission.
//!
//! # Invariants
//!
//! 1. Payloads ride through the stack untouched. The engine stores and
//!    returns them; it never downcasts them.
//! 2. A tip stream outlives its panel only as a disconnected sender: once
//!    the container is disposed the stream half is dropped and further
//!    emissions report failure to the sender.

use std::any::Any;
use std::fmt;
use std::sync::mpsc;

use fmenu_core::Identifier;

use crate::node::PanelNode;
use crate::row::{IconToken, RowEntry};

/// Secondary overlay anchored under the active panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipDescriptor {
    text: String,
    action_title: Option<String>,
    icon: Option<IconToken>,
}

impl TipDescriptor {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action_title: None,
            icon: None,
        }
    }

    /// Optional trailing action label ("Learn More" and the like).
    #[must_use]
    pub fn action_title(mut self, title: impl Into<String>) -> Self {
        self.action_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<IconToken>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn action_title_text(&self) -> Option<&str> {
        self.action_title.as_deref()
    }

    #[must_use]
    pub fn icon_token(&self) -> Option<&IconToken> {
        self.icon.as_ref()
    }
}

/// Creates a tip channel. The sender stays with the caller; the stream rides
/// on the specification and is polled by the stack on every layout pass.
#[must_use]
pub fn tip_channel() -> (TipSender, TipStream) {
    let (tx, rx) = mpsc::channel();
    (TipSender { tx }, TipStream { rx })
}

/// Caller-side half of a tip channel. `None` clears the current tip.
#[derive(Debug, Clone)]
pub struct TipSender {
    tx: mpsc::Sender<Option<TipDescriptor>>,
}

impl TipSender {
    /// Returns false once the receiving panel is gone.
    pub fn send(&self, tip: Option<TipDescriptor>) -> bool {
        self.tx.send(tip).is_ok()
    }
}

/// Stack-side half of a tip channel.
#[derive(Debug)]
pub struct TipStream {
    rx: mpsc::Receiver<Option<TipDescriptor>>,
}

impl TipStream {
    /// Drains pending emissions and returns the most recent, or `None` when
    /// nothing arrived since the last poll. Intermediate values a frame never
    /// saw are dropped.
    pub fn poll_latest(&self) -> Option<Option<TipDescriptor>> {
        let mut latest = None;
        while let Ok(tip) = self.rx.try_recv() {
            latest = Some(tip);
        }
        latest
    }
}

/// Opaque passthrough data attached to a specification. Stored per entry and
/// readable for the top entry; the engine never looks inside.
pub struct Payload(Box<dyn Any>);

impl Payload {
    #[must_use]
    pub fn new(value: impl Any) -> Self {
        Self(Box::new(value))
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// Content of one requested panel.
pub enum PanelContent {
    /// A single row list.
    List(Vec<RowEntry>),
    /// Two lists pushed back-to-back; identity and tip metadata bind to the
    /// first, the second is anonymous.
    TwoLists(Vec<RowEntry>, Vec<RowEntry>),
    /// Host-provided full-width node.
    Custom(Box<dyn PanelNode>),
}

impl fmt::Debug for PanelContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(rows) => f.debug_tuple("List").field(&rows.len()).finish(),
            Self::TwoLists(first, second) => f
                .debug_tuple("TwoLists")
                .field(&first.len())
                .field(&second.len())
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Everything the stack needs to admit one panel.
pub struct PanelSpecification {
    /// Equal identities across a `replace` enable in-place patching.
    pub identity: Option<Identifier>,
    pub content: PanelContent,
    pub tip: Option<TipDescriptor>,
    pub tip_stream: Option<TipStream>,
    pub reaction_payload: Option<Payload>,
    pub preview_payload: Option<Payload>,
    /// Invoked exactly once when the entry leaves the stack through a pop or
    /// a full-stack replace. Never invoked on plain drop.
    pub on_dismissed: Option<Box<dyn FnOnce()>>,
}

impl PanelSpecification {
    #[must_use]
    pub fn list(rows: Vec<RowEntry>) -> Self {
        Self::with_content(PanelContent::List(rows))
    }

    #[must_use]
    pub fn two_lists(first: Vec<RowEntry>, second: Vec<RowEntry>) -> Self {
        Self::with_content(PanelContent::TwoLists(first, second))
    }

    #[must_use]
    pub fn custom(node: Box<dyn PanelNode>) -> Self {
        Self::with_content(PanelContent::Custom(node))
    }

    #[must_use]
    fn with_content(content: PanelContent) -> Self {
        Self {
            identity: None,
            content,
            tip: None,
            tip_stream: None,
            reaction_payload: None,
            preview_payload: None,
            on_dismissed: None,
        }
    }

    #[must_use]
    pub fn identity(mut self, identity: impl Into<Identifier>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    #[must_use]
    pub fn tip(mut self, tip: TipDescriptor) -> Self {
        self.tip = Some(tip);
        self
    }

    #[must_use]
    pub fn tip_stream(mut self, stream: TipStream) -> Self {
        self.tip_stream = Some(stream);
        self
    }

    #[must_use]
    pub fn reaction_payload(mut self, payload: Payload) -> Self {
        self.reaction_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn preview_payload(mut self, payload: Payload) -> Self {
        self.preview_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn on_dismissed(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_dismissed = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for PanelSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSpecification")
            .field("identity", &self.identity)
            .field("content", &self.content)
            .field("tip", &self.tip)
            .field("tip_stream", &self.tip_stream.is_some())
            .field("reaction_payload", &self.reaction_payload.is_some())
            .field("preview_payload", &self.preview_payload.is_some())
            .field("on_dismissed", &self.on_dismissed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_stream_yields_latest_only() {
        let (tx, rx) = tip_channel();
        assert!(rx.poll_latest().is_none());

        assert!(tx.send(Some(TipDescriptor::new("first"))));
        assert!(tx.send(Some(TipDescriptor::new("second"))));
        assert!(tx.send(None));
        assert!(tx.send(Some(TipDescriptor::new("third"))));

        let latest = rx.poll_latest().flatten();
        assert_eq!(latest.map(|tip| tip.text().to_owned()), Some("third".into()));
        assert!(rx.poll_latest().is_none());
    }

    #[test]
    fn sender_reports_disconnected_stream() {
        let (tx, rx) = tip_channel();
        drop(rx);
        assert!(!tx.send(None));
    }

    #[test]
    fn payload_is_opaque_but_downcastable() {
        let payload = Payload::new(("peer", 42_u64));
        assert_eq!(payload.downcast_ref::<(&str, u64)>(), Some(&("peer", 42)));
        assert!(payload.downcast_ref::<String>().is_none());
    }
}
