#![forbid(unsafe_code)]

//! Row model: the data for one list-panel row.
//!
//! Rows are data, not views. Each row kind produces a [`RowNode`] through the
//! list panel's factory; the row itself carries only identity, visible
//! properties, and (for actions) the handler closure invoked on selection.
//!
//! # Invariants
//!
//! 1. Content equality ignores handlers and node factories: two rows with the
//!    same identity and visible properties are content-equal even if their
//!    closures differ.
//! 2. A row's kind never changes in place; the diff engine turns a kind
//!    change at the same identity into a delete plus insert.
//!
//! [`RowNode`]: crate::node::RowNode

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use fmenu_core::Identifier;

use crate::command::CommandSink;
use crate::node::RowNode;

/// Handler invoked when an action row is selected. Receives a sink; emitted
/// commands are returned to the owner from the invoking call.
pub type ActionHandler = Arc<dyn Fn(&mut CommandSink)>;

/// Opaque name of an icon slot. The engine never interprets it; hosts map
/// tokens to actual artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconToken(Cow<'static, str>);

impl IconToken {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for IconToken {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

/// Short trailing label on an action row (a count, "NEW", etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    text: String,
    accent: bool,
}

impl Badge {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accent: false,
        }
    }

    /// Render with the accent treatment.
    #[must_use]
    pub fn accent(mut self, accent: bool) -> Self {
        self.accent = accent;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_accent(&self) -> bool {
        self.accent
    }
}

/// One selectable menu action.
#[derive(Clone)]
pub struct ActionRow {
    id: Option<Identifier>,
    title: String,
    subtitle: Option<String>,
    icon: Option<IconToken>,
    badge: Option<Badge>,
    enabled: bool,
    handler: Option<ActionHandler>,
}

impl ActionRow {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            subtitle: None,
            icon: None,
            badge: None,
            enabled: true,
            handler: None,
        }
    }

    /// Stable identity. Required for diffing and in-place action updates.
    #[must_use]
    pub fn id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<IconToken>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Disabled rows render dimmed and are never highlightable.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Handler invoked on selection.
    #[must_use]
    pub fn on_select(mut self, handler: impl Fn(&mut CommandSink) + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle_text(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    #[must_use]
    pub fn icon_token(&self) -> Option<&IconToken> {
        self.icon.as_ref()
    }

    #[must_use]
    pub fn badge_value(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn handler(&self) -> Option<&ActionHandler> {
        self.handler.as_ref()
    }

    /// Visible-content equality. Handlers are not comparable and are
    /// deliberately excluded.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.subtitle == other.subtitle
            && self.icon == other.icon
            && self.badge == other.badge
            && self.enabled == other.enabled
    }
}

impl fmt::Debug for ActionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRow")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("icon", &self.icon)
            .field("badge", &self.badge)
            .field("enabled", &self.enabled)
            .field("handler", &self.handler.as_ref().map(|_| "…"))
            .finish()
    }
}

/// Host-supplied row content with its own node factory.
#[derive(Clone)]
pub struct CustomRow {
    id: Option<Identifier>,
    needs_separator: bool,
    factory: Arc<dyn Fn() -> Box<dyn RowNode>>,
}

impl CustomRow {
    #[must_use]
    pub fn new(factory: impl Fn() -> Box<dyn RowNode> + 'static) -> Self {
        Self {
            id: None,
            needs_separator: true,
            factory: Arc::new(factory),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Custom content that draws its own bottom edge sets this to false to
    /// suppress the trailing hairline.
    #[must_use]
    pub fn needs_separator(mut self, needs_separator: bool) -> Self {
        self.needs_separator = needs_separator;
        self
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    #[must_use]
    pub const fn wants_separator(&self) -> bool {
        self.needs_separator
    }

    #[must_use]
    pub fn build_node(&self) -> Box<dyn RowNode> {
        (self.factory)()
    }

    /// Content equality: identity, separator flag, and factory instance.
    /// Closures carry the content of a custom row, so two rows compare equal
    /// only when they share one factory.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.needs_separator == other.needs_separator
            && Arc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for CustomRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRow")
            .field("id", &self.id)
            .field("needs_separator", &self.needs_separator)
            .finish_non_exhaustive()
    }
}

/// Discriminant of a row entry. Positional kind compatibility gates the
/// in-place replace patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Action,
    Separator,
    Custom,
}

/// One entry of a list panel.
#[derive(Debug, Clone)]
pub enum RowEntry {
    Action(ActionRow),
    /// Section break with fixed height. Never highlightable, never carries
    /// identity.
    Separator,
    Custom(CustomRow),
}

impl RowEntry {
    #[must_use]
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Action(_) => RowKind::Action,
            Self::Separator => RowKind::Separator,
            Self::Custom(_) => RowKind::Custom,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identifier> {
        match self {
            Self::Action(action) => action.identity(),
            Self::Separator => None,
            Self::Custom(custom) => custom.identity(),
        }
    }

    /// Content equality across entries. Entries of different kinds are never
    /// content-equal.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Action(a), Self::Action(b)) => a.content_eq(b),
            (Self::Separator, Self::Separator) => true,
            (Self::Custom(a), Self::Custom(b)) => a.content_eq(b),
            _ => false,
        }
    }
}

impl From<ActionRow> for RowEntry {
    fn from(action: ActionRow) -> Self {
        Self::Action(action)
    }
}

impl From<CustomRow> for RowEntry {
    fn from(custom: CustomRow) -> Self {
        Self::Custom(custom)
    }
}
