#![forbid(unsafe_code)]

//! Node contracts: the seam between the engine and the host's renderer.
//!
//! The engine computes frames; the host draws them. A [`RowNode`] renders one
//! row, a [`PanelNode`] renders one stack entry. Both speak the same
//! measure-then-apply protocol: `measure` reports the minimum size under a
//! constraint, the caller decides the final size, `apply` commits it.
//!
//! # Invariants
//!
//! 1. `measure` never returns a width above its constraint; rows clamp
//!    themselves, the list only maxes and floors.
//! 2. `update` is pure layout: it must not emit commands or fire haptics.
//! 3. Highlight entry points arrive only on the top panel; covered panels
//!    never see them.

use std::sync::Arc;

use fmenu_core::{Haptics, Identifier, Point, Size, Transition};

use crate::command::CommandSink;
use crate::row::{ActionRow, RowEntry};

/// Layout inputs for one [`PanelNode::update`] pass.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext {
    /// Available size. Height already excludes chrome the stack reserves.
    pub constraints: Size,
    /// Lower bound of the panel width band.
    pub min_width: f32,
    /// Upper bound of the panel width band. Full-width panels see
    /// `min_width == max_width`.
    pub max_width: f32,
    /// Space reserved under the content, pre-measured tip included.
    pub bottom_inset: f32,
    /// How the resulting frame changes should reach the screen.
    pub transition: Transition,
}

/// Result of one [`PanelNode::update`] pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMeasure {
    /// Full content size.
    pub size: Size,
    /// Height the surrounding chrome should present. Scrolling panels report
    /// less than `size.height`; everything else reports it unchanged.
    pub apparent_height: f32,
}

/// Renderer contract for one row.
pub trait RowNode {
    /// Minimum size under `constraints`. Must not exceed the constraint
    /// width.
    fn measure(&mut self, constraints: Size) -> Size;

    /// Commit the final size decided by the list.
    fn apply(&mut self, size: Size);

    /// Whether the highlight may land on this row.
    fn can_highlight(&self) -> bool;

    fn set_highlighted(&mut self, highlighted: bool);

    /// Run the row's action, emitting commands into `sink`.
    fn perform_action(&mut self, sink: &mut CommandSink);

    /// Swap in updated action content, keeping the node alive. Nodes that
    /// do not render actions ignore it.
    fn rebind(&mut self, action: &ActionRow) {
        let _ = action;
    }
}

/// Builds a [`RowNode`] for a row entry.
pub type RowNodeFactory = Arc<dyn Fn(&RowEntry) -> Box<dyn RowNode>>;

/// Renderer contract for one stack entry.
pub trait PanelNode {
    /// Full-width panels span the whole standard width and reserve their own
    /// bottom inset for the tip.
    fn wants_full_width(&self) -> bool {
        false
    }

    /// Lay out for the given context.
    fn update(&mut self, ctx: &PanelContext) -> PanelMeasure;

    /// Pointer moved while the selection gesture is down. `location` is in
    /// the panel's own coordinates.
    fn highlight_gesture_moved(&mut self, location: Point, haptics: &dyn Haptics);

    /// Selection gesture ended. `perform` runs the highlighted row's action;
    /// either way the highlight clears.
    fn highlight_gesture_finished(&mut self, perform: bool, sink: &mut CommandSink);

    /// Move the highlight up one highlightable row (hardware keys,
    /// accessibility).
    fn decrease_highlighted_index(&mut self);

    /// Move the highlight down one highlightable row.
    fn increase_highlighted_index(&mut self);

    /// Try to take `rows` as this panel's new content without a transition.
    /// Returns the rows unconsumed when the shapes don't line up and the
    /// caller must fall back to a full replace.
    fn try_rebind_rows(&mut self, rows: Vec<RowEntry>) -> Result<(), Vec<RowEntry>> {
        Err(rows)
    }

    /// Rewrite one action row in place, matched by identity. Returns whether
    /// a row matched.
    fn update_action(&mut self, id: &Identifier, action: ActionRow) -> bool {
        let _ = (id, action);
        false
    }
}

/// Character-count text estimate. The plain node has no text engine; hosts
/// with real glyph metrics implement [`RowNode`] themselves.
fn estimated_text_width(text: &str, advance: f32) -> f32 {
    (text.chars().count() as f32 * advance).ceil()
}

const SIDE_INSET: f32 = 16.0;
const VERTICAL_INSET: f32 = 11.0;
const TITLE_SUBTITLE_SPACING: f32 = 1.0;
const ICON_SIDE_INSET: f32 = 12.0;
const STANDARD_ICON_WIDTH: f32 = 32.0;
const ICON_SPACING: f32 = 8.0;
const TITLE_LINE_HEIGHT: f32 = 20.0;
const SUBTITLE_LINE_HEIGHT: f32 = 18.0;
const TITLE_ADVANCE: f32 = 8.0;
const SUBTITLE_ADVANCE: f32 = 7.0;
const BADGE_PADDING: f32 = 12.0;

/// Fixed-metric [`RowNode`] for action rows. Single text line each for title
/// and subtitle, estimated advances instead of shaped glyphs.
#[derive(Debug)]
pub struct PlainRowNode {
    action: ActionRow,
    highlighted: bool,
    size: Size,
}

impl PlainRowNode {
    #[must_use]
    pub fn new(action: ActionRow) -> Self {
        Self {
            action,
            highlighted: false,
            size: Size::ZERO,
        }
    }

    #[must_use]
    pub fn action(&self) -> &ActionRow {
        &self.action
    }

    #[must_use]
    pub const fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Size committed by the last `apply`.
    #[must_use]
    pub const fn applied_size(&self) -> Size {
        self.size
    }
}

impl RowNode for PlainRowNode {
    fn measure(&mut self, constraints: Size) -> Size {
        let title_width = estimated_text_width(self.action.title(), TITLE_ADVANCE);
        let subtitle_width = self
            .action
            .subtitle_text()
            .map_or(0.0, |subtitle| estimated_text_width(subtitle, SUBTITLE_ADVANCE));

        let mut width = SIDE_INSET + title_width.max(subtitle_width);
        if self.action.icon_token().is_some() {
            width += STANDARD_ICON_WIDTH + ICON_SIDE_INSET + ICON_SPACING;
        } else {
            width += SIDE_INSET;
        }
        if let Some(badge) = self.action.badge_value() {
            width += estimated_text_width(badge.text(), SUBTITLE_ADVANCE) + BADGE_PADDING;
        }

        let mut height = VERTICAL_INSET * 2.0 + TITLE_LINE_HEIGHT;
        if self.action.subtitle_text().is_some() {
            height += TITLE_SUBTITLE_SPACING + SUBTITLE_LINE_HEIGHT;
        }

        Size::new(width.min(constraints.width), height.min(constraints.height))
    }

    fn apply(&mut self, size: Size) {
        self.size = size;
    }

    fn can_highlight(&self) -> bool {
        self.action.is_enabled() && self.action.handler().is_some()
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    fn perform_action(&mut self, sink: &mut CommandSink) {
        if let Some(handler) = self.action.handler() {
            handler(sink);
        }
    }

    fn rebind(&mut self, action: &ActionRow) {
        self.action = action.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Badge;

    fn unconstrained() -> Size {
        Size::new(10_000.0, 10_000.0)
    }

    #[test]
    fn plain_row_heights() {
        let mut plain = PlainRowNode::new(ActionRow::new("Reply"));
        assert_eq!(plain.measure(unconstrained()).height, 42.0);

        let mut with_subtitle =
            PlainRowNode::new(ActionRow::new("Mute").subtitle("For 1 hour"));
        assert_eq!(with_subtitle.measure(unconstrained()).height, 61.0);
    }

    #[test]
    fn icon_widens_the_row() {
        let mut bare = PlainRowNode::new(ActionRow::new("Copy"));
        let mut with_icon = PlainRowNode::new(ActionRow::new("Copy").icon("copy"));
        let bare_width = bare.measure(unconstrained()).width;
        let icon_width = with_icon.measure(unconstrained()).width;
        assert_eq!(
            icon_width - bare_width,
            STANDARD_ICON_WIDTH + ICON_SIDE_INSET + ICON_SPACING - SIDE_INSET
        );
    }

    #[test]
    fn measure_clamps_to_constraint_width() {
        let mut plain = PlainRowNode::new(ActionRow::new(
            "An uncommonly long action title that cannot possibly fit",
        ));
        let size = plain.measure(Size::new(240.0, 10_000.0));
        assert_eq!(size.width, 240.0);
    }

    #[test]
    fn badge_widens_the_row() {
        let mut bare = PlainRowNode::new(ActionRow::new("Unread"));
        let mut badged = PlainRowNode::new(ActionRow::new("Unread").badge(Badge::new("12")));
        assert!(badged.measure(unconstrained()).width > bare.measure(unconstrained()).width);
    }

    #[test]
    fn highlight_requires_enabled_and_handler() {
        let inert = PlainRowNode::new(ActionRow::new("Label"));
        assert!(!inert.can_highlight());

        let disabled = PlainRowNode::new(ActionRow::new("Fade").enabled(false).on_select(|_| {}));
        assert!(!disabled.can_highlight());

        let live = PlainRowNode::new(ActionRow::new("Go").on_select(|_| {}));
        assert!(live.can_highlight());
    }

    #[test]
    fn rebind_keeps_highlight() {
        let mut plain = PlainRowNode::new(ActionRow::new("Mute").id(3).on_select(|_| {}));
        plain.set_highlighted(true);
        plain.rebind(&ActionRow::new("Unmute").id(3).on_select(|_| {}));
        assert!(plain.is_highlighted());
        assert_eq!(plain.action().title(), "Unmute");
    }
}
