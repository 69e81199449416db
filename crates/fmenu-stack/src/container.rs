#![forbid(unsafe_code)]

//! Panel containers: one stack entry's node, dim overlay, tip, and metadata.
//!
//! A container binds a panel node to its depth position: it computes the
//! compression transform of a covered panel, owns the dim overlay fading the
//! panel being revealed, runs the tip lifecycle (value-compare swap with
//! cross-fade, stream polling), and carries the per-entry metadata the stack
//! reads back for the owner (scroll restore, position lock, payloads, the
//! one-shot dismissal callback).
//!
//! # Invariants
//!
//! 1. `take_on_dismissed` yields the callback at most once; teardown is
//!    idempotent.
//! 2. The dim alpha is exactly `1 - alpha_fraction`: opaque while fully
//!    covered, transparent once fully revealed. The dim belongs to the entry
//!    being revealed, not the one sliding away.
//! 3. The tip stream is polled for the container's entire lifetime;
//!    emissions after disposal die with the dropped receiver.
//! 4. Full-width panels measure their tip at the fixed standard width before
//!    the panel, because the tip anchors the panel's minimum width; list
//!    panels measure the tip after, at the panel's own width.

use std::time::Duration;

use fmenu_core::animation::{Animation, Ease};
use fmenu_core::{Haptics, Identifier, Point, Size, Transition};
use fmenu_panel::{
    ActionRow, CommandSink, PanelContext, PanelMeasure, PanelNode, Payload, RowEntry, TipDescriptor,
    TipStream,
};

use crate::layout::{MAX_SCALE_OFFSET, STANDARD_MAX_WIDTH, STANDARD_MIN_WIDTH, TIP_SPACING};
use crate::tip::{OutgoingTip, TipNodeFactory, TipOverlay};

/// Presentation transform of one entry at its depth position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTransform {
    /// Uniform scale of the panel node.
    pub scale: f32,
    /// Node center in container coordinates after the transform.
    pub center: Point,
    /// Dim overlay alpha.
    pub dim_alpha: f32,
}

impl DepthTransform {
    /// Transform for a panel of `size` at reveal measure `alpha_fraction`
    /// (1 = top, 0 = fully covered).
    ///
    /// The shrink is vertically centered and the reveal anchored at a
    /// half-width horizontal offset, producing the "peeking out from behind"
    /// cue without a per-frame matrix derivation.
    #[must_use]
    pub fn for_entry(size: Size, alpha_fraction: f32) -> Self {
        if size.width <= 0.0 {
            return Self {
                scale: 1.0,
                center: Point::new(size.width / 2.0, size.height / 2.0),
                dim_alpha: 1.0 - alpha_fraction,
            };
        }
        let scale_offset = MAX_SCALE_OFFSET * (1.0 - alpha_fraction);
        let scale = (size.width - scale_offset) / size.width;
        let y_offset = size.height * (1.0 - scale);
        let transition_offset = (1.0 - alpha_fraction) * size.width / 2.0;
        Self {
            scale,
            center: Point::new(
                size.width / 2.0 + scale_offset / 2.0 + transition_offset,
                size.height / 2.0 - y_offset / 2.0,
            ),
            dim_alpha: 1.0 - alpha_fraction,
        }
    }
}

/// Result of one container layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMeasure {
    pub size: Size,
    /// Height this entry contributes to the shared chrome.
    pub apparent_height: f32,
    pub transform: DepthTransform,
    /// Height of the live tip, zero without one.
    pub tip_height: f32,
}

/// One stack entry: panel node plus dim, tip, and metadata.
pub struct PanelContainer {
    identity: Option<Identifier>,
    node: Box<dyn PanelNode>,
    tip_descriptor: Option<TipDescriptor>,
    tip: Option<TipOverlay>,
    outgoing_tip: Option<OutgoingTip>,
    tip_stream: Option<TipStream>,
    tip_factory: TipNodeFactory,
    reaction_payload: Option<Payload>,
    preview_payload: Option<Payload>,
    on_dismissed: Option<Box<dyn FnOnce()>>,
    stored_scroll_offset: Option<f32>,
    position_lock: Option<f32>,
    measure: PanelMeasure,
    enter: Option<Ease>,
    fresh: bool,
}

impl PanelContainer {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        identity: Option<Identifier>,
        node: Box<dyn PanelNode>,
        tip: Option<TipDescriptor>,
        tip_stream: Option<TipStream>,
        reaction_payload: Option<Payload>,
        preview_payload: Option<Payload>,
        on_dismissed: Option<Box<dyn FnOnce()>>,
        position_lock: Option<f32>,
        tip_factory: TipNodeFactory,
    ) -> Self {
        Self {
            identity,
            node,
            tip_descriptor: tip,
            tip: None,
            outgoing_tip: None,
            tip_stream,
            tip_factory,
            reaction_payload,
            preview_payload,
            on_dismissed,
            stored_scroll_offset: None,
            position_lock,
            measure: PanelMeasure {
                size: Size::ZERO,
                apparent_height: 0.0,
            },
            enter: None,
            fresh: true,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identifier> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn reaction_payload(&self) -> Option<&Payload> {
        self.reaction_payload.as_ref()
    }

    #[must_use]
    pub fn preview_payload(&self) -> Option<&Payload> {
        self.preview_payload.as_ref()
    }

    #[must_use]
    pub const fn position_lock(&self) -> Option<f32> {
        self.position_lock
    }

    #[must_use]
    pub const fn stored_scroll_offset(&self) -> Option<f32> {
        self.stored_scroll_offset
    }

    /// Remember the scroll position to restore when this entry becomes top
    /// again. Set when the next entry pushes over it.
    pub fn store_scroll_offset(&mut self, offset: Option<f32>) {
        if offset.is_some() {
            self.stored_scroll_offset = offset;
        }
    }

    pub fn clear_stored_scroll_offset(&mut self) {
        self.stored_scroll_offset = None;
    }

    /// Measure of the last layout pass.
    #[must_use]
    pub const fn last_measure(&self) -> PanelMeasure {
        self.measure
    }

    /// The one-shot dismissal callback. Later calls observe `None`.
    #[must_use]
    pub fn take_on_dismissed(&mut self) -> Option<Box<dyn FnOnce()>> {
        self.on_dismissed.take()
    }

    /// Whether this container has never been laid out. Consumes the flag.
    pub fn take_fresh(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }

    /// Start the enter slide for a fresh container under an animated pass.
    pub fn begin_enter(&mut self, transition: Transition) {
        if let Some(runner) = transition.runner() {
            self.enter = Some(runner);
        }
    }

    /// Remaining enter-slide x offset; 0 once settled. The spring curve may
    /// momentarily overshoot past the rest position.
    #[must_use]
    pub fn enter_offset(&self) -> f32 {
        self.enter
            .as_ref()
            .map_or(0.0, |enter| (1.0 - enter.eased()) * self.measure.size.width)
    }

    /// Drain the tip stream, keeping the latest emission. Returns whether a
    /// layout pass is owed.
    pub fn poll_tip_stream(&mut self) -> bool {
        let Some(stream) = &self.tip_stream else {
            return false;
        };
        match stream.poll_latest() {
            Some(latest) if latest != self.tip_descriptor => {
                self.tip_descriptor = latest;
                true
            }
            _ => false,
        }
    }

    /// Reconcile the live overlay with the current descriptor. A changed
    /// descriptor moves the old overlay into the outgoing slot so the swap
    /// cross-fades.
    fn sync_tip(&mut self, transition: Transition) {
        let matches = match (&self.tip, &self.tip_descriptor) {
            (None, None) => true,
            (Some(tip), Some(descriptor)) => tip.descriptor() == descriptor,
            _ => false,
        };
        if matches {
            return;
        }

        if let Some(old) = self.tip.take() {
            self.outgoing_tip = Some(OutgoingTip::new(old));
        }
        self.tip = self.tip_descriptor.as_ref().map(|descriptor| {
            TipOverlay::new(
                descriptor.clone(),
                &self.tip_factory,
                transition.is_animated(),
            )
        });
    }

    /// Lay out this entry: tip reconciliation, panel measurement, and the
    /// depth transform for `alpha_fraction`.
    pub fn update(
        &mut self,
        constraints: Size,
        alpha_fraction: f32,
        transition: Transition,
    ) -> ContainerMeasure {
        self.sync_tip(transition);

        let full_width = self.node.wants_full_width();
        let (min_width, max_width) = if full_width {
            (STANDARD_MAX_WIDTH, STANDARD_MAX_WIDTH)
        } else {
            (STANDARD_MIN_WIDTH, STANDARD_MAX_WIDTH)
        };

        // The tip anchors a full-width panel's minimum width, so it measures
        // first and reserves its extent as a bottom inset.
        let mut bottom_inset = 0.0;
        if full_width {
            if let Some(tip) = &mut self.tip {
                bottom_inset = tip.measure(STANDARD_MAX_WIDTH).height + TIP_SPACING;
            }
        }

        let measure = self.node.update(&PanelContext {
            constraints,
            min_width,
            max_width,
            bottom_inset,
            transition,
        });
        self.measure = measure;

        if !full_width {
            if let Some(tip) = &mut self.tip {
                tip.measure(measure.size.width);
            }
        }

        ContainerMeasure {
            size: measure.size,
            apparent_height: measure.apparent_height,
            transform: DepthTransform::for_entry(measure.size, alpha_fraction),
            tip_height: self.tip.as_ref().map_or(0.0, |tip| tip.size().height),
        }
    }

    /// Live tip, if any, with its current alpha.
    #[must_use]
    pub fn tip(&self) -> Option<&TipOverlay> {
        self.tip.as_ref()
    }

    /// Outgoing tip still cross-fading away, if any.
    #[must_use]
    pub fn outgoing_tip(&self) -> Option<&OutgoingTip> {
        self.outgoing_tip.as_ref()
    }

    /// Advance enter slide and tip fades. Returns whether anything is still
    /// animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut animating = false;

        if let Some(enter) = &mut self.enter {
            enter.tick(dt);
            if enter.is_complete() {
                self.enter = None;
            } else {
                animating = true;
            }
        }

        if let Some(tip) = &mut self.tip {
            animating |= tip.tick(dt);
        }

        if let Some(outgoing) = &mut self.outgoing_tip {
            if outgoing.tick(dt) {
                self.outgoing_tip = None;
            } else {
                animating = true;
            }
        }

        animating
    }

    // --- Panel node passthrough --------------------------------------------

    #[must_use]
    pub fn wants_full_width(&self) -> bool {
        self.node.wants_full_width()
    }

    /// Forward a selection-gesture move to the panel and, when the point
    /// falls below the panel, to the tip rebased into its own space.
    pub fn highlight_gesture_moved(&mut self, location: Point, haptics: &dyn Haptics) {
        self.node.highlight_gesture_moved(location, haptics);
        if let Some(tip) = &mut self.tip {
            let tip_top = self.measure.size.height + TIP_SPACING;
            if location.y >= tip_top {
                tip.highlight_gesture_moved(Point::new(location.x, location.y - tip_top));
            }
        }
    }

    pub fn highlight_gesture_finished(&mut self, perform: bool, sink: &mut CommandSink) {
        self.node.highlight_gesture_finished(perform, sink);
    }

    pub fn decrease_highlighted_index(&mut self) {
        self.node.decrease_highlighted_index();
    }

    pub fn increase_highlighted_index(&mut self) {
        self.node.increase_highlighted_index();
    }

    /// In-place patch attempt; hands the rows back when shapes mismatch.
    pub fn try_rebind_rows(&mut self, rows: Vec<RowEntry>) -> Result<(), Vec<RowEntry>> {
        self.node.try_rebind_rows(rows)
    }

    /// Rewrite one action row in place, matched by identity.
    pub fn update_action(&mut self, id: &Identifier, action: ActionRow) -> bool {
        self.node.update_action(id, action)
    }
}

impl std::fmt::Debug for PanelContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelContainer")
            .field("identity", &self.identity)
            .field("tip", &self.tip_descriptor)
            .field("stored_scroll_offset", &self.stored_scroll_offset)
            .field("position_lock", &self.position_lock)
            .field("fresh", &self.fresh)
            .finish_non_exhaustive()
    }
}
