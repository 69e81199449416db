#![forbid(unsafe_code)]

//! The navigation stack: ordered containers, interactive pop, and layout.
//!
//! Authoritative state (container order, gesture fraction, highlight) changes
//! synchronously inside each call; presentation catches up through ticked
//! animations. Mutations never lay out directly — they schedule a coalesced
//! layout request and the owner runs [`NavigationStack::update`] once per
//! turn.
//!
//! # State Machine
//!
//! Empty → OneEntry → (push) → Deeper → (pop | committed pop gesture) →
//! shallower. `replace` jumps from any state to OneEntry (full replace) or
//! stays put (in-place patch). At most one interactive pan is live; a second
//! `Began` resets the fraction.
//!
//! # Invariants
//!
//! 1. `navigation_enabled() == (depth() > 1)` after every operation.
//! 2. A released gesture pops iff its fraction exceeds the commit threshold;
//!    `Ended` and `Cancelled` are indistinguishable here.
//! 3. Each removed entry's `on_dismissed` fires exactly once, on pop and on
//!    full replace alike.
//! 4. Containers in the dismissing set are disposed only inside `tick`, when
//!    their exit animation completes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fmenu_core::animation::{Animation, Ease, Spring, SpringConfig, lerp};
use fmenu_core::transition::SPRING_LONG;
use fmenu_core::{
    Haptics, Identifier, NoopHaptics, PanOutcome, PanPhase, PanTracker, PanVerdict, Point, Rect,
    Size, Transition, TransitionCurve,
};
use fmenu_panel::{
    ActionRow, CommandSink, ListPanelNode, MenuCommand, PanelContent, PanelNode,
    PanelSpecification, Payload, TipDescriptor, TipStream,
};
#[cfg(feature = "tracing")]
use web_time::Instant;

use crate::container::PanelContainer;
use crate::layout::{
    DismissingLayout, EntryLayout, LayoutConstraints, MIN_CHROME_HEIGHT, Presentation,
    SHADOW_INSET, STANDARD_MAX_WIDTH, StackLayout, TIP_SPACING, TipLayout,
};
use crate::scheduler::LayoutScheduler;
use crate::tip::{PlainTipNode, TipNodeFactory};

/// Stack-wide wiring: settle-spring parameters, the haptic sink, and the
/// tip-node factory.
#[derive(Clone)]
pub struct StackConfig {
    /// Parameters of the gesture settle spring.
    pub spring: SpringConfig,
    /// Fired on highlight changes. Never awaited.
    pub haptics: Arc<dyn Haptics>,
    /// Builds tip nodes from descriptors.
    pub tip_factory: TipNodeFactory,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            haptics: Arc::new(NoopHaptics),
            tip_factory: PlainTipNode::factory(),
        }
    }
}

impl fmt::Debug for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackConfig")
            .field("spring", &self.spring)
            .finish_non_exhaustive()
    }
}

/// What a `pop` amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopDisposition {
    /// The stack had at most one entry; removing it means dismissing the
    /// whole menu, which is the owner's decision. The stack is unchanged.
    DismissMenu,
    /// The top entry moved to the dismissing set.
    Popped,
}

/// What a `replace` amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// Identity and row shapes lined up; existing row nodes were patched in
    /// place and nothing was dismissed.
    Patched,
    /// The whole stack was torn down and the new panel pushed.
    Replaced,
}

/// Result of one presentation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Whether presented state is still in motion.
    pub animating: bool,
    /// Dismissing containers whose exit completed and were disposed.
    pub disposed: usize,
}

struct Dismissing {
    container: PanelContainer,
    popped: bool,
    exit: Ease,
    /// Fraction the exit starts from; non-zero when a drag committed.
    from_fraction: f32,
}

/// Ordered panel stack with interruptible gesture-driven pop.
pub struct NavigationStack {
    containers: Vec<PanelContainer>,
    dismissing: Vec<Dismissing>,
    tracker: PanTracker,
    settle: Option<Spring>,
    scheduler: LayoutScheduler,
    config: StackConfig,
    last_top_width: f32,
}

impl NavigationStack {
    #[must_use]
    pub fn new(config: StackConfig) -> Self {
        Self {
            containers: Vec::new(),
            dismissing: Vec::new(),
            tracker: PanTracker::new(),
            settle: None,
            scheduler: LayoutScheduler::new(),
            config,
            last_top_width: 0.0,
        }
    }

    // --- Stack mutation ----------------------------------------------------

    /// Append a panel. `current_scroll` is the outgoing top's scroll
    /// position, remembered for restoration when it resurfaces;
    /// `position_lock` rides through to the owner while this entry is top.
    ///
    /// A `TwoLists` specification expands into two entries pushed
    /// back-to-back: the first carries the identity, tip, payloads, and
    /// dismissal callback; the second is anonymous. Only the second push
    /// honors `animated`.
    pub fn push(
        &mut self,
        spec: PanelSpecification,
        current_scroll: Option<f32>,
        position_lock: Option<f32>,
        animated: bool,
    ) {
        let PanelSpecification {
            identity,
            content,
            tip,
            tip_stream,
            reaction_payload,
            preview_payload,
            on_dismissed,
        } = spec;

        match content {
            PanelContent::TwoLists(first, second) => {
                self.push_entry(
                    identity,
                    Box::new(ListPanelNode::new(first)),
                    tip,
                    tip_stream,
                    reaction_payload,
                    preview_payload,
                    on_dismissed,
                    current_scroll,
                    position_lock,
                    false,
                );
                self.push_entry(
                    None,
                    Box::new(ListPanelNode::new(second)),
                    None,
                    None,
                    None,
                    None,
                    None,
                    None,
                    None,
                    animated,
                );
            }
            PanelContent::List(rows) => self.push_entry(
                identity,
                Box::new(ListPanelNode::new(rows)),
                tip,
                tip_stream,
                reaction_payload,
                preview_payload,
                on_dismissed,
                current_scroll,
                position_lock,
                animated,
            ),
            PanelContent::Custom(node) => self.push_entry(
                identity,
                node,
                tip,
                tip_stream,
                reaction_payload,
                preview_payload,
                on_dismissed,
                current_scroll,
                position_lock,
                animated,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_entry(
        &mut self,
        identity: Option<Identifier>,
        node: Box<dyn PanelNode>,
        tip: Option<TipDescriptor>,
        tip_stream: Option<TipStream>,
        reaction_payload: Option<Payload>,
        preview_payload: Option<Payload>,
        on_dismissed: Option<Box<dyn FnOnce()>>,
        current_scroll: Option<f32>,
        position_lock: Option<f32>,
        animated: bool,
    ) {
        if let Some(top) = self.containers.last_mut() {
            top.store_scroll_offset(current_scroll);
        }
        self.containers.push(PanelContainer::new(
            identity,
            node,
            tip,
            tip_stream,
            reaction_payload,
            preview_payload,
            on_dismissed,
            position_lock,
            Arc::clone(&self.config.tip_factory),
        ));

        let transition = if animated {
            if self.containers.len() == 1 {
                Transition::spring_short()
            } else {
                Transition::spring_long()
            }
        } else {
            Transition::Immediate
        };
        self.scheduler.request(transition);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "stack.push", depth = self.containers.len(), animated);
    }

    /// Remove the top entry. With at most one entry the stack stays intact
    /// and the owner is told to dismiss the whole menu instead.
    pub fn pop(&mut self) -> PopDisposition {
        self.pop_from(0.0)
    }

    fn pop_from(&mut self, from_fraction: f32) -> PopDisposition {
        if self.containers.len() <= 1 {
            self.scheduler.request(Transition::spring_long());
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "stack.pop", disposition = "dismiss-menu");
            return PopDisposition::DismissMenu;
        }

        if let Some(mut container) = self.containers.pop() {
            if let Some(on_dismissed) = container.take_on_dismissed() {
                on_dismissed();
            }
            self.dismissing.push(Dismissing {
                container,
                popped: true,
                exit: Ease::new(SPRING_LONG, TransitionCurve::Spring.easing()),
                from_fraction,
            });
        }
        self.scheduler.request(Transition::spring_long());

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "stack.pop", depth = self.containers.len());
        PopDisposition::Popped
    }

    /// Replace the stack's content with one panel.
    ///
    /// When the specification's identity equals the top entry's, both are
    /// list content, and the row kinds line up 1:1, existing row nodes are
    /// patched in place and nothing transitions. Otherwise every entry is
    /// torn down — each `on_dismissed` fires — and the new panel is pushed.
    /// `animated: None` infers from the identities: a full replace animates
    /// only when the incoming identity differs from the outgoing one.
    pub fn replace(&mut self, spec: PanelSpecification, animated: Option<bool>) -> ReplaceOutcome {
        let top_identity = self
            .containers
            .last()
            .and_then(|container| container.identity().cloned());

        let mut spec = spec;
        let identity_matches = matches!(
            (&spec.identity, &top_identity),
            (Some(new), Some(top)) if new == top
        );
        if identity_matches {
            if let PanelContent::List(rows) = spec.content {
                let result = match self.containers.last_mut() {
                    Some(top) => top.try_rebind_rows(rows),
                    None => Err(rows),
                };
                match result {
                    Ok(()) => {
                        self.scheduler.request(Transition::spring_short());
                        #[cfg(feature = "tracing")]
                        tracing::debug!(message = "stack.replace", outcome = "patched");
                        return ReplaceOutcome::Patched;
                    }
                    // Shapes didn't line up; degrade to a full replace.
                    Err(rows) => spec.content = PanelContent::List(rows),
                }
            }
        }

        let resolved_animated = animated.unwrap_or(match (&spec.identity, &top_identity) {
            (Some(new), Some(top)) => new != top,
            _ => false,
        });

        let replaced: Vec<PanelContainer> = self.containers.drain(..).collect();
        for mut container in replaced {
            if let Some(on_dismissed) = container.take_on_dismissed() {
                on_dismissed();
            }
            if resolved_animated {
                self.dismissing.push(Dismissing {
                    container,
                    popped: false,
                    exit: Ease::new(SPRING_LONG, TransitionCurve::Spring.easing()),
                    from_fraction: 0.0,
                });
            }
        }
        self.tracker.reset();
        self.settle = None;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "stack.replace",
            outcome = "replaced",
            animated = resolved_animated
        );
        self.push(spec, None, None, resolved_animated);
        ReplaceOutcome::Replaced
    }

    /// Rewrite one action row on the top panel, matched by identity.
    pub fn update_action(&mut self, id: &Identifier, action: ActionRow) -> bool {
        let matched = self
            .containers
            .last_mut()
            .is_some_and(|top| top.update_action(id, action));
        if matched {
            self.scheduler.request(Transition::Immediate);
        }
        matched
    }

    /// Apply one emitted command, returning commands outside the stack's
    /// remit (dismiss, custom payloads) for the owner to interpret.
    pub fn apply(&mut self, command: MenuCommand) -> Option<MenuCommand> {
        match command {
            MenuCommand::Pop => match self.pop() {
                PopDisposition::DismissMenu => Some(MenuCommand::Dismiss),
                PopDisposition::Popped => None,
            },
            MenuCommand::Push { spec, animated } => {
                self.push(spec, None, None, animated);
                None
            }
            MenuCommand::Replace { spec, animated } => {
                let _ = self.replace(spec, animated);
                None
            }
            MenuCommand::UpdateAction { id, action } => {
                let _ = self.update_action(&id, action);
                None
            }
            other @ (MenuCommand::Dismiss | MenuCommand::Custom(_)) => Some(other),
        }
    }

    // --- Interactive pop ---------------------------------------------------

    /// Feed one classified pan phase. No-ops while navigation is disabled:
    /// single-entry and empty stacks never track.
    pub fn handle_pan(&mut self, phase: PanPhase) {
        if !self.navigation_enabled() {
            return;
        }
        let width = if self.last_top_width > 0.0 {
            self.last_top_width
        } else {
            STANDARD_MAX_WIDTH
        };

        match self.tracker.apply(phase, width) {
            PanOutcome::Idle => {}
            PanOutcome::FractionChanged => {
                // Track the finger 1:1; any smoothing would lag it.
                self.settle = None;
                self.scheduler.request(Transition::Immediate);
            }
            PanOutcome::Released {
                verdict,
                from_fraction,
            } => {
                self.settle = None;
                match verdict {
                    PanVerdict::Commit => {
                        let _ = self.pop_from(from_fraction);
                    }
                    PanVerdict::Settle => {
                        if from_fraction > 0.0 {
                            self.settle = Some(Spring::with_config(
                                f64::from(from_fraction),
                                0.0,
                                self.config.spring,
                            ));
                        }
                        self.scheduler.request(Transition::spring_long());
                    }
                }
            }
        }
    }

    /// Presented transition fraction: the live gesture while tracking, the
    /// settle spring afterwards, 0 at rest.
    #[must_use]
    pub fn transition_fraction(&self) -> f32 {
        match &self.settle {
            Some(spring) => spring.value(),
            None => self.tracker.fraction(),
        }
    }

    /// Whether a pan gesture is in flight.
    #[must_use]
    pub fn is_gesture_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    // --- Highlight passthrough ---------------------------------------------

    /// Forward a selection-gesture move to the top entry only; covered
    /// entries never receive highlight events.
    pub fn highlight_gesture_moved(&mut self, location: Point) {
        let haptics = Arc::clone(&self.config.haptics);
        if let Some(top) = self.containers.last_mut() {
            top.highlight_gesture_moved(location, haptics.as_ref());
        }
    }

    /// End the selection gesture on the top entry, returning the commands
    /// the performed action emitted.
    pub fn highlight_gesture_finished(&mut self, perform: bool) -> Vec<MenuCommand> {
        let mut sink = CommandSink::new();
        if let Some(top) = self.containers.last_mut() {
            top.highlight_gesture_finished(perform, &mut sink);
        }
        sink.into_commands()
    }

    pub fn decrease_highlighted_index(&mut self) {
        if let Some(top) = self.containers.last_mut() {
            top.decrease_highlighted_index();
        }
    }

    pub fn increase_highlighted_index(&mut self) {
        if let Some(top) = self.containers.last_mut() {
            top.increase_highlighted_index();
        }
    }

    // --- Layout ------------------------------------------------------------

    /// Run one layout pass, consuming the scheduled transition and any
    /// staged appearance flags. Safe to call at any time.
    pub fn update(
        &mut self,
        constraints: LayoutConstraints,
        presentation: Presentation,
    ) -> StackLayout {
        #[cfg(feature = "tracing")]
        let update_start = Instant::now();

        let transition = self
            .scheduler
            .take_scheduled()
            .unwrap_or(Transition::Immediate);
        let fraction = self.transition_fraction();
        let count = self.containers.len();
        let replacing = self.dismissing.iter().any(|exit| !exit.popped);

        let mut measures = Vec::with_capacity(count);
        for index in 0..count {
            let (transition_fraction, alpha_fraction) = if index + 1 == count {
                (fraction, 1.0)
            } else if index + 2 == count {
                (fraction - 1.0, fraction)
            } else {
                (0.0, 0.0)
            };
            let measure = self.containers[index].update(constraints.size, alpha_fraction, transition);
            measures.push((transition_fraction, alpha_fraction, measure));
        }

        // A fresh container slides in from the right when the pass animates
        // and either siblings sit beneath it or a full replace is exiting.
        for (index, container) in self.containers.iter_mut().enumerate() {
            if container.take_fresh()
                && transition.is_animated()
                && (count > 1 || (index + 1 == count && replacing))
            {
                container.begin_enter(transition);
            }
        }

        // Chrome blends the top two entries by the live fraction so it
        // resizes continuously mid-drag instead of snapping.
        let (top_width, top_apparent, top_height) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let (_, _, top) = measures[count - 1];
            if count > 1 {
                let (_, _, previous) = measures[count - 2];
                (
                    lerp(top.size.width, previous.size.width, fraction),
                    lerp(top.apparent_height, previous.apparent_height, fraction),
                    lerp(top.size.height, previous.size.height, fraction),
                )
            } else {
                (top.size.width, top.apparent_height, top.size.height)
            }
        };

        let chrome_frame = if top_apparent <= 0.0 {
            Rect::ZERO
        } else {
            Rect::new(0.0, 0.0, top_width, top_apparent.max(MIN_CHROME_HEIGHT))
        };
        let shadow_frame = (presentation.has_shadow() && !chrome_frame.is_empty())
            .then(|| chrome_frame.inset_by(-SHADOW_INSET, -SHADOW_INSET));

        let mut entries = Vec::with_capacity(count);
        for (index, &(transition_fraction, alpha_fraction, measure)) in
            measures.iter().enumerate()
        {
            // A covered entry slides out by its own width; the node's depth
            // transform shifts it back by a half width, netting the peek.
            // Entries moving forward slide by the width of what they cover.
            let reference_width = if index == 0 {
                measures[count - 1].2.size.width
            } else {
                measures[index - 1].2.size.width
            };
            let offset_x = if transition_fraction < 0.0 {
                transition_fraction * measure.size.width
            } else {
                transition_fraction * reference_width
            } + self.containers[index].enter_offset();

            let tip = self.containers[index].tip().map(|tip| TipLayout {
                frame: Rect::new(
                    chrome_frame.min_x(),
                    chrome_frame.max_y() + TIP_SPACING,
                    measure.size.width,
                    tip.size().height,
                ),
                alpha: alpha_fraction * tip.alpha(),
            });

            entries.push(EntryLayout {
                index,
                frame: Rect::new(offset_x, 0.0, measure.size.width, measure.size.height),
                node_center: measure.transform.center,
                node_scale: measure.transform.scale,
                transition_fraction,
                alpha_fraction,
                dim_alpha: measure.transform.dim_alpha,
                tip,
            });
        }

        let mut dismissing = Vec::with_capacity(self.dismissing.len());
        for exit in &self.dismissing {
            let size = exit.container.last_measure().size;
            let start_x = exit.from_fraction * size.width;
            let target_x = if exit.popped {
                size.width / 2.0 + top_width
            } else {
                size.width / 2.0 - top_width
            };
            let progress = exit.exit.value();
            let x = lerp(start_x, target_x, progress);
            let tip = exit.container.tip().map(|tip| TipLayout {
                frame: Rect::new(x, size.height + TIP_SPACING, size.width, tip.size().height),
                alpha: (1.0 - progress) * tip.alpha(),
            });
            dismissing.push(DismissingLayout {
                frame: Rect::new(x, 0.0, size.width, size.height),
                popped: exit.popped,
                tip,
            });
        }

        let tip_extent = entries
            .last()
            .and_then(|entry| entry.tip.as_ref())
            .map_or(0.0, |tip| TIP_SPACING + tip.frame.height);
        let size = Size::new(top_width, top_height + tip_extent);

        if top_width > 0.0 {
            self.last_top_width = top_width;
        }

        #[cfg(feature = "tracing")]
        {
            let update_duration_us = update_start.elapsed().as_micros() as u64;
            tracing::trace!(
                message = "stack.update",
                depth = count,
                dismissing = dismissing.len(),
                fraction,
                update_duration_us
            );
        }

        StackLayout {
            entries,
            dismissing,
            chrome_frame,
            shadow_frame,
            presentation,
            size,
        }
    }

    /// Advance presentation animations: the gesture settle spring, enter
    /// slides, tip fades, and dismissing exits. The sole disposal site for
    /// the dismissing set.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let mut animating = false;

        if let Some(spring) = &mut self.settle {
            spring.tick(dt);
            if spring.is_complete() {
                self.settle = None;
            } else {
                animating = true;
            }
            // The presented fraction moved either way.
            self.scheduler.request(Transition::Immediate);
        }

        let mut tips_changed = false;
        for container in &mut self.containers {
            animating |= container.tick(dt);
            tips_changed |= container.poll_tip_stream();
        }
        if tips_changed {
            self.scheduler.request(Transition::Immediate);
        }

        let mut disposed = 0;
        self.dismissing.retain_mut(|exit| {
            let _ = exit.container.tick(dt);
            exit.exit.tick(dt);
            if exit.exit.is_complete() {
                disposed += 1;
                false
            } else {
                animating = true;
                true
            }
        });
        if disposed > 0 {
            self.scheduler.request(Transition::Immediate);
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "stack.disposed", disposed);
        }

        TickOutcome { animating, disposed }
    }

    // --- Accessors ---------------------------------------------------------

    /// Number of live entries, dismissing set excluded.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Whether the inter-panel pan gesture is live.
    #[must_use]
    pub fn navigation_enabled(&self) -> bool {
        self.containers.len() > 1
    }

    /// Containers still riding out their exit animation.
    #[must_use]
    pub fn dismissing_count(&self) -> usize {
        self.dismissing.len()
    }

    /// Whether a layout pass is owed.
    #[must_use]
    pub fn has_scheduled_layout(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    #[must_use]
    pub fn top_identity(&self) -> Option<&Identifier> {
        self.containers.last().and_then(PanelContainer::identity)
    }

    #[must_use]
    pub fn top_reaction_payload(&self) -> Option<&Payload> {
        self.containers
            .last()
            .and_then(PanelContainer::reaction_payload)
    }

    #[must_use]
    pub fn top_preview_payload(&self) -> Option<&Payload> {
        self.containers
            .last()
            .and_then(PanelContainer::preview_payload)
    }

    #[must_use]
    pub fn top_position_lock(&self) -> Option<f32> {
        self.containers
            .last()
            .and_then(PanelContainer::position_lock)
    }

    /// Scroll position remembered for the top entry, set when a later entry
    /// pushed over it.
    #[must_use]
    pub fn stored_scroll_offset(&self) -> Option<f32> {
        self.containers
            .last()
            .and_then(PanelContainer::stored_scroll_offset)
    }

    pub fn clear_stored_scroll_offset(&mut self) {
        if let Some(top) = self.containers.last_mut() {
            top.clear_stored_scroll_offset();
        }
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

impl fmt::Debug for NavigationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationStack")
            .field("depth", &self.containers.len())
            .field("dismissing", &self.dismissing.len())
            .field("fraction", &self.transition_fraction())
            .finish_non_exhaustive()
    }
}
