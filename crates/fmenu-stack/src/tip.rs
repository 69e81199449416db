#![forbid(unsafe_code)]

//! Tip overlays: the secondary surface anchored below the active panel.
//!
//! A tip arrives on the panel's specification, statically or through a tip
//! stream, and may change or disappear while the panel is on screen. Tips
//! are compared by descriptor value; a changed descriptor swaps the node,
//! keeping the outgoing one alive briefly so it can cross-fade into its
//! replacement.
//!
//! # Invariants
//!
//! 1. A tip overlay belongs to exactly one container and dies with it;
//!    stream emissions after disposal go nowhere.
//! 2. An overlay's alpha is its fade-in progress, 1.0 once settled; an
//!    outgoing overlay reports the complement of its fade-out.
//! 3. Measurement order is the container's call: list panels measure the tip
//!    after the panel, full-width panels before it.

use std::sync::Arc;
use std::time::Duration;

use fmenu_core::animation::{Animation, Ease};
use fmenu_core::transition::TIP_FADE;
use fmenu_core::{Point, Size, TransitionCurve};
use fmenu_panel::TipDescriptor;

/// Renderer contract for one tip surface.
pub trait TipNode {
    /// Size under the given width bound.
    fn measure(&mut self, max_width: f32) -> Size;

    /// Pointer moved over the tip while the selection gesture is down.
    /// `location` is in the tip's own coordinates.
    fn highlight_gesture_moved(&mut self, location: Point) {
        let _ = location;
    }
}

/// Builds a [`TipNode`] for a descriptor.
pub type TipNodeFactory = Arc<dyn Fn(&TipDescriptor) -> Box<dyn TipNode>>;

const TIP_SIDE_INSET: f32 = 12.0;
const TIP_VERTICAL_INSET: f32 = 10.0;
const TIP_LINE_HEIGHT: f32 = 17.0;
const TIP_ADVANCE: f32 = 7.0;
const TIP_ACTION_HEIGHT: f32 = 20.0;

/// Fixed-metric [`TipNode`]: estimated advances, greedy character wrapping.
/// The default when the host supplies no factory; real text engines
/// implement [`TipNode`] themselves.
#[derive(Debug)]
pub struct PlainTipNode {
    descriptor: TipDescriptor,
}

impl PlainTipNode {
    #[must_use]
    pub fn new(descriptor: TipDescriptor) -> Self {
        Self { descriptor }
    }

    /// Factory producing plain tip nodes.
    #[must_use]
    pub fn factory() -> TipNodeFactory {
        Arc::new(|descriptor: &TipDescriptor| -> Box<dyn TipNode> {
            Box::new(PlainTipNode::new(descriptor.clone()))
        })
    }
}

impl TipNode for PlainTipNode {
    fn measure(&mut self, max_width: f32) -> Size {
        let text_width = self.descriptor.text().chars().count() as f32 * TIP_ADVANCE;
        let available = (max_width - TIP_SIDE_INSET * 2.0).max(TIP_ADVANCE);
        let lines = (text_width / available).ceil().max(1.0);

        let mut height = TIP_VERTICAL_INSET * 2.0 + lines * TIP_LINE_HEIGHT;
        if self.descriptor.action_title_text().is_some() {
            height += TIP_ACTION_HEIGHT;
        }

        let width = (text_width + TIP_SIDE_INSET * 2.0).min(max_width);
        Size::new(width, height)
    }
}

/// One live tip surface bound to a container.
pub struct TipOverlay {
    descriptor: TipDescriptor,
    node: Box<dyn TipNode>,
    fade_in: Option<Ease>,
    size: Size,
}

impl TipOverlay {
    /// Build an overlay for `descriptor`. Animated arrivals fade in over
    /// [`TIP_FADE`]; immediate arrivals present at full alpha.
    #[must_use]
    pub fn new(descriptor: TipDescriptor, factory: &TipNodeFactory, animated: bool) -> Self {
        let node = (factory)(&descriptor);
        Self {
            descriptor,
            node,
            fade_in: animated.then(|| Ease::new(TIP_FADE, TransitionCurve::Spring.easing())),
            size: Size::ZERO,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &TipDescriptor {
        &self.descriptor
    }

    /// Measure and remember the tip's size at the given width bound.
    pub fn measure(&mut self, max_width: f32) -> Size {
        self.size = self.node.measure(max_width);
        self.size
    }

    /// Size committed by the last `measure`.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Fade-in progress; 1.0 once settled.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.fade_in.as_ref().map_or(1.0, Animation::value)
    }

    /// Advance the fade. Returns whether the overlay is still animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if let Some(fade) = &mut self.fade_in {
            fade.tick(dt);
            if fade.is_complete() {
                self.fade_in = None;
                return false;
            }
            return true;
        }
        false
    }

    /// Forward a selection-gesture move, in tip coordinates.
    pub fn highlight_gesture_moved(&mut self, location: Point) {
        self.node.highlight_gesture_moved(location);
    }
}

impl std::fmt::Debug for TipOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipOverlay")
            .field("descriptor", &self.descriptor)
            .field("fading_in", &self.fade_in.is_some())
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A replaced tip riding out its fade so the swap cross-animates.
pub struct OutgoingTip {
    overlay: TipOverlay,
    fade_out: Ease,
}

impl OutgoingTip {
    #[must_use]
    pub fn new(overlay: TipOverlay) -> Self {
        Self {
            overlay,
            fade_out: Ease::new(TIP_FADE, TransitionCurve::Spring.easing()),
        }
    }

    /// Remaining visibility: 1.0 at the swap, 0.0 once faded.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        1.0 - self.fade_out.value()
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.overlay.size()
    }

    /// Advance the fade. Returns whether the outgoing tip is spent and may
    /// be discarded.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.fade_out.tick(dt);
        self.fade_out.is_complete()
    }
}

impl std::fmt::Debug for OutgoingTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutgoingTip")
            .field("descriptor", self.overlay.descriptor())
            .field("alpha", &self.alpha())
            .finish_non_exhaustive()
    }
}
