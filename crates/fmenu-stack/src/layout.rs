#![forbid(unsafe_code)]

//! Layout vocabulary: constants, presentation styles, and the pass output.
//!
//! The navigation stack's `update` is a pure function from stack state to a
//! [`StackLayout`]: one frame/transform/alpha set per visible entry, the
//! blended chrome and shadow frames, tip placements, and exit frames for
//! containers riding the dismissing set. The host draws from this; the
//! engine never renders.

use fmenu_core::{Rect, Size};

/// Narrowest a list panel may lay out.
pub const STANDARD_MIN_WIDTH: f32 = 220.0;

/// Widest any panel may lay out; full-width content pins to exactly this.
pub const STANDARD_MAX_WIDTH: f32 = 240.0;

/// Depth-cue width shrink of a fully covered panel. Contractual, not
/// derived.
pub const MAX_SCALE_OFFSET: f32 = 10.0;

/// Gap between the panel chrome and its tip overlay.
pub const TIP_SPACING: f32 = 10.0;

/// Drop-shadow outset around the chrome and tips.
pub const SHADOW_INSET: f32 = 30.0;

/// The chrome never presents shorter than this while non-empty.
pub const MIN_CHROME_HEIGHT: f32 = 28.0;

/// How the owning surface presents the menu. The engine only reports the
/// style; drawing the chrome is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Opaque chrome, no shadow.
    Modal,
    /// Blurred chrome over content, with a shadow.
    #[default]
    Inline,
    /// Half-alpha blurred chrome, with a shadow. Secondary menus stacked
    /// next to a primary one.
    Additional,
}

impl Presentation {
    /// Whether a drop shadow surrounds the chrome.
    #[must_use]
    pub const fn has_shadow(self) -> bool {
        !matches!(self, Self::Modal)
    }

    /// Whether the chrome blurs the content beneath it.
    #[must_use]
    pub const fn is_blurred(self) -> bool {
        !matches!(self, Self::Modal)
    }

    /// Alpha of the chrome surface.
    #[must_use]
    pub const fn chrome_alpha(self) -> f32 {
        match self {
            Self::Modal | Self::Inline => 1.0,
            Self::Additional => 0.5,
        }
    }
}

/// Inputs to one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    /// Space the owning surface offers the whole menu.
    pub size: Size,
}

impl LayoutConstraints {
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self { size }
    }
}

/// Placement of one tip overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipLayout {
    pub frame: Rect,
    pub alpha: f32,
}

/// Placement of one live stack entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryLayout {
    /// Position in the stack, bottom first.
    pub index: usize,
    /// Container frame; the x origin carries the transition offset and any
    /// enter slide.
    pub frame: Rect,
    /// Center of the panel node inside the container, after the depth
    /// transform.
    pub node_center: fmenu_core::Point,
    /// Uniform scale of the panel node.
    pub node_scale: f32,
    /// Reveal progress relative to this entry: live fraction on top,
    /// `fraction - 1` one below, 0 deeper.
    pub transition_fraction: f32,
    /// Reveal measure: 1 on top, live fraction one below, 0 deeper.
    pub alpha_fraction: f32,
    /// Dim overlay alpha, exactly `1 - alpha_fraction`.
    pub dim_alpha: f32,
    pub tip: Option<TipLayout>,
}

/// Placement of one container finishing its exit animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissingLayout {
    pub frame: Rect,
    /// Whether the exit is a pop (slides right) or a replace (slides left).
    pub popped: bool,
    pub tip: Option<TipLayout>,
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackLayout {
    /// Live entries, bottom first. During a drag only the top two move.
    pub entries: Vec<EntryLayout>,
    /// Containers riding out their exit animations.
    pub dismissing: Vec<DismissingLayout>,
    /// Shared rounded-rect background, blended across the top two entries.
    /// Zero when the stack presents nothing.
    pub chrome_frame: Rect,
    /// Chrome outset by [`SHADOW_INSET`]; absent for shadowless
    /// presentations and empty chromes.
    pub shadow_frame: Option<Rect>,
    pub presentation: Presentation,
    /// Extent the surrounding chrome should adopt, tip included.
    pub size: Size,
}
