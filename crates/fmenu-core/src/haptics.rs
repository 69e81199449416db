#![forbid(unsafe_code)]

//! Haptic feedback seam.
//!
//! Highlight changes fire a physical tick on platforms that have an engine
//! for it. The engine itself is host-provided; this module only defines the
//! seam so the navigation stack can fire feedback without knowing whether
//! anything is listening.

#[cfg(feature = "test-helpers")]
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Sink for haptic feedback events.
///
/// Implementations must be cheap to call: `tap` fires on every pointer-driven
/// highlight change, including the change to no highlight.
pub trait Haptics {
    /// Light selection tick.
    fn tap(&self);
}

/// Discards all feedback. The default when the host wires nothing up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    #[inline]
    fn tap(&self) {}
}

/// Counts feedback events for assertions. Clones share the same counters.
#[cfg(feature = "test-helpers")]
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    taps: Arc<AtomicUsize>,
}

#[cfg(feature = "test-helpers")]
impl RecordingHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `tap` calls observed across all clones.
    #[must_use]
    pub fn tap_count(&self) -> usize {
        self.taps.load(Ordering::Relaxed)
    }
}

#[cfg(feature = "test-helpers")]
impl Haptics for RecordingHaptics {
    fn tap(&self) {
        self.taps.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(all(test, feature = "test-helpers"))]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counts() {
        let recorder = RecordingHaptics::new();
        let clone = recorder.clone();
        recorder.tap();
        clone.tap();
        assert_eq!(recorder.tap_count(), 2);
        assert_eq!(clone.tap_count(), 2);
    }
}
