//! Property-based invariant tests for the pan-gesture tracker.
//!
//! These hold for any sequence of gesture phases:
//!
//! 1. The fraction is always within [0.0, 1.0].
//! 2. A release commits iff the fraction at release exceeds the commit
//!    threshold, and only the final `Changed` sample matters.
//! 3. `Ended` and `Cancelled` produce identical outcomes.
//! 4. After any release the tracker is idle with a zero fraction.

use fmenu_core::{COMMIT_THRESHOLD, PanDirections, PanOutcome, PanPhase, PanTracker, PanVerdict, Point};
use proptest::prelude::*;

const WIDTH: f32 = 240.0;

fn arb_translations() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-100.0_f32..400.0, 1..24)
}

proptest! {
    #[test]
    fn fraction_stays_clamped(translations in arb_translations()) {
        let mut tracker = PanTracker::new();
        tracker.apply(
            PanPhase::Began { directions: PanDirections::RIGHT },
            WIDTH,
        );
        for x in translations {
            tracker.apply(
                PanPhase::Changed { translation: Point::new(x, 0.0) },
                WIDTH,
            );
            prop_assert!((0.0..=1.0).contains(&tracker.fraction()));
        }
    }

    #[test]
    fn release_verdict_depends_only_on_final_sample(
        translations in arb_translations(),
        cancelled in any::<bool>(),
    ) {
        let mut tracker = PanTracker::new();
        tracker.apply(
            PanPhase::Began { directions: PanDirections::RIGHT },
            WIDTH,
        );
        let mut expected_fraction = 0.0_f32;
        for &x in &translations {
            tracker.apply(
                PanPhase::Changed { translation: Point::new(x, 0.0) },
                WIDTH,
            );
            expected_fraction = (x / WIDTH).clamp(0.0, 1.0);
        }

        let phase = if cancelled { PanPhase::Cancelled } else { PanPhase::Ended };
        match tracker.apply(phase, WIDTH) {
            PanOutcome::Released { verdict, from_fraction } => {
                prop_assert_eq!(from_fraction, expected_fraction);
                let expected_verdict = if expected_fraction > COMMIT_THRESHOLD {
                    PanVerdict::Commit
                } else {
                    PanVerdict::Settle
                };
                prop_assert_eq!(verdict, expected_verdict);
            }
            other => prop_assert!(false, "expected release, got {:?}", other),
        }

        prop_assert_eq!(tracker.fraction(), 0.0);
        prop_assert!(!tracker.is_tracking());
    }

    #[test]
    fn phases_without_began_never_track(translations in arb_translations()) {
        let mut tracker = PanTracker::new();
        for x in translations {
            let outcome = tracker.apply(
                PanPhase::Changed { translation: Point::new(x, 0.0) },
                WIDTH,
            );
            prop_assert_eq!(outcome, PanOutcome::Idle);
        }
        prop_assert_eq!(tracker.apply(PanPhase::Ended, WIDTH), PanOutcome::Idle);
    }
}
