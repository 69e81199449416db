//! Property-based invariant tests for the row-list diff engine.
//!
//! These tests verify structural invariants that must hold for any pair of
//! row lists:
//!
//! 1. Applying deletions, insertions, then updates to the old list yields
//!    exactly the new list (content-wise).
//! 2. Diffing a list against itself is empty.
//! 3. Deletions are strictly descending; insertions and updates strictly
//!    ascending.
//! 4. Every index is in range for the list it targets, and no index is both
//!    inserted and updated.
//! 5. A move's `previous_index` points at a row with the same identity and
//!    kind.
//! 6. Updates only target rows whose content actually changed.
//! 7. `ListPanelNode::set_rows` ends with exactly the new list, whatever the
//!    mutation mix.

use fmenu_panel::{ActionRow, ListPanelNode, RowEntry, diff_rows};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Distinct ids drawn from a small universe, in random order, with random
/// content versions and separators sprinkled between rows. Two lists built
/// from the same universe overlap, reorder, appear, and vanish naturally.
fn arb_rows() -> impl Strategy<Value = Vec<RowEntry>> {
    proptest::collection::vec(any::<bool>(), 14)
        .prop_map(|mask| {
            mask.iter()
                .enumerate()
                .filter(|&(_, &keep)| keep)
                .map(|(id, _)| id as i64)
                .collect::<Vec<i64>>()
        })
        .prop_shuffle()
        .prop_flat_map(|ids| {
            let len = ids.len();
            (
                Just(ids),
                proptest::collection::vec(0u8..3, len),
                proptest::collection::vec(any::<bool>(), len),
            )
        })
        .prop_map(|(ids, versions, separators)| {
            let mut rows = Vec::new();
            for ((id, version), separator_before) in
                ids.iter().zip(&versions).zip(&separators)
            {
                if *separator_before {
                    rows.push(RowEntry::Separator);
                }
                rows.push(RowEntry::Action(
                    ActionRow::new(format!("row-{id}-v{version}")).id(*id),
                ));
            }
            rows
        })
}

fn content_equal(a: &[RowEntry], b: &[RowEntry]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
}

fn titles(rows: &[RowEntry]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            RowEntry::Action(action) => action.title().to_owned(),
            RowEntry::Separator => "<sep>".to_owned(),
            RowEntry::Custom(_) => "<custom>".to_owned(),
        })
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Applying the diff reproduces the new list
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn apply_reproduces_new_list(old in arb_rows(), new in arb_rows()) {
        let diff = diff_rows(&old, &new);
        let applied = diff.apply_to(&old);
        prop_assert!(
            content_equal(&applied, &new),
            "applied {:?} != new {:?} (old {:?})",
            titles(&applied), titles(&new), titles(&old)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Self-diff is empty
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn self_diff_is_empty(rows in arb_rows()) {
        let diff = diff_rows(&rows, &rows);
        prop_assert!(
            diff.is_empty(),
            "self-diff produced {} deletions, {} insertions, {} updates",
            diff.deletions.len(), diff.insertions.len(), diff.updates.len()
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Application-order invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn indices_are_ordered(old in arb_rows(), new in arb_rows()) {
        let diff = diff_rows(&old, &new);

        prop_assert!(
            diff.deletions.windows(2).all(|pair| pair[0] > pair[1]),
            "deletions not strictly descending: {:?}", diff.deletions
        );
        prop_assert!(
            diff.insertions.windows(2).all(|pair| pair[0].index < pair[1].index),
            "insertions not strictly ascending"
        );
        prop_assert!(
            diff.updates.windows(2).all(|pair| pair[0].index < pair[1].index),
            "updates not strictly ascending"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Every index is in range and roles don't overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn indices_are_in_range(old in arb_rows(), new in arb_rows()) {
        let diff = diff_rows(&old, &new);

        for &deleted in &diff.deletions {
            prop_assert!(deleted < old.len(), "deletion {} out of range", deleted);
        }
        for insertion in &diff.insertions {
            prop_assert!(insertion.index < new.len());
            if let Some(previous) = insertion.previous_index {
                prop_assert!(previous < old.len());
            }
        }
        for update in &diff.updates {
            prop_assert!(update.index < new.len());
            prop_assert!(
                diff.insertions.iter().all(|ins| ins.index != update.index),
                "index {} both inserted and updated", update.index
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Moves point at the same row
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_preserve_identity(old in arb_rows(), new in arb_rows()) {
        let diff = diff_rows(&old, &new);
        for insertion in &diff.insertions {
            let Some(previous) = insertion.previous_index else {
                continue;
            };
            prop_assert_eq!(
                old[previous].identity(), insertion.entry.identity(),
                "move from old index {} changed identity", previous
            );
            prop_assert_eq!(old[previous].kind(), insertion.entry.kind());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Updates only fire on changed content
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn updates_require_content_change(old in arb_rows(), new in arb_rows()) {
        let diff = diff_rows(&old, &new);
        for update in &diff.updates {
            // Anonymous separators always compare equal, so every update in
            // this strategy must carry an identity.
            let identity = update.entry.identity();
            prop_assert!(identity.is_some(), "update at {} on id-less row", update.index);
            if let Some(id) = identity {
                let old_row = old.iter().find(|row| row.identity() == Some(id));
                prop_assert!(
                    old_row.is_some_and(|row| !row.content_eq(&update.entry)),
                    "update at {} targets unchanged content", update.index
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Live application through ListPanelNode matches
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_rows_lands_on_new_list(old in arb_rows(), new in arb_rows()) {
        let mut list = ListPanelNode::new(old);
        list.set_rows(new.clone());

        let resulting: Vec<RowEntry> = list.rows().cloned().collect();
        prop_assert!(
            content_equal(&resulting, &new),
            "set_rows ended on {:?}, wanted {:?}",
            titles(&resulting), titles(&new)
        );
    }
}
