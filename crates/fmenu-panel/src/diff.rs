#![forbid(unsafe_code)]

//! Identity-keyed list diff: minimal mutations between two row lists.
//!
//! Rows with identities key by identity; id-less rows key by their ordinal
//! among id-less rows of the same kind, so anonymous separators pair up
//! positionally. Survivors (key present on both sides, same kind) are split
//! by a longest-increasing spine over their old indices: rows on the spine
//! stay in place and become updates if their content changed, rows off the
//! spine move as a deletion plus a re-insert that carries `previous_index`
//! so the caller can keep the node (and its per-node state) alive.
//!
//! # Invariants
//!
//! 1. `deletions` is strictly descending, `insertions` and `updates`
//!    strictly ascending; applying in that order (deletions, insertions,
//!    updates) against the old list reproduces the new list.
//! 2. A key paired with a different kind never survives; it splits into a
//!    deletion and a fresh insertion.
//! 3. Updates only target rows that did not move; a moved row's new content
//!    rides its re-insert.
//!
//! # Failure Modes
//!
//! 1. Duplicate identities within one list are a caller bug; debug builds
//!    assert, release builds keep the first occurrence and treat the rest
//!    as fresh rows.

use ahash::{AHashMap, AHashSet};

use fmenu_core::Identifier;

use crate::row::{RowEntry, RowKind};

/// Diff key of one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Caller-supplied stable identity.
    Identity(Identifier),
    /// Position among id-less rows of the same kind.
    Ordinal(RowKind, usize),
}

impl RowKey {
    /// Keys for every row in `rows`, in order.
    #[must_use]
    pub fn assign(rows: &[RowEntry]) -> Vec<RowKey> {
        let mut ordinals = [0_usize; 3];
        rows.iter()
            .map(|entry| match entry.identity() {
                Some(id) => RowKey::Identity(id.clone()),
                None => {
                    let kind = entry.kind();
                    let slot = match kind {
                        RowKind::Action => 0,
                        RowKind::Separator => 1,
                        RowKind::Custom => 2,
                    };
                    let ordinal = ordinals[slot];
                    ordinals[slot] += 1;
                    RowKey::Ordinal(kind, ordinal)
                }
            })
            .collect()
    }
}

/// One row entering the list, possibly reusing a node that moved.
#[derive(Debug, Clone)]
pub struct RowInsertion {
    /// Position in the new list.
    pub index: usize,
    pub entry: RowEntry,
    /// Old index of the node to adopt; `None` builds a fresh node.
    pub previous_index: Option<usize>,
}

/// In-place content change of a row that did not move.
#[derive(Debug, Clone)]
pub struct RowUpdate {
    /// Position in the new list.
    pub index: usize,
    pub entry: RowEntry,
}

/// Minimal mutation set between two row lists.
#[derive(Debug, Clone, Default)]
pub struct RowListDiff {
    /// Old indices, descending.
    pub deletions: Vec<usize>,
    /// New indices, ascending.
    pub insertions: Vec<RowInsertion>,
    /// New indices, ascending.
    pub updates: Vec<RowUpdate>,
}

impl RowListDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.updates.is_empty()
    }

    /// Reference application: the row list a faithful consumer ends up with.
    #[must_use]
    pub fn apply_to(&self, old: &[RowEntry]) -> Vec<RowEntry> {
        let mut rows: Vec<RowEntry> = old.to_vec();
        for &index in &self.deletions {
            rows.remove(index);
        }
        for insertion in &self.insertions {
            rows.insert(insertion.index, insertion.entry.clone());
        }
        for update in &self.updates {
            rows[update.index] = update.entry.clone();
        }
        rows
    }
}

/// Diff `old` against `new`.
#[must_use]
pub fn diff_rows(old: &[RowEntry], new: &[RowEntry]) -> RowListDiff {
    let old_keys = RowKey::assign(old);
    let new_keys = RowKey::assign(new);

    // First occurrence wins on duplicate keys; later duplicates fall out as
    // plain deletions and fresh insertions.
    let mut old_index_by_key: AHashMap<&RowKey, usize> = AHashMap::with_capacity(old_keys.len());
    for (index, key) in old_keys.iter().enumerate() {
        let slot = old_index_by_key.entry(key).or_insert(index);
        debug_assert!(*slot == index, "duplicate row key in old list: {key:?}");
    }

    // Pair each new row with an unclaimed old row of the same key and kind.
    let mut claimed = vec![false; old.len()];
    let mut matched_old: Vec<Option<usize>> = Vec::with_capacity(new.len());
    let mut seen_new_keys: AHashSet<&RowKey> = AHashSet::with_capacity(new_keys.len());
    for (new_i, key) in new_keys.iter().enumerate() {
        debug_assert!(
            seen_new_keys.insert(key),
            "duplicate row key in new list: {key:?}"
        );
        let matched = old_index_by_key
            .get(key)
            .copied()
            .filter(|&old_i| !claimed[old_i] && old[old_i].kind() == new[new_i].kind());
        if let Some(old_i) = matched {
            claimed[old_i] = true;
        }
        matched_old.push(matched);
    }

    let survivor_old: Vec<usize> = matched_old.iter().flatten().copied().collect();
    let spine = increasing_spine(&survivor_old);

    let mut deletions: Vec<usize> = claimed
        .iter()
        .enumerate()
        .filter(|&(_, &kept)| !kept)
        .map(|(index, _)| index)
        .collect();
    let mut insertions = Vec::new();
    let mut updates = Vec::new();

    for (new_i, matched) in matched_old.iter().enumerate() {
        match *matched {
            None => insertions.push(RowInsertion {
                index: new_i,
                entry: new[new_i].clone(),
                previous_index: None,
            }),
            Some(old_i) if !spine.contains(&old_i) => {
                deletions.push(old_i);
                insertions.push(RowInsertion {
                    index: new_i,
                    entry: new[new_i].clone(),
                    previous_index: Some(old_i),
                });
            }
            Some(old_i) => {
                if !old[old_i].content_eq(&new[new_i]) {
                    updates.push(RowUpdate {
                        index: new_i,
                        entry: new[new_i].clone(),
                    });
                }
            }
        }
    }

    deletions.sort_unstable_by(|a, b| b.cmp(a));

    RowListDiff {
        deletions,
        insertions,
        updates,
    }
}

/// Values (all distinct) that form a longest strictly-increasing
/// subsequence, patience style. Ties resolve toward later elements, which
/// keeps the latest run of stable rows anchored.
fn increasing_spine(values: &[usize]) -> AHashSet<usize> {
    // tails[k] holds the position of the smallest tail among increasing
    // runs of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = vec![None; values.len()];

    for (position, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&tail| values[tail] < value);
        if slot > 0 {
            predecessor[position] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(position);
        } else {
            tails[slot] = position;
        }
    }

    let mut spine = AHashSet::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(position) = cursor {
        spine.insert(values[position]);
        cursor = predecessor[position];
    }
    spine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{ActionRow, CustomRow};

    fn action(id: i64, title: &str) -> RowEntry {
        RowEntry::Action(ActionRow::new(title).id(id))
    }

    fn ids(insertions: &[RowInsertion]) -> Vec<(usize, Option<usize>)> {
        insertions
            .iter()
            .map(|ins| (ins.index, ins.previous_index))
            .collect()
    }

    #[test]
    fn identical_lists_diff_empty() {
        let rows = vec![action(1, "Reply"), RowEntry::Separator, action(2, "Copy")];
        let diff = diff_rows(&rows, &rows);
        assert!(diff.is_empty());
    }

    #[test]
    fn value_change_in_place_is_one_update() {
        let old = vec![action(1, "Reply"), action(2, "Mute"), action(3, "Delete")];
        let new = vec![action(1, "Reply"), action(2, "Unmute"), action(3, "Delete")];

        let diff = diff_rows(&old, &new);
        assert!(diff.deletions.is_empty());
        assert!(diff.insertions.is_empty());
        assert_eq!(diff.updates.len(), 1);
        assert_eq!(diff.updates[0].index, 1);
        assert!(diff.updates[0].entry.content_eq(&new[1]));
    }

    #[test]
    fn rotation_moves_one_row() {
        let old = vec![action(1, "A"), action(2, "B"), action(3, "C")];
        let new = vec![action(3, "C"), action(1, "A"), action(2, "B")];

        let diff = diff_rows(&old, &new);
        assert_eq!(diff.deletions, vec![2]);
        assert_eq!(ids(&diff.insertions), vec![(0, Some(2))]);
        assert!(diff.updates.is_empty());
    }

    #[test]
    fn swap_with_fresh_row_between() {
        let old = vec![action(1, "A"), action(2, "B")];
        let new = vec![action(2, "B"), action(4, "X"), action(1, "A")];

        let diff = diff_rows(&old, &new);
        assert_eq!(diff.deletions, vec![1]);
        assert_eq!(ids(&diff.insertions), vec![(0, Some(1)), (1, None)]);
        assert!(diff.updates.is_empty());
    }

    #[test]
    fn kind_change_at_same_identity_never_survives() {
        let old = vec![action(1, "A")];
        let new = vec![RowEntry::Custom(
            CustomRow::new(|| unreachable!("diff never builds nodes")).id(1),
        )];

        let diff = diff_rows(&old, &new);
        assert_eq!(diff.deletions, vec![0]);
        assert_eq!(ids(&diff.insertions), vec![(0, None)]);
        assert!(diff.updates.is_empty());
    }

    #[test]
    fn anonymous_separators_pair_by_ordinal() {
        let old = vec![
            action(1, "A"),
            RowEntry::Separator,
            action(2, "B"),
            RowEntry::Separator,
            action(3, "C"),
        ];
        let new = vec![action(1, "A"), RowEntry::Separator, action(3, "C")];

        let diff = diff_rows(&old, &new);
        assert_eq!(diff.deletions, vec![3, 2]);
        assert!(diff.insertions.is_empty());
        assert!(diff.updates.is_empty());
    }

    #[test]
    fn empty_transitions() {
        let rows = vec![action(1, "A"), action(2, "B")];

        let grow = diff_rows(&[], &rows);
        assert!(grow.deletions.is_empty());
        assert_eq!(ids(&grow.insertions), vec![(0, None), (1, None)]);

        let shrink = diff_rows(&rows, &[]);
        assert_eq!(shrink.deletions, vec![1, 0]);
        assert!(shrink.insertions.is_empty());
    }

    #[test]
    fn apply_to_reproduces_new_list() {
        let old = vec![
            action(1, "A"),
            RowEntry::Separator,
            action(2, "B"),
            action(3, "C"),
        ];
        let new = vec![
            action(3, "C"),
            action(1, "A*"),
            RowEntry::Separator,
            action(4, "D"),
        ];

        let diff = diff_rows(&old, &new);
        let applied = diff.apply_to(&old);
        assert_eq!(applied.len(), new.len());
        for (result, expected) in applied.iter().zip(&new) {
            assert!(result.content_eq(expected));
        }
    }
}
