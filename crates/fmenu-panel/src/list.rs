#![forbid(unsafe_code)]

//! List panel node: a vertical stack of row nodes with diffable updates.
//!
//! Rows are measured at the band's maximum width, stacked at the widest
//! row's width (floored at the band minimum), and mutated exclusively
//! through [`diff_rows`] so untouched rows keep their nodes and any
//! per-node state across sibling insertions.
//!
//! # Invariants
//!
//! 1. `set_rows` never rebuilds a surviving row's node unless the row is a
//!    custom row whose content changed; action updates rebind in place.
//! 2. Hairline visibility is derived at layout from neighbors, never stored
//!    in row content and never part of diff identity.
//! 3. The highlight follows its row's key through moves; a deleted row drops
//!    the highlight silently, with no haptic.
//! 4. The reported apparent height equals the full content height; scroll
//!    state lives with the owner, not here.

use ahash::{AHashMap, AHashSet};
#[cfg(feature = "tracing")]
use web_time::Instant;

use fmenu_core::{Haptics, Identifier, Point, Rect, Size};

use crate::command::CommandSink;
use crate::diff::{RowKey, RowListDiff, diff_rows};
use crate::highlight::{HighlightChange, HighlightTracker};
use crate::node::{PanelContext, PanelMeasure, PanelNode, PlainRowNode, RowNode, RowNodeFactory};
use crate::row::{ActionRow, RowEntry, RowKind};

/// Height of an anonymous separator row.
pub const SEPARATOR_HEIGHT: f32 = 7.0;

#[derive(Debug, Default)]
struct SeparatorRowNode;

impl RowNode for SeparatorRowNode {
    fn measure(&mut self, _constraints: Size) -> Size {
        Size::new(0.0, SEPARATOR_HEIGHT)
    }

    fn apply(&mut self, _size: Size) {}

    fn can_highlight(&self) -> bool {
        false
    }

    fn set_highlighted(&mut self, _highlighted: bool) {}

    fn perform_action(&mut self, _sink: &mut CommandSink) {}
}

fn default_factory() -> RowNodeFactory {
    std::sync::Arc::new(|entry: &RowEntry| -> Box<dyn RowNode> {
        match entry {
            RowEntry::Action(action) => Box::new(PlainRowNode::new(action.clone())),
            RowEntry::Separator => Box::new(SeparatorRowNode),
            RowEntry::Custom(custom) => custom.build_node(),
        }
    })
}

struct RowSlot {
    entry: RowEntry,
    node: Box<dyn RowNode>,
    frame: Rect,
    hairline_visible: bool,
}

/// Layout of one row, for the host renderer.
#[derive(Debug, Clone, Copy)]
pub struct RowLayout {
    pub index: usize,
    pub kind: RowKind,
    pub frame: Rect,
    /// Whether the hairline directly under this row's frame is drawn.
    pub hairline_visible: bool,
    pub highlighted: bool,
}

/// A vertical list of rows backing one stack entry.
pub struct ListPanelNode {
    slots: Vec<RowSlot>,
    factory: RowNodeFactory,
    highlight: HighlightTracker,
    content_size: Size,
}

impl ListPanelNode {
    #[must_use]
    pub fn new(rows: Vec<RowEntry>) -> Self {
        Self::with_factory(rows, default_factory())
    }

    /// Build with a custom row-node factory. The factory is also used for
    /// rows inserted later through `set_rows`.
    #[must_use]
    pub fn with_factory(rows: Vec<RowEntry>, factory: RowNodeFactory) -> Self {
        let slots = rows
            .into_iter()
            .map(|entry| RowSlot {
                node: (factory)(&entry),
                entry,
                frame: Rect::ZERO,
                hairline_visible: false,
            })
            .collect();
        Self {
            slots,
            factory,
            highlight: HighlightTracker::new(),
            content_size: Size::ZERO,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RowEntry> + '_ {
        self.slots.iter().map(|slot| &slot.entry)
    }

    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.highlight.current()
    }

    /// Content size committed by the last `update`.
    #[must_use]
    pub const fn content_size(&self) -> Size {
        self.content_size
    }

    /// Per-row layout in top-to-bottom order, valid after `update`.
    pub fn row_layouts(&self) -> impl Iterator<Item = RowLayout> + '_ {
        let highlighted = self.highlight.current();
        self.slots.iter().enumerate().map(move |(index, slot)| RowLayout {
            index,
            kind: slot.entry.kind(),
            frame: slot.frame,
            hairline_visible: slot.hairline_visible,
            highlighted: highlighted == Some(index),
        })
    }

    /// Replace the row list, mutating live nodes minimally. Returns the diff
    /// that was applied so the host can animate row-level changes.
    pub fn set_rows(&mut self, rows: Vec<RowEntry>) -> RowListDiff {
        #[cfg(feature = "tracing")]
        let set_start = Instant::now();

        let old_entries: Vec<RowEntry> = self.slots.iter().map(|slot| slot.entry.clone()).collect();
        let diff = diff_rows(&old_entries, &rows);

        // Remember the highlighted row's key so the highlight can follow a
        // move.
        let highlighted_key = self
            .highlight
            .current()
            .and_then(|index| RowKey::assign(&old_entries).into_iter().nth(index));

        // Deletions, descending. Nodes referenced by a re-insert are parked
        // for adoption instead of dropped.
        let moved: AHashSet<usize> = diff
            .insertions
            .iter()
            .filter_map(|insertion| insertion.previous_index)
            .collect();
        let mut parked: AHashMap<usize, Box<dyn RowNode>> = AHashMap::new();
        for &index in &diff.deletions {
            let slot = self.slots.remove(index);
            if moved.contains(&index) {
                parked.insert(index, slot.node);
            }
        }

        // Insertions, ascending.
        for insertion in &diff.insertions {
            let node = match insertion
                .previous_index
                .and_then(|old_index| parked.remove(&old_index))
            {
                Some(node) => node,
                None => (self.factory)(&insertion.entry),
            };
            self.slots.insert(
                insertion.index,
                RowSlot {
                    entry: insertion.entry.clone(),
                    node,
                    frame: Rect::ZERO,
                    hairline_visible: false,
                },
            );
        }

        // Updates: actions rebind without losing their node, custom rows
        // rebuild from their new factory.
        for update in &diff.updates {
            let slot = &mut self.slots[update.index];
            slot.entry = update.entry.clone();
            match &update.entry {
                RowEntry::Action(action) => slot.node.rebind(action),
                _ => slot.node = (self.factory)(&update.entry),
            }
        }

        let remapped = highlighted_key.and_then(|key| {
            RowKey::assign(&rows).into_iter().position(|candidate| candidate == key)
        });
        self.highlight = HighlightTracker::new();
        let _ = self.highlight.set(remapped);
        if let Some(index) = remapped {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.node.set_highlighted(true);
            }
        }

        #[cfg(feature = "tracing")]
        {
            let set_rows_duration_us = set_start.elapsed().as_micros() as u64;
            tracing::debug!(
                message = "list.set_rows",
                rows = self.slots.len(),
                deletions = diff.deletions.len(),
                insertions = diff.insertions.len(),
                updates = diff.updates.len(),
                set_rows_duration_us
            );
        }

        diff
    }

    fn apply_highlight_change(&mut self, change: HighlightChange) -> bool {
        match change {
            HighlightChange::Unchanged => false,
            HighlightChange::Changed { previous, current } => {
                if let Some(index) = previous {
                    if let Some(slot) = self.slots.get_mut(index) {
                        slot.node.set_highlighted(false);
                    }
                }
                if let Some(index) = current {
                    if let Some(slot) = self.slots.get_mut(index) {
                        slot.node.set_highlighted(true);
                    }
                }
                true
            }
        }
    }
}

impl std::fmt::Debug for ListPanelNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPanelNode")
            .field("rows", &self.slots.len())
            .field("highlight", &self.highlight)
            .field("content_size", &self.content_size)
            .finish_non_exhaustive()
    }
}

impl PanelNode for ListPanelNode {
    fn update(&mut self, ctx: &PanelContext) -> PanelMeasure {
        let row_constraints = Size::new(ctx.max_width, ctx.constraints.height);

        let mut combined = Size::ZERO;
        let mut min_sizes = Vec::with_capacity(self.slots.len());
        for slot in &mut self.slots {
            let min_size = slot.node.measure(row_constraints);
            combined.width = combined.width.max(min_size.width);
            combined.height += min_size.height;
            min_sizes.push(min_size);
        }
        combined.width = combined.width.max(ctx.min_width);

        let mut next_origin_y = 0.0;
        for (slot, min_size) in self.slots.iter_mut().zip(&min_sizes) {
            let item_size = Size::new(combined.width, min_size.height);
            slot.frame = Rect::new(0.0, next_origin_y, item_size.width, item_size.height);
            slot.node.apply(item_size);
            next_origin_y += item_size.height;
        }

        let count = self.slots.len();
        for index in 0..count {
            let visible = match &self.slots[index].entry {
                RowEntry::Separator => false,
                RowEntry::Custom(custom) if !custom.wants_separator() => false,
                _ => {
                    let last = index + 1 == count;
                    let next_is_separator = self
                        .slots
                        .get(index + 1)
                        .is_some_and(|next| matches!(next.entry, RowEntry::Separator));
                    !last && !next_is_separator
                }
            };
            self.slots[index].hairline_visible = visible;
        }

        self.content_size = combined;
        PanelMeasure {
            size: combined,
            apparent_height: combined.height,
        }
    }

    fn highlight_gesture_moved(&mut self, location: Point, haptics: &dyn Haptics) {
        // First geometric hit decides; no fallthrough to a highlightable row
        // further down.
        let mut candidate = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.frame.contains(location) {
                if slot.node.can_highlight() {
                    candidate = Some(index);
                }
                break;
            }
        }

        let change = self.highlight.set(candidate);
        if self.apply_highlight_change(change) {
            haptics.tap();
        }
    }

    fn highlight_gesture_finished(&mut self, perform: bool, sink: &mut CommandSink) {
        if let Some(index) = self.highlight.clear() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.node.set_highlighted(false);
                if perform {
                    slot.node.perform_action(sink);
                }
            }
        }
    }

    fn decrease_highlighted_index(&mut self) {
        let change = self.highlight.step_decrease(self.slots.len());
        self.apply_highlight_change(change);
    }

    fn increase_highlighted_index(&mut self) {
        let change = self.highlight.step_increase(self.slots.len());
        self.apply_highlight_change(change);
    }

    fn try_rebind_rows(&mut self, rows: Vec<RowEntry>) -> Result<(), Vec<RowEntry>> {
        if rows.len() != self.slots.len() {
            return Err(rows);
        }
        let kinds_line_up = self
            .slots
            .iter()
            .zip(&rows)
            .all(|(slot, row)| slot.entry.kind() == row.kind());
        if !kinds_line_up {
            return Err(rows);
        }

        for (slot, row) in self.slots.iter_mut().zip(rows) {
            if let RowEntry::Action(action) = &row {
                slot.node.rebind(action);
            }
            slot.entry = row;
        }
        Ok(())
    }

    fn update_action(&mut self, id: &Identifier, action: ActionRow) -> bool {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let RowEntry::Action(existing) = &slot.entry {
                if existing.identity() == Some(id) {
                    let entry = RowEntry::Action(action);
                    slot.node = (self.factory)(&entry);
                    slot.entry = entry;
                    if self.highlight.current() == Some(index) {
                        slot.node.set_highlighted(true);
                    }
                    return true;
                }
            }
        }
        false
    }
}
