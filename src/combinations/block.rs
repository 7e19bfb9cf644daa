//! Sliding category windows over binned rows.
//!
//! Block enumeration proceeds by ascending category id. The window anchored
//! at a category merges up to `window_size` consecutive non-empty categories;
//! the base policy's ordering runs over raw row indices within the merged
//! union, and a tuple is additionally legal only when every pair of slot
//! categories differs by at most `range`. Each tuple belongs to exactly one
//! window: the one anchored at the minimum category over its slots, so
//! sliding windows never emit a tuple twice.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::binning::{CategoryId, CategoryTable};

use super::generator::WindowInfo;
use super::odometer::Odometer;
use super::policy::IndexPolicy;

/// Immutable block setup, built once at generator construction and shared
/// read-only by every iterator.
#[derive(Clone, Debug)]
pub(crate) struct BlockConfig {
    window_size: usize,
    /// Maximum category distance between two slots; 0 means same category.
    span: CategoryId,
    /// Window anchors: ascending non-empty category ids.
    anchors: Vec<CategoryId>,
    regime: Regime,
}

#[derive(Clone, Debug)]
enum Regime {
    /// All slots share one table identity and selection.
    SameIndex(Arc<CategoryTable>),
    /// One category table per slot (shared between same-table slots).
    General(Vec<Arc<CategoryTable>>),
}

impl BlockConfig {
    pub(crate) fn same_index(window_size: usize, range: i64, table: Arc<CategoryTable>) -> Self {
        let anchors = table.groups().iter().map(|g| g.id()).collect();
        Self {
            window_size,
            span: range.max(0),
            anchors,
            regime: Regime::SameIndex(table),
        }
    }

    pub(crate) fn general(window_size: usize, range: i64, tables: Vec<Arc<CategoryTable>>) -> Self {
        let mut anchors: Vec<CategoryId> = tables
            .iter()
            .flat_map(|t| t.groups().iter().map(|g| g.id()))
            .collect();
        anchors.sort_unstable();
        anchors.dedup();
        Self {
            window_size,
            span: range.max(0),
            anchors,
            regime: Regime::General(tables),
        }
    }
}

/// Candidate rows of one window, tagged with their category.
#[derive(Debug)]
enum Candidates {
    /// Same-index regime: one merged list shared by every slot.
    Shared(Vec<(usize, CategoryId)>),
    /// General regime: one list per slot.
    PerSlot(Vec<Vec<(usize, CategoryId)>>),
}

impl Candidates {
    #[inline]
    fn slot(&self, slot: usize) -> &[(usize, CategoryId)] {
        match self {
            Candidates::Shared(rows) => rows,
            Candidates::PerSlot(rows) => &rows[slot],
        }
    }
}

#[derive(Debug)]
struct WindowState {
    anchor_id: CategoryId,
    candidates: Candidates,
    odo: Odometer,
    started: bool,
    /// True until the first tuple of this window is emitted.
    fresh: bool,
    neighbours: usize,
}

/// Per-iterator block state; never shared between iterators.
#[derive(Debug)]
pub(crate) struct BlockIter<'a> {
    config: &'a BlockConfig,
    policy: IndexPolicy,
    same_as_prev: &'a [bool],
    /// Next anchor position to open.
    next_anchor: usize,
    window: Option<WindowState>,
}

impl<'a> BlockIter<'a> {
    pub(crate) fn new(
        config: &'a BlockConfig,
        policy: IndexPolicy,
        same_as_prev: &'a [bool],
    ) -> Self {
        Self {
            config,
            policy,
            same_as_prev,
            next_anchor: 0,
            window: None,
        }
    }

    /// Next legal tuple as dense per-slot row indices, with the window
    /// introspection valid for that tuple.
    pub(crate) fn next_indices(&mut self) -> Option<(Vec<usize>, WindowInfo)> {
        let arity = self.same_as_prev.len();
        if arity == 0 {
            return None;
        }
        loop {
            let window = match self.window.as_mut() {
                Some(window) => window,
                None => {
                    if self.next_anchor >= self.config.anchors.len() {
                        return None;
                    }
                    let id = self.config.anchors[self.next_anchor];
                    self.next_anchor += 1;
                    self.window = self.open_window(id);
                    continue;
                }
            };
            let ok = if window.started {
                window.odo.advance()
            } else {
                window.started = true;
                window.odo.start()
            };
            if !ok {
                self.window = None;
                continue;
            }

            let mut rows = Vec::with_capacity(arity);
            let mut min_cat = CategoryId::MAX;
            let mut max_cat = CategoryId::MIN;
            for (slot, &position) in window.odo.indices().iter().enumerate() {
                let (row, cat) = window.candidates.slot(slot)[position];
                min_cat = min_cat.min(cat);
                max_cat = max_cat.max(cat);
                rows.push(row);
            }
            // Pairwise category distance, and window ownership by minimum
            // category (tuples led by a later category belong to a later
            // window).
            if max_cat.saturating_sub(min_cat) > self.config.span || min_cat != window.anchor_id {
                continue;
            }
            let info = WindowInfo {
                new_window: window.fresh,
                neighbours: window.neighbours,
            };
            window.fresh = false;
            return Some((rows, info));
        }
    }

    /// Gather the merged candidate rows for the window anchored at `id`.
    /// Returns `None` when some slot has no candidate rows at all.
    fn open_window(&self, id: CategoryId) -> Option<WindowState> {
        let arity = self.same_as_prev.len();
        let (candidates, sizes, neighbours) = match &self.config.regime {
            Regime::SameIndex(table) => {
                let groups = table.groups();
                let first = table.lower_group(id);
                debug_assert!(groups[first].id() == id);
                let take = self.config.window_size.min(groups.len() - first);
                let mut merged = Vec::new();
                for group in &groups[first..first + take] {
                    merged.extend(group.rows().iter().map(|&row| (row, group.id())));
                }
                merged.sort_unstable_by_key(|&(row, _)| row);
                let sizes = vec![merged.len(); arity];
                (Candidates::Shared(merged), sizes, take)
            }
            Regime::General(tables) => {
                let mut per_slot = Vec::with_capacity(arity);
                let mut merged_ids = BTreeSet::new();
                for table in tables {
                    let groups = table.groups();
                    let mut position = table.lower_group(id);
                    let mut taken = 0;
                    let mut rows = Vec::new();
                    while position < groups.len() && taken < self.config.window_size {
                        let group = &groups[position];
                        rows.extend(group.rows().iter().map(|&row| (row, group.id())));
                        merged_ids.insert(group.id());
                        taken += 1;
                        position += 1;
                    }
                    rows.sort_unstable_by_key(|&(row, _)| row);
                    if rows.is_empty() {
                        return None;
                    }
                    per_slot.push(rows);
                }
                let sizes = per_slot.iter().map(Vec::len).collect();
                (Candidates::PerSlot(per_slot), sizes, merged_ids.len())
            }
        };
        Some(WindowState {
            anchor_id: id,
            candidates,
            odo: Odometer::new(self.policy, self.same_as_prev.to_vec(), sizes),
            started: false,
            fresh: true,
            neighbours,
        })
    }
}
