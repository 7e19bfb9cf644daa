//! Lazy enumeration of row-reference tuples.
//!
//! Entry points take [`Slot`]s (a table plus an optional selection) and an
//! [`IndexPolicy`], and return a restartable [`CombinationsGenerator`].
//! Block variants additionally take a binning policy, a window size and a
//! neighbor range, and restrict tuples to same or near-category rows.

mod block;
mod generator;
mod odometer;
mod policy;

pub use generator::{Combination, CombinationsGenerator, CombinationsIter, WindowInfo};
pub use policy::IndexPolicy;

use std::sync::Arc;

use crate::binning::{BinningError, BinningPolicy, CategoryTable};
use crate::table::{ChunkedTable, SelectionError, SelectionMask};

use block::BlockConfig;

/// Errors raised while constructing an enumeration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CombinationsError {
    #[error("window size must be at least 1")]
    ZeroWindow,

    #[error(transparent)]
    Binning(#[from] BinningError),
}

// =============================================================================
// Slot
// =============================================================================

/// One participating table of an enumeration, optionally filtered.
///
/// All policy semantics run in the slot's dense index space: an unfiltered
/// slot enumerates global rows directly, a filtered slot enumerates the k-th
/// selected row. Two slots share an index space (and with it same-table
/// ordering constraints) only when they hold the same table identity and
/// the same selection handle.
#[derive(Clone, Debug)]
pub struct Slot {
    table: ChunkedTable,
    selection: Option<Arc<SelectionMask>>,
}

impl Slot {
    /// Unfiltered slot over a table.
    pub fn new(table: &ChunkedTable) -> Self {
        Self {
            table: table.clone(),
            selection: None,
        }
    }

    /// Slot restricted to a precomputed selection.
    ///
    /// Fails when the mask selects a row outside the table, so a
    /// misconfigured selection surfaces here instead of during iteration.
    pub fn filtered(table: &ChunkedTable, mask: SelectionMask) -> Result<Self, SelectionError> {
        Self::filtered_shared(table, Arc::new(mask))
    }

    /// Slot restricted to a shared selection handle.
    ///
    /// Use this to pass one mask for several slots so that same-table
    /// ordering constraints stay active between them. Fails when the mask
    /// selects a row outside the table.
    pub fn filtered_shared(
        table: &ChunkedTable,
        mask: Arc<SelectionMask>,
    ) -> Result<Self, SelectionError> {
        // Selected rows are ascending, so the last one bounds them all.
        if let Some(last) = mask.len().checked_sub(1).map(|k| mask.global(k)) {
            if last >= table.len() {
                return Err(SelectionError::OutOfBounds {
                    row: last,
                    n_rows: table.len(),
                });
            }
        }
        Ok(Self {
            table: table.clone(),
            selection: Some(mask),
        })
    }

    /// The underlying table.
    #[inline]
    pub fn table(&self) -> &ChunkedTable {
        &self.table
    }

    /// The active selection, if any.
    pub fn selection(&self) -> Option<&SelectionMask> {
        self.selection.as_deref()
    }

    /// Effective number of rows (selected count when filtered).
    #[inline]
    pub fn len(&self) -> usize {
        match &self.selection {
            Some(mask) => mask.len(),
            None => self.table.len(),
        }
    }

    /// True when no rows participate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a dense index to the true global row.
    #[inline]
    pub(crate) fn global(&self, dense: usize) -> usize {
        match &self.selection {
            Some(mask) => mask.global(dense),
            None => dense,
        }
    }

    /// Same table identity and same selection handle.
    pub(crate) fn same_index_space(&self, other: &Slot) -> bool {
        if !self.table.same_table(&other.table) {
            return false;
        }
        match (&self.selection, &other.selection) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Enumerate all legal tuples over the given slots under `policy`.
///
/// Ascending lexicographic order over per-slot indices; same-table ordering
/// constraints apply between consecutive slots sharing an index space.
///
/// # Example
///
/// ```
/// use tablecomb::{combinations, IndexPolicy, Slot, TableBuilder};
///
/// let a = TableBuilder::new().column_i64("x", vec![0, 1, 2]).build().unwrap();
/// let b = TableBuilder::new().column_i64("x", vec![7, 8]).build().unwrap();
///
/// let cross = combinations(IndexPolicy::Full, vec![Slot::new(&a), Slot::new(&b)]);
/// assert_eq!(cross.iter().count(), 6);
/// ```
pub fn combinations(policy: IndexPolicy, slots: Vec<Slot>) -> CombinationsGenerator {
    CombinationsGenerator::plain(policy, slots)
}

/// Strictly-upper self-combination of arity 2: all unordered row pairs.
pub fn pair_combinations(table: &ChunkedTable) -> CombinationsGenerator {
    self_tuples(table, 2)
}

/// Strictly-upper self-combination of arity 3: all unordered row triples.
pub fn triple_combinations(table: &ChunkedTable) -> CombinationsGenerator {
    self_tuples(table, 3)
}

fn self_tuples(table: &ChunkedTable, arity: usize) -> CombinationsGenerator {
    let slots = (0..arity).map(|_| Slot::new(table)).collect();
    CombinationsGenerator::plain(IndexPolicy::StrictlyUpper, slots)
}

/// Block enumeration: tuples restricted to same or neighboring categories.
///
/// `binning` assigns each row a category; category tables are built here,
/// once, per distinct slot. Windows merge up to `window_size` consecutive
/// non-empty categories and slide by one category id; `range` bounds the
/// category distance between any two slots of a tuple (`<= 0` means same
/// category only).
///
/// Fails when the binning configuration does not match the slot tables or
/// `window_size` is zero; iteration itself never fails.
pub fn block_combinations(
    policy: IndexPolicy,
    binning: &dyn BinningPolicy,
    window_size: usize,
    range: i64,
    slots: Vec<Slot>,
) -> Result<CombinationsGenerator, CombinationsError> {
    if window_size == 0 {
        return Err(CombinationsError::ZeroWindow);
    }
    if slots.is_empty() {
        return Ok(CombinationsGenerator::plain(policy, slots));
    }

    let same_index = slots.iter().all(|s| s.same_index_space(&slots[0]));
    let config = if same_index {
        let table = Arc::new(categories_for(binning, &slots[0])?);
        BlockConfig::same_index(window_size, range, table)
    } else {
        // One category table per distinct index space, shared between the
        // slots that use it.
        let mut built: Vec<(usize, Arc<CategoryTable>)> = Vec::new();
        let mut tables = Vec::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let cached = built
                .iter()
                .find(|(j, _)| slot.same_index_space(&slots[*j]))
                .map(|(_, t)| t.clone());
            let table = match cached {
                Some(table) => table,
                None => {
                    let table = Arc::new(categories_for(binning, slot)?);
                    built.push((i, table.clone()));
                    table
                }
            };
            tables.push(table);
        }
        BlockConfig::general(window_size, range, tables)
    };
    Ok(CombinationsGenerator::block(policy, slots, config))
}

/// Strictly-upper block self-combination: the event-mixing entry point.
///
/// Equivalent to [`block_combinations`] with [`IndexPolicy::StrictlyUpper`]
/// and `arity` copies of `slot`.
pub fn self_combinations(
    binning: &dyn BinningPolicy,
    window_size: usize,
    range: i64,
    slot: Slot,
    arity: usize,
) -> Result<CombinationsGenerator, CombinationsError> {
    let slots = (0..arity).map(|_| slot.clone()).collect();
    block_combinations(IndexPolicy::StrictlyUpper, binning, window_size, range, slots)
}

/// Arity-2 convenience over [`self_combinations`].
pub fn self_pair_combinations(
    binning: &dyn BinningPolicy,
    window_size: usize,
    range: i64,
    table: &ChunkedTable,
) -> Result<CombinationsGenerator, CombinationsError> {
    self_combinations(binning, window_size, range, Slot::new(table), 2)
}

/// Arity-3 convenience over [`self_combinations`].
pub fn self_triple_combinations(
    binning: &dyn BinningPolicy,
    window_size: usize,
    range: i64,
    table: &ChunkedTable,
) -> Result<CombinationsGenerator, CombinationsError> {
    self_combinations(binning, window_size, range, Slot::new(table), 3)
}

fn categories_for(
    binning: &dyn BinningPolicy,
    slot: &Slot,
) -> Result<CategoryTable, BinningError> {
    CategoryTable::build(binning, slot.table(), slot.selection())
}
