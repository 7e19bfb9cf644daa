//! Precomputed category → rows grouping.

use std::collections::BTreeMap;

use crate::table::{ChunkedTable, SelectionMask};

use super::policy::{BinningPolicy, OverflowPolicy};
use super::{BinningError, CategoryId};

/// One category and its member rows.
///
/// Row indices are dense slot indices (positions in the filtered index
/// space when a selection is active, global rows otherwise), in ascending
/// order.
#[derive(Clone, Debug)]
pub struct CategoryGroup {
    id: CategoryId,
    rows: Vec<usize>,
}

impl CategoryGroup {
    /// Category id.
    #[inline]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    /// Member rows, ascending.
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of member rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the group holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Immutable category → rows table for one slot.
///
/// Built once by scanning every (selected) row of a table; groups are
/// ordered by ascending category id and contain only non-empty row lists.
/// Overflow rows retained under [`OverflowPolicy::Retain`] sit in a
/// separate bucket that block enumeration never matches.
#[derive(Clone, Debug)]
pub struct CategoryTable {
    groups: Vec<CategoryGroup>,
    overflow: Vec<usize>,
}

impl CategoryTable {
    /// Scan a table (through an optional selection) and group its rows.
    ///
    /// Fails if the policy's column capabilities are missing from `table`.
    pub fn build(
        policy: &dyn BinningPolicy,
        table: &ChunkedTable,
        selection: Option<&SelectionMask>,
    ) -> Result<Self, BinningError> {
        policy.validate(table)?;
        let n_rows = selection.map_or(table.len(), SelectionMask::len);
        let retain = policy.overflow_policy() == OverflowPolicy::Retain;

        let mut grouped: BTreeMap<CategoryId, Vec<usize>> = BTreeMap::new();
        let mut overflow = Vec::new();
        for dense in 0..n_rows {
            let global = selection.map_or(dense, |s| s.global(dense));
            match policy.category(table, global) {
                Some(id) => grouped.entry(id).or_default().push(dense),
                None if retain => overflow.push(dense),
                None => {}
            }
        }

        let groups = grouped
            .into_iter()
            .map(|(id, rows)| CategoryGroup { id, rows })
            .collect();
        Ok(Self { groups, overflow })
    }

    /// Non-empty groups in ascending id order.
    #[inline]
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Number of non-empty categories.
    #[inline]
    pub fn n_categories(&self) -> usize {
        self.groups.len()
    }

    /// Rows kept under the reserved overflow bucket (never matched).
    #[inline]
    pub fn overflow_rows(&self) -> &[usize] {
        &self.overflow
    }

    /// Position of the first group with id >= `id`.
    pub(crate) fn lower_group(&self, id: CategoryId) -> usize {
        self.groups.partition_point(|g| g.id < id)
    }
}
