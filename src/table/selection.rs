//! Precomputed row selections.
//!
//! The engine never evaluates predicates. A caller computes a selection
//! once (boolean-per-row or an index list) and hands it in; the engine then
//! runs every policy in the dense filtered index space and resolves back to
//! global rows only when projecting a combination.

/// Errors raised while building a selection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectionError {
    #[error("selected row {row} out of bounds for table of {n_rows} rows")]
    OutOfBounds { row: usize, n_rows: usize },

    #[error("selected rows must be strictly ascending at position {position}")]
    NotAscending { position: usize },
}

/// Dense index translation for a filtered table.
///
/// Maps the k-th selected row back to its global row index. Built once,
/// immutable, shareable across any number of generators.
#[derive(Clone, Debug)]
pub struct SelectionMask {
    selected: Vec<usize>,
}

impl SelectionMask {
    /// Build from a boolean-per-row mask.
    pub fn from_mask(mask: &[bool]) -> Self {
        let selected = mask
            .iter()
            .enumerate()
            .filter_map(|(row, &keep)| keep.then_some(row))
            .collect();
        Self { selected }
    }

    /// Build from a global row index list.
    ///
    /// Indices must be strictly ascending and within `0..n_rows`, so that
    /// the filtered space preserves row order.
    pub fn from_indices(indices: Vec<usize>, n_rows: usize) -> Result<Self, SelectionError> {
        for (position, window) in indices.windows(2).enumerate() {
            if window[0] >= window[1] {
                return Err(SelectionError::NotAscending { position: position + 1 });
            }
        }
        if let Some(&last) = indices.last() {
            if last >= n_rows {
                return Err(SelectionError::OutOfBounds { row: last, n_rows });
            }
        }
        Ok(Self { selected: indices })
    }

    /// Number of selected rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True if nothing is selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Global row index of the k-th selected row.
    ///
    /// # Panics
    ///
    /// Panics if `dense >= len()`.
    #[inline]
    pub fn global(&self, dense: usize) -> usize {
        self.selected[dense]
    }

    /// Selected global rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}
