//! Binning policies: multi-dimensional interval search and raw-value grouping.

use crate::table::{ChunkedTable, ColumnKind};

use super::axis::BinAxis;
use super::{BinningError, CategoryId};

/// What to do with rows that fall outside the declared bin edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowPolicy {
    /// Overflow rows are excluded from all category tables.
    #[default]
    Discard,
    /// Overflow rows are retained in the category table under one reserved
    /// bucket that never matches as "same" or "neighbor" of any category,
    /// including other overflow rows.
    Retain,
}

/// Maps a row of a table to an integer category.
///
/// Implementations must be pure functions of the row's column values; the
/// engine evaluates them exactly once per row when building category tables.
pub trait BinningPolicy {
    /// Check that `table` carries the columns this policy reads.
    ///
    /// Called at generator construction; a missing capability fails here,
    /// never during iteration.
    fn validate(&self, table: &ChunkedTable) -> Result<(), BinningError>;

    /// Category of a row, or `None` for an overflow row.
    fn category(&self, table: &ChunkedTable, row: usize) -> Option<CategoryId>;

    /// How overflow rows are handled when grouping.
    fn overflow_policy(&self) -> OverflowPolicy {
        OverflowPolicy::Discard
    }
}

// =============================================================================
// ColumnBinning
// =============================================================================

/// Multi-dimensional interval binning.
///
/// Each axis locates its interval index by binary search; the per-axis
/// indices combine into one id by mixed-radix encoding
/// (`id = Σ idx_d · Π_{d' < d} n_bins_{d'}`), so rows share a category
/// exactly when they share every interval. A row outside the edges of any
/// axis is an overflow row, handled per [`OverflowPolicy`].
///
/// # Example
///
/// ```
/// use tablecomb::{BinAxis, ColumnBinning, OverflowPolicy, TableBuilder};
///
/// let binning = ColumnBinning::new(
///     vec![
///         BinAxis::new("y", vec![0.0, 5.0, 10.0]).unwrap(),
///         BinAxis::new("z", vec![-1.0, 0.0, 1.0]).unwrap(),
///     ],
///     OverflowPolicy::Discard,
/// )
/// .unwrap();
/// assert_eq!(binning.n_categories(), 4);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnBinning {
    axes: Vec<BinAxis>,
    overflow: OverflowPolicy,
}

impl ColumnBinning {
    /// Build a policy from validated axes.
    pub fn new(axes: Vec<BinAxis>, overflow: OverflowPolicy) -> Result<Self, BinningError> {
        if axes.is_empty() {
            return Err(BinningError::NoAxes);
        }
        Ok(Self { axes, overflow })
    }

    /// Binning dimensions.
    #[inline]
    pub fn axes(&self) -> &[BinAxis] {
        &self.axes
    }

    /// Total number of distinct non-overflow categories.
    pub fn n_categories(&self) -> usize {
        self.axes.iter().map(BinAxis::n_bins).product()
    }
}

impl BinningPolicy for ColumnBinning {
    fn validate(&self, table: &ChunkedTable) -> Result<(), BinningError> {
        for axis in &self.axes {
            if table.column_index(axis.column()).is_none() {
                return Err(BinningError::MissingColumn {
                    column: axis.column().to_string(),
                });
            }
        }
        Ok(())
    }

    fn category(&self, table: &ChunkedTable, row: usize) -> Option<CategoryId> {
        let mut id: CategoryId = 0;
        let mut radix: CategoryId = 1;
        for axis in &self.axes {
            let column = table.column_index(axis.column())?;
            let interval = axis.interval_of(table.value_f64(column, row))?;
            id += interval as CategoryId * radix;
            radix *= axis.n_bins() as CategoryId;
        }
        Some(id)
    }

    fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }
}

// =============================================================================
// ValueBinning
// =============================================================================

/// Uses an integer column's raw value directly as the category id.
///
/// Useful when rows already carry a grouping key (an event or run id); no
/// edges are configured and no row overflows.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueBinning {
    column: String,
}

impl ValueBinning {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }

    /// Column this policy reads.
    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl BinningPolicy for ValueBinning {
    fn validate(&self, table: &ChunkedTable) -> Result<(), BinningError> {
        match table.column_kind(&self.column) {
            None => Err(BinningError::MissingColumn {
                column: self.column.clone(),
            }),
            Some(ColumnKind::Int) => Ok(()),
            Some(got) => Err(BinningError::ColumnKindMismatch {
                column: self.column.clone(),
                expected: ColumnKind::Int,
                got,
            }),
        }
    }

    fn category(&self, table: &ChunkedTable, row: usize) -> Option<CategoryId> {
        let column = table.column_index(&self.column)?;
        table.value_i64(column, row)
    }
}
