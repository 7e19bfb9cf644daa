//! Single-dimension bin edges.

use super::BinningError;

/// One binning dimension: a column name plus monotonically increasing edges.
///
/// Edges describe half-open `[lo, hi)` intervals: a value `v` falls in
/// interval `k` when `edges[k] <= v < edges[k + 1]`. A value below the first
/// edge, at or above the last edge, or NaN lies outside the axis.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinAxis {
    column: String,
    edges: Vec<f64>,
}

impl BinAxis {
    /// Validate edges and build the axis.
    ///
    /// At least two edges (one interval) are required and edges must be
    /// strictly increasing; this is checked here so that a misconfigured
    /// axis fails at construction, never during iteration.
    pub fn new(column: impl Into<String>, edges: Vec<f64>) -> Result<Self, BinningError> {
        let column = column.into();
        if edges.len() < 2 {
            return Err(BinningError::TooFewEdges {
                column,
                got: edges.len(),
            });
        }
        for (position, window) in edges.windows(2).enumerate() {
            // NaN edges fail this comparison as well.
            if !(window[0] < window[1]) {
                return Err(BinningError::NonMonotonicEdges {
                    column,
                    position: position + 1,
                });
            }
        }
        Ok(Self { column, edges })
    }

    /// Column this axis reads.
    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Number of intervals.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Edge list.
    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Interval index for a value; `None` when the value lies outside the
    /// declared edges (including NaN).
    #[inline]
    pub fn interval_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.edges[0]) || value >= self.edges[self.edges.len() - 1] {
            return None;
        }
        // First edge greater than value bounds the interval from above.
        Some(self.edges.partition_point(|&e| e <= value) - 1)
    }
}
