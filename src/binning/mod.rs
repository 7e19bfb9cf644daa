//! Row → category assignment.
//!
//! A binning policy maps a row to an integer [`CategoryId`] from one or more
//! column values. Block enumeration ([`crate::block_combinations`],
//! [`crate::self_combinations`]) groups rows by category once at
//! construction and then restricts tuples to same or neighboring categories.

mod axis;
mod category;
mod policy;

pub use axis::BinAxis;
pub use category::{CategoryGroup, CategoryTable};
pub use policy::{BinningPolicy, ColumnBinning, OverflowPolicy, ValueBinning};

/// Integer category id assigned to a row by a binning policy.
///
/// [`ColumnBinning`] produces non-negative mixed-radix ids; [`ValueBinning`]
/// passes raw (possibly negative) column values through.
pub type CategoryId = i64;

/// Errors raised while configuring binning or building category tables.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BinningError {
    #[error("bin axis {column} needs at least two edges, got {got}")]
    TooFewEdges { column: String, got: usize },

    #[error("bin axis {column} edges must be strictly increasing at position {position}")]
    NonMonotonicEdges { column: String, position: usize },

    #[error("binning requires at least one axis")]
    NoAxes,

    #[error("table has no column named {column}")]
    MissingColumn { column: String },

    #[error("column {column} has kind {got}, expected {expected}")]
    ColumnKindMismatch {
        column: String,
        expected: crate::table::ColumnKind,
        got: crate::table::ColumnKind,
    },
}
