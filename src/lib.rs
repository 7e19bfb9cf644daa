//! tablecomb: lazy combinatorial enumeration over chunked column tables.
//!
//! Given N logical tables (possibly the same table repeated, possibly built
//! from several physical chunks), the engine produces tuples of row
//! references satisfying a configurable ordering rule, optionally restricted
//! to rows falling in the same or neighboring data-driven bins, and
//! optionally filtered by a precomputed row selection.
//!
//! # Key Types
//!
//! - [`ChunkedTable`] / [`TableBuilder`] - column tables over one or more chunks
//! - [`SelectionMask`] - precomputed row filter, consumed not evaluated
//! - [`ColumnBinning`] / [`ValueBinning`] - row → category assignment
//! - [`IndexPolicy`] - Full / Upper / StrictlyUpper tuple legality
//! - [`CombinationsGenerator`] - restartable lazy enumeration
//!
//! # Enumeration
//!
//! Build tables once, then hand slots to one of the entry points:
//!
//! ```
//! use tablecomb::{pair_combinations, TableBuilder};
//!
//! let table = TableBuilder::new()
//!     .column_f64("pt", vec![0.5, 1.2, 3.4])
//!     .build()
//!     .unwrap();
//!
//! let pairs = pair_combinations(&table);
//! assert_eq!(pairs.iter().count(), 3); // C(3, 2)
//! ```
//!
//! Binned ("block") enumeration restricts tuples to rows in the same or
//! neighboring categories and is the entry point for event-mixing style
//! workloads; see [`self_combinations`] and [`block_combinations`].
//!
//! The engine is single-threaded and pull-based. Category tables and
//! selection masks are built once at construction and shared read-only by
//! any number of live iterators.

pub mod binning;
pub mod combinations;
pub mod table;

// Table handling
pub use table::{
    Chunk, ChunkedTable, Column, ColumnKind, RowCursor, SelectionError, SelectionMask,
    TableBuilder, TableError,
};

// Binning
pub use binning::{
    BinAxis, BinningError, BinningPolicy, CategoryId, CategoryTable, ColumnBinning,
    OverflowPolicy, ValueBinning,
};

// Enumeration surface
pub use combinations::{
    block_combinations, combinations, pair_combinations, self_combinations,
    self_pair_combinations, self_triple_combinations, triple_combinations, Combination,
    CombinationsError, CombinationsGenerator, CombinationsIter, IndexPolicy, Slot, WindowInfo,
};
