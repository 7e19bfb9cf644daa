//! Logical table views over chunked column storage.
//!
//! A [`ChunkedTable`] exposes one or more physical [`Chunk`]s as a single
//! indexable row sequence. Policies detect "same table" through the view's
//! stable storage identity, so one table handle may be passed for several
//! slots of an enumeration.

mod column;
mod selection;
mod view;

pub use column::{Column, ColumnKind};
pub use selection::{SelectionError, SelectionMask};
pub use view::{Chunk, ChunkedTable, RowCursor, TableBuilder, TableError};
