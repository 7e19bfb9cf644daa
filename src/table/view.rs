//! Chunked logical table views and row cursors.

use std::sync::Arc;

use super::column::{Column, ColumnKind};

/// Errors raised while assembling a table view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    #[error("table must have at least one column")]
    NoColumns,

    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("inconsistent column length: column {name} expected {expected} rows, got {got}")]
    InconsistentLength {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("concat requires at least one table")]
    EmptyConcat,

    #[error("schema mismatch at table {index}: expected {expected}, got {got}")]
    SchemaMismatch {
        index: usize,
        expected: String,
        got: String,
    },
}

// =============================================================================
// Chunk
// =============================================================================

/// One physical storage segment: a set of equally sized columns.
///
/// Column names live on the owning table's schema; a chunk stores data in
/// schema order only.
#[derive(Clone, Debug)]
pub struct Chunk {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Chunk {
    pub(crate) fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Self { columns, n_rows }
    }

    /// Number of rows in this chunk.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// True if the chunk holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column data in schema order.
    #[inline]
    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }
}

// =============================================================================
// ChunkedTable
// =============================================================================

#[derive(Debug)]
struct TableInner {
    schema: Vec<(String, ColumnKind)>,
    chunks: Vec<Arc<Chunk>>,
    /// Cumulative row offsets; `offsets[c]..offsets[c + 1]` is chunk c.
    /// Length is `chunks.len() + 1`.
    offsets: Vec<usize>,
}

/// One or more physical chunks exposed as a single indexable row sequence.
///
/// Cloning is cheap: the storage is shared, and the shared storage is also
/// the table's identity. Two enumeration slots are "same table" exactly when
/// they hold clones of one `ChunkedTable`; a [`concat`](ChunkedTable::concat)
/// result is a new identity even though it shares chunk data.
///
/// Row addressing is global: a row index in `0..len()` resolves to a
/// `(chunk, local)` pair by binary search over prefix sizes, never by
/// scanning rows.
#[derive(Clone, Debug)]
pub struct ChunkedTable {
    inner: Arc<TableInner>,
}

impl ChunkedTable {
    fn from_chunks(
        schema: Vec<(String, ColumnKind)>,
        chunks: Vec<Arc<Chunk>>,
    ) -> Self {
        let mut offsets = Vec::with_capacity(chunks.len() + 1);
        let mut total = 0usize;
        offsets.push(0);
        for chunk in &chunks {
            total += chunk.len();
            offsets.push(total);
        }
        Self {
            inner: Arc::new(TableInner {
                schema,
                chunks,
                offsets,
            }),
        }
    }

    /// Start building a single-chunk table.
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    /// Concatenate tables into one logical sequence.
    ///
    /// Chunk data is shared, not copied. All tables must carry the same
    /// schema (column names and kinds, in order). The result is a fresh
    /// table identity: it does not compare "same table" with its parts.
    pub fn concat(tables: &[ChunkedTable]) -> Result<ChunkedTable, TableError> {
        let first = tables.first().ok_or(TableError::EmptyConcat)?;
        let schema = first.inner.schema.clone();
        let mut chunks = Vec::new();
        for (index, table) in tables.iter().enumerate() {
            if table.inner.schema != schema {
                return Err(TableError::SchemaMismatch {
                    index,
                    expected: schema_string(&schema),
                    got: schema_string(&table.inner.schema),
                });
            }
            chunks.extend(table.inner.chunks.iter().cloned());
        }
        Ok(Self::from_chunks(schema, chunks))
    }

    /// Total number of rows across all chunks.
    #[inline]
    pub fn len(&self) -> usize {
        *self.inner.offsets.last().unwrap_or(&0)
    }

    /// True if the table holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of physical chunks.
    #[inline]
    pub fn n_chunks(&self) -> usize {
        self.inner.chunks.len()
    }

    /// Chunk boundaries as cumulative row offsets (length `n_chunks() + 1`).
    #[inline]
    pub fn chunk_boundaries(&self) -> &[usize] {
        &self.inner.offsets
    }

    /// Resolve a global row index to `(chunk id, local index)`.
    ///
    /// # Panics
    ///
    /// Panics if `global >= len()`.
    #[inline]
    pub fn chunk_of(&self, global: usize) -> (usize, usize) {
        assert!(global < self.len(), "row {global} out of bounds");
        // offsets[0] == 0, so at least one element is <= global.
        let chunk = self.inner.offsets.partition_point(|&o| o <= global) - 1;
        (chunk, global - self.inner.offsets[chunk])
    }

    /// Stable storage identity; true iff both handles share one storage.
    #[inline]
    pub fn same_table(&self, other: &ChunkedTable) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Position of a named column in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.inner.schema.iter().position(|(n, _)| n == name)
    }

    /// Storage kind of a named column.
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.inner
            .schema
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, kind)| *kind)
    }

    /// Column names and kinds in schema order.
    pub fn schema(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.inner.schema.iter().map(|(n, k)| (n.as_str(), *k))
    }

    /// Read a cell as f64 by column position (integers widen).
    #[inline]
    pub fn value_f64(&self, column: usize, global: usize) -> f64 {
        let (chunk, local) = self.chunk_of(global);
        self.inner.chunks[chunk].column(column).value_f64(local)
    }

    /// Read a cell as i64 by column position; `None` for float columns.
    #[inline]
    pub fn value_i64(&self, column: usize, global: usize) -> Option<i64> {
        let (chunk, local) = self.chunk_of(global);
        self.inner.chunks[chunk].column(column).value_i64(local)
    }

    /// Borrow a row without copying any data.
    #[inline]
    pub fn row(&self, global: usize) -> RowCursor<'_> {
        debug_assert!(global < self.len());
        RowCursor { table: self, row: global }
    }

    /// Physical chunk by id.
    #[inline]
    pub fn chunk(&self, id: usize) -> &Chunk {
        &self.inner.chunks[id]
    }
}

fn schema_string(schema: &[(String, ColumnKind)]) -> String {
    let cols: Vec<String> = schema
        .iter()
        .map(|(n, k)| format!("{n}:{k}"))
        .collect();
    format!("[{}]", cols.join(", "))
}

// =============================================================================
// TableBuilder
// =============================================================================

/// Builder for a single-chunk [`ChunkedTable`].
///
/// Columns are added in schema order; `build` validates uniform length and
/// unique names. Multi-chunk tables come from [`ChunkedTable::concat`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<(String, Column)>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a float column.
    pub fn column_f64(mut self, name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        self.columns.push((name.into(), Column::from(values.into())));
        self
    }

    /// Add an integer column.
    pub fn column_i64(mut self, name: impl Into<String>, values: impl Into<Vec<i64>>) -> Self {
        self.columns.push((name.into(), Column::from(values.into())));
        self
    }

    /// Add a prebuilt column.
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// Validate and assemble the table.
    pub fn build(self) -> Result<ChunkedTable, TableError> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        let n_rows = self.columns[0].1.len();
        let mut schema = Vec::with_capacity(self.columns.len());
        let mut data = Vec::with_capacity(self.columns.len());
        for (name, column) in self.columns {
            if schema.iter().any(|(n, _): &(String, ColumnKind)| *n == name) {
                return Err(TableError::DuplicateColumn { name });
            }
            if column.len() != n_rows {
                return Err(TableError::InconsistentLength {
                    name,
                    expected: n_rows,
                    got: column.len(),
                });
            }
            schema.push((name, column.kind()));
            data.push(column);
        }
        let chunk = Arc::new(Chunk::new(data, n_rows));
        Ok(ChunkedTable::from_chunks(schema, vec![chunk]))
    }
}

// =============================================================================
// RowCursor
// =============================================================================

/// A borrowed reference to one row of a [`ChunkedTable`].
///
/// Copy-cheap: holds the table borrow and the global row index, never row
/// data. Valid only while the table view is alive.
#[derive(Clone, Copy, Debug)]
pub struct RowCursor<'a> {
    table: &'a ChunkedTable,
    row: usize,
}

impl<'a> RowCursor<'a> {
    /// Global row index within the logical table.
    #[inline]
    pub fn global_index(&self) -> usize {
        self.row
    }

    /// Physical chunk holding this row.
    #[inline]
    pub fn chunk_index(&self) -> usize {
        self.table.chunk_of(self.row).0
    }

    /// Row index within its physical chunk.
    #[inline]
    pub fn local_index(&self) -> usize {
        self.table.chunk_of(self.row).1
    }

    /// The table this cursor points into.
    #[inline]
    pub fn table(&self) -> &'a ChunkedTable {
        self.table
    }

    /// Read a named cell as f64 (integers widen).
    pub fn f64(&self, column: &str) -> Option<f64> {
        let index = self.table.column_index(column)?;
        Some(self.table.value_f64(index, self.row))
    }

    /// Read a named cell as i64; `None` for float columns.
    pub fn i64(&self, column: &str) -> Option<i64> {
        let index = self.table.column_index(column)?;
        self.table.value_i64(index, self.row)
    }
}
