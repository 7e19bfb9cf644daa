//! Typed column storage.

use ndarray::Array1;

/// Storage kind of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit floating point values.
    Float,
    /// 64-bit signed integer values.
    Int,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Int => write!(f, "int"),
        }
    }
}

/// One column of a physical chunk.
///
/// Values are stored contiguously per chunk. Float reads widen integer
/// columns, so binning can consume either kind; integer reads are exact
/// and only succeed on integer columns.
#[derive(Clone, Debug)]
pub enum Column {
    /// Continuous values.
    Float(Array1<f64>),
    /// Discrete values (ids, counters, labels).
    Int(Array1<i64>),
}

impl Column {
    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
        }
    }

    /// True if the column holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind.
    #[inline]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Float(_) => ColumnKind::Float,
            Column::Int(_) => ColumnKind::Int,
        }
    }

    /// Read a row as f64. Integer values widen losslessly up to 2^53.
    #[inline]
    pub fn value_f64(&self, row: usize) -> f64 {
        match self {
            Column::Float(v) => v[row],
            Column::Int(v) => v[row] as f64,
        }
    }

    /// Read a row as i64. Returns `None` for float columns.
    #[inline]
    pub fn value_i64(&self, row: usize) -> Option<i64> {
        match self {
            Column::Float(_) => None,
            Column::Int(v) => Some(v[row]),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float(Array1::from(values))
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int(Array1::from(values))
    }
}
