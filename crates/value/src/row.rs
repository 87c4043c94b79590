//! Positional rows of values.
//!
//! A row is the unit handed between the analyzer (as a parameter carrier)
//! and downstream execution. Rows are fixed-length and immutable once built.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Read access to a fixed-length tuple of values, by position only.
pub trait Row {
    fn size(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Value>;

    fn values(&self) -> &[Value];

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Copy the cells out into an owned vector.
    fn materialize(&self) -> Vec<Value> {
        self.values().to_vec()
    }
}

/// Row backed by a slice of cells.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RowN {
    cells: Cow<'static, [Value]>,
}

impl RowN {
    /// The shared zero-length row.
    pub const EMPTY: RowN = RowN {
        cells: Cow::Borrowed(&[]),
    };

    pub fn new(cells: Vec<Value>) -> Self {
        Self {
            cells: Cow::Owned(cells),
        }
    }
}

impl Row for RowN {
    fn size(&self) -> usize {
        self.cells.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    fn values(&self) -> &[Value] {
        &self.cells
    }
}

impl Default for RowN {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Vec<Value>> for RowN {
    fn from(cells: Vec<Value>) -> Self {
        Self::new(cells)
    }
}

impl fmt::Debug for RowN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cells.iter()).finish()
    }
}

/// Factories lifting nested sequences into rows.
pub struct Rows;

impl Rows {
    /// Lift each inner sequence into one row, preserving order and values.
    ///
    /// Accepts arrays, vectors or any nested iterator whose cells convert
    /// into [`Value`].
    pub fn of<I, R, V>(rows: I) -> Vec<RowN>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        rows.into_iter()
            .map(|row| RowN::new(row.into_iter().map(Into::into).collect()))
            .collect()
    }
}

/// Build a [`RowN`] from heterogeneous expressions.
///
/// ```
/// use strata_value::{Row, row};
///
/// let row = row![2, "0-all"];
/// assert_eq!(row.size(), 2);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::RowN::EMPTY
    };
    ($($cell:expr),+ $(,)?) => {
        $crate::RowN::new(vec![$($crate::Value::from($cell)),+])
    };
}
