//! Dataset representation for validation.
//!
//! The engine only needs a narrow view of the data: look a column up by name, test its
//! values for null, and count rows. That view is the [`Dataset`] trait. [`DataSet`] is a
//! small columnar implementation used by tests and by callers that build data in memory.

use crate::{ContractError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A value in a dataset.
///
/// Serialized untagged, so it reads and writes as a plain YAML/JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl DataValue {
    /// Returns true if this value is null. A NaN float is a missing value too.
    pub fn is_null(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "bool",
            DataValue::Int(_) => "int",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Equality used for allowed-value membership.
    ///
    /// Same as `==` except that integers and floats compare numerically, so an `int`
    /// column can be checked against `[1.0, 2.0]` and vice versa.
    pub fn matches(&self, other: &DataValue) -> bool {
        match (self, other) {
            (DataValue::Int(a), DataValue::Float(b)) | (DataValue::Float(b), DataValue::Int(a)) => {
                *a as f64 == *b
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(x) => write!(f, "{}", x),
            DataValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<i32> for DataValue {
    fn from(i: i32) -> Self {
        DataValue::Int(i64::from(i))
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// The capabilities the engine needs from a tabular dataset.
///
/// Implement this for whatever in-memory or columnar representation you already have.
/// A column that is absent returns `None`; a present column returns all of its values in
/// row order, with nulls represented as [`DataValue::Null`].
pub trait Dataset {
    /// Total number of rows.
    fn row_count(&self) -> usize;

    /// Values of the named column, or `None` if the dataset has no such column.
    fn column(&self, name: &str) -> Option<&[DataValue]>;

    /// Returns true if the dataset has the named column.
    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// A single row of data.
pub type DataRow = HashMap<String, DataValue>;

/// An in-memory, column-oriented dataset.
///
/// # Example
///
/// ```rust
/// use contracts_core::{DataSet, DataValue, Dataset};
///
/// let dataset = DataSet::new()
///     .with_column("order_id", vec![Some("A1"), None])
///     .unwrap()
///     .with_column("amount", vec![10.0, -5.0])
///     .unwrap();
///
/// assert_eq!(dataset.row_count(), 2);
/// assert_eq!(dataset.column("order_id").unwrap()[1], DataValue::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: IndexMap<String, Vec<DataValue>>,
    rows: usize,
}

impl DataSet {
    /// Creates a new dataset with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a column, replacing any column with the same name.
    ///
    /// The first column fixes the row count; every later column must match it.
    pub fn with_column<I, V>(mut self, name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        let name = name.into();
        let values: Vec<DataValue> = values.into_iter().map(Into::into).collect();

        if self.columns.is_empty() {
            self.rows = values.len();
        } else if values.len() != self.rows {
            return Err(ContractError::ColumnLength {
                column: name,
                expected: self.rows,
                actual: values.len(),
            });
        }

        self.columns.insert(name, values);
        Ok(self)
    }

    /// Creates a dataset from rows.
    ///
    /// Every key seen in any row becomes a column; rows lacking that key get a null.
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let mut columns: IndexMap<String, Vec<DataValue>> = IndexMap::new();

        for row in &rows {
            for name in row.keys() {
                if !columns.contains_key(name) {
                    columns.insert(name.clone(), Vec::with_capacity(rows.len()));
                }
            }
        }

        for row in &rows {
            for (name, values) in columns.iter_mut() {
                values.push(row.get(name).cloned().unwrap_or(DataValue::Null));
            }
        }

        Self {
            columns,
            rows: rows.len(),
        }
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl Dataset for DataSet {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

impl FromIterator<DataRow> for DataSet {
    fn from_iter<T: IntoIterator<Item = DataRow>>(iter: T) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}
