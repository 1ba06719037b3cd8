//! Tabular query results with column-oriented accessors

use bolsactl_core::SqlValue;
use serde::Serialize;

/// Rows returned by one query. Column names come from the SQL aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column; empty when the column does not exist
    pub fn column(&self, name: &str) -> Vec<&SqlValue> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Numeric column, NULL read as 0
    pub fn f64s(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .into_iter()
            .map(|v| v.as_f64().unwrap_or(0.0))
            .collect()
    }

    pub fn i64s(&self, name: &str) -> Vec<i64> {
        self.column(name)
            .into_iter()
            .map(|v| v.as_i64().unwrap_or(0))
            .collect()
    }

    pub fn texts(&self, name: &str) -> Vec<String> {
        self.column(name).into_iter().map(ToString::to_string).collect()
    }

    pub fn sum(&self, name: &str) -> f64 {
        self.f64s(name).iter().sum()
    }

    /// Cell at `row` in column `name`
    pub fn value(&self, row: usize, name: &str) -> Option<&SqlValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    /// First value of a column, as a number (for single-row aggregates)
    pub fn scalar_f64(&self, name: &str) -> f64 {
        self.value(0, name).and_then(SqlValue::as_f64).unwrap_or(0.0)
    }

    pub fn scalar_i64(&self, name: &str) -> i64 {
        self.value(0, name).and_then(SqlValue::as_i64).unwrap_or(0)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> ResultSet {
        ResultSet {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
