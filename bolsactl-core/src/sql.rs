//! SQL text with bound parameters, and the dynamically typed values that come
//! back from SQLite.
//!
//! `SqlQuery` is hashable so the server can use it directly as a cache key:
//! two queries are equal only when both the SQL text and every bound
//! parameter match.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// A bound query parameter
#[derive(Debug, Clone)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl PartialEq for SqlParam {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            // Bitwise so that Eq stays consistent with Hash
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for SqlParam {}

impl Hash for SqlParam {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Real(f) => f.to_bits().hash(state),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for SqlParam {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for SqlParam {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

/// SQL text using `?` placeholders plus its parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append raw SQL text. Never pass user input here.
    pub fn push(mut self, fragment: &str) -> Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append a `?` placeholder bound to `param`
    pub fn push_bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.sql.push('?');
        self.params.push(param.into());
        self
    }

    /// Append ` WHERE ...` (or ` AND ...` when `has_where`) for a non-empty predicate
    pub fn push_predicate(mut self, predicate: &Predicate, has_where: bool) -> Self {
        if predicate.is_empty() {
            return self;
        }
        self.sql.push_str(if has_where { " AND " } else { " WHERE " });
        self.sql.push_str(&predicate.clauses.join(" AND "));
        self.params.extend(predicate.params.iter().cloned());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// Conjunction of `column op ?` clauses, built from user selections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn eq(mut self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.clauses.push(format!("{} = ?", column));
        self.params.push(value.into());
        self
    }

    /// `column IN (?, ?, ...)`; an empty value list adds nothing
    pub fn is_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlParam>,
    {
        let params: Vec<SqlParam> = values.into_iter().map(Into::into).collect();
        if params.is_empty() {
            return self;
        }
        let placeholders = vec!["?"; params.len()].join(", ");
        self.clauses.push(format!("{} IN ({})", column, placeholders));
        self.params.extend(params);
        self
    }

    /// `column >= ?`
    pub fn at_least(mut self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.clauses.push(format!("{} >= ?", column));
        self.params.push(value.into());
        self
    }

    /// `column <= ?`
    pub fn at_most(mut self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.clauses.push(format!("{} <= ?", column));
        self.params.push(value.into());
        self
    }

    /// `column IS NOT NULL`
    pub fn not_null(mut self, column: &str) -> Self {
        self.clauses.push(format!("{} IS NOT NULL", column));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// One cell of a result set, typed by its SQLite storage class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(f) => Some(f.round() as i64),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(s) => f.write_str(s),
        }
    }
}
