//! Detached, cursor-like snapshot of a query result.

use rusqlite::{types::ValueRef, Rows};

use crate::error::{DatabaseResultExt, Result};

/// Where the cursor of a [`QueryResult`] points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// Every row and column name of a query, copied out of the statement that
/// produced it.
///
/// The statement is finalized as soon as the snapshot is taken, so a
/// `QueryResult` can be handed around and iterated long after the query ran.
/// Values are kept as text (`None` for SQL `NULL`) with typed accessors on
/// top. Reading before the first [`next`](Self::next) or after exhaustion
/// yields `None` rather than panicking.
#[derive(Debug, Clone)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    position: Position,
}

impl QueryResult {
    /// Drains a live cursor into memory.
    pub(crate) fn from_rows(columns: Vec<String>, mut rows: Rows<'_>) -> Result<Self> {
        let mut content = Vec::new();
        while let Some(row) = rows.next().db_context("Failed to fetch row")? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                let value = row.get_ref(index).db_context("Failed to read column")?;
                values.push(value_to_text(value));
            }
            content.push(values);
        }

        Ok(Self {
            columns,
            rows: content,
            position: Position::BeforeFirst,
        })
    }

    /// Moves the cursor to the next row; false once the rows are exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::At(index) => index + 1,
            Position::AfterLast => return false,
        };

        if next < self.rows.len() {
            self.position = Position::At(next);
            true
        } else {
            self.position = Position::AfterLast;
            false
        }
    }

    /// Rewinds the cursor in front of the first row.
    pub fn before_first(&mut self) {
        self.position = Position::BeforeFirst;
    }

    /// Moves the cursor behind the last row.
    pub fn after_last(&mut self) {
        self.position = Position::AfterLast;
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text of a column in the current row.
    pub fn get(&self, column: usize) -> Option<&str> {
        match self.position {
            Position::At(row) => self.rows.get(row)?.get(column)?.as_deref(),
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }

    /// Text of a column in the current row, addressed by name.
    pub fn get_by_name(&self, column: &str) -> Option<&str> {
        self.get(self.column_index(column)?)
    }

    /// Integer value of a column; `None` for `NULL` or non-numeric text.
    pub fn get_i64(&self, column: usize) -> Option<i64> {
        self.get(column)?.parse().ok()
    }

    pub fn get_i64_by_name(&self, column: &str) -> Option<i64> {
        self.get_by_name(column)?.parse().ok()
    }

    /// Boolean stored as an integer flag; any non-zero value is true.
    pub fn get_bool_by_name(&self, column: &str) -> Option<bool> {
        self.get_i64_by_name(column).map(|value| value != 0)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
