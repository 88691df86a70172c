use crate::row::Row;
use serde::Serialize;

/// A named row set. The column list comes from the source file's header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table whose columns are taken from the first row.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn insert_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn get_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get_all_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
