use crate::errors::QueryError;
use crate::row::Row;
use crate::table::Table;
use crate::types::Value;
use ahash::AHashMap;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// In-memory tables keyed by name. Not synchronized; shared owners wrap it
/// in a lock.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: AHashMap<String, Table>,
}

/// Listing entry for `tables` in the CLI and `GET /tables`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

impl TableStore {
    pub fn new() -> Self {
        Self {
            tables: AHashMap::new(),
        }
    }

    /// Reads a CSV file with a header row into a table named after the file
    /// stem, replacing any table of the same name. Fields are kept as text.
    pub fn load(&mut self, filename: &str) -> Result<String, QueryError> {
        let path = Path::new(filename);
        if !path.exists() {
            return Err(QueryError::file_not_found(filename));
        }
        let table_name = table_name_for(path)
            .ok_or_else(|| QueryError::file_unreadable(filename, "no file name"))?;

        let file = File::open(path).map_err(|e| QueryError::file_unreadable(filename, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| QueryError::file_unreadable(filename, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Table::new(table_name.clone(), headers.clone());
        for (index, record) in reader.records().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let record = record.map_err(|e| {
                QueryError::file_unreadable(filename, format!("line {}: {}", index + 2, e))
            })?;
            // Short records are padded with empty fields, surplus fields dropped
            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let field = record.get(i).unwrap_or("");
                    (column.clone(), Value::Text(field.to_string()))
                })
                .collect();
            table.insert_row(row);
        }

        info!(
            "loaded table '{}' from '{}' ({} rows, {} columns)",
            table_name,
            filename,
            table.row_count(),
            headers.len()
        );
        if self.tables.insert(table_name.clone(), table).is_some() {
            debug!("replaced existing table '{}'", table_name);
        }
        Ok(table_name)
    }

    /// Registers an already-built table under its own name.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name.clone(), table)
    }

    pub fn get(&self, table_name: &str) -> Result<&Table, QueryError> {
        self.tables
            .get(table_name)
            .ok_or_else(|| QueryError::table_not_found(table_name))
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Summaries sorted by table name.
    pub fn summaries(&self) -> Vec<TableSummary> {
        self.table_names()
            .into_iter()
            .filter_map(|name| {
                self.tables.get(&name).map(|table| TableSummary {
                    columns: table.get_columns().to_vec(),
                    rows: table.row_count(),
                    name,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Base name without directory or the last extension.
fn table_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_names_table_after_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "employees.csv", "id,name\n1,John\n2,Jane\n");

        let mut store = TableStore::new();
        let name = store.load(&path).unwrap();

        assert_eq!(name, "employees");
        let table = store.get("employees").unwrap();
        assert_eq!(table.get_columns(), ["id".to_string(), "name".to_string()]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.get_all_rows()[1].get("name"),
            Some(&Value::Text("Jane".to_string()))
        );
    }

    #[test]
    fn test_fields_stay_text() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "nums.csv", "n,x\n42,1.5\n");

        let mut store = TableStore::new();
        store.load(&path).unwrap();

        let row = &store.get("nums").unwrap().get_all_rows()[0];
        assert_eq!(row.get("n"), Some(&Value::Text("42".to_string())));
        assert_eq!(row.get("x"), Some(&Value::Text("1.5".to_string())));
    }

    #[test]
    fn test_quoted_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "quotes.csv", "name,city\n\"Smith, J\",\"Paris\"\n");

        let mut store = TableStore::new();
        store.load(&path).unwrap();

        let row = &store.get("quotes").unwrap().get_all_rows()[0];
        assert_eq!(row.get_as_string("name"), "Smith, J");
        assert_eq!(row.get_as_string("city"), "Paris");
    }

    #[test]
    fn test_short_records_are_padded() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "ragged.csv", "a,b,c\n1,2\n1,2,3,4\n");

        let mut store = TableStore::new();
        store.load(&path).unwrap();

        let rows = store.get("ragged").unwrap().get_all_rows();
        assert_eq!(rows[0].get_as_string("c"), "");
        assert!(rows[0].contains("c"));
        assert_eq!(rows[1].columns().count(), 3);
    }

    #[test]
    fn test_reload_replaces_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "t.csv", "a\n1\n2\n");

        let mut store = TableStore::new();
        store.load(&path).unwrap();
        fs::write(&path, "a\n1\n").unwrap();
        store.load(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("t").unwrap().row_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let mut store = TableStore::new();
        let err = store.load("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, QueryError::FileLoad(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_directory_is_not_loadable() {
        let dir = TempDir::new().unwrap();
        let mut store = TableStore::new();
        let err = store.load(&dir.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, QueryError::FileLoad(_)));
    }

    #[test]
    fn test_get_unknown_table() {
        let store = TableStore::new();
        assert!(matches!(store.get("nope"), Err(QueryError::TableNotFound(_))));
    }

    #[test]
    fn test_summaries_sorted_by_name() {
        let mut store = TableStore::new();
        store.insert(Table::from_rows("zeta", vec![Row::from_values([("a", "1")])]));
        store.insert(Table::from_rows("alpha", Vec::new()));

        let summaries = store.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "alpha");
        assert_eq!(summaries[1].name, "zeta");
        assert_eq!(summaries[1].rows, 1);
        assert_eq!(summaries[1].columns, vec!["a".to_string()]);
    }
}
