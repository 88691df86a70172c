use crate::errors::QueryError;
use crate::parser::{parse_sql, CountTarget, Predicate, Projection, Query};
use crate::row::Row;
use crate::store::TableStore;
use crate::types::compare;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Outcome of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// LOAD
    Loaded { table_name: String, filename: String },
    /// SELECT with `*` or a column list
    Rows { rows: Vec<Row> },
    /// SELECT COUNT(...)
    Count { count: usize },
}

/// Parses and runs a query string.
pub fn execute_sql(sql: &str, store: &mut TableStore) -> Result<ExecutionResult, QueryError> {
    let query = parse_sql(sql)?;
    execute(&query, store)
}

/// Runs a parsed query against the store. LOAD writes to the store; SELECT
/// only reads it and returns owned copies of the rows.
pub fn execute(query: &Query, store: &mut TableStore) -> Result<ExecutionResult, QueryError> {
    let start_time = Instant::now();

    let result = match query {
        Query::Load { filename } => {
            let table_name = store.load(filename)?;
            ExecutionResult::Loaded {
                table_name,
                filename: filename.clone(),
            }
        }
        Query::Select {
            columns,
            table_name,
            predicate,
        } => execute_select(columns, table_name, predicate.as_ref(), store)?,
    };

    debug!("executed {:?} in {}μs", query, start_time.elapsed().as_micros());
    Ok(result)
}

fn execute_select(
    columns: &Projection,
    table_name: &str,
    predicate: Option<&Predicate>,
    store: &TableStore,
) -> Result<ExecutionResult, QueryError> {
    let table = store.get(table_name)?;
    let all_rows = table.get_all_rows();

    let rows: Vec<&Row> = match predicate {
        Some(predicate) => filter_rows(all_rows, predicate, table_name)?,
        None => all_rows.iter().collect(),
    };

    match columns {
        Projection::Count(target) => Ok(ExecutionResult::Count {
            count: count_rows(&rows, target),
        }),
        Projection::All => Ok(ExecutionResult::Rows {
            rows: rows.into_iter().cloned().collect(),
        }),
        Projection::Columns(names) => Ok(ExecutionResult::Rows {
            rows: project_rows(&rows, names, table_name)?,
        }),
    }
}

/// Keeps the rows that satisfy the predicate, in their original order.
/// Every row must carry the predicate's column.
pub fn filter_rows<'a>(
    rows: &'a [Row],
    predicate: &Predicate,
    table_name: &str,
) -> Result<Vec<&'a Row>, QueryError> {
    let mut matched = Vec::new();
    for row in rows {
        if evaluate_predicate(predicate, row, table_name)? {
            matched.push(row);
        }
    }
    Ok(matched)
}

fn evaluate_predicate(predicate: &Predicate, row: &Row, table_name: &str) -> Result<bool, QueryError> {
    let stored = row
        .get(&predicate.column)
        .ok_or_else(|| QueryError::column_not_found_in(&predicate.column, table_name))?;

    let ordering = compare(stored, &predicate.value, &predicate.raw);
    predicate.operator.evaluate(ordering).ok_or_else(|| {
        QueryError::execution(&format!(
            "Cannot compare '{}' with '{}' using operator '{}'",
            stored, predicate.value, predicate.operator
        ))
    })
}

/// `COUNT(*)` counts rows. `COUNT(col)` counts rows where `col` exists and is
/// non-empty; rows without the column are skipped, not an error.
pub fn count_rows(rows: &[&Row], target: &CountTarget) -> usize {
    match target {
        CountTarget::All => rows.len(),
        CountTarget::Column(column) => rows
            .iter()
            .filter(|row| row.get(column).map_or(false, |value| !value.is_empty()))
            .count(),
    }
}

/// Copies the requested columns, in requested order, into new rows. A column
/// missing from any row fails the whole projection.
pub fn project_rows(rows: &[&Row], columns: &[String], table_name: &str) -> Result<Vec<Row>, QueryError> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(|value| (column.clone(), value.clone()))
                        .ok_or_else(|| QueryError::column_not_found_in(column, table_name))
                })
                .collect::<Result<Row, QueryError>>()
        })
        .collect()
}
