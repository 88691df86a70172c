use thiserror::Error;

/// Every failure a query can produce. Errors end the request that raised them;
/// callers decide how to present them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Query text matches no grammar, or the WHERE clause has no operator
    #[error("{0}")]
    Parse(String),

    /// Ingest source is missing or unreadable
    #[error("{0}")]
    FileLoad(String),

    #[error("{0}")]
    TableNotFound(String),

    #[error("{0}")]
    ColumnNotFound(String),

    /// A comparison could not be evaluated
    #[error("{0}")]
    Execution(String),
}

impl QueryError {
    pub fn parse(msg: &str) -> Self {
        QueryError::Parse(msg.to_string())
    }

    pub fn file_not_found(filename: &str) -> Self {
        QueryError::FileLoad(format!("File '{}' not found", filename))
    }

    pub fn file_unreadable(filename: &str, reason: impl std::fmt::Display) -> Self {
        QueryError::FileLoad(format!("File '{}' could not be read: {}", filename, reason))
    }

    pub fn table_not_found(table_name: &str) -> Self {
        QueryError::TableNotFound(format!(
            "Table '{}' not found. Please load it first.",
            table_name
        ))
    }

    pub fn column_not_found_in(column: &str, table_name: &str) -> Self {
        QueryError::ColumnNotFound(format!(
            "Column '{}' not found in table '{}'",
            column, table_name
        ))
    }

    pub fn execution(msg: &str) -> Self {
        QueryError::Execution(msg.to_string())
    }

    /// Stable snake_case name of the variant, used in JSON error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Parse(_) => "parse_error",
            QueryError::FileLoad(_) => "file_load_error",
            QueryError::TableNotFound(_) => "table_not_found",
            QueryError::ColumnNotFound(_) => "column_not_found",
            QueryError::Execution(_) => "execution_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        assert_eq!(
            QueryError::table_not_found("users").to_string(),
            "Table 'users' not found. Please load it first."
        );
        assert_eq!(
            QueryError::column_not_found_in("salary", "users").to_string(),
            "Column 'salary' not found in table 'users'"
        );
        assert_eq!(
            QueryError::file_not_found("missing.csv").to_string(),
            "File 'missing.csv' not found"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(QueryError::parse("x").kind(), "parse_error");
        assert_eq!(QueryError::execution("x").kind(), "execution_error");
        assert_eq!(QueryError::column_not_found_in("c", "t").kind(), "column_not_found");
    }
}
