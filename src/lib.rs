pub mod cli;
pub mod errors;
pub mod executor;
pub mod format;
pub mod parser;
pub mod row;
pub mod store;
pub mod table;
pub mod types;
pub mod web;

pub use cli::Repl;
pub use errors::QueryError;
pub use executor::{execute, execute_sql, ExecutionResult};
pub use format::format_result;
pub use parser::{parse_predicate, parse_sql, CountTarget, Operator, Predicate, Projection, Query};
pub use row::Row;
pub use store::{TableStore, TableSummary};
pub use table::Table;
pub use types::Value;
pub use web::{start_server, QueryRequest, QueryResponse, ServerConfig};
