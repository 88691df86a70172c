use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use crate::executor::{execute_sql, ExecutionResult};
use crate::format::format_result;
use crate::store::{TableStore, TableSummary};

/// Store shared across requests. The lock serializes every query.
pub type SharedStore = Arc<Mutex<TableStore>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Body of `POST /execute`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    /// Human-readable rendering of `data`
    pub result: String,
    pub data: ExecutionResult,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(serve_frontend))
        .route("/execute", post(handle_execute))
        .route("/tables", get(handle_tables))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Binds to the configured address and serves until the process stops.
pub async fn start_server(config: ServerConfig, store: TableStore) -> std::io::Result<()> {
    let shared_store = Arc::new(Mutex::new(store));
    let app = router(shared_store);

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!("web server listening on http://{}", config.address());
    println!("Mini SQL Engine listening on http://{}", config.address());
    println!("  POST /execute  {{\"query\": \"SELECT * FROM employees\"}}");

    axum::serve(listener, app).await
}

/// `POST /execute` handler
async fn handle_execute(
    State(store): State<SharedStore>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Empty query".to_string(), None));
    }

    let mut store = store.lock().map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", e),
            None,
        )
    })?;

    match execute_sql(query, &mut store) {
        Ok(data) => Ok(Json(QueryResponse {
            success: true,
            result: format_result(&data),
            data,
            query: query.to_string(),
        })),
        Err(e) => {
            warn!("query failed: {} - {}", query, e);
            Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("SQL Error: {}", e),
                Some(e.kind()),
            ))
        }
    }
}

/// `GET /tables` handler
async fn handle_tables(State(store): State<SharedStore>) -> Result<Json<Vec<TableSummary>>, ApiError> {
    let store = store.lock().map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", e),
            None,
        )
    })?;
    Ok(Json(store.summaries()))
}

fn error_response(status: StatusCode, error: String, kind: Option<&'static str>) -> ApiError {
    (status, Json(ErrorResponse { error, kind }))
}

async fn serve_frontend() -> Html<&'static str> {
    Html(FRONTEND_HTML)
}

const FRONTEND_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Mini SQL Engine</title>
    <style>
        body { font-family: sans-serif; max-width: 900px; margin: 40px auto; }
        textarea { width: 100%; height: 80px; font-family: monospace; }
        pre { background: #f4f4f4; padding: 12px; overflow-x: auto; }
        .error { color: #c62828; }
    </style>
</head>
<body>
    <h1>Mini SQL Engine</h1>
    <textarea id="query" placeholder="SELECT * FROM employees;"></textarea>
    <button onclick="run()">Execute</button>
    <pre id="output"></pre>
    <script>
        async function run() {
            const output = document.getElementById('output');
            const response = await fetch('/execute', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ query: document.getElementById('query').value })
            });
            const body = await response.json();
            output.className = response.ok ? '' : 'error';
            output.textContent = response.ok ? body.result : body.error;
        }
    </script>
</body>
</html>
"#;
