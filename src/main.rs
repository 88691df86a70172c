use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use minisql::{execute_sql, format_result, start_server, Repl, ServerConfig, TableStore};

/// Minimal SQL engine over CSV files
#[derive(Parser, Debug)]
#[command(name = "minisql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive shell (default)
    Repl,

    /// Serve the HTTP interface
    Web {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Run queries in order against one store and print each result
    Exec {
        /// Queries, e.g. "LOAD data.csv" "SELECT * FROM data"
        #[arg(required = true)]
        queries: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            Repl::new().run().context("Failed to run interactive shell")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Web { host, port } => {
            let config = ServerConfig { host, port };
            start_server(config.clone(), TableStore::new())
                .await
                .with_context(|| format!("Web server failed on {}", config.address()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec { queries } => Ok(run_queries(&queries)),
    }
}

fn run_queries(queries: &[String]) -> ExitCode {
    let mut store = TableStore::new();
    for query in queries {
        match execute_sql(query, &mut store) {
            Ok(result) => println!("{}", format_result(&result)),
            Err(e) => {
                eprintln!("SQL Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
