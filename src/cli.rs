use crate::executor::execute_sql;
use crate::format::format_result;
use crate::store::TableStore;
use log::debug;
use std::io::{self, BufRead, IsTerminal, Write};

const HELP_TEXT: &str = "\
Mini SQL Engine CLI
===================

Commands:
  LOAD filename.csv                        Load a CSV file as a table
  SELECT * FROM table;                     Select all columns
  SELECT col1, col2 FROM table;            Select specific columns
  SELECT * FROM table WHERE condition;     Filter rows
  SELECT COUNT(*) FROM table;              Count rows
  SELECT COUNT(col) FROM table;            Count non-empty values in a column
  tables                                   List loaded tables
  help                                     Show this help
  exit, quit, q                            Leave the shell

WHERE conditions:
  Operators: =, !=, >, <, >=, <=
  Quote text values: WHERE country = 'USA'
  Numbers are bare:  WHERE age > 30

Examples:
  LOAD employees.csv;
  SELECT name, age FROM employees WHERE age > 30;
  SELECT COUNT(*) FROM employees WHERE country = 'USA';
";

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive shell over one table store.
#[derive(Debug, Default)]
pub struct Repl {
    store: TableStore,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            store: TableStore::new(),
        }
    }

    pub fn with_store(store: TableStore) -> Self {
        Self { store }
    }

    /// Runs on stdin/stdout. The banner and prompt appear only on a terminal.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        self.run_with(stdin.lock(), io::stdout().lock(), interactive)
    }

    pub fn run_with<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        interactive: bool,
    ) -> io::Result<()> {
        if interactive {
            writeln!(output, "Mini SQL Engine CLI")?;
            writeln!(output, "Type 'help' for available commands or 'exit' to quit.")?;
            writeln!(output)?;
        }

        let mut lines = input.lines();
        loop {
            if interactive {
                write!(output, "sql> ")?;
                output.flush()?;
            }

            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    // EOF
                    if interactive {
                        writeln!(output)?;
                        writeln!(output, "Goodbye!")?;
                    }
                    return Ok(());
                }
            };

            if self.handle_line(line.trim(), &mut output)? == Flow::Quit {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
        }
    }

    fn handle_line<W: Write>(&mut self, line: &str, output: &mut W) -> io::Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match line.to_lowercase().as_str() {
            "exit" | "quit" | "q" => return Ok(Flow::Quit),
            "help" => {
                write!(output, "{}", HELP_TEXT)?;
                return Ok(Flow::Continue);
            }
            "tables" | ".tables" => {
                self.list_tables(output)?;
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        debug!("cli query: {}", line);
        match execute_sql(line, &mut self.store) {
            Ok(result) => writeln!(output, "{}", format_result(&result))?,
            Err(e) => writeln!(output, "SQL Error: {}", e)?,
        }
        writeln!(output)?;
        Ok(Flow::Continue)
    }

    fn list_tables<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let summaries = self.store.summaries();
        if summaries.is_empty() {
            return writeln!(output, "No tables loaded");
        }
        for summary in summaries {
            writeln!(
                output,
                "{} ({} columns, {} rows): {}",
                summary.name,
                summary.columns.len(),
                summary.rows,
                summary.columns.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use crate::table::Table;
    use std::io::Cursor;

    fn run_script(repl: &mut Repl, script: &str) -> String {
        let mut output = Vec::new();
        repl.run_with(Cursor::new(script), &mut output, false).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn repl_with_people() -> Repl {
        let mut store = TableStore::new();
        store.insert(Table::from_rows(
            "people",
            vec![
                Row::from_values([("name", "Ann"), ("age", "41")]),
                Row::from_values([("name", "Ben"), ("age", "19")]),
            ],
        ));
        Repl::with_store(store)
    }

    #[test]
    fn test_runs_queries_until_eof() {
        let mut repl = repl_with_people();
        let output = run_script(&mut repl, "SELECT COUNT(*) FROM people;\n\nSELECT name FROM people WHERE age > 20\n");

        assert!(output.starts_with("2\n"));
        assert!(output.contains("│ Ann  │"));
        assert!(!output.contains("Ben"));
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut repl = repl_with_people();
        let output = run_script(&mut repl, "SELECT * FROM nowhere\nDROP TABLE people\nSELECT COUNT(*) FROM people\n");

        assert!(output.contains("SQL Error: Table 'nowhere' not found. Please load it first."));
        assert!(output.contains("SQL Error: Unsupported SQL query format"));
        assert!(output.contains("\n2\n"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut repl = repl_with_people();
        let output = run_script(&mut repl, "QUIT\nSELECT COUNT(*) FROM people\n");
        assert_eq!(output, "Goodbye!\n");
    }

    #[test]
    fn test_help_and_tables() {
        let mut repl = repl_with_people();
        let output = run_script(&mut repl, "help\ntables\n");
        assert!(output.contains("Operators: =, !=, >, <, >=, <="));
        assert!(output.contains("people (2 columns, 2 rows): name, age"));

        let mut empty = Repl::new();
        assert_eq!(run_script(&mut empty, ".tables\n"), "No tables loaded\n");
    }

    #[test]
    fn test_interactive_prompt() {
        let mut repl = Repl::new();
        let mut output = Vec::new();
        repl.run_with(Cursor::new("exit\n"), &mut output, true).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Mini SQL Engine CLI\n"));
        assert!(output.ends_with("sql> Goodbye!\n"));
    }
}
