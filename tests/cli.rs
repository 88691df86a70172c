use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn minisql() -> Command {
    Command::cargo_bin("minisql").unwrap()
}

#[test]
fn exec_runs_queries_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("employees.csv");
    fs::write(&path, "id,name,age\n1,John,30\n2,Jane,25\n").unwrap();

    minisql()
        .arg("exec")
        .arg(format!("LOAD {};", path.display()))
        .arg("SELECT COUNT(*) FROM employees WHERE age >= 30;")
        .arg("SELECT name FROM employees WHERE age < 30")
        .assert()
        .success()
        .stdout(predicate::str::contains("Table 'employees' loaded successfully"))
        .stdout(predicate::str::contains("\n1\n"))
        .stdout(predicate::str::contains("│ Jane │"));
}

#[test]
fn exec_fails_on_first_error() {
    minisql()
        .args(["exec", "SELECT * FROM nowhere", "SELECT COUNT(*) FROM nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "SQL Error: Table 'nowhere' not found. Please load it first.",
        ));
}

#[test]
fn repl_reads_piped_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pets.csv");
    fs::write(&path, "name,kind\nRex,dog\nTom,cat\n").unwrap();

    minisql()
        .arg("repl")
        .write_stdin(format!(
            "LOAD {}\nSELECT COUNT(kind) FROM pets\nSELECT * FROM pets WHERE kind = dog\nbogus\nexit\n",
            path.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("\n2\n"))
        .stdout(predicate::str::contains("│ Rex  │ dog  │"))
        .stdout(predicate::str::contains("SQL Error: Unsupported SQL query format"))
        .stdout(predicate::str::contains("Goodbye!"));
}
