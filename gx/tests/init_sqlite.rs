// gx/tests/init_sqlite.rs
//
// The binary end to end: answers on stdin, transcript on stdout, exit codes.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

fn passengers_db(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("titanic.db");
    let conn = rusqlite::Connection::open(&path)?;
    conn.execute_batch(
        "CREATE TABLE titanic (Name TEXT, PClass TEXT, Age REAL, Sex TEXT, Survived INTEGER, SexCode INTEGER);",
    )?;
    for i in 0..200_i64 {
        let female = i % 3 == 0;
        let age = if i % 5 == 0 { None } else { Some((i % 60) as f64 + 0.5) };
        conn.execute(
            "INSERT INTO titanic VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                format!("Passenger {}", i),
                ["1st", "2nd", "3rd"][(i % 3) as usize],
                age,
                if female { "female" } else { "male" },
                i64::from(female),
                i64::from(female)
            ],
        )?;
    }
    Ok(path)
}

fn gx() -> Result<Command> {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gx"));
    // `true <url>` stands in for a browser
    cmd.env("BROWSER", "true").env_remove("RUST_LOG");
    Ok(cmd)
}

fn init_project(project_dir: &Path, db: &Path) -> Result<()> {
    let answers = format!("Y\n2\n5\ntitanic\nsqlite:///{}\n1\nwarning\n\n", db.display());
    gx()?
        .args(["init", "-d"])
        .arg(project_dir)
        .write_stdin(answers)
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_init_new_project_through_the_binary() -> Result<()> {
    let tmp = tempdir()?;
    let project_dir = tmp.path().join("project");
    let db = passengers_db(tmp.path())?;

    let answers = format!("Y\n2\n5\ntitanic\n  sqlite:///{}  \n1\nwarning\n\n", db.display());
    gx()?
        .args(["init", "-d"])
        .arg(&project_dir)
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Always know what to expect from your data"))
        .stdout(predicate::str::contains("Name the new expectation suite [main.titanic.warning]: warning"))
        .stdout(predicate::str::contains("A new Expectation suite 'warning' was added to your project"))
        .stdout(predicate::str::contains("Great Expectations is now set up"))
        .stdout(predicate::str::contains("Error: invalid input").not())
        .stderr(predicate::str::is_empty());

    let config = std::fs::read_to_string(project_dir.join("great_expectations/great_expectations.yml"))?;
    let config: serde_yaml::Value = serde_yaml::from_str(&config)?;
    assert_eq!(
        config["datasources"]["titanic"]["class_name"].as_str(),
        Some("SqlAlchemyDatasource")
    );
    assert_eq!(
        config["datasources"]["titanic"]["data_asset_type"]["class_name"].as_str(),
        Some("SqlAlchemyDataset")
    );

    let pages: Vec<_> = WalkDir::new(project_dir.join("great_expectations/uncommitted/data_docs/local_site/validations/warning"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "html"))
        .collect();
    assert_eq!(pages.len(), 1);
    Ok(())
}

#[test]
fn test_short_script_aborts() -> Result<()> {
    let tmp = tempdir()?;
    gx()?
        .args(["init", "-d"])
        .arg(tmp.path())
        .write_stdin("Y\n2\nseven\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: invalid input"))
        .stdout(predicate::str::contains("Aborted!"));
    Ok(())
}

#[test]
fn test_connection_failure_exits_non_zero() -> Result<()> {
    let tmp = tempdir()?;
    let project_dir = tmp.path().join("project");
    gx()?
        .args(["init", "-d"])
        .arg(&project_dir)
        .write_stdin("Y\n2\n5\ntitanic\nmysql://nobody@localhost/nothing\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Cannot connect to the database."))
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_decline_creates_nothing() -> Result<()> {
    let tmp = tempdir()?;
    gx()?
        .args(["init", "-d"])
        .arg(tmp.path())
        .write_stdin("n\n")
        .assert()
        .success();
    assert!(!tmp.path().join("great_expectations").exists());
    Ok(())
}

#[test]
fn test_list_commands_on_initialised_project() -> Result<()> {
    let tmp = tempdir()?;
    let project_dir = tmp.path().join("project");
    let db = passengers_db(tmp.path())?;
    init_project(&project_dir, &db)?;

    gx()?
        .args(["datasource", "list", "-d"])
        .arg(&project_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("titanic"))
        .stdout(predicate::str::contains("SqlAlchemyDatasource"));

    gx()?
        .args(["suite", "list", "-d"])
        .arg(&project_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"))
        .stdout(predicate::str::contains("1 expectation suite(s) found"));

    gx()?
        .args(["docs", "--no-view", "-d"])
        .arg(&project_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("- local_site: file://"));
    Ok(())
}

#[test]
fn test_commands_outside_a_project_fail() -> Result<()> {
    let tmp = tempdir()?;
    for args in [vec!["docs", "--no-view"], vec!["datasource", "list"], vec!["suite", "list"]] {
        gx()?
            .args(&args)
            .arg("-d")
            .arg(tmp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No great_expectations project found"));
    }
    Ok(())
}
