// gx-core/src/application/suite.rs
//
// "Create an expectation suite" step: pick a batch, name the suite,
// profile it, validate the batch against it and store the result.

use std::path::Path;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::application::context::DataContext;
use crate::application::datasource::report_connection_failure;
use crate::application::profiler::SampleSuiteProfiler;
use crate::application::validator::validate;
use crate::domain::batch::{BatchKwargs, ReaderMethod};
use crate::domain::compiler::QueryGuard;
use crate::domain::expectations::{ExpectationSuite, validate_suite_name};
use crate::domain::project::DatasourceKind;
use crate::domain::validation::{RunId, ValidationKey};
use crate::error::GxError;
use crate::ports::connector::Connector;
use crate::ports::console::Console;

pub const TABLE_PROMPT: &str = "Which table would you like to use? (Choose one)";
pub const QUERY_HINT: &str = "Don't see the table in the list above? Just type the SQL query";
pub const SUITE_NAME_PROMPT: &str = "Name the new expectation suite";
pub const PROFILING_NOTICE: &str = "Great Expectations will choose a couple of columns and generate expectations about them to demonstrate some examples of assertions you can make about your data.";
pub const GENERATING: &str = "Generating example Expectation Suite...";

#[derive(Debug, Clone, PartialEq)]
pub enum SuiteOutcome {
    Created {
        name: String,
        batch: BatchKwargs,
        validation: ValidationKey,
    },
    NoDataAssets,
    ConnectionFailed,
}

/// Candidate batches of a datasource, in display order.
#[instrument(skip(context, connector))]
pub async fn list_assets(
    context: &DataContext,
    connector: &dyn Connector,
    datasource: &str,
) -> Result<Vec<BatchKwargs>, GxError> {
    match context.datasource(datasource)?.kind() {
        Some(DatasourceKind::Files) => {
            let dir = context.datasource_directory(datasource)?;
            Ok(list_data_files(&dir)
                .into_iter()
                .map(|(path, method)| BatchKwargs::path(datasource, &path, method))
                .collect())
        }
        _ => Ok(connector
            .list_tables()
            .await?
            .into_iter()
            .map(|t| BatchKwargs::table(datasource, t.schema.as_deref(), &t.name))
            .collect()),
    }
}

fn list_data_files(dir: &Path) -> Vec<(std::path::PathBuf, ReaderMethod)> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let method = ReaderMethod::from_path(e.path())?;
            Some((e.into_path(), method))
        })
        .collect()
}

fn asset_menu(assets: &[BatchKwargs], accepts_sql: bool) -> String {
    let mut menu = String::from(TABLE_PROMPT);
    for (i, asset) in assets.iter().enumerate() {
        menu.push_str(&format!("\n    {}. {}", i + 1, asset.asset_name()));
    }
    if accepts_sql {
        menu.push_str(&format!("\n    {}", QUERY_HINT));
    }
    menu
}

async fn choose_batch(
    connector: &dyn Connector,
    console: &mut dyn Console,
    datasource: &str,
    assets: &[BatchKwargs],
    accepts_sql: bool,
) -> Result<BatchKwargs, GxError> {
    let menu = asset_menu(assets, accepts_sql);
    loop {
        let answer = console.text(&menu, None)?;

        if let Ok(n) = answer.parse::<usize>() {
            if let Some(asset) = n.checked_sub(1).and_then(|i| assets.get(i)) {
                return Ok(asset.clone());
            }
            console.invalid()?;
            continue;
        }

        if !accepts_sql {
            console.invalid()?;
            continue;
        }
        match QueryGuard::check(&answer) {
            Ok(query) => {
                let batch = BatchKwargs::query(datasource, &query);
                match connector.fetch_columns(&batch.relation()).await {
                    Ok(_) => return Ok(batch),
                    Err(e) => {
                        debug!(error = %e, "Query does not run");
                        console.invalid()?;
                        console.say(&format!("  - {}", e))?;
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Not a usable query");
                console.invalid()?;
            }
        }
    }
}

fn prompt_suite_name(
    context: &DataContext,
    console: &mut dyn Console,
    default: &str,
) -> Result<String, GxError> {
    let store = context.expectations_store();
    loop {
        let name = console.text(SUITE_NAME_PROMPT, Some(default))?;
        if let Err(e) = validate_suite_name(&name) {
            console.say(&format!("Error: {}", e))?;
            continue;
        }
        if store.exists(&name) {
            console.say(&format!(
                "An expectation suite named `{}` already exists. Please choose another name.",
                name
            ))?;
            continue;
        }
        return Ok(name);
    }
}

/// Interactive suite creation over one datasource.
#[instrument(skip(context, console))]
pub async fn create_suite(
    context: &DataContext,
    console: &mut dyn Console,
    datasource: &str,
) -> Result<SuiteOutcome, GxError> {
    let connector = match context.open_datasource(datasource).await {
        Ok(c) => c,
        Err(e) if e.is_connection_failure() => {
            report_connection_failure(console, &e)?;
            return Ok(SuiteOutcome::ConnectionFailed);
        }
        Err(e) => return Err(e),
    };
    let config = context.datasource(datasource)?;
    let accepts_sql = config.kind() != Some(DatasourceKind::Files);
    let data_asset_type = config.data_asset_type.class_name.clone();

    let assets = list_assets(context, connector.as_ref(), datasource).await?;
    if assets.is_empty() {
        console.say(&format!(
            "No data assets were found in datasource '{}'. Add a table (or data file) and run init again.",
            datasource
        ))?;
        return Ok(SuiteOutcome::NoDataAssets);
    }

    let batch = choose_batch(connector.as_ref(), console, datasource, &assets, accepts_sql).await?;
    let name = prompt_suite_name(
        context,
        console,
        &ExpectationSuite::default_name_for(&batch.asset_name()),
    )?;

    console.say(PROFILING_NOTICE)?;
    console.say(GENERATING)?;

    let suite =
        SampleSuiteProfiler::profile(connector.as_ref(), &batch, &name, &data_asset_type).await?;
    context.expectations_store().save(&suite)?;

    let result = validate(connector.as_ref(), &batch, &suite, RunId::now()).await?;
    let validation = context.validations_store().save(&result)?;
    info!(suite = %name, success = result.success, "Sample suite validated");

    console.say(&format!(
        "A new Expectation suite '{}' was added to your project",
        name
    ))?;
    Ok(SuiteOutcome::Created {
        name,
        batch,
        validation,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::scaffold::scaffold_project;
    use crate::domain::project::{DatasourceConfig, ProjectLayout};
    use crate::infrastructure::console::LineConsole;
    use anyhow::Result;
    use serde_yaml::Mapping;
    use std::io::Cursor;
    use tempfile::{TempDir, tempdir};

    fn project_with_sqlite(rows: usize) -> Result<(TempDir, DataContext)> {
        let dir = tempdir()?;
        let db = dir.path().join("people.db");
        let conn = rusqlite::Connection::open(&db)?;
        conn.execute_batch("CREATE TABLE people (name TEXT, age INTEGER);")?;
        for i in 0..rows {
            conn.execute(
                "INSERT INTO people VALUES (?1, ?2)",
                rusqlite::params![format!("person_{}", i), 20 + (i % 7) as i64],
            )?;
        }
        drop(conn);

        scaffold_project(&ProjectLayout::new(dir.path()))?;
        let mut context = DataContext::load(dir.path())?;
        let mut credentials = Mapping::new();
        credentials.insert(
            "url".into(),
            format!("sqlite:///{}", db.display()).into(),
        );
        context.add_datasource("people", DatasourceConfig::sql("people"), Some(credentials))?;
        Ok((dir, context))
    }

    fn console(script: &str) -> LineConsole<Cursor<Vec<u8>>, Vec<u8>> {
        LineConsole::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), true)
    }

    #[tokio::test]
    async fn test_create_suite_from_table() -> Result<()> {
        let (_dir, context) = project_with_sqlite(40)?;
        let mut console = console("1\n\n");

        let outcome = create_suite(&context, &mut console, "people").await?;
        let SuiteOutcome::Created { name, validation, .. } = outcome.clone() else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(name, "main.people.warning");
        assert!(context.expectations_store().exists(&name));
        assert!(context.validations_store().get(&validation)?.success);

        let out = String::from_utf8(console.into_output())?;
        assert!(out.contains("    1. main.people"));
        assert!(out.contains(QUERY_HINT));
        assert!(out.contains("A new Expectation suite 'main.people.warning' was added to your project"));
        Ok(())
    }

    #[tokio::test]
    async fn test_query_batch_and_invalid_answers() -> Result<()> {
        let (_dir, context) = project_with_sqlite(15)?;
        let mut console = console("7\nhello there\nDELETE FROM people\nSELECT name, age FROM people WHERE age > 21\n\n");

        let outcome = create_suite(&context, &mut console, "people").await?;
        let SuiteOutcome::Created { name, batch, .. } = outcome.clone() else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(name, "query.warning");
        assert_eq!(batch.asset_name(), "query");

        let out = String::from_utf8(console.into_output())?;
        assert_eq!(out.matches("Error: invalid input").count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_suite_name_collision_reprompts() -> Result<()> {
        let (_dir, context) = project_with_sqlite(12)?;
        context.expectations_store().save(&ExpectationSuite::new("taken"))?;
        let mut console = console("1\ntaken\nfresh\n");

        let outcome = create_suite(&context, &mut console, "people").await?;
        assert!(matches!(outcome, SuiteOutcome::Created { ref name, .. } if name == "fresh"));
        let out = String::from_utf8(console.into_output())?;
        assert!(out.contains("`taken` already exists"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_database_has_no_assets() -> Result<()> {
        let dir = tempdir()?;
        let db = dir.path().join("empty.db");
        rusqlite::Connection::open(&db)?.execute_batch("PRAGMA user_version = 1;")?;
        scaffold_project(&ProjectLayout::new(dir.path()))?;
        let mut context = DataContext::load(dir.path())?;
        let mut credentials = Mapping::new();
        credentials.insert("url".into(), format!("sqlite:///{}", db.display()).into());
        context.add_datasource("empty", DatasourceConfig::sql("empty"), Some(credentials))?;

        let mut console = console("");
        let outcome = create_suite(&context, &mut console, "empty").await?;
        assert_eq!(outcome, SuiteOutcome::NoDataAssets);
        Ok(())
    }

    #[tokio::test]
    async fn test_files_datasource_lists_csv_files() -> Result<()> {
        let dir = tempdir()?;
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data)?;
        let mut csv = String::from("city,population\n");
        for i in 0..25 {
            csv.push_str(&format!("city_{},{}\n", i, 1000 + i * 10));
        }
        std::fs::write(data.join("cities.csv"), csv)?;
        std::fs::write(data.join("notes.txt"), "ignored")?;

        scaffold_project(&ProjectLayout::new(dir.path()))?;
        let mut context = DataContext::load(dir.path())?;
        context.add_datasource("data__dir", DatasourceConfig::files("../data"), None)?;

        let mut console = console("SELECT 1\n1\n\n");
        let outcome = create_suite(&context, &mut console, "data__dir").await?;
        assert!(matches!(outcome, SuiteOutcome::Created { ref name, .. } if name == "cities.warning"));

        let out = String::from_utf8(console.into_output())?;
        assert!(out.contains("    1. cities"));
        assert!(!out.contains("notes"));
        assert!(!out.contains(QUERY_HINT));
        Ok(())
    }
}
