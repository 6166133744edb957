// gx-core/tests/common/mod.rs
//
// Disposable projects and databases for the wizard tests.

#![allow(dead_code)]

use anyhow::Result;
use gx_core::GxError;
use gx_core::application::{InitOutcome, InitWizard};
use gx_core::infrastructure::LineConsole;
use gx_core::ports::Browser;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::instrument::WithSubscriber;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

pub const TITANIC_ROWS: usize = 1313;

const SURNAMES: [&str; 8] = [
    "Allen", "Allison", "Anderson", "Andrews", "Appleton", "Artagaveytia", "Astor", "Aubert",
];

/// Writes `titanic.db` into `dir` with a 1313-row `titanic` table shaped like
/// the classic passenger list: Name, PClass, Age, Sex, Survived, SexCode.
pub fn titanic_db(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("titanic.db");
    let mut conn = rusqlite::Connection::open(&path)?;
    conn.execute_batch(
        "CREATE TABLE titanic (
            Name TEXT,
            PClass TEXT,
            Age REAL,
            Sex TEXT,
            Survived INTEGER,
            SexCode INTEGER
        );",
    )?;

    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare("INSERT INTO titanic VALUES (?1, ?2, ?3, ?4, ?5, ?6)")?;
        for i in 0..TITANIC_ROWS {
            let female = i % 3 == 0;
            let title = if female { "Mrs" } else { "Mr" };
            let name = format!("{}, {} Passenger {}", SURNAMES[i % SURNAMES.len()], title, i);
            let pclass = ["1st", "2nd", "3rd"][i % 3];
            // roughly two passengers in five have no recorded age
            let age = if i % 5 < 2 {
                None
            } else {
                Some(0.5 + ((i * 37) % 71) as f64)
            };
            let sex = if female { "female" } else { "male" };
            let survived = i64::from(female || i % 4 == 0);
            let sex_code = i64::from(female);
            insert.execute(rusqlite::params![name, pclass, age, sex, survived, sex_code])?;
        }
    }
    tx.commit()?;
    Ok(path)
}

/// A database file with no tables.
pub fn empty_db(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("empty.db");
    rusqlite::Connection::open(&path)?.execute_batch("PRAGMA user_version = 1;")?;
    Ok(path)
}

pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite:///{}", path.display())
}

/// Records every `open` call instead of starting a browser.
#[derive(Default)]
pub struct RecordingBrowser {
    calls: Mutex<Vec<String>>,
}

impl RecordingBrowser {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) -> Result<(), GxError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        Ok(())
    }
}

/// Collects the level of every event seen while the wizard runs.
#[derive(Clone, Default)]
pub struct LevelCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LevelCapture {
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events at WARN or ERROR.
    pub fn warnings(&self) -> Vec<(Level, String)> {
        self.events()
            .into_iter()
            .filter(|(level, _)| *level <= Level::WARN)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LevelCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if let Ok(mut events) = self.events.lock() {
            events.push((*meta.level(), meta.target().to_string()));
        }
    }
}

/// Everything a wizard run produced.
pub struct Run {
    pub result: Result<InitOutcome, GxError>,
    pub transcript: String,
    pub browser_calls: Vec<String>,
    pub logs: LevelCapture,
}

impl Run {
    pub fn outcome(&self) -> InitOutcome {
        match &self.result {
            Ok(outcome) => *outcome,
            Err(e) => panic!("wizard failed: {}\n{}", e, self.transcript),
        }
    }
}

/// Runs `init` on `project_dir` with newline-separated answers.
pub async fn run_init(project_dir: &Path, answers: &str) -> Run {
    let mut console = LineConsole::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new(), true);
    let browser = RecordingBrowser::default();
    let logs = LevelCapture::default();
    let subscriber = Registry::default().with(logs.clone());

    let result = InitWizard::new(project_dir, &mut console, &browser)
        .run()
        .with_subscriber(subscriber)
        .await;

    Run {
        result,
        transcript: String::from_utf8_lossy(&console.into_output()).to_string(),
        browser_calls: browser.calls(),
        logs,
    }
}

/// A project initialised through the wizard with the `titanic` datasource
/// and a `warning` suite.
pub async fn initialized_sqlite_project(root: &Path) -> Result<PathBuf> {
    let db = titanic_db(root)?;
    let project_dir = root.join("my_rad_project");
    std::fs::create_dir_all(&project_dir)?;

    let answers = format!("Y\n2\n5\ntitanic\n{}\n1\nwarning\n\n", sqlite_url(&db));
    let run = run_init(&project_dir, &answers).await;
    assert_eq!(run.outcome(), InitOutcome::ProjectReady, "{}", run.transcript);
    assert_eq!(run.browser_calls.len(), 1);
    Ok(project_dir)
}
