// gx-core/src/application/init.rs
//
// The `init` wizard: scaffold or repair a project, connect a datasource,
// generate a sample suite, build Data Docs and offer to open them.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::application::context::DataContext;
use crate::application::datasource::{DatasourceOutcome, add_datasource};
use crate::application::docs::{BuiltSite, build_data_docs, preferred_site};
use crate::application::scaffold::scaffold_project;
use crate::application::suite::{SuiteOutcome, create_suite};
use crate::domain::project::ProjectLayout;
use crate::domain::validation::ValidationKey;
use crate::error::GxError;
use crate::infrastructure::config::is_initialized;
use crate::ports::browser::Browser;
use crate::ports::console::Console;

pub const BANNER: &str = r#"
  ___              _     ___                  _        _   _
 / __|_ _ ___ __ _| |_  | __|_ ___ __  ___ __| |_ __ _| |_(_)___ _ _  ___
| (_ | '_/ -_) _` |  _| | _|\ \ / '_ \/ -_) _|  _/ _` |  _| / _ \ ' \(_-<
 \___|_| \___\__,_|\__| |___/_\_\ .__/\___\__|\__\__,_|\__|_\___/_||_/__/
                                |_|
             ~ Always know what to expect from your data ~
"#;

pub const NEW_PROJECT_PREVIEW: &str = "Let's configure a new Data Context.

First, Great Expectations will create a new directory:

    great_expectations
    |-- great_expectations.yml
    |-- expectations
    |-- notebooks
    |-- plugins
    |-- .gitignore
    |-- uncommitted
        |-- config_variables.yml
        |-- data_docs
        |-- validations
";

pub const PROCEED_PROMPT: &str = "OK to proceed?";
pub const PROJECT_COMPLETE: &str =
    "This looks like an existing project that appears complete! You are ready to roll.";
pub const BUILD_DOCS_PROMPT: &str = "Would you like to build & view this project's Data Docs!?";
pub const VIEW_DOCS_PROMPT: &str = "Would you like to view your new Expectations in Data Docs? This will open a new browser window.";
pub const SELECT_DATASOURCE_PROMPT: &str = "Select a datasource";
pub const SET_UP: &str = "Congratulations! Great Expectations is now set up.";

/// How a wizard run ended. Expected failures live here, not in `GxError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A suite was generated and the docs built.
    ProjectReady,
    /// Complete project, docs rebuilt on request.
    DocsRebuilt,
    /// The user said no; nothing else happened.
    Declined,
    ConnectionFailed,
    NoDataAssets,
}

impl InitOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ProjectReady | Self::DocsRebuilt | Self::Declined => 0,
            Self::ConnectionFailed | Self::NoDataAssets => 1,
        }
    }
}

pub struct InitWizard<'a> {
    project_dir: PathBuf,
    console: &'a mut dyn Console,
    browser: &'a dyn Browser,
}

impl<'a> InitWizard<'a> {
    pub fn new(project_dir: &Path, console: &'a mut dyn Console, browser: &'a dyn Browser) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            console,
            browser,
        }
    }

    #[instrument(skip(self), fields(project_dir = %self.project_dir.display()))]
    pub async fn run(mut self) -> Result<InitOutcome, GxError> {
        self.console.say(BANNER)?;

        let layout = ProjectLayout::new(&self.project_dir);
        if is_initialized(&layout) {
            self.existing_project(&layout).await
        } else {
            self.new_project(&layout).await
        }
    }

    async fn new_project(&mut self, layout: &ProjectLayout) -> Result<InitOutcome, GxError> {
        self.console.say(NEW_PROJECT_PREVIEW)?;
        if !self.console.confirm(PROCEED_PROMPT, true)? {
            self.console.say(
                "OK, nothing was created. Run `gx init` again when you are ready to set up a project.",
            )?;
            return Ok(InitOutcome::Declined);
        }

        let report = scaffold_project(layout)?;
        info!(created = report.created.len(), "Project scaffolded");
        let mut context = DataContext::load(&self.project_dir)?;
        self.console.say(&format!(
            "\nGreat Expectations created a new project in {}",
            context.layout().ge_dir().display()
        ))?;
        self.connect_and_profile(&mut context).await
    }

    async fn existing_project(&mut self, layout: &ProjectLayout) -> Result<InitOutcome, GxError> {
        let report = scaffold_project(layout)?;
        if !report.is_empty() {
            debug!(created = ?report.created, "Project repaired");
            self.console.say(&format!(
                "Great Expectations added {} missing item(s) to your project.",
                report.created.len()
            ))?;
        }

        let mut context = DataContext::load(&self.project_dir)?;
        let datasources = context.datasource_names();

        if !context.list_suite_names()?.is_empty() {
            if !datasources.is_empty() {
                self.console.say(PROJECT_COMPLETE)?;
            }
            if !self.console.confirm(BUILD_DOCS_PROMPT, true)? {
                return Ok(InitOutcome::Declined);
            }
            let sites = self.build_docs(&context)?;
            if let Some(site) = preferred_site(&sites) {
                let url = site.index_url.clone();
                self.open_in_browser(&url)?;
            }
            return Ok(InitOutcome::DocsRebuilt);
        }

        match datasources.as_slice() {
            [] => self.connect_and_profile(&mut context).await,
            [only] => {
                let name = only.clone();
                self.profile(&context, &name).await
            }
            many => {
                let choices: Vec<&str> = many.iter().map(String::as_str).collect();
                let picked = self.console.select(SELECT_DATASOURCE_PROMPT, &choices)?;
                let name = many[picked].clone();
                self.profile(&context, &name).await
            }
        }
    }

    async fn connect_and_profile(&mut self, context: &mut DataContext) -> Result<InitOutcome, GxError> {
        match add_datasource(context, &mut *self.console).await? {
            DatasourceOutcome::Added(name) => self.profile(context, &name).await,
            DatasourceOutcome::ConnectionFailed => Ok(InitOutcome::ConnectionFailed),
        }
    }

    async fn profile(&mut self, context: &DataContext, datasource: &str) -> Result<InitOutcome, GxError> {
        match create_suite(context, &mut *self.console, datasource).await? {
            SuiteOutcome::Created { validation, .. } => self.finish(context, &validation),
            SuiteOutcome::NoDataAssets => Ok(InitOutcome::NoDataAssets),
            SuiteOutcome::ConnectionFailed => Ok(InitOutcome::ConnectionFailed),
        }
    }

    fn finish(&mut self, context: &DataContext, validation: &ValidationKey) -> Result<InitOutcome, GxError> {
        let sites = self.build_docs(context)?;
        if let Some(site) = preferred_site(&sites) {
            if self.console.confirm(VIEW_DOCS_PROMPT, true)? {
                let url = site.validation_page_url(validation)?;
                self.open_in_browser(&url)?;
            }
        }
        self.console.say(SET_UP)?;
        Ok(InitOutcome::ProjectReady)
    }

    fn build_docs(&mut self, context: &DataContext) -> Result<Vec<BuiltSite>, GxError> {
        self.console.say("\nBuilding Data Docs...")?;
        let sites = build_data_docs(context)?;
        self.console.say("The following Data Docs sites were built:")?;
        for site in &sites {
            self.console.say(&format!("- {}: {}", site.name, site.index_url))?;
        }
        Ok(sites)
    }

    /// A browser that fails to start is not a wizard failure.
    fn open_in_browser(&mut self, url: &str) -> Result<(), GxError> {
        if let Err(e) = self.browser.open(url) {
            debug!(error = %e, "Browser did not open");
            self.console.say(&format!(
                "Could not open a browser window. Open this page by hand: {}",
                url
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::console::LineConsole;
    use anyhow::Result;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Browser for Recorder {
        fn open(&self, url: &str) -> Result<(), GxError> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(InitOutcome::ProjectReady.exit_code(), 0);
        assert_eq!(InitOutcome::Declined.exit_code(), 0);
        assert_eq!(InitOutcome::ConnectionFailed.exit_code(), 1);
        assert_eq!(InitOutcome::NoDataAssets.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_decline_leaves_directory_untouched() -> Result<()> {
        let dir = tempdir()?;
        let mut console = LineConsole::new(Cursor::new(b"n\n".to_vec()), Vec::new(), true);
        let browser = Recorder::default();

        let outcome = InitWizard::new(dir.path(), &mut console, &browser).run().await?;
        assert_eq!(outcome, InitOutcome::Declined);
        assert!(!dir.path().join("great_expectations").exists());
        assert!(browser.0.lock().unwrap().is_empty());

        let out = String::from_utf8(console.into_output())?;
        assert!(out.contains("Always know what to expect from your data"));
        assert!(out.contains("OK to proceed? [Y/n]: "));
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_backend_is_a_connection_failure() -> Result<()> {
        let dir = tempdir()?;
        let script = "Y\n2\n5\npg\npostgresql://localhost/nothing\n";
        let mut console = LineConsole::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), true);
        let browser = Recorder::default();

        let outcome = InitWizard::new(dir.path(), &mut console, &browser).run().await?;
        assert_eq!(outcome, InitOutcome::ConnectionFailed);
        assert!(browser.0.lock().unwrap().is_empty());
        assert!(DataContext::load(dir.path())?.datasource_names().is_empty());

        let out = String::from_utf8(console.into_output())?;
        assert!(out.contains("Cannot connect to the database."));
        Ok(())
    }
}
