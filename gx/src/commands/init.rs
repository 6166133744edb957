// gx/src/commands/init.rs
//
// USE CASE: Interactive project initialisation.

use std::io::{BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use gx_core::GxError;
use gx_core::application::InitWizard;
use gx_core::infrastructure::{LineConsole, SystemBrowser};

pub async fn execute(directory: PathBuf) -> anyhow::Result<i32> {
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Cannot create project directory {:?}", directory))?;

    let stdin = std::io::stdin();
    // piped answers are echoed so the transcript reads like a session
    let echo = !stdin.is_terminal();
    let mut console = LineConsole::new(BufReader::new(stdin), std::io::stdout(), echo);
    let browser = SystemBrowser;

    match InitWizard::new(&directory, &mut console, &browser).run().await {
        Ok(outcome) => Ok(outcome.exit_code()),
        Err(GxError::InputExhausted) => {
            println!("Aborted!");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
