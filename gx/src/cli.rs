// gx/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gx")]
#[command(about = "Always know what to expect from your data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Creates (or completes) a project interactively
    Init {
        /// Directory holding (or that will hold) great_expectations/
        #[arg(short = 'd', long = "directory", default_value = ".")]
        directory: PathBuf,
    },

    /// 📚 Builds Data Docs and opens them
    Docs {
        #[arg(short = 'd', long = "directory", default_value = ".")]
        directory: PathBuf,

        /// Build only, do not open a browser
        #[arg(long)]
        no_view: bool,
    },

    /// 🔌 Datasource operations
    Datasource {
        #[command(subcommand)]
        command: DatasourceCommands,
    },

    /// 📋 Expectation suite operations
    Suite {
        #[command(subcommand)]
        command: SuiteCommands,
    },
}

#[derive(Subcommand)]
pub enum DatasourceCommands {
    /// Lists the datasources of the project
    List {
        #[arg(short = 'd', long = "directory", default_value = ".")]
        directory: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum SuiteCommands {
    /// Lists the expectation suites of the project
    List {
        #[arg(short = 'd', long = "directory", default_value = ".")]
        directory: PathBuf,
    },
}
