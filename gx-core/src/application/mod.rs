// gx-core/src/application/mod.rs

pub mod context;
pub mod datasource;
pub mod docs;
pub mod init;
pub mod metrics;
pub mod ports;
pub mod profiler;
pub mod scaffold;
pub mod suite;
pub mod validator;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs:
// `use gx_core::application::{DataContext, InitWizard, build_data_docs};`

pub use context::DataContext;
pub use docs::{BuiltSite, DataDocsBuilder, build_data_docs, preferred_site};
pub use init::{InitOutcome, InitWizard};
pub use profiler::SampleSuiteProfiler;
pub use scaffold::scaffold_project;
pub use validator::validate;
