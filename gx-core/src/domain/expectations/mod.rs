// gx-core/src/domain/expectations/mod.rs

pub mod expectation;
pub mod suite;

pub use expectation::Expectation;
pub use suite::{ExpectationSuite, ProfilerMeta, SuiteMeta, validate_suite_name};
