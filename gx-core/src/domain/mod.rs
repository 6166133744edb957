pub mod batch;
pub mod compiler;
pub mod error;
pub mod expectations;
pub mod profiling;
pub mod project;
pub mod validation;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
