// gx-core/src/infrastructure/stores/mod.rs
//
// Filesystem stores: one pretty-printed JSON document per suite / result.

pub mod expectations;
pub mod validations;

pub use expectations::ExpectationsStore;
pub use validations::ValidationsStore;
