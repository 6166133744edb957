// gx-core/src/domain/compiler/mod.rs

pub mod quoter;

pub use quoter::{QueryGuard, quote_ident, quote_literal};
