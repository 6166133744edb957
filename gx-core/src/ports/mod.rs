// gx-core/src/ports/mod.rs

pub mod browser;
pub mod connector;
pub mod console;

pub use browser::Browser;
pub use connector::{ColumnSchema, Connector, TableRef};
pub use console::Console;
