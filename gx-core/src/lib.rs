// gx-core/src/lib.rs

// 1. Documentation is optional for now
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts with the outside world: SQL engine, console, browser.
pub mod ports;

// 2. Domain (business core)
// Project schema, batches, expectations, profiling plan, validation results.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// SQLite / DuckDB, YAML config, stores, Jinja rendering, console, browser.
// Depends on the Domain and the Ports.
pub mod infrastructure;

// 4. Application (Use Cases)
// Scaffold, profiling, validation, Data Docs, the init wizard.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use gx_core::GxError;
pub use error::GxError;
