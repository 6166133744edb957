// gx-core/src/infrastructure/render/mod.rs

pub mod assets;
pub mod jinja;

pub use jinja::JinjaRenderer;
