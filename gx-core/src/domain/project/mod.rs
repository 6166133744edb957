// gx-core/src/domain/project/mod.rs

pub mod configuration;
pub mod layout;

pub use configuration::{
    ClassRef, DatasourceConfig, DatasourceKind, ProjectConfig, SiteConfig, StoreBackendConfig,
    StoreConfig, validate_datasource_name,
};
pub use layout::ProjectLayout;
