// gx-core/src/infrastructure/render/assets.rs

/// Files copied under `<site>/static/`, as (relative path, content).
pub const STATIC_ASSETS: [(&str, &str); 4] = [
    (
        "styles/data_docs_default_styles.css",
        include_str!("../../../static/styles/data_docs_default_styles.css"),
    ),
    (
        "styles/data_docs_custom_styles_template.css",
        include_str!("../../../static/styles/data_docs_custom_styles_template.css"),
    ),
    (
        "images/logo-long-vector.svg",
        include_str!("../../../static/images/logo-long-vector.svg"),
    ),
    (
        "images/short-logo-vector.svg",
        include_str!("../../../static/images/short-logo-vector.svg"),
    ),
];

/// Starting point of the project's own stylesheet (plugins/custom_data_docs/styles/).
pub const CUSTOM_STYLES_TEMPLATE: &str =
    include_str!("../../../static/styles/data_docs_custom_styles_template.css");
