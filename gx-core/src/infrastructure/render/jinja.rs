// gx-core/src/infrastructure/render/jinja.rs

// Turns the Data Docs view models into HTML. Templates are compiled into the
// binary; `.html` names get minijinja's auto-escaping.

use crate::application::ports::TemplateEngine;
use crate::domain::expectations::expectation::format_number;
use crate::error::GxError;
use crate::infrastructure::error::InfrastructureError;
use minijinja::Environment;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const SUITE_TEMPLATE: &str = "expectation_suite.html";
pub const VALIDATION_TEMPLATE: &str = "validation_result.html";

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../../templates/base.html")),
    (INDEX_TEMPLATE, include_str!("../../../templates/index.html")),
    (
        SUITE_TEMPLATE,
        include_str!("../../../templates/expectation_suite.html"),
    ),
    (
        VALIDATION_TEMPLATE,
        include_str!("../../../templates/validation_result.html"),
    ),
];

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl JinjaRenderer<'static> {
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        // 🟢 Nombres lisibles: 30.0 -> "30", 29.881134 -> "29.8811"
        env.add_filter("number", |value: f64| format_number(value));

        Ok(Self { env })
    }
}

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, GxError> {
        let tmpl = self
            .env
            .get_template(template)
            .map_err(InfrastructureError::TemplateError)?;
        // On enrichit l'erreur pour savoir où ça a planté
        let html = tmpl
            .render(context)
            .map_err(InfrastructureError::TemplateError)?;
        Ok(html)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    fn page_context() -> serde_json::Value {
        json!({
            "static_root": "static",
            "index_href": "index.html",
            "site_name": "local_site",
            "built_at": "now",
            "version": "0.1.0",
            "suites": [],
            "validations": [],
        })
    }

    #[test]
    fn test_index_renders_empty_site() -> Result<()> {
        let renderer = JinjaRenderer::new()?;
        let html = renderer.render(INDEX_TEMPLATE, &page_context())?;
        assert!(html.contains("No expectation suites yet."));
        assert!(html.contains("static/styles/data_docs_default_styles.css"));
        Ok(())
    }

    #[test]
    fn test_values_are_escaped() -> Result<()> {
        let renderer = JinjaRenderer::new()?;
        let mut ctx = page_context();
        ctx["suites"] = json!([{
            "name": "<script>",
            "href": "expectations/x.html",
            "expectation_count": 1,
            "columns": [],
        }]);
        let html = renderer.render(INDEX_TEMPLATE, &ctx)?;
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        Ok(())
    }

    #[test]
    fn test_unknown_template() -> Result<()> {
        let renderer = JinjaRenderer::new()?;
        assert!(renderer.render("nope.html", &json!({})).is_err());
        Ok(())
    }
}
