// gx-core/src/application/docs.rs
//
// Static HTML site over the expectation and validation stores.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::application::context::DataContext;
use crate::application::ports::TemplateEngine;
use crate::domain::expectations::expectation::format_number;
use crate::domain::expectations::suite::GX_VERSION;
use crate::domain::expectations::{Expectation, ExpectationSuite};
use crate::domain::project::configuration::DEFAULT_SITE_NAME;
use crate::domain::validation::{ExpectationValidationResult, SuiteValidationResult, ValidationKey};
use crate::error::GxError;
use crate::infrastructure::fs::atomic_write;
use crate::infrastructure::render::JinjaRenderer;
use crate::infrastructure::render::assets::STATIC_ASSETS;
use crate::infrastructure::render::jinja::{INDEX_TEMPLATE, SUITE_TEMPLATE, VALIDATION_TEMPLATE};

/// One generated site.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSite {
    pub name: String,
    pub dir: PathBuf,
    pub index_url: String,
}

impl BuiltSite {
    pub fn validation_page_url(&self, key: &ValidationKey) -> Result<String, GxError> {
        file_url(&self.dir.join("validations").join(key.relative_path("html")))
    }
}

/// `file://` URL of an absolute (or made absolute) path.
pub fn file_url(path: &Path) -> Result<String, GxError> {
    let absolute = std::path::absolute(path)?;
    let text = absolute.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        Ok(format!("file://{}", text))
    } else {
        Ok(format!("file:///{}", text))
    }
}

/// Site to open after a build: `local_site` when present, else the first one.
pub fn preferred_site(sites: &[BuiltSite]) -> Option<&BuiltSite> {
    sites
        .iter()
        .find(|s| s.name == DEFAULT_SITE_NAME)
        .or_else(|| sites.first())
}

// --- VIEW MODELS ---

#[derive(Serialize)]
struct Section<T: Serialize> {
    title: String,
    items: Vec<T>,
}

#[derive(Serialize)]
struct ExpectationItem {
    expectation_type: &'static str,
    description: String,
}

#[derive(Serialize)]
struct ResultRow {
    success: bool,
    expectation_type: &'static str,
    description: String,
    observed: String,
    exception: Option<String>,
}

/// Groups by column: table-level rules first, then columns in first-seen order.
fn sections<'e, T: Serialize>(
    expectations: impl Iterator<Item = &'e Expectation>,
    items: Vec<T>,
) -> Vec<Section<T>> {
    let mut sections: Vec<(Option<&str>, Section<T>)> = Vec::new();
    for (expectation, item) in expectations.zip(items) {
        let key = expectation.column();
        let pos = match sections.iter().position(|(k, _)| *k == key) {
            Some(pos) => pos,
            None => {
                let title = match key {
                    Some(column) => column.to_string(),
                    None => "Table-Level Expectations".to_string(),
                };
                sections.push((
                    key,
                    Section {
                        title,
                        items: Vec::new(),
                    },
                ));
                sections.len() - 1
            }
        };
        sections[pos].1.items.push(item);
    }
    sections.sort_by_key(|(k, _)| k.is_some());
    sections.into_iter().map(|(_, s)| s).collect()
}

fn observed_text(result: &ExpectationValidationResult) -> String {
    let r = &result.result;
    if let (Some(unexpected), Some(percent)) = (r.unexpected_count, r.unexpected_percent) {
        return format!("{} unexpected ({}%)", unexpected, format_number(percent));
    }
    match &r.observed_value {
        None | Some(Value::Null) => "-".to_string(),
        Some(value) => value_text(value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, value_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(b) => b.to_string(),
    }
}

// --- BUILDER ---

pub struct DataDocsBuilder<'a> {
    context: &'a DataContext,
    renderer: &'a dyn TemplateEngine,
}

impl<'a> DataDocsBuilder<'a> {
    pub fn new(context: &'a DataContext, renderer: &'a dyn TemplateEngine) -> Self {
        Self { context, renderer }
    }

    /// Regenerates every configured site from scratch.
    #[instrument(skip(self))]
    pub fn build(&self) -> Result<Vec<BuiltSite>, GxError> {
        let expectations = self.context.expectations_store();
        let validations = self.context.validations_store();

        let mut suites = Vec::new();
        for name in expectations.list_suite_names()? {
            suites.push(expectations.get(&name)?);
        }
        let mut results = Vec::new();
        for key in validations.list_keys()? {
            let result = validations.get(&key)?;
            results.push((key, result));
        }

        let mut built = Vec::new();
        for (name, site) in &self.context.config().data_docs_sites {
            let dir = self
                .context
                .layout()
                .resolve(&site.store_backend.base_directory);
            self.build_site(name, &dir, &suites, &results)?;
            built.push(BuiltSite {
                name: name.clone(),
                index_url: file_url(&dir.join("index.html"))?,
                dir,
            });
        }
        info!(sites = built.len(), suites = suites.len(), "Data Docs built");
        Ok(built)
    }

    fn build_site(
        &self,
        site_name: &str,
        dir: &Path,
        suites: &[ExpectationSuite],
        results: &[(ValidationKey, SuiteValidationResult)],
    ) -> Result<(), GxError> {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;

        for (relative, content) in STATIC_ASSETS {
            atomic_write(dir.join("static").join(relative), content)?;
        }

        let built_at = Utc::now().to_rfc3339();
        let page = |depth: usize, extra: Value| -> Value {
            let up = "../".repeat(depth);
            let mut ctx = json!({
                "static_root": format!("{}static", up),
                "index_href": format!("{}index.html", up),
                "site_name": site_name,
                "built_at": built_at,
                "version": GX_VERSION,
            });
            if let (Some(base), Value::Object(more)) = (ctx.as_object_mut(), extra) {
                base.extend(more);
            }
            ctx
        };

        // Expectation suite pages: expectations/<suite>.html
        for suite in suites {
            let items: Vec<ExpectationItem> = suite
                .expectations
                .iter()
                .map(|e| ExpectationItem {
                    expectation_type: e.expectation_type(),
                    description: e.describe(),
                })
                .collect();
            let profiled = suite.meta.profiled_with.as_ref();
            let html = self.renderer.render(
                SUITE_TEMPLATE,
                &page(
                    1,
                    json!({
                        "suite": {
                            "name": suite.name(),
                            "data_asset_type": suite.data_asset_type,
                            "batch": profiled.map(|p| p.batch_kwargs.to_string()),
                            "created_at": profiled.map(|p| p.created_at.clone()),
                            "expectation_count": suite.expectations.len(),
                        },
                        "sections": sections(suite.expectations.iter(), items),
                    }),
                ),
            )?;
            atomic_write(
                dir.join("expectations").join(format!("{}.html", suite.name())),
                html,
            )?;
        }

        // Validation pages: validations/<suite>/<run_id>/<fingerprint>.html
        for (key, result) in results {
            let rows: Vec<ResultRow> = result
                .results
                .iter()
                .map(|r| ResultRow {
                    success: r.success,
                    expectation_type: r.expectation_config.expectation_type(),
                    description: r.expectation_config.describe(),
                    observed: observed_text(r),
                    exception: r.exception_info.clone(),
                })
                .collect();
            let html = self.renderer.render(
                VALIDATION_TEMPLATE,
                &page(
                    3,
                    json!({
                        "suite": key.suite,
                        "run_id": key.run_id.as_str(),
                        "fingerprint": key.fingerprint,
                        "batch": result.meta.batch_kwargs.to_string(),
                        "validation_time": result.meta.validation_time,
                        "success": result.success,
                        "statistics": result.statistics,
                        "sections": sections(
                            result.results.iter().map(|r| &r.expectation_config),
                            rows
                        ),
                    }),
                ),
            )?;
            atomic_write(
                dir.join("validations").join(key.relative_path("html")),
                html,
            )?;
        }

        // Index
        let suite_rows: Vec<Value> = suites
            .iter()
            .map(|s| {
                json!({
                    "name": s.name(),
                    "href": format!("expectations/{}.html", s.name()),
                    "expectation_count": s.expectations.len(),
                    "columns": s.columns(),
                })
            })
            .collect();
        let validation_rows: Vec<Value> = results
            .iter()
            .rev()
            .map(|(key, result)| {
                json!({
                    "href": path_href(&Path::new("validations").join(key.relative_path("html"))),
                    "run_id": key.run_id.as_str(),
                    "suite": key.suite,
                    "batch": result.meta.batch_kwargs.to_string(),
                    "success": result.success,
                    "successful": result.statistics.successful_expectations,
                    "evaluated": result.statistics.evaluated_expectations,
                })
            })
            .collect();
        let html = self.renderer.render(
            INDEX_TEMPLATE,
            &page(
                0,
                json!({ "suites": suite_rows, "validations": validation_rows }),
            ),
        )?;
        atomic_write(dir.join("index.html"), html)?;

        debug!(site = site_name, dir = ?dir, "Site written");
        Ok(())
    }
}

fn path_href(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Builds the docs with the embedded templates.
pub fn build_data_docs(context: &DataContext) -> Result<Vec<BuiltSite>, GxError> {
    let renderer = JinjaRenderer::new()?;
    DataDocsBuilder::new(context, &renderer).build()
}
