use crate::error::GxError;

pub trait TemplateEngine: Send + Sync {
    /// Renders the named template with a JSON view model.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, GxError>;
}
