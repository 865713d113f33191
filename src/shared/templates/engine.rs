use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// (name, source) of every embedded template
const TEMPLATES: &[(&str, &str)] = &[(
    "reports/preview.html.jinja",
    include_str!("../../../templates/reports/preview.html.jinja"),
)];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render an embedded template with any serializable context
pub fn render<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

impl From<TemplateError> for crate::core::error::AppError {
    fn from(e: TemplateError) -> Self {
        crate::core::error::AppError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_template() {
        let err = render("nope.html.jinja", ()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_embedded_templates_compile() {
        for (name, _) in TEMPLATES {
            assert!(get_environment().get_template(name).is_ok(), "{name}");
        }
    }
}
