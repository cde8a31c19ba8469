//! Template engine for HTML pages and map documents using Jinja2 syntax.
//!
//! Templates live in `templates/` at the project root and are compiled into
//! the binary, so rendering never depends on the working directory.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Template name and source, relative to `templates/`
const TEMPLATES: &[(&str, &str)] = &[
    ("index.html", include_str!("../../../templates/index.html")),
    ("map.html", include_str!("../../../templates/map.html")),
    (
        "map/document.html",
        include_str!("../../../templates/map/document.html"),
    ),
    (
        "map/popup.html",
        include_str!("../../../templates/map/popup.html"),
    ),
    (
        "map/tooltip.html",
        include_str!("../../../templates/map/tooltip.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in TEMPLATES {
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

/// Render a template with the given context.
///
/// Templates ending in `.html` are auto-escaped.
///
/// # Example
/// ```ignore
/// use minijinja::context;
///
/// let page = render_template("index.html", context! { error => "Dosya yüklenmedi." })?;
/// ```
pub fn render_template<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[allow(dead_code)]
pub fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}
