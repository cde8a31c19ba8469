//! HTML template rendering.
//!
//! Page templates (`index.html`, `map.html`) and the map document templates
//! (`map/document.html`, `map/popup.html`) share one minijinja environment.

pub mod engine;

pub use engine::{render_template, TemplateError};
