//! Exercise Widgets - Interactive exercise composition and spatial input controls
//!
//! This library composes exercise prose (Markdown/LaTeX templates with
//! placeholder fields) into DOM trees, and provides six spatial input
//! controls that bind their value to a host record.
//!
//! # Example
//!
//! ```rust
//! use exercise_widgets::fragment::{FieldRegistry, MimeBundle};
//! use exercise_widgets::render;
//!
//! let registry = FieldRegistry::rebuild(
//!     vec![("x".to_string(), MimeBundle::plain("42"))],
//!     Vec::new(),
//! );
//! let html = render("The answer is <<x>>", &registry).unwrap();
//! assert!(html.contains("42"));
//! ```

pub mod compositor;
pub mod config;
pub mod disclosure;
pub mod dom;
pub mod error;
pub mod exercise;
pub mod fragment;
pub mod host;
pub mod input;
pub mod render;
pub mod spatial;

pub use compositor::{ComposeReport, Compositor};
pub use config::{CompositorConfig, SpatialConfig, WidgetConfig};
pub use error::{RenderError, TemplateError, WidgetError};
pub use exercise::{Exercise, ExerciseContent};
pub use fragment::{FieldRegistry, Fragment, MimeBundle};
pub use host::{HostRecord, MemoryRecord};
pub use input::{ControlHandle, InputControl};
pub use spatial::{ControlKind, SpatialControl, SpatialWidget, SurfaceEvent};

use dom::{serialize_element, Element};
use render::{AllowListSanitizer, MarkdownRenderer};

/// Compose a template with the default sanitizer and renderer and return
/// the resulting HTML
pub fn render(template: &str, registry: &FieldRegistry) -> Result<String, WidgetError> {
    render_with_config(template, registry, &CompositorConfig::default())
}

/// Compose a template with custom placeholder attributes
///
/// # Example
///
/// ```rust
/// use exercise_widgets::{render_with_config, CompositorConfig, FieldRegistry};
///
/// let config = CompositorConfig::default().with_field_name_attr("data-name");
/// let html = render_with_config("plain prose", &FieldRegistry::new(), &config).unwrap();
/// assert!(html.contains("plain prose"));
/// ```
pub fn render_with_config(
    template: &str,
    registry: &FieldRegistry,
    config: &CompositorConfig,
) -> Result<String, WidgetError> {
    let sanitizer = AllowListSanitizer::new();
    let renderer = MarkdownRenderer::new();
    let compositor = Compositor::new(&sanitizer, &renderer).with_config(config.clone());
    let mut host = Element::new("div");
    pollster::block_on(compositor.render_template(template, registry, &mut host))?;
    Ok(serialize_element(&host))
}
