//! Error types for templates, coordinates, rendering and widget contracts

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::config::ConfigError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors raised while expanding placeholder shorthand in a template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("unknown format specifier \"{spec}\" for field {field} at {span:?}")]
    UnknownFormatSpec {
        field: String,
        spec: String,
        span: Span,
    },
}

impl TemplateError {
    pub fn span(&self) -> Span {
        match self {
            TemplateError::UnknownFormatSpec { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            TemplateError::UnknownFormatSpec { field, spec, span } => {
                let message = format!("unknown format specifier \"{}\"", spec);
                let result = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(&message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!(
                                "field '{}' only accepts the 'latex' specifier",
                                field
                            ))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if result.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Errors parsing canonical coordinate strings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordError {
    #[error("expected {expected} comma-separated integers, found {found} in \"{input}\"")]
    Arity {
        input: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid integer \"{part}\" in \"{input}\"")]
    Integer { input: String, part: String },
}

/// Errors from the rich-output renderer collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("no supported representation among: {}", .available.join(", "))]
    NoSupportedFormat { available: Vec<String> },

    #[error("invalid {mime} payload: {message}")]
    InvalidPayload { mime: String, message: String },
}

/// Contract violations. These propagate; user-interaction failures never do.
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("alert box kind has to be either 'info' or 'warning', got '{0}'")]
    InvalidAlertKind(String),

    #[error("control '{id}' mounted before it was displayed")]
    NotDisplayed { id: String },

    #[error("unknown control kind '{0}'")]
    UnknownControlKind(String),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("coordinate error: {0}")]
    Coord(#[from] CoordError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_report_mentions_spec() {
        let source = "Value: <<x:bold>>";
        let err = TemplateError::UnknownFormatSpec {
            field: "x".to_string(),
            spec: "bold".to_string(),
            span: 7..17,
        };
        let report = err.format(source, "problem");
        assert!(report.contains("unknown format specifier \"bold\""));
        assert!(report.contains("problem"));
    }

    #[test]
    fn test_widget_error_display() {
        let err = WidgetError::InvalidAlertKind("danger".to_string());
        assert_eq!(
            err.to_string(),
            "alert box kind has to be either 'info' or 'warning', got 'danger'"
        );
    }
}
