//! Configuration for composition and spatial controls
//!
//! Configuration can be built in code with the `with_*` builders or loaded
//! from a TOML file:
//!
//! ```toml
//! [compositor]
//! field_name_attr = "data-field-name"
//!
//! [spatial]
//! token_width = 24
//! token_height = 24
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Attribute names that identify placeholder spans
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Attribute carrying the field name of a placeholder
    pub field_name_attr: String,
    /// Attribute carrying the optional format spec of a placeholder
    pub format_spec_attr: String,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            field_name_attr: "data-field-name".to_string(),
            format_spec_attr: "data-format-spec".to_string(),
        }
    }
}

impl CompositorConfig {
    pub fn with_field_name_attr(mut self, attr: impl Into<String>) -> Self {
        self.field_name_attr = attr.into();
        self
    }

    pub fn with_format_spec_attr(mut self, attr: impl Into<String>) -> Self {
        self.format_spec_attr = attr.into();
        self
    }
}

/// Token geometry and decorations for spatial controls
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Width of a token footprint in pixels
    pub token_width: u32,
    /// Height of a token footprint in pixels
    pub token_height: u32,
    /// Opacity of tokens that are part of the value
    pub active_opacity: f32,
    /// Opacity of tokens that are not part of the value
    pub idle_opacity: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            token_width: 20,
            token_height: 20,
            active_opacity: 1.0,
            idle_opacity: 0.4,
        }
    }
}

impl SpatialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a square token footprint
    pub fn with_token_size(mut self, size: u32) -> Self {
        self.token_width = size;
        self.token_height = size;
        self
    }

    pub fn with_opacities(mut self, active: f32, idle: f32) -> Self {
        self.active_opacity = active;
        self.idle_opacity = idle;
        self
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub compositor: CompositorConfig,
    pub spatial: SpatialConfig,
}

impl WidgetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys take defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_compositor(mut self, config: CompositorConfig) -> Self {
        self.compositor = config;
        self
    }

    pub fn with_spatial(mut self, config: SpatialConfig) -> Self {
        self.spatial = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();
        assert_eq!(config.compositor.field_name_attr, "data-field-name");
        assert_eq!(config.compositor.format_spec_attr, "data-format-spec");
        assert_eq!(config.spatial.token_width, 20);
        assert_eq!(config.spatial.idle_opacity, 0.4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WidgetConfig::from_str(
            r#"
[spatial]
token_width = 30
"#,
        )
        .expect("Should parse");
        assert_eq!(config.spatial.token_width, 30);
        assert_eq!(config.spatial.token_height, 20);
        assert_eq!(config.compositor, CompositorConfig::default());
    }

    #[test]
    fn test_builder_pattern() {
        let config = WidgetConfig::new()
            .with_spatial(SpatialConfig::new().with_token_size(10).with_opacities(0.9, 0.1))
            .with_compositor(CompositorConfig::default().with_field_name_attr("data-pyrope-field-name"));
        assert_eq!(config.spatial.token_height, 10);
        assert_eq!(config.spatial.active_opacity, 0.9);
        assert_eq!(config.compositor.field_name_attr, "data-pyrope-field-name");
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = WidgetConfig::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
