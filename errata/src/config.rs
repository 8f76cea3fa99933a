//! Presenter configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default class marking the error-message element.
pub const DEFAULT_MARKER_CLASS: &str = "error-message";

/// Default distance of a toast from the viewport edges, in pixels.
pub const DEFAULT_TOAST_OFFSET: i16 = 10;

/// Default stacking order of toasts.
pub const DEFAULT_TOAST_Z_INDEX: i16 = 1000;

/// Default toast padding, in pixels.
pub const DEFAULT_TOAST_PADDING: u16 = 10;

/// How error responses are recognized and how toasts are laid out.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// marker_class = "flash-error"
/// toast_offset = 16
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Tag of the error-message element; `*` matches any tag.
    pub marker_tag: String,
    /// Class of the error-message element.
    pub marker_class: String,
    /// `name` of the hidden input carrying the placement mode.
    pub mode_field: String,
    /// `name` of the hidden input carrying the auto-dismiss delay.
    pub persistence_field: String,
    /// Media types (essence only, no parameters) treated as markup.
    pub markup_types: Vec<String>,
    pub toast_offset: i16,
    pub toast_z_index: i16,
    pub toast_padding: u16,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            marker_tag: "div".to_string(),
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            mode_field: "mode".to_string(),
            persistence_field: "persistence".to_string(),
            markup_types: vec!["text/html".to_string(), "application/xhtml+xml".to_string()],
            toast_offset: DEFAULT_TOAST_OFFSET,
            toast_z_index: DEFAULT_TOAST_Z_INDEX,
            toast_padding: DEFAULT_TOAST_PADDING,
        }
    }
}

impl PresenterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_marker(mut self, tag: impl Into<String>, class: impl Into<String>) -> Self {
        self.marker_tag = tag.into();
        self.marker_class = class.into();
        self
    }

    pub fn with_fields(mut self, mode: impl Into<String>, persistence: impl Into<String>) -> Self {
        self.mode_field = mode.into();
        self.persistence_field = persistence.into();
        self
    }

    pub fn with_toast_offset(mut self, offset: i16) -> Self {
        self.toast_offset = offset;
        self
    }

    pub fn with_toast_z_index(mut self, z_index: i16) -> Self {
        self.toast_z_index = z_index;
        self
    }

    pub fn with_toast_padding(mut self, padding: u16) -> Self {
        self.toast_padding = padding;
        self
    }

    /// Whether a `Content-Type` header value declares renderable markup.
    ///
    /// Parameters (`; charset=...`) are ignored and the comparison is
    /// case-insensitive.
    pub fn is_markup(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        !essence.is_empty()
            && self
                .markup_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(essence))
    }

    /// Whether `element` is an error-message element.
    pub fn is_marker(&self, element: &pagedom::Element) -> bool {
        (self.marker_tag == "*" || element.tag.eq_ignore_ascii_case(&self.marker_tag))
            && element.has_class(&self.marker_class)
    }
}
