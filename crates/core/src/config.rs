//! Highlight configuration
//!
//! Consumers hand the result set a configuration value bag alongside the
//! query; the recognized keys live under a `highlight` object:
//!
//! - `highlight.fields`: ordered list of field names to highlight
//! - `highlight.start` / `highlight.end`: marker strings
//! - `highlight.maxNumFragments`: maximum fragments per field
//!
//! Anything absent falls back to the defaults (no fields, `<B>`/`</B>`, 2).

use serde_json::Value;

/// Default start marker inserted before a matched term
pub const DEFAULT_START_MARKER: &str = "<B>";

/// Default end marker inserted after a matched term
pub const DEFAULT_END_MARKER: &str = "</B>";

/// Default maximum number of fragments per field
pub const DEFAULT_MAX_FRAGMENTS: usize = 2;

/// Resolved highlighting configuration
///
/// Field insertion order is output order. An empty field list disables
/// highlighting entirely (zero overhead during iteration).
///
/// # Example
///
/// ```
/// use sift_core::config::HighlightConfig;
///
/// let config = HighlightConfig::new()
///     .with_field("title")
///     .with_markers("<em>", "</em>");
/// assert!(config.is_enabled());
/// assert_eq!(config.max_fragments, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    /// Field names to highlight, in output order
    pub fields: Vec<String>,
    /// Marker inserted before each matched term
    pub start_marker: String,
    /// Marker inserted after each matched term
    pub end_marker: String,
    /// Maximum fragments generated per field
    pub max_fragments: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            fields: vec![],
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            max_fragments: DEFAULT_MAX_FRAGMENTS,
        }
    }
}

impl HighlightConfig {
    /// Create the default configuration (highlighting disabled)
    pub fn new() -> Self {
        HighlightConfig::default()
    }

    /// Builder: append a field to highlight
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Builder: set the marker pair
    pub fn with_markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_marker = start.into();
        self.end_marker = end.into();
        self
    }

    /// Builder: set the per-field fragment cap
    pub fn with_max_fragments(mut self, max_fragments: usize) -> Self {
        self.max_fragments = max_fragments;
        self
    }

    /// Whether any field is configured for highlighting
    pub fn is_enabled(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Parse the configuration from a query metadata value bag
    ///
    /// Unknown keys are ignored; malformed values fall back to defaults.
    pub fn from_metadata(metadata: &Value) -> Self {
        let highlight = match metadata.get("highlight") {
            Some(h) => h,
            None => return HighlightConfig::default(),
        };

        let fields = highlight
            .get("fields")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let start_marker = highlight
            .get("start")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_START_MARKER)
            .to_string();

        let end_marker = highlight
            .get("end")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_END_MARKER)
            .to_string();

        let max_fragments = highlight
            .get("maxNumFragments")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_FRAGMENTS as u64) as usize;

        HighlightConfig {
            fields,
            start_marker,
            end_marker,
            max_fragments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = HighlightConfig::default();
        assert!(config.fields.is_empty());
        assert!(!config.is_enabled());
        assert_eq!(config.start_marker, "<B>");
        assert_eq!(config.end_marker, "</B>");
        assert_eq!(config.max_fragments, 2);
    }

    #[test]
    fn test_builder() {
        let config = HighlightConfig::new()
            .with_field("title")
            .with_field("body")
            .with_markers("<em>", "</em>")
            .with_max_fragments(5);

        assert_eq!(config.fields, vec!["title", "body"]);
        assert_eq!(config.start_marker, "<em>");
        assert_eq!(config.max_fragments, 5);
        assert!(config.is_enabled());
    }

    #[test]
    fn test_from_metadata_full() {
        let metadata = json!({
            "highlight": {
                "fields": ["title", "body"],
                "start": "<mark>",
                "end": "</mark>",
                "maxNumFragments": 3
            }
        });

        let config = HighlightConfig::from_metadata(&metadata);
        assert_eq!(config.fields, vec!["title", "body"]);
        assert_eq!(config.start_marker, "<mark>");
        assert_eq!(config.end_marker, "</mark>");
        assert_eq!(config.max_fragments, 3);
    }

    #[test]
    fn test_from_metadata_partial() {
        let metadata = json!({ "highlight": { "fields": ["title"] } });

        let config = HighlightConfig::from_metadata(&metadata);
        assert_eq!(config.fields, vec!["title"]);
        assert_eq!(config.start_marker, "<B>");
        assert_eq!(config.end_marker, "</B>");
        assert_eq!(config.max_fragments, 2);
    }

    #[test]
    fn test_from_metadata_missing_highlight() {
        let metadata = json!({ "other": 1 });
        let config = HighlightConfig::from_metadata(&metadata);
        assert_eq!(config, HighlightConfig::default());
    }

    #[test]
    fn test_from_metadata_field_order_preserved() {
        let metadata = json!({ "highlight": { "fields": ["z", "a", "m"] } });
        let config = HighlightConfig::from_metadata(&metadata);
        assert_eq!(config.fields, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_from_metadata_malformed_values_fall_back() {
        let metadata = json!({
            "highlight": {
                "fields": "not-an-array",
                "maxNumFragments": "three"
            }
        });
        let config = HighlightConfig::from_metadata(&metadata);
        assert!(config.fields.is_empty());
        assert_eq!(config.max_fragments, 2);
    }
}
