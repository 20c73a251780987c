//! MIME bundles: alternative representations of one value

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_MARKDOWN: &str = "text/markdown";
pub const TEXT_LATEX: &str = "text/latex";

/// Representations of a value keyed by MIME type, plus metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MimeBundle {
    pub data: BTreeMap<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl MimeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle holding only `text/plain`
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new().with(TEXT_PLAIN, Value::String(text.into()))
    }

    /// A bundle holding only `text/markdown`
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new().with(TEXT_MARKDOWN, Value::String(source.into()))
    }

    pub fn with(mut self, mime: &str, content: Value) -> Self {
        self.data.insert(mime.to_string(), content);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Build a bundle from display data produced for a value.
    ///
    /// When LaTeX is available the plain representation is replaced by the
    /// bare LaTeX source, so it can be substituted straight into math.
    pub fn from_display(data: BTreeMap<String, Value>) -> Self {
        let mut bundle = Self {
            data,
            metadata: Map::new(),
        };
        let latex = bundle
            .get_str(TEXT_LATEX)
            .map(|s| s.trim_matches(|c| c == ' ' || c == '$').to_string());
        if let Some(latex) = latex {
            bundle.data.insert(TEXT_PLAIN.to_string(), Value::String(latex));
        }
        bundle
    }

    /// Decode the wire shape `[data, metadata]`; `[]` and anything
    /// malformed mean "no bundle"
    pub fn from_wire(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        let data = items.first()?.as_object()?;
        let metadata = items
            .get(1)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Some(Self {
            data: data.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            metadata,
        })
    }

    pub fn to_wire(&self) -> Value {
        let data: Map<String, Value> = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Value::Array(vec![Value::Object(data), Value::Object(self.metadata.clone())])
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.data.contains_key(mime)
    }

    /// Content for `mime` as text. Line arrays are joined.
    pub fn get_str(&self, mime: &str) -> Option<String> {
        match self.data.get(mime)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(lines) => Some(
                lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .concat(),
            ),
            _ => None,
        }
    }

    /// The plain-text representation, empty if there is none
    pub fn plain_text(&self) -> String {
        self.get_str(TEXT_PLAIN).unwrap_or_default()
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
