//! Field registry mapping field names to renderable fragments

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::bundle::MimeBundle;
use crate::input::ControlHandle;

/// A named, independently updatable piece of renderable content
#[derive(Clone)]
pub enum Fragment {
    /// A formatted value
    Formatted(MimeBundle),
    /// A live input control
    Control(ControlHandle),
}

impl Fragment {
    /// Plain text usable inside LaTeX; controls have none
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Fragment::Formatted(bundle) => Some(bundle.plain_text()),
            Fragment::Control(_) => None,
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self, Fragment::Control(_))
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Formatted(bundle) => f.debug_tuple("Formatted").field(bundle).finish(),
            Fragment::Control(handle) => f
                .debug_tuple("Control")
                .field(&handle.control_id())
                .finish(),
        }
    }
}

/// Registry of fragments available to one template.
///
/// The registry is rebuilt wholesale whenever the host changes its fields;
/// there is no incremental update.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, Fragment>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from formatted values and controls.
    ///
    /// A control shadows a formatted value of the same name.
    pub fn rebuild<B, C>(bundles: B, controls: C) -> Self
    where
        B: IntoIterator<Item = (String, MimeBundle)>,
        C: IntoIterator<Item = (String, ControlHandle)>,
    {
        let mut fields: HashMap<String, Fragment> = bundles
            .into_iter()
            .map(|(name, bundle)| (name, Fragment::Formatted(bundle)))
            .collect();
        for (name, handle) in controls {
            if fields.insert(name.clone(), Fragment::Control(handle)).is_some() {
                tracing::warn!(field = %name, "control shadows formatted field");
            }
        }
        Self { fields }
    }

    /// Build a registry of formatted values from the host wire shape
    /// `{name: [data, metadata]}`
    pub fn from_host_value(value: &Value) -> Self {
        let Some(entries) = value.as_object() else {
            tracing::warn!("field mapping is not an object, using an empty registry");
            return Self::default();
        };
        let bundles = entries.iter().filter_map(|(name, wire)| {
            match MimeBundle::from_wire(wire) {
                Some(bundle) => Some((name.clone(), bundle)),
                None => {
                    tracing::warn!(field = %name, "skipping malformed field bundle");
                    None
                }
            }
        });
        Self::rebuild(bundles, std::iter::empty())
    }

    /// A copy of this registry with `controls` added
    pub fn with_controls<C>(&self, controls: C) -> Self
    where
        C: IntoIterator<Item = (String, ControlHandle)>,
    {
        let bundles = self.fields.iter().filter_map(|(name, fragment)| match fragment {
            Fragment::Formatted(bundle) => Some((name.clone(), bundle.clone())),
            Fragment::Control(_) => None,
        });
        let existing = self.fields.iter().filter_map(|(name, fragment)| match fragment {
            Fragment::Control(handle) => Some((name.clone(), handle.clone())),
            Fragment::Formatted(_) => None,
        });
        let controls: Vec<(String, ControlHandle)> = existing.chain(controls).collect();
        Self::rebuild(bundles, controls)
    }

    pub fn resolve(&self, name: &str) -> Option<&Fragment> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
