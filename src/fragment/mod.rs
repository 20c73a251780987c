//! Fragments and the field registry
//!
//! Hosts push formatted values as MIME bundles and input controls as
//! handles. The [`FieldRegistry`] turns both into [`Fragment`]s that the
//! compositor resolves by field name.

mod bundle;
mod registry;

pub use bundle::{MimeBundle, TEXT_LATEX, TEXT_MARKDOWN, TEXT_PLAIN};
pub use registry::{FieldRegistry, Fragment};
