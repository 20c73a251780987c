//! Spatial interaction engine
//!
//! Six controls share one model: a fixed-size surface, tokens positioned on
//! it, a value made of canonical coordinate strings, and an interaction
//! state driven by pointer and drag events.
//!
//! | Kind | Gesture | Value effect |
//! |---|---|---|
//! | hotspot | click a token | toggle its coordinate |
//! | select-point | click the surface | append the point |
//! | order | click a token | toggle; labels show the position |
//! | associate | press on a token, release on another | toggle the pair |
//! | gap-match | drag a source onto a gap | append the gap |
//! | position-object | drag a token anywhere | append its new anchor |
//!
//! Decorations are always re-derived from the tokens and the value, so a
//! control can be redrawn from those two alone.

mod control;
mod coord;
mod state;
mod surface;
mod value;
mod variants;
mod view;
mod widget;

pub use control::{ControlKind, ControlSpec, Outcome, SpatialControl, Transient, VariantHooks};
pub use coord::{BoundingBox, Coord, CoordPair, Footprint, Offset};
pub use state::{InteractionState, SurfaceEvent};
pub use surface::{Background, Surface, Token, TokenId, TokenRole};
pub use value::ValueSet;
pub use view::{TokenView, ViewState};
pub use widget::{SpatialWidget, VALUE_KEY};
