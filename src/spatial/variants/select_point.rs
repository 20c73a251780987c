//! Select-point: clicking the surface places a marker

use super::{hit_nothing, reset_nothing, token_views};
use crate::spatial::control::{Outcome, SpatialControl, VariantHooks};
use crate::spatial::state::SurfaceEvent;
use crate::spatial::view::ViewState;

pub(crate) static HOOKS: VariantHooks = VariantHooks {
    hit_test: hit_nothing,
    handle,
    on_commit,
    on_reset: reset_nothing,
};

fn handle(control: &mut SpatialControl, event: &SurfaceEvent) -> Outcome {
    let SurfaceEvent::Click(point) = *event else {
        return Outcome::Ignored;
    };
    if !control.surface.admits(&control.footprint(point)) {
        tracing::debug!(control = %control.id, %point, "placement rejected at surface edge");
        return Outcome::Ignored;
    }
    if control.value.insert(&point.key()) {
        Outcome::Changed
    } else {
        Outcome::Ignored
    }
}

fn on_commit(control: &SpatialControl) -> ViewState {
    ViewState {
        tokens: token_views(control, |_| (false, None)),
        markers: control.value.coords(),
        ..ViewState::default()
    }
}
