//! Position-object: a draggable token is dropped anywhere on the surface.
//! The placed anchor keeps the offset at which the token was grabbed.

use super::{hit_any_token, reset_nothing, token_views};
use crate::spatial::control::{Outcome, SpatialControl, VariantHooks};
use crate::spatial::state::{InteractionState, SurfaceEvent};
use crate::spatial::surface::TokenRole;
use crate::spatial::view::ViewState;

pub(crate) static HOOKS: VariantHooks = VariantHooks {
    hit_test: hit_any_token,
    handle,
    on_commit,
    on_reset: reset_nothing,
};

fn handle(control: &mut SpatialControl, event: &SurfaceEvent) -> Outcome {
    match *event {
        SurfaceEvent::PointerDown(point) => {
            let grabbed = control
                .hit_role(point, TokenRole::Source)
                .and_then(|id| control.token(id))
                .map(|t| (t.id, point.offset_from(t.anchor)));
            match grabbed {
                Some((token, grab)) => {
                    control.state = InteractionState::Dragging { token, grab };
                    Outcome::Updated
                }
                None => Outcome::Ignored,
            }
        }
        SurfaceEvent::DragEnd(point) => {
            let InteractionState::Dragging { grab, .. } = control.state else {
                return Outcome::Ignored;
            };
            control.end_gesture();
            let anchor = point.minus(grab);
            if !control.surface.admits(&control.footprint(anchor)) {
                tracing::debug!(control = %control.id, %anchor, "placement rejected at surface edge");
                return Outcome::Updated;
            }
            if control.value.insert(&anchor.key()) {
                Outcome::Changed
            } else {
                Outcome::Updated
            }
        }
        // Released without dragging
        SurfaceEvent::PointerUp(_) if !control.state.is_idle() => {
            control.end_gesture();
            Outcome::Updated
        }
        _ => Outcome::Ignored,
    }
}

fn on_commit(control: &SpatialControl) -> ViewState {
    ViewState {
        tokens: token_views(control, |_| (true, None)),
        markers: control.value.coords(),
        ..ViewState::default()
    }
}
