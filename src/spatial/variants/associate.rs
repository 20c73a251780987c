//! Associate: dragging from one token to another toggles a link between
//! them. A preview line follows the pointer while armed.

use super::{hit_any_token, token_views};
use crate::spatial::control::{Outcome, SpatialControl, VariantHooks};
use crate::spatial::coord::CoordPair;
use crate::spatial::state::{InteractionState, SurfaceEvent};
use crate::spatial::view::ViewState;

pub(crate) static HOOKS: VariantHooks = VariantHooks {
    hit_test: hit_any_token,
    handle,
    on_commit,
    on_reset,
};

fn handle(control: &mut SpatialControl, event: &SurfaceEvent) -> Outcome {
    match *event {
        SurfaceEvent::PointerDown(point) => {
            let Some(start) = control.hit_test(point) else {
                return Outcome::Ignored;
            };
            let Some(origin) = control.token(start).map(|t| t.anchor) else {
                return Outcome::Ignored;
            };
            control.state = InteractionState::Armed { start, origin };
            control.transient.preview = None;
            Outcome::Updated
        }
        SurfaceEvent::PointerMove(point) => match control.state {
            InteractionState::Armed { origin, .. } => {
                control.transient.preview = Some(CoordPair::new(origin, point));
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        },
        SurfaceEvent::PointerUp(point) => {
            let InteractionState::Armed { start, origin } = control.state else {
                return Outcome::Ignored;
            };
            let end = control
                .hit_test(point)
                .filter(|id| *id != start)
                .and_then(|id| control.token(id))
                .map(|t| t.anchor);
            control.end_gesture();
            match end {
                Some(end) => {
                    control.value.toggle_link(CoordPair::new(origin, end));
                    Outcome::Changed
                }
                None => {
                    tracing::debug!(control = %control.id, "association cancelled");
                    Outcome::Updated
                }
            }
        }
        _ => Outcome::Ignored,
    }
}

fn on_commit(control: &SpatialControl) -> ViewState {
    let links = control.value.pairs();
    ViewState {
        tokens: token_views(control, |t| {
            let linked = links
                .iter()
                .any(|l| l.start == t.anchor || l.end == t.anchor);
            (linked, None)
        }),
        links,
        ..ViewState::default()
    }
}

fn on_reset(control: &mut SpatialControl) {
    control.transient.preview = None;
}
