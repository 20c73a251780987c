//! Gap-match: a source token dragged onto a gap fills that gap

use super::{hit_any_token, token_views};
use crate::spatial::control::{Outcome, SpatialControl, VariantHooks};
use crate::spatial::coord::Offset;
use crate::spatial::state::{InteractionState, SurfaceEvent};
use crate::spatial::surface::TokenRole;
use crate::spatial::view::ViewState;

pub(crate) static HOOKS: VariantHooks = VariantHooks {
    hit_test: hit_any_token,
    handle,
    on_commit,
    on_reset,
};

/// Drag-over and drop only count while a drag started on a source
fn carrying(control: &SpatialControl) -> bool {
    control.transient.drag_active && matches!(control.state, InteractionState::Dragging { .. })
}

fn handle(control: &mut SpatialControl, event: &SurfaceEvent) -> Outcome {
    match *event {
        SurfaceEvent::DragStart(point) => match control.hit_role(point, TokenRole::Source) {
            Some(token) => {
                control.state = InteractionState::Dragging {
                    token,
                    grab: Offset::default(),
                };
                control.transient.drag_active = true;
                Outcome::Updated
            }
            None => Outcome::Ignored,
        },
        SurfaceEvent::DragOver(point) => {
            if !carrying(control) {
                return Outcome::Ignored;
            }
            let hover = control.hit_role(point, TokenRole::Gap);
            if hover == control.transient.hover {
                return Outcome::Ignored;
            }
            control.transient.hover = hover;
            Outcome::Updated
        }
        SurfaceEvent::Drop(point) => {
            if !carrying(control) {
                return Outcome::Ignored;
            }
            let gap = control
                .hit_role(point, TokenRole::Gap)
                .and_then(|id| control.token(id))
                .map(|t| t.anchor);
            control.end_gesture();
            match gap {
                Some(anchor) if control.value.insert(&anchor.key()) => Outcome::Changed,
                Some(_) => Outcome::Updated,
                None => {
                    tracing::debug!(control = %control.id, %point, "drop outside any gap");
                    Outcome::Updated
                }
            }
        }
        SurfaceEvent::DragEnd(_) => {
            if control.state.is_idle() && !control.transient.drag_active {
                return Outcome::Ignored;
            }
            control.end_gesture();
            Outcome::Updated
        }
        _ => Outcome::Ignored,
    }
}

fn on_commit(control: &SpatialControl) -> ViewState {
    ViewState {
        tokens: token_views(control, |t| match t.role {
            TokenRole::Gap => (control.value.contains(&t.anchor.key()), None),
            _ => (true, None),
        }),
        ..ViewState::default()
    }
}

fn on_reset(control: &mut SpatialControl) {
    control.transient.hover = None;
    control.transient.drag_active = false;
}
