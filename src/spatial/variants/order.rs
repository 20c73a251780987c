//! Order: clicking toggles a token; selected tokens are numbered by
//! their position in the value

use super::{hit_any_token, reset_nothing, toggle_token_at, token_views};
use crate::spatial::control::{Outcome, SpatialControl, VariantHooks};
use crate::spatial::state::SurfaceEvent;
use crate::spatial::view::ViewState;

pub(crate) static HOOKS: VariantHooks = VariantHooks {
    hit_test: hit_any_token,
    handle,
    on_commit,
    on_reset: reset_nothing,
};

fn handle(control: &mut SpatialControl, event: &SurfaceEvent) -> Outcome {
    match *event {
        SurfaceEvent::Click(point) => toggle_token_at(control, point),
        _ => Outcome::Ignored,
    }
}

fn on_commit(control: &SpatialControl) -> ViewState {
    ViewState {
        tokens: token_views(control, |t| match control.value.position(&t.anchor.key()) {
            Some(i) => (true, Some((i + 1).to_string())),
            None => (false, None),
        }),
        ..ViewState::default()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SpatialConfig;
    use crate::spatial::{ControlKind, Coord, SpatialControl, Surface, SurfaceEvent, ValueSet};
    use pretty_assertions::assert_eq;

    fn control() -> SpatialControl {
        SpatialControl::with_spots(
            "o",
            ControlKind::Order,
            Surface::new(300, 100),
            &[Coord::new(20, 50), Coord::new(100, 50), Coord::new(180, 50)],
            SpatialConfig::default(),
        )
    }

    #[test]
    fn test_labels_follow_click_order() {
        let mut c = control();
        c.handle(&SurfaceEvent::Click(Coord::new(180, 50)));
        c.handle(&SurfaceEvent::Click(Coord::new(20, 50)));
        assert_eq!(c.view().labels(), vec![Some("2"), None, Some("1")]);
    }

    #[test]
    fn test_deselect_renumbers_remaining() {
        let mut c = control();
        for x in [20, 100, 180] {
            c.handle(&SurfaceEvent::Click(Coord::new(x, 50)));
        }
        c.handle(&SurfaceEvent::Click(Coord::new(20, 50)));
        assert_eq!(c.value(), &ValueSet::from_keys(["100,50", "180,50"]));
        assert_eq!(c.view().labels(), vec![None, Some("1"), Some("2")]);
    }

    #[test]
    fn test_external_value_relabels() {
        let mut c = control();
        c.on_value_externally_changed(ValueSet::from_keys(["100,50", "20,50", "180,50"]));
        assert_eq!(c.view().labels(), vec![Some("2"), Some("1"), Some("3")]);
    }
}
