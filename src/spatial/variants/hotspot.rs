//! Hotspot: clicking a token toggles its coordinate

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
        tokens: token_views(control, |t| (control.value.contains(&t.anchor.key()), None)),
        ..ViewState::default()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SpatialConfig;
    use crate::spatial::{ControlKind, Coord, Outcome, SpatialControl, Surface, SurfaceEvent, ValueSet};

    fn control() -> SpatialControl {
        SpatialControl::with_spots(
            "h",
            ControlKind::Hotspot,
            Surface::new(200, 100),
            &[Coord::new(20, 20), Coord::new(60, 20)],
            SpatialConfig::default(),
        )
    }

    #[test]
    fn test_click_toggles_token() {
        let mut c = control();
        assert_eq!(c.handle(&SurfaceEvent::Click(Coord::new(22, 18))), Outcome::Changed);
        assert_eq!(c.value(), &ValueSet::from_keys(["20,20"]));
        assert!(c.view().tokens[0].active);
        assert!(!c.view().tokens[1].active);

        assert_eq!(c.handle(&SurfaceEvent::Click(Coord::new(20, 20))), Outcome::Changed);
        assert!(c.value().is_empty());
        assert!(c.view().is_blank());
    }

    #[test]
    fn test_click_on_background_is_ignored() {
        let mut c = control();
        assert_eq!(c.handle(&SurfaceEvent::Click(Coord::new(150, 80))), Outcome::Ignored);
        assert!(c.value().is_empty());
    }
}
