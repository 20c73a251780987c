//! Variant hook implementations

pub(crate) mod associate;
pub(crate) mod gap_match;
pub(crate) mod hotspot;
pub(crate) mod order;
pub(crate) mod position_object;
pub(crate) mod select_point;

use super::control::{Outcome, SpatialControl};
use super::coord::Coord;
use super::surface::{Token, TokenId};
use super::view::TokenView;

/// First token in document order whose footprint contains `point`
pub(crate) fn hit_any_token(control: &SpatialControl, point: Coord) -> Option<TokenId> {
    control
        .tokens
        .iter()
        .find(|t| control.footprint(t.anchor).contains(point))
        .map(|t| t.id)
}

pub(crate) fn hit_nothing(_: &SpatialControl, _: Coord) -> Option<TokenId> {
    None
}

pub(crate) fn reset_nothing(_: &mut SpatialControl) {}

/// Toggle the coordinate of the token under `point`
pub(crate) fn toggle_token_at(control: &mut SpatialControl, point: Coord) -> Outcome {
    let anchor = control
        .hit_test(point)
        .and_then(|id| control.token(id))
        .map(|t| t.anchor);
    match anchor {
        Some(anchor) => {
            control.value.toggle(&anchor.key());
            Outcome::Changed
        }
        None => Outcome::Ignored,
    }
}

/// Decorate every token with `(active, label)`
pub(crate) fn token_views(
    control: &SpatialControl,
    decorate: impl Fn(&Token) -> (bool, Option<String>),
) -> Vec<TokenView> {
    control
        .tokens
        .iter()
        .map(|token| {
            let (active, label) = decorate(token);
            TokenView {
                id: token.id,
                anchor: token.anchor,
                role: token.role,
                active,
                label,
            }
        })
        .collect()
}
