//! Spatial controls and variant dispatch
//!
//! Every control owns a surface, its tokens, a value and an interaction
//! state. Behavior that differs between variants lives in a
//! [`VariantHooks`] record selected by [`ControlKind`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::coord::{Coord, CoordPair, Footprint};
use super::state::{InteractionState, SurfaceEvent};
use super::surface::{Background, Surface, Token, TokenId, TokenRole};
use super::value::ValueSet;
use super::variants;
use super::view::ViewState;
use crate::config::SpatialConfig;
use crate::dom::Element;
use crate::error::WidgetError;

/// The closed set of spatial control variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    Hotspot,
    SelectPoint,
    Order,
    Associate,
    GapMatch,
    PositionObject,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Hotspot => "hotspot",
            ControlKind::SelectPoint => "select-point",
            ControlKind::Order => "order",
            ControlKind::Associate => "associate",
            ControlKind::GapMatch => "gap-match",
            ControlKind::PositionObject => "position-object",
        }
    }

    pub fn hooks(&self) -> &'static VariantHooks {
        match self {
            ControlKind::Hotspot => &variants::hotspot::HOOKS,
            ControlKind::SelectPoint => &variants::select_point::HOOKS,
            ControlKind::Order => &variants::order::HOOKS,
            ControlKind::Associate => &variants::associate::HOOKS,
            ControlKind::GapMatch => &variants::gap_match::HOOKS,
            ControlKind::PositionObject => &variants::position_object::HOOKS,
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlKind {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotspot" => Ok(ControlKind::Hotspot),
            "select-point" => Ok(ControlKind::SelectPoint),
            "order" => Ok(ControlKind::Order),
            "associate" => Ok(ControlKind::Associate),
            "gap-match" => Ok(ControlKind::GapMatch),
            "position-object" => Ok(ControlKind::PositionObject),
            other => Err(WidgetError::UnknownControlKind(other.to_string())),
        }
    }
}

/// Per-variant behavior
pub struct VariantHooks {
    /// Token under a point, if the variant reacts to tokens there
    pub hit_test: fn(&SpatialControl, Coord) -> Option<TokenId>,
    /// Apply one event to the state and value
    pub handle: fn(&mut SpatialControl, &SurfaceEvent) -> Outcome,
    /// Derive decorations from tokens and value
    pub on_commit: fn(&SpatialControl) -> ViewState,
    /// Drop gesture-only state
    pub on_reset: fn(&mut SpatialControl),
}

/// What handling an event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    /// Interaction state or gesture decorations changed
    Updated,
    /// The value changed and must be committed
    Changed,
}

/// Gesture-only decorations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transient {
    pub preview: Option<CoordPair>,
    pub hover: Option<TokenId>,
    /// Set while a native drag carrying a token is in progress
    pub drag_active: bool,
}

/// Declarative description of a control, as loaded from an exercise file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlSpec {
    pub kind: ControlKind,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: Option<String>,
    /// Clickable spots (hotspot, order, associate)
    #[serde(default)]
    pub coords: Vec<String>,
    /// Draggable tokens (gap-match, position-object)
    #[serde(default)]
    pub sources: Vec<String>,
    /// Drop targets (gap-match)
    #[serde(default)]
    pub gaps: Vec<String>,
}

/// A spatial input control
#[derive(Debug, Clone)]
pub struct SpatialControl {
    pub(crate) id: String,
    pub(crate) kind: ControlKind,
    pub(crate) surface: Surface,
    pub(crate) tokens: Vec<Token>,
    pub(crate) config: SpatialConfig,
    pub(crate) value: ValueSet,
    pub(crate) state: InteractionState,
    pub(crate) transient: Transient,
    view: ViewState,
}

impl SpatialControl {
    /// Create a control; tokens are given as `(anchor, role)` in document order
    pub fn new(
        id: impl Into<String>,
        kind: ControlKind,
        surface: Surface,
        tokens: impl IntoIterator<Item = (Coord, TokenRole)>,
        config: SpatialConfig,
    ) -> Self {
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(i, (anchor, role))| Token::new(TokenId(i), anchor, role))
            .collect();
        let mut control = Self {
            id: id.into(),
            kind,
            surface,
            tokens,
            config,
            value: ValueSet::new(),
            state: InteractionState::Idle,
            transient: Transient::default(),
            view: ViewState::default(),
        };
        control.refresh_view();
        control
    }

    /// Spots only
    pub fn with_spots(
        id: impl Into<String>,
        kind: ControlKind,
        surface: Surface,
        coords: &[Coord],
        config: SpatialConfig,
    ) -> Self {
        Self::new(
            id,
            kind,
            surface,
            coords.iter().map(|c| (*c, TokenRole::Spot)),
            config,
        )
    }

    pub fn from_spec(
        id: impl Into<String>,
        spec: &ControlSpec,
        config: SpatialConfig,
    ) -> Result<Self, WidgetError> {
        let parse = |keys: &[String], role: TokenRole| -> Result<Vec<(Coord, TokenRole)>, WidgetError> {
            keys.iter()
                .map(|k| k.parse::<Coord>().map(|c| (c, role)).map_err(WidgetError::from))
                .collect()
        };
        let mut tokens = parse(&spec.coords, TokenRole::Spot)?;
        tokens.extend(parse(&spec.sources, TokenRole::Source)?);
        tokens.extend(parse(&spec.gaps, TokenRole::Gap)?);

        let mut surface = Surface::new(spec.width, spec.height);
        if let Some(url) = &spec.background {
            surface = surface.with_background(Background::Url(url.clone()));
        }
        Ok(Self::new(id, spec.kind, surface, tokens, config))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn set_background(&mut self, background: Background) {
        self.surface.background = Some(background);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0)
    }

    pub fn value(&self) -> &ValueSet {
        &self.value
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Footprint of a token anchored at `anchor`
    pub fn footprint(&self, anchor: Coord) -> Footprint {
        Footprint::new(anchor, self.config.token_width, self.config.token_height)
    }

    /// First token in document order whose footprint contains `point`
    pub fn hit_test(&self, point: Coord) -> Option<TokenId> {
        (self.kind.hooks().hit_test)(self, point)
    }

    /// First token with `role` whose footprint contains `point`
    pub fn hit_role(&self, point: Coord, role: TokenRole) -> Option<TokenId> {
        self.hit_test(point)
            .filter(|id| self.token(*id).map(|t| t.role) == Some(role))
    }

    /// Apply one event. Leave and cancel return to idle and discard gesture
    /// decorations without touching the value.
    pub fn handle(&mut self, event: &SurfaceEvent) -> Outcome {
        let outcome = match event {
            SurfaceEvent::Leave | SurfaceEvent::Cancel => self.cancel_gesture(),
            _ => (self.kind.hooks().handle)(self, event),
        };
        if outcome != Outcome::Ignored {
            self.refresh_view();
        }
        outcome
    }

    /// Adopt a value pushed from outside and re-derive the view from it.
    ///
    /// A value equal to the current one leaves an ongoing gesture alone;
    /// a different value ends it.
    pub fn on_value_externally_changed(&mut self, value: ValueSet) {
        if value != self.value {
            self.end_gesture();
            self.value = value;
        }
        self.refresh_view();
    }

    /// Clear the value and every decoration
    pub fn reset(&mut self) -> Outcome {
        let had_value = !self.value.is_empty();
        self.value.clear();
        self.end_gesture();
        self.refresh_view();
        if had_value {
            Outcome::Changed
        } else {
            Outcome::Updated
        }
    }

    /// Render the surface with background, tokens and decorations
    pub fn render(&self) -> Element {
        let mut root = self
            .view
            .render(&self.surface, &self.config, self.kind.as_str());
        root.set_attr("data-control-id", self.id.clone());
        root
    }

    /// Take a value read from the host right before mutating it
    pub(crate) fn adopt_value(&mut self, value: ValueSet) {
        if value != self.value {
            self.value = value;
            self.refresh_view();
        }
    }

    pub(crate) fn end_gesture(&mut self) {
        self.state = InteractionState::Idle;
        (self.kind.hooks().on_reset)(self);
    }

    fn cancel_gesture(&mut self) -> Outcome {
        let active = !self.state.is_idle() || self.transient != Transient::default();
        self.end_gesture();
        if active {
            tracing::debug!(control = %self.id, kind = %self.kind, "gesture cancelled");
            Outcome::Updated
        } else {
            Outcome::Ignored
        }
    }

    fn refresh_view(&mut self) {
        let mut view = (self.kind.hooks().on_commit)(self);
        view.preview = self.transient.preview;
        view.highlight = self.transient.hover;
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        for kind in [
            ControlKind::Hotspot,
            ControlKind::SelectPoint,
            ControlKind::Order,
            ControlKind::Associate,
            ControlKind::GapMatch,
            ControlKind::PositionObject,
        ] {
            assert_eq!(kind.as_str().parse::<ControlKind>().ok(), Some(kind));
        }
        assert!(matches!(
            "slider".parse::<ControlKind>(),
            Err(WidgetError::UnknownControlKind(_))
        ));
    }

    #[test]
    fn test_hit_test_prefers_document_order() {
        let control = SpatialControl::with_spots(
            "c",
            ControlKind::Hotspot,
            Surface::new(100, 100),
            &[Coord::new(20, 20), Coord::new(25, 25)],
            SpatialConfig::default(),
        );
        assert_eq!(control.hit_test(Coord::new(24, 24)), Some(TokenId(0)));
        assert_eq!(control.hit_test(Coord::new(35, 35)), Some(TokenId(1)));
        assert_eq!(control.hit_test(Coord::new(90, 90)), None);
    }

    #[test]
    fn test_from_spec_assigns_roles() {
        let spec: ControlSpec = toml::from_str(
            r#"
kind = "gap-match"
width = 200
height = 100
sources = ["20,20"]
gaps = ["100,50", "150,50"]
"#,
        )
        .expect("spec");
        let control = SpatialControl::from_spec("g", &spec, SpatialConfig::default()).expect("control");
        let roles: Vec<TokenRole> = control.tokens().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![TokenRole::Source, TokenRole::Gap, TokenRole::Gap]);
    }

    #[test]
    fn test_from_spec_rejects_bad_coords() {
        let spec = ControlSpec {
            kind: ControlKind::Hotspot,
            width: 10,
            height: 10,
            background: None,
            coords: vec!["1;2".to_string()],
            sources: Vec::new(),
            gaps: Vec::new(),
        };
        assert!(matches!(
            SpatialControl::from_spec("h", &spec, SpatialConfig::default()),
            Err(WidgetError::Coord(_))
        ));
    }

    #[test]
    fn test_leave_when_idle_is_ignored() {
        let mut control = SpatialControl::with_spots(
            "c",
            ControlKind::Associate,
            Surface::new(100, 100),
            &[Coord::new(20, 20)],
            SpatialConfig::default(),
        );
        assert_eq!(control.handle(&SurfaceEvent::Leave), Outcome::Ignored);
    }

    #[test]
    fn test_render_carries_id() {
        let control = SpatialControl::with_spots(
            "spot",
            ControlKind::Hotspot,
            Surface::new(10, 10),
            &[],
            SpatialConfig::default(),
        );
        assert_eq!(control.render().attr("data-control-id"), Some("spot"));
    }
}
