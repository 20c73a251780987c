//! View state derived from tokens and value, and its DOM rendering

use super::coord::{Coord, CoordPair, Footprint};
use super::surface::{Surface, TokenId, TokenRole};
use crate::config::SpatialConfig;
use crate::dom::Element;

/// Decoration of one token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenView {
    pub id: TokenId,
    pub anchor: Coord,
    pub role: TokenRole,
    /// Part of the current value
    pub active: bool,
    pub label: Option<String>,
}

/// Everything drawn on a surface.
///
/// `tokens`, `markers` and `links` are derived from the value alone;
/// `preview` and `highlight` belong to an ongoing gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub tokens: Vec<TokenView>,
    /// Placed points (select-point, position-object)
    pub markers: Vec<Coord>,
    /// Drawn associations
    pub links: Vec<CoordPair>,
    pub preview: Option<CoordPair>,
    pub highlight: Option<TokenId>,
}

impl ViewState {
    pub fn token(&self, id: TokenId) -> Option<&TokenView> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Labels of all tokens in document order
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.tokens.iter().map(|t| t.label.as_deref()).collect()
    }

    /// Whether nothing but undecorated tokens is shown
    pub fn is_blank(&self) -> bool {
        self.markers.is_empty()
            && self.links.is_empty()
            && self.preview.is_none()
            && self.highlight.is_none()
            && self.tokens.iter().all(|t| !t.active && t.label.is_none())
    }

    /// Render into a container sized to the surface
    pub fn render(&self, surface: &Surface, config: &SpatialConfig, kind: &str) -> Element {
        let mut root = Element::new("div")
            .with_class("spatial")
            .with_class(kind)
            .with_attr(
                "style",
                format!(
                    "position: relative; width: {}px; height: {}px;",
                    surface.width, surface.height
                ),
            );

        if let Some(background) = &surface.background {
            root.append(
                Element::new("img")
                    .with_class("background")
                    .with_attr("src", background.src())
                    .with_attr("width", surface.width.to_string())
                    .with_attr("height", surface.height.to_string())
                    .with_attr("draggable", "false"),
            );
        }

        if !self.links.is_empty() || self.preview.is_some() {
            let mut svg = Element::new("svg")
                .with_class("links")
                .with_attr("width", surface.width.to_string())
                .with_attr("height", surface.height.to_string());
            for link in &self.links {
                svg.append(line(link, "link"));
            }
            if let Some(preview) = &self.preview {
                svg.append(line(preview, "preview"));
            }
            root.append(svg);
        }

        for token in &self.tokens {
            let opacity = if token.active {
                config.active_opacity
            } else {
                config.idle_opacity
            };
            let mut el = positioned(token.anchor, config, opacity)
                .with_class("token")
                .with_class(token.role.class());
            el.set_class("active", token.active);
            el.set_class("highlight", self.highlight == Some(token.id));
            if let Some(label) = &token.label {
                el.set_text_content(label);
            }
            root.append(el);
        }

        for marker in &self.markers {
            root.append(positioned(*marker, config, config.active_opacity).with_class("marker"));
        }

        root
    }
}

fn positioned(anchor: Coord, config: &SpatialConfig, opacity: f32) -> Element {
    let bounds = Footprint::new(anchor, config.token_width, config.token_height).bounds();
    Element::new("div")
        .with_attr("data-coord", anchor.key())
        .with_attr(
            "style",
            format!(
                "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; opacity: {};",
                bounds.x, bounds.y, bounds.width, bounds.height, opacity
            ),
        )
}

fn line(pair: &CoordPair, class: &str) -> Element {
    Element::new("line")
        .with_class(class)
        .with_attr("x1", pair.start.x.to_string())
        .with_attr("y1", pair.start.y.to_string())
        .with_attr("x2", pair.end.x.to_string())
        .with_attr("y2", pair.end.y.to_string())
}
