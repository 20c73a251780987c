//! Background surfaces and tokens

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::coord::{Coord, Footprint};

/// Background image of a control surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Url(String),
    Image { mime: String, bytes: Vec<u8> },
}

impl Background {
    /// Value for an `img` `src` attribute; image bytes become a `data:` URI
    pub fn src(&self) -> String {
        match self {
            Background::Url(url) => url.clone(),
            Background::Image { mime, bytes } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
        }
    }

    /// Guess the MIME type of an image file from its extension
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// A fixed-size area in which tokens are placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub background: Option<Background>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Whether a footprint lies entirely on the surface
    pub fn admits(&self, footprint: &Footprint) -> bool {
        footprint.within(self.width, self.height)
    }
}

/// Index of a token in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

/// What a token is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    /// Clickable spot
    Spot,
    /// Draggable source
    Source,
    /// Drop target
    Gap,
}

impl TokenRole {
    pub fn class(&self) -> &'static str {
        match self {
            TokenRole::Spot => "spot",
            TokenRole::Source => "source",
            TokenRole::Gap => "gap",
        }
    }
}

/// A positioned token, centered on its anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub anchor: Coord,
    pub role: TokenRole,
}

impl Token {
    pub fn new(id: TokenId, anchor: Coord, role: TokenRole) -> Self {
        Self { id, anchor, role }
    }
}
