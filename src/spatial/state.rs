//! Interaction states and surface events

use super::coord::{Coord, Offset};
use super::surface::TokenId;

/// Where a control is within a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// First endpoint captured, second awaited
    Armed { start: TokenId, origin: Coord },
    /// A token is in flight; `grab` is the cursor's offset from its anchor
    Dragging { token: TokenId, grab: Offset },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}

/// Pointer and drag events, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Click(Coord),
    PointerDown(Coord),
    PointerMove(Coord),
    PointerUp(Coord),
    DragStart(Coord),
    DragOver(Coord),
    Drop(Coord),
    DragEnd(Coord),
    /// The pointer left the surface
    Leave,
    /// The gesture was aborted (escape key, lost capture)
    Cancel,
}

impl SurfaceEvent {
    /// Build an event from its kebab-case name
    pub fn from_name(name: &str, at: Option<Coord>) -> Option<Self> {
        let event = match (name, at) {
            ("leave", _) => SurfaceEvent::Leave,
            ("cancel", _) => SurfaceEvent::Cancel,
            ("click", Some(p)) => SurfaceEvent::Click(p),
            ("pointer-down", Some(p)) => SurfaceEvent::PointerDown(p),
            ("pointer-move", Some(p)) => SurfaceEvent::PointerMove(p),
            ("pointer-up", Some(p)) => SurfaceEvent::PointerUp(p),
            ("drag-start", Some(p)) => SurfaceEvent::DragStart(p),
            ("drag-over", Some(p)) => SurfaceEvent::DragOver(p),
            ("drop", Some(p)) => SurfaceEvent::Drop(p),
            ("drag-end", Some(p)) => SurfaceEvent::DragEnd(p),
            _ => return None,
        };
        Some(event)
    }

    pub fn position(&self) -> Option<Coord> {
        match self {
            SurfaceEvent::Click(p)
            | SurfaceEvent::PointerDown(p)
            | SurfaceEvent::PointerMove(p)
            | SurfaceEvent::PointerUp(p)
            | SurfaceEvent::DragStart(p)
            | SurfaceEvent::DragOver(p)
            | SurfaceEvent::Drop(p)
            | SurfaceEvent::DragEnd(p) => Some(*p),
            SurfaceEvent::Leave | SurfaceEvent::Cancel => None,
        }
    }
}
