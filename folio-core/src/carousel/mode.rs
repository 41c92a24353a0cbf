//! Interaction modes of the carousel engine.

use serde::Serialize;

/// Drag bookkeeping captured on pointer-down / touch-start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Pointer x at drag start.
    pub start_x: f32,
    /// Container scroll offset at drag start.
    pub baseline: f32,
    /// Most recent per-event scroll displacement.
    pub velocity: f32,
}

/// The three mutually exclusive modes. Each variant only carries the fields
/// meaningful while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CarouselMode {
    /// Timer-driven auto-advance (also the idle mode when nothing can run).
    #[default]
    Auto,
    Dragging(DragState),
    Momentum { velocity: f32 },
}

/// Payload-free discriminant, handy for snapshots and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Auto,
    Dragging,
    Momentum,
}

impl CarouselMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            CarouselMode::Auto => ModeKind::Auto,
            CarouselMode::Dragging(_) => ModeKind::Dragging,
            CarouselMode::Momentum { .. } => ModeKind::Momentum,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, CarouselMode::Dragging(_))
    }

    /// Velocity if the mode tracks one.
    pub fn velocity(&self) -> Option<f32> {
        match self {
            CarouselMode::Auto => None,
            CarouselMode::Dragging(drag) => Some(drag.velocity),
            CarouselMode::Momentum { velocity } => Some(*velocity),
        }
    }
}
