use folio_model::PortfolioItem;
use std::sync::Arc;

use super::scheduler::Ticket;

/// Input and scheduling events the carousel reacts to.
#[derive(Debug, Clone)]
pub enum CarouselMessage {
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    PointerUp,
    PointerLeave,
    TouchStart { x: f32 },
    TouchMove { x: f32 },
    TouchEnd,
    /// Recurring auto-advance timer fired.
    AutoAdvance(Ticket),
    /// Momentum animation frame fired.
    Frame(Ticket),
    /// A fetch completed with a new item list.
    ItemsReplaced(Arc<[PortfolioItem]>),
    /// Container width changed.
    Resized { viewport_width: f32 },
}
