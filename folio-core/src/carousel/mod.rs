//! Interactive carousel
//!
//! A horizontally scrolling strip that auto-advances on a timer, pans under
//! pointer/touch drag, and glides with decaying momentum after release. The
//! engine is a plain state machine over two seams: a [`ScrollSurface`] (the
//! container being scrolled) and a [`Scheduler`] (timer and frame source).
//! [`runtime::CarouselRuntime`] wires it to tokio.

pub mod config;
pub mod engine;
pub mod messages;
pub mod mode;
pub mod runtime;
pub mod scheduler;
pub mod surface;
pub mod update;

// Re-export primary types for convenience
pub use config::CarouselConfig;
pub use engine::{BoxedSurface, CarouselEngine, CarouselSnapshot};
pub use messages::CarouselMessage;
pub use mode::{CarouselMode, DragState, ModeKind};
pub use runtime::{CarouselRuntime, RuntimeError, TokioScheduler};
pub use scheduler::{
    ManualScheduler, Scheduler, TaskHandle, TaskKind, Ticket, TicketMint,
};
pub use surface::{ScrollBehavior, ScrollSurface, StripLayout};
pub use update::update;
