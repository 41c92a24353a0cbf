//! Folio core: the portfolio carousel engine and the collaborators around it.
//!
//! - [`carousel`]: auto-advancing, draggable strip with momentum.
//! - [`page`]: page controller owning the fetched items and the add form.
//! - [`store`]: `DocumentStore` implementations (memory, JSON file, Firestore).
//! - [`auth`]: in-process auth state and the login/authenticated gate.

pub mod auth;
pub mod carousel;
pub mod error;
pub mod page;
pub mod store;
pub mod view;

pub use auth::{AccessGate, AuthHub, GateView};
pub use carousel::{
    CarouselConfig, CarouselEngine, CarouselMessage, CarouselRuntime,
    CarouselSnapshot, ManualScheduler, StripLayout,
};
pub use error::{FolioError, Result};
pub use page::PortfolioPage;
pub use view::{CardView, CarouselView, FormToggle, LinkAction};
