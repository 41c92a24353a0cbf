//! Core data model definitions shared across Folio crates.
#![allow(missing_docs)]

pub mod draft;
pub mod item;
pub mod user;

pub use draft::{DraftError, NewPortfolioRecord, ProjectDraft};
pub use item::{ItemId, PortfolioItem, Screenshot};
pub use user::AuthUser;
