//! Trait surfaces that describe the collaborators the portfolio page talks to.

pub mod auth;
pub mod store;

/// Frequently used contracts for UI and orchestration crates.
pub mod prelude {
    pub use super::auth::{AuthCallback, AuthProvider, AuthSubscription};
    pub use super::store::{DocumentStore, StoreError, StoreResult};
}
