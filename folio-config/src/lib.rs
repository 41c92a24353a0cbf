//! Shared configuration library for Folio.
//!
//! Loads [`FolioConfig`] from `.env`, environment variables and TOML/JSON
//! files, enforces guard rails on the carousel tuning, and installs the
//! `tracing` subscriber used by the binaries.

pub mod loader;
pub mod logging;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    AuthSettings, ConfigMetadata, ConfigSource, FolioConfig, LayoutConfig,
    LoggingConfig, StoreConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
