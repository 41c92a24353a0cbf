pub mod store;

pub use store::StoreConfig;

use folio_core::carousel::{CarouselConfig, StripLayout};
use folio_model::AuthUser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FolioConfig {
    pub carousel: CarouselConfig,
    pub layout: LayoutConfig,
    pub store: StoreConfig,
    pub auth: AuthSettings,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub metadata: ConfigMetadata,
}

/// Geometry of the headless strip used by `folioctl play`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport_width: f32,
    pub item_width: f32,
    pub item_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 360.0,
            item_width: 280.0,
            item_spacing: 16.0,
        }
    }
}

impl LayoutConfig {
    pub fn strip(&self) -> StripLayout {
        StripLayout::new(self.viewport_width, self.item_width, self.item_spacing)
    }
}

/// Identity the CLI acts as. Unset means signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    pub uid: Option<String>,
    pub email: Option<String>,
}

impl AuthSettings {
    pub fn user(&self) -> Option<AuthUser> {
        let uid = self.uid.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let user = AuthUser::new(uid);
        Some(match &self.email {
            Some(email) => user.with_email(email.clone()),
            None => user,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

/// Source that produced the file-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::EnvPath(path)
            | ConfigSource::File(path) => Some(path),
            ConfigSource::Default | ConfigSource::EnvInline => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub source: ConfigSource,
    pub env_file_loaded: bool,
}
