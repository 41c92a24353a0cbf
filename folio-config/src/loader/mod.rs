pub mod error;

use anyhow::anyhow;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use self::error::ConfigLoadError;
use super::models::{ConfigMetadata, ConfigSource, FolioConfig};
use super::validation::{self, ConfigWarnings};

pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "FOLIO_CONFIG_JSON";
pub const AUTH_UID_ENV: &str = "FOLIO_AUTH_UID";
pub const AUTH_EMAIL_ENV: &str = "FOLIO_AUTH_EMAIL";

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &[
    "folio.toml",
    "folio.json",
    "config/folio.toml",
    "config/folio.json",
];

/// Validated configuration plus the non-fatal findings from guard rails.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: FolioConfig,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Directory the default file candidates are resolved against.
    pub search_root: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_search_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.search_root = Some(path.into());
        self
    }

    /// Evaluation order:
    /// 1) `.env` (or the configured env file) is loaded into the process,
    /// 2) an explicit `--config` path,
    /// 3) `$FOLIO_CONFIG_PATH` (TOML or JSON file),
    /// 4) `$FOLIO_CONFIG_JSON` (inline JSON),
    /// 5) the first default file that exists,
    /// 6) defaults.
    ///
    /// `$FOLIO_AUTH_UID` / `$FOLIO_AUTH_EMAIL` override the file's auth user.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let (mut config, source) = self.resolve_source()?;

        if let Some(uid) = non_empty_env(AUTH_UID_ENV) {
            config.auth.uid = Some(uid);
        }
        if let Some(email) = non_empty_env(AUTH_EMAIL_ENV) {
            config.auth.email = Some(email);
        }

        debug!(source = ?source, env_file_loaded, "folio configuration resolved");
        config.metadata = ConfigMetadata {
            source,
            env_file_loaded,
        };

        let warnings = validation::apply_guard_rails(&config)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        Ok(loaded.or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(err),
        })?)
    }

    fn resolve_source(
        &self,
    ) -> Result<(FolioConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            if !path.exists() {
                return Err(ConfigLoadError::MissingConfig { path: path.clone() });
            }
            let config = Self::load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(path_str) = non_empty_env(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = non_empty_env(CONFIG_JSON_ENV) {
            let config = serde_json::from_str(&raw)
                .map_err(ConfigLoadError::InlineJson)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((FolioConfig::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> Result<FolioConfig, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let parse_err = |source: anyhow::Error| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .map_err(|err| parse_err(err.into())),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| parse_err(err.into()))
            }
            _ => Self::parse_from_str(&contents).map_err(parse_err),
        }
    }

    /// Try TOML first, then JSON.
    pub fn parse_from_str(contents: &str) -> anyhow::Result<FolioConfig> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!("toml error: {toml_err}; json error: {json_err}")
            })
        })
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let root = self
            .options
            .search_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
