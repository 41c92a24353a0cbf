use thiserror::Error;

use super::models::{FolioConfig, StoreConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigGuardRailError {
    #[error("carousel.{field} {reason}")]
    InvalidCarousel { field: &'static str, reason: String },
    #[error("layout.{field} must be a positive width, got {value}")]
    InvalidLayout { field: &'static str, value: f32 },
    #[error("firestore store requires a non-empty project_id")]
    MissingFirestoreProject,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

pub fn apply_guard_rails(
    config: &FolioConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();
    let carousel = &config.carousel;

    if !(carousel.decay > 0.0 && carousel.decay < 1.0) {
        return Err(ConfigGuardRailError::InvalidCarousel {
            field: "decay",
            reason: format!("must be strictly between 0 and 1, got {}", carousel.decay),
        });
    }
    if !(carousel.min_velocity.is_finite() && carousel.min_velocity > 0.0) {
        return Err(ConfigGuardRailError::InvalidCarousel {
            field: "min_velocity",
            reason: format!("must be positive, got {}", carousel.min_velocity),
        });
    }
    if !(carousel.drag_gain.is_finite() && carousel.drag_gain > 0.0) {
        return Err(ConfigGuardRailError::InvalidCarousel {
            field: "drag_gain",
            reason: format!("must be finite and positive, got {}", carousel.drag_gain),
        });
    }
    if carousel.auto_advance_ms == 0 {
        return Err(ConfigGuardRailError::InvalidCarousel {
            field: "auto_advance_ms",
            reason: "must be greater than zero".into(),
        });
    }
    if carousel.frame_ms == 0 {
        return Err(ConfigGuardRailError::InvalidCarousel {
            field: "frame_ms",
            reason: "must be greater than zero".into(),
        });
    }

    let layout = &config.layout;
    for (field, value) in [
        ("viewport_width", layout.viewport_width),
        ("item_width", layout.item_width),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigGuardRailError::InvalidLayout { field, value });
        }
    }
    if !(layout.item_spacing.is_finite() && layout.item_spacing >= 0.0) {
        return Err(ConfigGuardRailError::InvalidLayout {
            field: "item_spacing",
            value: layout.item_spacing,
        });
    }

    if let StoreConfig::Firestore(firestore) = &config.store {
        if firestore.project_id.trim().is_empty() {
            return Err(ConfigGuardRailError::MissingFirestoreProject);
        }
        if firestore.api_key.is_none() {
            warnings.push_with_hint(
                "firestore store has no api_key; requests rely on open security rules",
                "Set store.api_key to the web API key of the project",
            );
        }
    }

    if carousel.frame_ms > carousel.auto_advance_ms {
        warnings.push(format!(
            "carousel.frame_ms ({}) exceeds auto_advance_ms ({}); glides will look choppy",
            carousel.frame_ms, carousel.auto_advance_ms
        ));
    }

    if config.auth.user().is_none() {
        warnings.push_with_hint(
            "no auth user configured; adding projects is disabled",
            "Set auth.uid in the config file or FOLIO_AUTH_UID",
        );
    }

    Ok(warnings)
}
