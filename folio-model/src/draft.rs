use chrono::{DateTime, Utc};
use std::fmt::{self, Display};
use url::Url;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::item::{ItemId, PortfolioItem, Screenshot};

const SCREENSHOT_TITLE: &str = "Screenshot";

/// Raw field values captured by the "Add New Project" form.
///
/// `tech` and `screenshots` are comma separated, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub details: String,
    pub image: String,
    pub tech: String,
    pub screenshots: String,
    pub url: String,
    pub github: String,
}

/// Errors produced while turning a draft into a storable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    MissingField(&'static str),
    InvalidUrl { field: &'static str, value: String },
}

impl Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::MissingField(field) => {
                write!(f, "missing required field: {field}")
            }
            DraftError::InvalidUrl { field, value } => {
                write!(f, "invalid {field} url: {value}")
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// Record shape handed to `DocumentStore::append`; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NewPortfolioRecord {
    pub name: String,
    pub description: String,
    pub details: String,
    pub image: String,
    pub tech: Vec<String>,
    pub screenshots: Vec<Screenshot>,
    pub url: String,
    pub github: String,
    pub created_at: DateTime<Utc>,
}

impl NewPortfolioRecord {
    /// Materialize the record under the id chosen by the store.
    pub fn into_item(self, id: ItemId) -> PortfolioItem {
        PortfolioItem {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            url: non_blank(self.url),
            github: non_blank(self.github),
            details: non_blank(self.details),
            tech: self.tech,
            screenshots: self.screenshots,
            created_at: Some(self.created_at),
        }
    }
}

impl ProjectDraft {
    /// Validate the draft and convert it into a record stamped with `now`.
    pub fn into_record(
        self,
        now: DateTime<Utc>,
    ) -> Result<NewPortfolioRecord, DraftError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DraftError::MissingField("name"));
        }
        let image = self.image.trim().to_string();
        if image.is_empty() {
            return Err(DraftError::MissingField("image"));
        }

        let url = checked_link("url", &self.url)?;
        let github = checked_link("github", &self.github)?;

        Ok(NewPortfolioRecord {
            name,
            description: self.description,
            details: self.details,
            image,
            tech: split_list(&self.tech),
            screenshots: split_list(&self.screenshots)
                .into_iter()
                .map(|image| Screenshot {
                    title: SCREENSHOT_TITLE.to_string(),
                    description: String::new(),
                    image,
                })
                .collect(),
            url,
            github,
            created_at: now,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn checked_link(field: &'static str, raw: &str) -> Result<String, DraftError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    Url::parse(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|_| DraftError::InvalidUrl {
            field,
            value: trimmed.to_string(),
        })
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn splits_tech_and_screenshots() {
        let draft = ProjectDraft {
            name: "Folio".into(),
            image: "https://img.example/cover.png".into(),
            tech: " Rust, tokio ,, serde ".into(),
            screenshots: "https://img.example/a.png, https://img.example/b.png"
                .into(),
            ..Default::default()
        };

        let record = draft.into_record(now()).unwrap();
        assert_eq!(record.tech, vec!["Rust", "tokio", "serde"]);
        assert_eq!(record.screenshots.len(), 2);
        assert_eq!(record.screenshots[1].image, "https://img.example/b.png");
        assert_eq!(record.screenshots[0].title, "Screenshot");
        assert!(record.screenshots[0].description.is_empty());
        assert_eq!(record.created_at, now());
    }

    #[test]
    fn name_and_image_are_required() {
        let missing_name = ProjectDraft {
            image: "cover.png".into(),
            ..Default::default()
        };
        assert_eq!(
            missing_name.into_record(now()),
            Err(DraftError::MissingField("name"))
        );

        let missing_image = ProjectDraft {
            name: "  Folio ".into(),
            image: "   ".into(),
            ..Default::default()
        };
        assert_eq!(
            missing_image.into_record(now()),
            Err(DraftError::MissingField("image"))
        );
    }

    #[test]
    fn rejects_malformed_links() {
        let draft = ProjectDraft {
            name: "Folio".into(),
            image: "cover.png".into(),
            github: "not a url".into(),
            ..Default::default()
        };
        let err = draft.into_record(now()).unwrap_err();
        assert!(matches!(err, DraftError::InvalidUrl { field: "github", .. }));
    }

    #[test]
    fn blank_links_become_absent_on_materialize() {
        let draft = ProjectDraft {
            name: "Folio".into(),
            image: "cover.png".into(),
            url: "https://folio.example".into(),
            ..Default::default()
        };
        let item = draft
            .into_record(now())
            .unwrap()
            .into_item(ItemId::new("abc"));
        assert_eq!(item.live_link(), Some("https://folio.example"));
        assert_eq!(item.source_link(), None);
        assert_eq!(item.details, None);
        assert_eq!(item.created_at, Some(now()));
    }
}
