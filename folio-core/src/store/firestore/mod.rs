//! Firestore REST client for the `portfolio` collection.

pub mod codec;

use async_trait::async_trait;
use folio_contracts::store::{DocumentStore, StoreError, StoreResult};
use folio_model::{NewPortfolioRecord, PortfolioItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1/";
pub const DEFAULT_COLLECTION: &str = "portfolio";
const PAGE_SIZE: u32 = 300;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// Web API key, sent as `?key=`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// Overridable for emulators.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: None,
            collection: default_collection(),
            database: default_database(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// `.../projects/{p}/databases/{db}/documents/{collection}`
    pub fn collection_url(&self) -> Result<Url, StoreError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|err| {
            StoreError::Transport(format!("invalid base url {base}: {err}"))
        })?;
        let path = format!(
            "projects/{}/databases/{}/documents/{}",
            self.project_id, self.database, self.collection
        );
        base.join(&path).map_err(|err| {
            StoreError::Transport(format!("invalid collection path {path}: {err}"))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn with_key(&self, mut url: Url) -> Url {
        if let Some(key) = self.config.api_key.as_deref() {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    async fn fetch_page(
        &self,
        page_token: Option<&str>,
    ) -> StoreResult<ListDocumentsResponse> {
        let mut url = self.with_key(self.config.collection_url()?);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        let response = self.client.get(url).send().await.map_err(transport)?;
        let response = check_status(response).await?;
        response
            .json::<ListDocumentsResponse>()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

async fn check_status(
    response: reqwest::Response,
) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Remote {
        status: status.as_u16(),
        message: remote_message(&body),
    })
}

/// Token for the following page; `None` ends the listing, including when the
/// server hands back the token it was just given.
fn next_page_token(previous: Option<&str>, next: Option<String>) -> Option<String> {
    next.filter(|token| !token.is_empty() && Some(token.as_str()) != previous)
}

/// Pull `error.message` out of a Google API error body, else the raw text.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            for doc in &page.documents {
                match codec::decode_document(doc) {
                    Ok(item) => items.push(item),
                    Err(err) => warn!("skipping portfolio document: {err}"),
                }
            }
            match next_page_token(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(
            count = items.len(),
            collection = %self.config.collection,
            "listed firestore documents"
        );
        Ok(items)
    }

    async fn append(
        &self,
        record: NewPortfolioRecord,
    ) -> StoreResult<PortfolioItem> {
        let url = self.with_key(self.config.collection_url()?);
        let body = codec::encode_record(&record);
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let doc: Value = response
            .json()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        let item = codec::decode_document(&doc)?;
        info!(id = %item.id, "portfolio document created");
        Ok(item)
    }
}
