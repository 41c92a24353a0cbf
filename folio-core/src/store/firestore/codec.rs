//! Firestore REST typed-value encoding for portfolio documents.
//!
//! Firestore wraps every field in a single-key object naming its type, e.g.
//! `{"stringValue": "Folio"}` or `{"arrayValue": {"values": [...]}}`.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_contracts::store::StoreError;
use folio_model::{ItemId, NewPortfolioRecord, PortfolioItem, Screenshot};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum FirestoreValue {
    Null,
    String(String),
    Timestamp(String),
    Array(Vec<FirestoreValue>),
    Map(BTreeMap<String, FirestoreValue>),
    /// Types the portfolio schema never uses (integers, booleans, ...).
    Other(Value),
}

impl FirestoreValue {
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| format!("expected typed value object, got {value}"))?;
        let (kind, inner) = obj
            .iter()
            .next()
            .ok_or_else(|| "empty typed value".to_string())?;

        match kind.as_str() {
            "nullValue" => Ok(FirestoreValue::Null),
            "stringValue" => inner
                .as_str()
                .map(|s| FirestoreValue::String(s.to_string()))
                .ok_or_else(|| format!("stringValue is not a string: {inner}")),
            "timestampValue" => inner
                .as_str()
                .map(|s| FirestoreValue::Timestamp(s.to_string()))
                .ok_or_else(|| format!("timestampValue is not a string: {inner}")),
            "arrayValue" => {
                let values = match inner.get("values") {
                    Some(Value::Array(values)) => values
                        .iter()
                        .map(FirestoreValue::from_json)
                        .collect::<Result<Vec<_>, _>>()?,
                    Some(other) => {
                        return Err(format!("arrayValue.values is not a list: {other}"));
                    }
                    // Firestore omits `values` for empty arrays.
                    None => Vec::new(),
                };
                Ok(FirestoreValue::Array(values))
            }
            "mapValue" => {
                let fields = match inner.get("fields") {
                    Some(fields) => decode_fields(fields)?,
                    None => BTreeMap::new(),
                };
                Ok(FirestoreValue::Map(fields))
            }
            _ => Ok(FirestoreValue::Other(value.clone())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FirestoreValue::Null => json!({ "nullValue": null }),
            FirestoreValue::String(s) => json!({ "stringValue": s }),
            FirestoreValue::Timestamp(ts) => json!({ "timestampValue": ts }),
            FirestoreValue::Array(values) => json!({
                "arrayValue": {
                    "values": values.iter().map(FirestoreValue::to_json).collect::<Vec<_>>()
                }
            }),
            FirestoreValue::Map(fields) => json!({
                "mapValue": { "fields": encode_fields(fields) }
            }),
            FirestoreValue::Other(raw) => raw.clone(),
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            FirestoreValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn decode_fields(raw: &Value) -> Result<BTreeMap<String, FirestoreValue>, String> {
    let obj = raw
        .as_object()
        .ok_or_else(|| format!("fields is not an object: {raw}"))?;
    obj.iter()
        .map(|(k, v)| FirestoreValue::from_json(v).map(|v| (k.clone(), v)))
        .collect()
}

fn encode_fields(fields: &BTreeMap<String, FirestoreValue>) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    Value::Object(map)
}

/// Document id is the last segment of its resource name.
pub fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

struct Fields<'a> {
    id: &'a str,
    fields: &'a BTreeMap<String, FirestoreValue>,
}

impl Fields<'_> {
    fn malformed(&self, reason: String) -> StoreError {
        StoreError::MalformedDocument {
            id: self.id.to_string(),
            reason,
        }
    }

    /// String field; absent and null both map to `None`.
    fn string(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.fields.get(key) {
            None | Some(FirestoreValue::Null) => Ok(None),
            Some(FirestoreValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.malformed(format!(
                "field `{key}` should be a string, got {other:?}"
            ))),
        }
    }

    fn string_list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        match self.fields.get(key) {
            None | Some(FirestoreValue::Null) => Ok(Vec::new()),
            Some(FirestoreValue::Array(values)) => Ok(values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()),
            Some(other) => Err(self.malformed(format!(
                "field `{key}` should be an array, got {other:?}"
            ))),
        }
    }

    fn screenshots(&self) -> Result<Vec<Screenshot>, StoreError> {
        let values = match self.fields.get("screenshots") {
            None | Some(FirestoreValue::Null) => return Ok(Vec::new()),
            Some(FirestoreValue::Array(values)) => values,
            Some(other) => {
                return Err(self.malformed(format!(
                    "field `screenshots` should be an array, got {other:?}"
                )));
            }
        };
        Ok(values
            .iter()
            .filter_map(|v| match v {
                FirestoreValue::Map(m) => {
                    let get = |k: &str| {
                        m.get(k)
                            .and_then(FirestoreValue::as_str)
                            .unwrap_or_default()
                            .to_string()
                    };
                    Some(Screenshot {
                        title: get("title"),
                        description: get("description"),
                        image: get("image"),
                    })
                }
                // Bare URL strings show up in hand-edited documents.
                FirestoreValue::String(url) => Some(Screenshot {
                    title: "Screenshot".to_string(),
                    description: String::new(),
                    image: url.clone(),
                }),
                _ => None,
            })
            .collect())
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(key) {
            Some(FirestoreValue::Timestamp(ts)) => parse_timestamp(ts),
            _ => None,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Decode one REST document into a portfolio item.
pub fn decode_document(doc: &Value) -> Result<PortfolioItem, StoreError> {
    let name = doc.get("name").and_then(Value::as_str).unwrap_or_default();
    let id = document_id(name).ok_or_else(|| StoreError::MalformedDocument {
        id: name.to_string(),
        reason: "document has no name".to_string(),
    })?;

    let fields = match doc.get("fields") {
        Some(raw) => decode_fields(raw).map_err(|reason| {
            StoreError::MalformedDocument {
                id: id.to_string(),
                reason,
            }
        })?,
        None => BTreeMap::new(),
    };
    let f = Fields {
        id,
        fields: &fields,
    };

    let created_at = f.timestamp("createdAt").or_else(|| {
        doc.get("createTime")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    });

    Ok(PortfolioItem {
        id: ItemId::new(id),
        name: f.string("name")?.unwrap_or_default(),
        description: f.string("description")?.unwrap_or_default(),
        image: f.string("image")?.unwrap_or_default(),
        url: f.string("url")?.filter(|s| !s.trim().is_empty()),
        github: f.string("github")?.filter(|s| !s.trim().is_empty()),
        details: f.string("details")?.filter(|s| !s.trim().is_empty()),
        tech: f.string_list("tech")?,
        screenshots: f.screenshots()?,
        created_at,
    })
}

/// Encode a new record as a REST document body (`{"fields": {...}}`).
pub fn encode_record(record: &NewPortfolioRecord) -> Value {
    let string = |s: &str| FirestoreValue::String(s.to_string());
    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), string(&record.name));
    fields.insert("description".to_string(), string(&record.description));
    fields.insert("details".to_string(), string(&record.details));
    fields.insert("image".to_string(), string(&record.image));
    fields.insert(
        "tech".to_string(),
        FirestoreValue::Array(record.tech.iter().map(|t| string(t)).collect()),
    );
    fields.insert(
        "screenshots".to_string(),
        FirestoreValue::Array(
            record
                .screenshots
                .iter()
                .map(|shot| {
                    FirestoreValue::Map(BTreeMap::from([
                        ("title".to_string(), string(&shot.title)),
                        ("description".to_string(), string(&shot.description)),
                        ("image".to_string(), string(&shot.image)),
                    ]))
                })
                .collect(),
        ),
    );
    fields.insert("url".to_string(), string(&record.url));
    fields.insert("github".to_string(), string(&record.github));
    fields.insert(
        "createdAt".to_string(),
        FirestoreValue::Timestamp(
            record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
    );

    json!({ "fields": encode_fields(&fields) })
}
