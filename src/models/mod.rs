//! Data models module
//!
//! Request and response structures of the amoCRM v2 API, plus the shared
//! `_links` / `_embedded` envelope pieces and the in-band error envelope.

use crate::services::validator::{Presence, Rules, Validate, ValidationError};
use crate::utils::error::CrmError;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

pub mod account;
pub mod auth;
pub mod contact;
pub mod lead;
pub mod note;
pub mod pipeline;
pub mod stringified;
pub mod task;

pub use account::{Account, AccountWith};
pub use auth::{AuthAccount, AuthResponse};
pub use contact::{Contact, ContactAdd, ContactFilter, ContactUpdate};
pub use lead::{Lead, LeadAdd, LeadFilter, LeadUpdate};
pub use note::{Note, NoteAdd, NoteFilter};
pub use pipeline::{Pipeline, PipelineFilter};
pub use task::{Task, TaskAdd, TaskFilter, TaskUpdate};

/// Element types accepted by task endpoints
pub const ELEMENT_TYPES: &[&str] = &["1", "2", "3", "12"];

/// Element type names used by list filters
pub const ELEMENT_TYPE_NAMES: &[&str] = &["contact", "lead", "company", "customer"];

/// Largest page the API serves
pub const MAX_LIMIT_ROWS: i64 = 500;

/// Hypermedia link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// `_links` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
}

/// `_embedded` block carrying the items collection
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Embedded<T> {
    #[serde(default, deserialize_with = "seq_or_map")]
    pub items: Vec<T>,
}

impl<T> Default for Embedded<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Top-level list / mutation response
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemsEnvelope<T> {
    #[serde(rename = "_links", default)]
    pub links: Links,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded<T>>,
}

impl<T> ItemsEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        self.embedded.map(|e| e.items).unwrap_or_default()
    }
}

/// Reference to a related entity (`{}` when absent)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityRef {
    #[serde(with = "stringified")]
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// List of related entity ids (`{}` when absent)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityIds {
    pub id: Vec<i64>,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Tag attached to a lead or contact
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    #[serde(with = "stringified")]
    pub id: i64,
    pub name: String,
}

/// Custom field value as read from the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomFieldValue {
    pub value: FieldValue,
    #[serde(rename = "enum", default, deserialize_with = "stringified::deserialize")]
    pub enum_id: i64,
    #[serde(default)]
    pub subtype: Option<String>,
}

/// Custom field attached to an entity
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomField {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<CustomFieldValue>,
    #[serde(default)]
    pub is_system: bool,
}

/// Custom field value as written to the API
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomFieldValueInput {
    pub value: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_id: Option<String>,
}

impl Presence for CustomFieldValueInput {
    fn is_present(&self) -> bool {
        !self.value.is_empty() || self.enum_id.is_some()
    }
}

/// Custom field as written to the API
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomFieldInput {
    #[serde(serialize_with = "stringified::serialize")]
    pub id: i64,
    pub values: Vec<CustomFieldValueInput>,
}

impl CustomFieldInput {
    pub fn text(id: i64, value: impl Into<String>) -> Self {
        Self {
            id,
            values: vec![CustomFieldValueInput {
                value: value.into(),
                enum_id: None,
            }],
        }
    }
}

impl Validate for CustomFieldInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("CustomFieldInput")
            .required("id", &self.id)
            .required("values", &self.values)
            .each("values", &self.values)
            .finish()
    }
}

/// Result of an add/update call: the id of the created or updated entity
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationItem {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Validate for MutationItem {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("MutationItem")
            .required("id", &self.id)
            .finish()
    }
}

/// In-band failure reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub code: Option<String>,
    pub message: String,
}

impl ServiceError {
    /// Find a populated error envelope in a decoded payload
    ///
    /// Recognizes `{"response": {"error": .., "error_code": ..}}` and a
    /// non-empty `_embedded.errors`.
    pub fn probe(payload: &Value) -> Option<Self> {
        if let Some(response) = payload.get("response") {
            let message = response.get("error").and_then(scalar_text);
            let code = response.get("error_code").and_then(scalar_text);
            if message.is_some() || code.is_some() {
                return Some(Self {
                    message: message.unwrap_or_else(|| "unspecified service error".to_string()),
                    code,
                });
            }
        }

        let errors = payload.get("_embedded")?.get("errors")?;
        if is_empty_value(errors) {
            return None;
        }
        let mut messages = Vec::new();
        collect_strings(errors, &mut messages);
        let message = if messages.is_empty() {
            errors.to_string()
        } else {
            messages.join("; ")
        };
        Some(Self { code: None, message })
    }
}

impl From<ServiceError> for CrmError {
    fn from(err: ServiceError) -> Self {
        CrmError::Service {
            code: err.code,
            message: err.message,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.values().all(is_empty_value),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => out.push(s.clone()),
        Value::Array(a) => a.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(o) => o.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

/// Deserialize a collection the API sends either as an array or as an
/// object keyed by id; `null` reads as empty. Document order is kept.
pub fn seq_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct SeqOrMap<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for SeqOrMap<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an array or an object keyed by id")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<T>, A::Error> {
            let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element()? {
                out.push(item);
            }
            Ok(out)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<T>, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_, item)) = map.next_entry::<de::IgnoredAny, T>()? {
                out.push(item);
            }
            Ok(out)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(SeqOrMap(PhantomData))
}
