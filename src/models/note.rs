//! Note data models

use super::{stringified, Links, MAX_LIMIT_ROWS};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entity kinds accepted by the notes list `type` parameter
pub const NOTE_ELEMENT_NAMES: &[&str] = &["contact", "lead", "company", "task", "customer"];

/// Element types a note can be attached to (tasks included)
pub const NOTE_ELEMENT_TYPES: &[&str] = &["1", "2", "3", "4", "12"];

/// Plain text note type
pub const NOTE_TYPE_COMMON: i64 = 4;

/// Note as returned by `GET /api/v2/notes`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Note {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default, with = "stringified")]
    pub element_id: i64,
    #[serde(default, with = "stringified")]
    pub element_type: i64,
    #[serde(default, with = "stringified")]
    pub note_type: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default, with = "stringified")]
    pub created_at: i64,
    #[serde(default, with = "stringified")]
    pub updated_at: i64,
    #[serde(default, with = "stringified")]
    pub responsible_user_id: i64,
    #[serde(default, with = "stringified")]
    pub created_by: i64,
    #[serde(default, with = "stringified")]
    pub account_id: i64,
    #[serde(default)]
    pub is_editable: bool,
    /// File name for attachment notes, empty otherwise
    #[serde(default)]
    pub attachment: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Validate for Note {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Note")
            .required("id", &self.id)
            .one_of_num("element_type", self.element_type, NOTE_ELEMENT_TYPES)
            .finish()
    }
}

/// New note for `POST /api/v2/notes` (`add`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteAdd {
    #[serde(serialize_with = "stringified::serialize")]
    pub element_id: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub element_type: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub note_type: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub created_at: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub responsible_user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl NoteAdd {
    /// Plain text note on an entity
    pub fn common(element_type: i64, element_id: i64, text: impl Into<String>) -> Self {
        Self {
            element_id,
            element_type,
            note_type: NOTE_TYPE_COMMON,
            text: text.into(),
            ..Default::default()
        }
    }
}

impl Validate for NoteAdd {
    fn validate(&self) -> Result<(), ValidationError> {
        let common = (self.note_type == NOTE_TYPE_COMMON).then_some(1i64);
        Rules::new("NoteAdd")
            .required("element_id", &self.element_id)
            .required("element_type", &self.element_type)
            .one_of_num("element_type", self.element_type, NOTE_ELEMENT_TYPES)
            .required("note_type", &self.note_type)
            .required_if("text", &self.text, "note_type", &common)
            .finish()
    }
}

/// Query filter for `GET /api/v2/notes`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Entity kind the notes belong to; the API requires it
    pub element_type: String,
    pub id: Vec<i64>,
    pub element_id: i64,
    pub note_type: i64,
    pub limit_rows: i64,
    pub limit_offset: i64,
}

impl NoteFilter {
    pub fn for_element(element_type: impl Into<String>, element_id: i64) -> Self {
        Self {
            element_type: element_type.into(),
            element_id,
            ..Default::default()
        }
    }
}

impl ToQuery for NoteFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .text("type", &self.element_type)
            .ids("id", &self.id)
            .num("element_id", self.element_id)
            .num("note_type", self.note_type)
            .num("limit_rows", self.limit_rows)
            .num("limit_offset", self.limit_offset)
    }
}

impl Validate for NoteFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("NoteFilter")
            .required("type", &self.element_type)
            .one_of("type", &self.element_type, NOTE_ELEMENT_NAMES)
            .each("id", &self.id)
            .min("limit_rows", self.limit_rows, 0)
            .max("limit_rows", self.limit_rows, MAX_LIMIT_ROWS)
            .min("limit_offset", self.limit_offset, 0)
            .required_if("limit_rows", &self.limit_rows, "limit_offset", &self.limit_offset)
            .finish()
    }
}
