//! Lead data models

use super::{
    stringified, CustomField, CustomFieldInput, EntityIds, EntityRef, Links, Tag, MAX_LIMIT_ROWS,
};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// Lead as returned by `GET /api/v2/leads`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Lead {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "stringified")]
    pub responsible_user_id: i64,
    #[serde(default, with = "stringified")]
    pub created_by: i64,
    #[serde(default, with = "stringified")]
    pub created_at: i64,
    #[serde(default, with = "stringified")]
    pub updated_at: i64,
    #[serde(default, with = "stringified")]
    pub updated_by: i64,
    #[serde(default, with = "stringified")]
    pub account_id: i64,
    #[serde(default, with = "stringified")]
    pub group_id: i64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub main_contact: EntityRef,
    #[serde(default)]
    pub company: EntityRef,
    #[serde(default)]
    pub contacts: EntityIds,
    #[serde(default, with = "stringified")]
    pub closed_at: i64,
    #[serde(default, with = "stringified")]
    pub closest_task_at: i64,
    /// Sent as `{}` or `null` when empty; repaired before decoding
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Sent as `{}` or `null` when empty; repaired before decoding
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, with = "stringified")]
    pub status_id: i64,
    #[serde(default, with = "stringified")]
    pub sale: i64,
    #[serde(default, with = "stringified")]
    pub pipeline_id: i64,
    #[serde(default, with = "stringified")]
    pub loss_reason_id: i64,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Validate for Lead {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Lead")
            .required("id", &self.id)
            .required("created_at", &self.created_at)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

impl Validate for CustomField {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("CustomField").required("id", &self.id).finish()
    }
}

/// New lead for `POST /api/v2/leads` (`add`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadAdd {
    pub name: String,
    #[serde(serialize_with = "stringified::serialize")]
    pub status_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub pipeline_id: i64,
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
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub sale: i64,
    /// Comma separated tag names
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(
        serialize_with = "stringified::serialize_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub contacts_id: Vec<i64>,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub company_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldInput>,
}

impl LeadAdd {
    pub fn new(name: impl Into<String>, status_id: i64) -> Self {
        Self {
            name: name.into(),
            status_id,
            ..Default::default()
        }
    }
}

impl Validate for LeadAdd {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("LeadAdd")
            .required("name", &self.name)
            .required("status_id", &self.status_id)
            .min("sale", self.sale, 0)
            .each("contacts_id", &self.contacts_id)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// Changes to an existing lead for `POST /api/v2/leads` (`update`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadUpdate {
    #[serde(serialize_with = "stringified::serialize")]
    pub id: i64,
    /// Must be later than the stored modification time
    #[serde(serialize_with = "stringified::serialize")]
    pub updated_at: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub status_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub pipeline_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub responsible_user_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub sale: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(
        serialize_with = "stringified::serialize_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub contacts_id: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldInput>,
}

impl LeadUpdate {
    pub fn new(id: i64, updated_at: i64) -> Self {
        Self {
            id,
            updated_at,
            ..Default::default()
        }
    }
}

impl Validate for LeadUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("LeadUpdate")
            .required("id", &self.id)
            .required("updated_at", &self.updated_at)
            .required_if("status_id", &self.status_id, "pipeline_id", &self.pipeline_id)
            .min("sale", self.sale, 0)
            .each("contacts_id", &self.contacts_id)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// Query filter for `GET /api/v2/leads`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub id: Vec<i64>,
    pub query: String,
    pub responsible_user_id: i64,
    pub status: Vec<i64>,
    pub limit_rows: i64,
    pub limit_offset: i64,
}

impl LeadFilter {
    pub fn by_ids(ids: impl Into<Vec<i64>>) -> Self {
        Self {
            id: ids.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn page(mut self, limit_rows: i64, limit_offset: i64) -> Self {
        self.limit_rows = limit_rows;
        self.limit_offset = limit_offset;
        self
    }
}

impl ToQuery for LeadFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .ids("id", &self.id)
            .text("query", &self.query)
            .num("responsible_user_id", self.responsible_user_id)
            .ids("status", &self.status)
            .num("limit_rows", self.limit_rows)
            .num("limit_offset", self.limit_offset)
    }
}

impl Validate for LeadFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("LeadFilter")
            .each("id", &self.id)
            .each("status", &self.status)
            .min("limit_rows", self.limit_rows, 0)
            .max("limit_rows", self.limit_rows, MAX_LIMIT_ROWS)
            .min("limit_offset", self.limit_offset, 0)
            .required_if("limit_rows", &self.limit_rows, "limit_offset", &self.limit_offset)
            .finish()
    }
}
