//! Contact data models

use super::{
    stringified, CustomField, CustomFieldInput, EntityIds, EntityRef, Links, Tag, MAX_LIMIT_ROWS,
};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// Contact as returned by `GET /api/v2/contacts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
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
    pub company: EntityRef,
    #[serde(default)]
    pub leads: EntityIds,
    #[serde(default)]
    pub customers: EntityIds,
    #[serde(default, with = "stringified")]
    pub closest_task_at: i64,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Validate for Contact {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Contact")
            .required("id", &self.id)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// New contact for `POST /api/v2/contacts` (`add`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactAdd {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub responsible_user_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub created_at: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(
        serialize_with = "stringified::serialize_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub leads_id: Vec<i64>,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub company_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldInput>,
}

impl ContactAdd {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Validate for ContactAdd {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("ContactAdd")
            .required("name", &self.name)
            .each("leads_id", &self.leads_id)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// Changes to an existing contact for `POST /api/v2/contacts` (`update`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactUpdate {
    #[serde(serialize_with = "stringified::serialize")]
    pub id: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub updated_at: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub responsible_user_id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(
        serialize_with = "stringified::serialize_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub leads_id: Vec<i64>,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub company_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldInput>,
}

impl ContactUpdate {
    pub fn new(id: i64, updated_at: i64) -> Self {
        Self {
            id,
            updated_at,
            ..Default::default()
        }
    }
}

impl Validate for ContactUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("ContactUpdate")
            .required("id", &self.id)
            .required("updated_at", &self.updated_at)
            .each("leads_id", &self.leads_id)
            .nested("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// Query filter for `GET /api/v2/contacts`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    pub id: Vec<i64>,
    pub query: String,
    pub responsible_user_id: i64,
    pub limit_rows: i64,
    pub limit_offset: i64,
}

impl ToQuery for ContactFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .ids("id", &self.id)
            .text("query", &self.query)
            .num("responsible_user_id", self.responsible_user_id)
            .num("limit_rows", self.limit_rows)
            .num("limit_offset", self.limit_offset)
    }
}

impl Validate for ContactFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("ContactFilter")
            .each("id", &self.id)
            .min("limit_rows", self.limit_rows, 0)
            .max("limit_rows", self.limit_rows, MAX_LIMIT_ROWS)
            .min("limit_offset", self.limit_offset, 0)
            .required_if("limit_rows", &self.limit_rows, "limit_offset", &self.limit_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_add_with_custom_field() {
        let mut contact = ContactAdd::new("Jane Roe");
        contact.custom_fields = vec![CustomFieldInput::text(310, "+15550100")];

        assert_eq!(
            serde_json::to_value(&contact).unwrap(),
            json!({
                "name": "Jane Roe",
                "custom_fields": [{"id": "310", "values": [{"value": "+15550100"}]}]
            })
        );
    }

    #[test]
    fn test_nested_custom_field_violation() {
        let mut contact = ContactAdd::new("Jane Roe");
        contact.custom_fields = vec![CustomFieldInput {
            id: 0,
            values: Vec::new(),
        }];

        let err = contact.validate().unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["custom_fields[0].id", "custom_fields[0].values"]
        );
    }

    #[test]
    fn test_each_rejects_zero_lead_id() {
        let mut update = ContactUpdate::new(4, 1_700_000_000);
        update.leads_id = vec![5, 0];
        let err = update.validate().unwrap_err();
        assert!(err.has_field("leads_id"));
    }
}
