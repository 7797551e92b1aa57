//! Account data models

use super::{seq_or_map, stringified, Links, Pipeline};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use serde::Deserialize;

/// Sections that can be embedded in the account response
pub const ACCOUNT_WITH: &[&str] = &[
    "custom_fields",
    "users",
    "pipelines",
    "groups",
    "note_types",
    "task_types",
];

/// Account user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, with = "stringified")]
    pub group_id: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// User group
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoteType {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub editable: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskType {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Custom field definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDefinition {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "stringified")]
    pub field_type: i64,
    #[serde(default, with = "stringified")]
    pub sort: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub is_multiple: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub enums: Option<serde_json::Value>,
}

/// Custom field definitions per entity
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountCustomFields {
    #[serde(default, deserialize_with = "seq_or_map")]
    pub contacts: Vec<FieldDefinition>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub leads: Vec<FieldDefinition>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub companies: Vec<FieldDefinition>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub customers: Vec<FieldDefinition>,
}

/// Sections requested with [`AccountWith`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountEmbedded {
    #[serde(default, deserialize_with = "seq_or_map")]
    pub users: Vec<User>,
    #[serde(default)]
    pub custom_fields: AccountCustomFields,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub pipelines: Vec<Pipeline>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub note_types: Vec<NoteType>,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub task_types: Vec<TaskType>,
}

/// Account as returned by `GET /api/v2/account`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub timezone_offset: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, with = "stringified")]
    pub current_user: i64,
    #[serde(rename = "_embedded", default)]
    pub embedded: AccountEmbedded,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Account {
    pub fn user(&self, id: i64) -> Option<&User> {
        self.embedded.users.iter().find(|u| u.id == id)
    }
}

impl Validate for Account {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Account")
            .required("id", &self.id)
            .required("subdomain", &self.subdomain)
            .nested("pipelines", &self.embedded.pipelines)
            .finish()
    }
}

/// Sections to embed in `GET /api/v2/account`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountWith {
    pub sections: Vec<String>,
}

impl AccountWith {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
        }
    }

    /// Every section the API can embed
    pub fn all() -> Self {
        Self::new(ACCOUNT_WITH.iter().copied())
    }
}

impl ToQuery for AccountWith {
    fn to_query(&self) -> Query {
        let sections: Vec<&str> = self.sections.iter().map(String::as_str).collect();
        Query::new().list("with", &sections)
    }
}

impl Validate for AccountWith {
    fn validate(&self) -> Result<(), ValidationError> {
        self.sections
            .iter()
            .fold(Rules::new("AccountWith").each("with", &self.sections), |rules, s| {
                rules.one_of("with", s, ACCOUNT_WITH)
            })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query() {
        let with = AccountWith::new(["users", "pipelines"]);
        assert_eq!(with.to_query().get("with"), Some("users,pipelines"));
        assert!(AccountWith::default().to_query().is_empty());
    }

    #[test]
    fn test_with_rejects_unknown_section() {
        let err = AccountWith::new(["users", "invoices"]).validate().unwrap_err();
        assert_eq!(err.fields(), vec!["with"]);
        assert!(AccountWith::all().validate().is_ok());
    }

    #[test]
    fn test_account_embedded_maps() {
        let account: Account = serde_json::from_str(
            r#"{
                "id": 1001, "name": "Acme", "subdomain": "acme", "currency": "USD",
                "timezone": "Europe/London", "timezone_offset": "+00:00", "language": "en",
                "current_user": 7,
                "_embedded": {
                    "users": {"7": {"id": 7, "name": "Sam", "login": "sam@example.com", "is_admin": true}},
                    "groups": [],
                    "custom_fields": {"leads": {"300": {"id": 300, "name": "Source", "field_type": 1}}, "companies": []},
                    "task_types": {"1": {"id": 1, "name": "Follow-up"}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(account.user(7).unwrap().login, "sam@example.com");
        assert_eq!(account.embedded.custom_fields.leads[0].name, "Source");
        assert!(account.embedded.groups.is_empty());
        assert!(account.validate().is_ok());
    }
}
