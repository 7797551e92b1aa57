//! Task data models

use super::{stringified, Links, ELEMENT_TYPES, ELEMENT_TYPE_NAMES, MAX_LIMIT_ROWS};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Outcome recorded when a task was closed (`{}` while open)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskResult {
    #[serde(with = "stringified")]
    pub id: i64,
    pub text: String,
}

/// Task as returned by `GET /api/v2/tasks`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default, with = "stringified")]
    pub element_id: i64,
    #[serde(default, with = "stringified")]
    pub element_type: i64,
    #[serde(default, with = "stringified")]
    pub complete_till_at: i64,
    #[serde(default, with = "stringified")]
    pub task_type: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default, with = "stringified")]
    pub created_at: i64,
    #[serde(default, with = "stringified")]
    pub updated_at: i64,
    #[serde(default, with = "stringified")]
    pub responsible_user_id: i64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, with = "stringified")]
    pub created_by: i64,
    #[serde(default, with = "stringified")]
    pub account_id: i64,
    #[serde(default, with = "stringified")]
    pub group_id: i64,
    #[serde(default)]
    pub result: TaskResult,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Task {
    /// Deadline as a UTC timestamp
    pub fn complete_till(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.complete_till_at, 0).single()
    }
}

impl Validate for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Task")
            .required("id", &self.id)
            .one_of_num("element_type", self.element_type, ELEMENT_TYPES)
            .required_if("element_type", &self.element_type, "element_id", &self.element_id)
            .finish()
    }
}

/// New task for `POST /api/v2/tasks` (`add`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskAdd {
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub element_id: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub element_type: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub complete_till_at: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub task_type: i64,
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
}

impl TaskAdd {
    pub fn new(text: impl Into<String>, task_type: i64, complete_till: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            task_type,
            complete_till_at: complete_till.timestamp(),
            ..Default::default()
        }
    }

    /// Attach the task to an entity (`element_type` is 1 contact, 2 lead, 3 company, 12 customer)
    #[must_use]
    pub fn for_element(mut self, element_type: i64, element_id: i64) -> Self {
        self.element_type = element_type;
        self.element_id = element_id;
        self
    }
}

impl Validate for TaskAdd {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("TaskAdd")
            .required("text", &self.text)
            .required("task_type", &self.task_type)
            .required("complete_till_at", &self.complete_till_at)
            .one_of_num("element_type", self.element_type, ELEMENT_TYPES)
            .required_if("element_type", &self.element_type, "element_id", &self.element_id)
            .required_if("element_id", &self.element_id, "element_type", &self.element_type)
            .finish()
    }
}

/// Changes to an existing task for `POST /api/v2/tasks` (`update`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(serialize_with = "stringified::serialize")]
    pub id: i64,
    #[serde(serialize_with = "stringified::serialize")]
    pub updated_at: i64,
    /// The API rejects updates without text
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub complete_till_at: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub task_type: i64,
    #[serde(
        serialize_with = "stringified::serialize",
        skip_serializing_if = "stringified::is_zero"
    )]
    pub responsible_user_id: i64,
}

impl TaskUpdate {
    pub fn new(id: i64, updated_at: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            updated_at,
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn completed(mut self) -> Self {
        self.is_completed = Some(true);
        self
    }
}

impl Validate for TaskUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("TaskUpdate")
            .required("id", &self.id)
            .required("updated_at", &self.updated_at)
            .required("text", &self.text)
            .finish()
    }
}

/// Query filter for `GET /api/v2/tasks`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub id: Vec<i64>,
    pub element_id: i64,
    /// `contact`, `lead`, `company` or `customer`
    pub element_type: String,
    pub responsible_user_id: i64,
    pub is_completed: Option<bool>,
    pub limit_rows: i64,
    pub limit_offset: i64,
}

impl ToQuery for TaskFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .ids("id", &self.id)
            .num("element_id", self.element_id)
            .text("type", &self.element_type)
            .num("responsible_user_id", self.responsible_user_id)
            .flag("filter[status]", self.is_completed)
            .num("limit_rows", self.limit_rows)
            .num("limit_offset", self.limit_offset)
    }
}

impl Validate for TaskFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("TaskFilter")
            .each("id", &self.id)
            .one_of("type", &self.element_type, ELEMENT_TYPE_NAMES)
            .required_if("type", &self.element_type, "element_id", &self.element_id)
            .min("limit_rows", self.limit_rows, 0)
            .max("limit_rows", self.limit_rows, MAX_LIMIT_ROWS)
            .min("limit_offset", self.limit_offset, 0)
            .required_if("limit_rows", &self.limit_rows, "limit_offset", &self.limit_offset)
            .finish()
    }
}
