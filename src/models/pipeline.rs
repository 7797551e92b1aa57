//! Pipeline data models

use super::{seq_or_map, stringified, Links};
use crate::services::encoder::{Query, ToQuery};
use crate::services::validator::{Rules, Validate, ValidationError};
use serde::Deserialize;

/// Stage of a pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineStatus {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, with = "stringified")]
    pub sort: i64,
    #[serde(default)]
    pub is_editable: bool,
}

/// Pipeline as returned by `GET /api/v2/pipelines`
///
/// The API keys both pipelines and their statuses by id; both are read
/// into vectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pipeline {
    #[serde(with = "stringified")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "stringified")]
    pub sort: i64,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default, deserialize_with = "seq_or_map")]
    pub statuses: Vec<PipelineStatus>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Pipeline {
    pub fn status(&self, id: i64) -> Option<&PipelineStatus> {
        self.statuses.iter().find(|s| s.id == id)
    }
}

impl Validate for Pipeline {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("Pipeline")
            .required("id", &self.id)
            .required("name", &self.name)
            .nested("statuses", &self.statuses)
            .finish()
    }
}

impl Validate for PipelineStatus {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("PipelineStatus").required("id", &self.id).finish()
    }
}

/// Query filter for `GET /api/v2/pipelines`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineFilter {
    pub id: i64,
}

impl ToQuery for PipelineFilter {
    fn to_query(&self) -> Query {
        Query::new().num("id", self.id)
    }
}

impl Validate for PipelineFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        Rules::new("PipelineFilter").min("id", self.id, 0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_statuses_keyed_by_id() {
        let pipeline: Pipeline = serde_json::from_str(
            r##"{
                "id": 55, "name": "Sales", "sort": 1, "is_main": true,
                "statuses": {
                    "142": {"id": 142, "name": "Won", "color": "#CCFF66", "sort": 10000, "is_editable": false},
                    "143": {"id": 143, "name": "Lost", "color": "#D5D8DB", "sort": 11000, "is_editable": false}
                }
            }"##,
        )
        .unwrap();

        assert_eq!(pipeline.statuses.len(), 2);
        assert_eq!(pipeline.status(143).unwrap().name, "Lost");
        assert!(pipeline.validate().is_ok());
    }
}
