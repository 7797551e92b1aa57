//! Pipelines resource

use super::list;
use crate::models::{Pipeline, PipelineFilter};
use crate::services::decoder::Repair;
use crate::services::session::Session;
use crate::utils::error::CrmResult;

pub const PIPELINES_PATH: &str = "/api/v2/pipelines";

/// `/api/v2/pipelines`
#[derive(Debug, Clone, Copy)]
pub struct Pipelines<'a> {
    session: &'a Session,
}

impl<'a> Pipelines<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// List pipelines ordered by their `sort` position
    ///
    /// The service keys pipelines (and their statuses) by id.
    pub async fn list(&self, filter: &PipelineFilter) -> CrmResult<Option<Vec<Pipeline>>> {
        let mut pipelines: Option<Vec<Pipeline>> =
            list(self.session, PIPELINES_PATH, filter, &Repair::NONE).await?;
        if let Some(pipelines) = pipelines.as_mut() {
            pipelines.sort_by_key(|p| p.sort);
            for pipeline in pipelines.iter_mut() {
                pipeline.statuses.sort_by_key(|s| s.sort);
            }
        }
        Ok(pipelines)
    }
}
