//! Tasks resource

use super::{list, mutate};
use crate::models::{Task, TaskAdd, TaskFilter, TaskUpdate};
use crate::services::decoder::Repair;
use crate::services::encoder::Mutation;
use crate::services::session::Session;
use crate::utils::error::CrmResult;

pub const TASKS_PATH: &str = "/api/v2/tasks";

/// `/api/v2/tasks`
#[derive(Debug, Clone, Copy)]
pub struct Tasks<'a> {
    session: &'a Session,
}

impl<'a> Tasks<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self, filter: &TaskFilter) -> CrmResult<Option<Vec<Task>>> {
        list(self.session, TASKS_PATH, filter, &Repair::NONE).await
    }

    pub async fn add(&self, task: &TaskAdd) -> CrmResult<i64> {
        mutate(self.session, TASKS_PATH, Mutation::add(task)).await
    }

    /// Update a task; mark it done with [`TaskUpdate::completed`]
    pub async fn update(&self, task: &TaskUpdate) -> CrmResult<i64> {
        mutate(self.session, TASKS_PATH, Mutation::update(task)).await
    }
}
