//! Leads resource

use super::{list, mutate};
use crate::models::{Lead, LeadAdd, LeadFilter, LeadUpdate};
use crate::services::decoder::Repair;
use crate::services::encoder::Mutation;
use crate::services::session::Session;
use crate::utils::error::CrmResult;

pub const LEADS_PATH: &str = "/api/v2/leads";

/// Lead fields the service sends as `null` / `{}` when empty
pub const LEAD_REPAIR: Repair = Repair::fields(&["tags", "custom_fields"]);

/// `/api/v2/leads`
#[derive(Debug, Clone, Copy)]
pub struct Leads<'a> {
    session: &'a Session,
}

impl<'a> Leads<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// List leads matching the filter; `None` when the service has nothing
    /// to return
    pub async fn list(&self, filter: &LeadFilter) -> CrmResult<Option<Vec<Lead>>> {
        list(self.session, LEADS_PATH, filter, &LEAD_REPAIR).await
    }

    /// Create a lead and return its id
    pub async fn add(&self, lead: &LeadAdd) -> CrmResult<i64> {
        mutate(self.session, LEADS_PATH, Mutation::add(lead)).await
    }

    /// Update a lead and return its id
    pub async fn update(&self, lead: &LeadUpdate) -> CrmResult<i64> {
        mutate(self.session, LEADS_PATH, Mutation::update(lead)).await
    }
}
