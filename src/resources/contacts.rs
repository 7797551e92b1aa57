//! Contacts resource

use super::{list, mutate};
use crate::models::{Contact, ContactAdd, ContactFilter, ContactUpdate};
use crate::services::decoder::Repair;
use crate::services::encoder::Mutation;
use crate::services::session::Session;
use crate::utils::error::CrmResult;

pub const CONTACTS_PATH: &str = "/api/v2/contacts";

pub const CONTACT_REPAIR: Repair = Repair::fields(&["tags", "custom_fields"]);

/// `/api/v2/contacts`
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    session: &'a Session,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self, filter: &ContactFilter) -> CrmResult<Option<Vec<Contact>>> {
        list(self.session, CONTACTS_PATH, filter, &CONTACT_REPAIR).await
    }

    pub async fn add(&self, contact: &ContactAdd) -> CrmResult<i64> {
        mutate(self.session, CONTACTS_PATH, Mutation::add(contact)).await
    }

    pub async fn update(&self, contact: &ContactUpdate) -> CrmResult<i64> {
        mutate(self.session, CONTACTS_PATH, Mutation::update(contact)).await
    }
}
