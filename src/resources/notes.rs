//! Notes resource

use super::{list, mutate};
use crate::models::{Note, NoteAdd, NoteFilter};
use crate::services::decoder::Repair;
use crate::services::encoder::Mutation;
use crate::services::session::Session;
use crate::utils::error::CrmResult;

pub const NOTES_PATH: &str = "/api/v2/notes";

/// `/api/v2/notes`
#[derive(Debug, Clone, Copy)]
pub struct Notes<'a> {
    session: &'a Session,
}

impl<'a> Notes<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self, filter: &NoteFilter) -> CrmResult<Option<Vec<Note>>> {
        list(self.session, NOTES_PATH, filter, &Repair::NONE).await
    }

    pub async fn add(&self, note: &NoteAdd) -> CrmResult<i64> {
        mutate(self.session, NOTES_PATH, Mutation::add(note)).await
    }
}
