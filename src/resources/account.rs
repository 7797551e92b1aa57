//! Account resource

use crate::models::{Account, AccountWith};
use crate::services::decoder;
use crate::services::encoder::ToQuery;
use crate::services::session::Session;
use crate::services::validator::Validate;
use crate::utils::error::CrmResult;

pub const ACCOUNT_PATH: &str = "/api/v2/account";

/// `/api/v2/account`
#[derive(Debug, Clone, Copy)]
pub struct AccountApi<'a> {
    session: &'a Session,
}

impl<'a> AccountApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch the account with the requested embedded sections
    ///
    /// An empty answer yields `Ok(None)`.
    pub async fn get(&self, with: &AccountWith) -> CrmResult<Option<Account>> {
        with.validate()?;
        let body = self.session.get(ACCOUNT_PATH, &with.to_query()).await?;
        decoder::decode_object(&body)
    }
}
