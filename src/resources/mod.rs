//! Domain resources
//!
//! `AmoClient` owns a logged-in [`Session`] and hands out one borrowed handle
//! per API resource. Every operation runs the same pipeline: validate the
//! request, encode it, make one round-trip, decode the response and validate
//! what came back.

use crate::config::CrmConfig;
use crate::services::decoder::{self, Repair};
use crate::services::encoder::{Mutation, ToQuery};
use crate::services::session::Session;
use crate::services::validator::Validate;
use crate::utils::error::CrmResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub mod account;
pub mod attachments;
pub mod contacts;
pub mod leads;
pub mod notes;
pub mod pipelines;
pub mod tasks;

pub use account::AccountApi;
pub use attachments::Attachments;
pub use contacts::Contacts;
pub use leads::Leads;
pub use notes::Notes;
pub use pipelines::Pipelines;
pub use tasks::Tasks;

/// amoCRM API client
#[derive(Debug, Clone)]
pub struct AmoClient {
    session: Session,
}

impl AmoClient {
    /// Log in and create a client
    pub async fn connect(config: &CrmConfig) -> CrmResult<Self> {
        Ok(Self::from_session(Session::connect(config).await?))
    }

    /// Wrap an existing session
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(&self.session)
    }

    pub fn leads(&self) -> Leads<'_> {
        Leads::new(&self.session)
    }

    pub fn tasks(&self) -> Tasks<'_> {
        Tasks::new(&self.session)
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(&self.session)
    }

    pub fn pipelines(&self) -> Pipelines<'_> {
        Pipelines::new(&self.session)
    }

    pub fn notes(&self) -> Notes<'_> {
        Notes::new(&self.session)
    }

    pub fn attachments(&self) -> Attachments<'_> {
        Attachments::new(&self.session)
    }
}

/// Validated list call
pub(crate) async fn list<F, T>(
    session: &Session,
    path: &str,
    filter: &F,
    repair: &Repair,
) -> CrmResult<Option<Vec<T>>>
where
    F: ToQuery + Validate,
    T: DeserializeOwned + Validate,
{
    filter.validate()?;
    let query = filter.to_query();
    debug!("Listing {} with {} filter(s)", path, query.pairs().len());

    let body = session.get(path, &query).await?;
    decoder::decode_items(&body, repair)
}

/// Validated single-entity write, returning the affected id
pub(crate) async fn mutate<T>(session: &Session, path: &str, mutation: Mutation<'_, T>) -> CrmResult<i64>
where
    T: Serialize + Validate,
{
    let item = match &mutation {
        Mutation::Add([item]) | Mutation::Update([item]) => *item,
    };
    item.validate()?;

    let body = session.post_json(path, &mutation).await?;
    let id = decoder::decode_mutation(&body)?;
    debug!("{} accepted entity {}", path, id);
    Ok(id)
}
