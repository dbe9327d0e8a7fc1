//! Application service
//!
//! [`ApplicationService`] is the entrypoint the boundary layer calls. It owns
//! the creation path (persist, then hand off to the [`ProcessLauncher`]) and
//! every read path, composing authorization scoping with the shared
//! [`QueryFilter`](crate::store::QueryFilter) contract.

use std::sync::Arc;

use serde::Serialize;

use crate::client::{AuthorizationApi, AuthorizedForm, BpmApi};
use crate::error::Result;
use crate::store::ApplicationRepository;

pub mod aggregate;
pub mod create;
pub mod launcher;
pub mod mapper;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use create::CreateApplicationRequest;
pub use launcher::ProcessLauncher;

/// One page of results plus the total number of matching records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Creation and query service over an application repository, a workflow
/// engine and an authorization provider.
///
/// The authorization provider is normally an
/// [`AuthorizationCache`](crate::cache::AuthorizationCache).
pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository>,
    auth: Arc<dyn AuthorizationApi>,
    launcher: ProcessLauncher,
}

impl ApplicationService {
    pub fn new(
        repo: Arc<dyn ApplicationRepository>,
        bpm: Arc<dyn BpmApi>,
        auth: Arc<dyn AuthorizationApi>,
    ) -> Self {
        let launcher = ProcessLauncher::new(bpm, Arc::clone(&repo));
        Self {
            repo,
            auth,
            launcher,
        }
    }

    /// Forms the credential may access.
    pub async fn authorized_forms(&self, credential: &str) -> Result<Vec<AuthorizedForm>> {
        Ok(self.auth.get_authorized_forms(credential).await?)
    }

    /// Distinct authorized form names, used as the query scope.
    async fn authorized_form_names(&self, credential: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .authorized_forms(credential)
            .await?
            .into_iter()
            .map(|form| form.form_name)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
