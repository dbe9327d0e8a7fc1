//! Application read paths
//!
//! Authorization-scoped reads resolve the caller's form names first. An empty
//! set fails closed: the store is never queried.

use reqwest::StatusCode;

use super::{ApplicationService, Page};
use crate::error::{Error, Result};
use crate::models::{ApplicationView, MapperView, StatusList};
use crate::store::{ApplicationScope, ApplicationUpdate, QueryFilter, QueryParams};

fn invalid_application() -> Error {
    Error::business(StatusCode::BAD_REQUEST, "Invalid application")
}

impl ApplicationService {
    fn find_page(&self, scope: ApplicationScope, filter: &QueryFilter) -> Result<Page<ApplicationView>> {
        log::debug!("Finding applications: scope={:?} filter={:?}", scope, filter);
        let (applications, total) = self.repo.find_applications(&scope, filter)?;
        Ok(Page {
            items: applications.into_iter().map(ApplicationView::from).collect(),
            total,
        })
    }

    /// Applications of every form the credential is authorized for.
    pub async fn get_auth_applications_and_count(
        &self,
        credential: &str,
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        let names = self.authorized_form_names(credential).await?;
        if names.is_empty() {
            return Ok(Page::empty());
        }
        self.find_page(ApplicationScope::FormNames(names), &filter)
    }

    /// One application, if the credential is authorized for its form.
    ///
    /// Fails with [`Error::Forbidden`] when the credential has no forms at
    /// all; an application outside the authorized forms is `None`.
    pub async fn get_auth_by_application_id(
        &self,
        application_id: i64,
        credential: &str,
    ) -> Result<Option<ApplicationView>> {
        let names = self.authorized_form_names(credential).await?;
        if names.is_empty() {
            return Err(Error::Forbidden);
        }
        let filter = QueryFilter::new().application_id(application_id);
        let page = self.find_page(ApplicationScope::FormNames(names), &filter)?;
        Ok(page.items.into_iter().next())
    }

    /// Authorized applications, honouring only pagination.
    pub async fn get_all_application_count(
        &self,
        credential: &str,
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(&params.pagination_only())?;
        let names = self.authorized_form_names(credential).await?;
        if names.is_empty() {
            return Ok(Page::empty());
        }
        self.find_page(ApplicationScope::FormNames(names), &filter)
    }

    /// Every application (administrative view).
    pub fn get_all_applications(&self, params: &QueryParams) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        self.find_page(ApplicationScope::All, &filter)
    }

    /// Applications created by one user.
    pub fn get_all_applications_by_user(
        &self,
        user_id: &str,
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        self.find_page(ApplicationScope::Owner(user_id.to_string()), &filter)
    }

    /// Applications created by any member of a group.
    pub fn get_all_application_by_user_group(
        &self,
        members: &[String],
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        self.find_page(ApplicationScope::Owners(members.to_vec()), &filter)
    }

    pub fn get_all_applications_ids(&self, ids: &[i64]) -> Result<Vec<ApplicationView>> {
        let page = self.find_page(ApplicationScope::Ids(ids.to_vec()), &QueryFilter::new())?;
        Ok(page.items)
    }

    /// Applications submitted against one form.
    pub fn get_all_applications_form_id(
        &self,
        form_id: &str,
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        self.find_page(ApplicationScope::FormId(form_id.to_string()), &filter)
    }

    /// Applications submitted against one form by one user.
    pub fn get_all_applications_form_id_user(
        &self,
        form_id: &str,
        user_id: &str,
        params: &QueryParams,
    ) -> Result<Page<ApplicationView>> {
        let filter = QueryFilter::from_params(params)?;
        let scope = ApplicationScope::FormIdOwner {
            form_id: form_id.to_string(),
            owner: user_id.to_string(),
        };
        self.find_page(scope, &filter)
    }

    pub fn get_all_application_by_user_count(&self, user_id: &str) -> Result<u64> {
        Ok(self
            .repo
            .count_applications(&ApplicationScope::Owner(user_id.to_string()))?)
    }

    pub fn get_all_applications_form_id_count(&self, form_id: &str) -> Result<u64> {
        Ok(self
            .repo
            .count_applications(&ApplicationScope::FormId(form_id.to_string()))?)
    }

    pub fn get_all_applications_form_id_user_count(&self, form_id: &str, user_id: &str) -> Result<u64> {
        Ok(self.repo.count_applications(&ApplicationScope::FormIdOwner {
            form_id: form_id.to_string(),
            owner: user_id.to_string(),
        })?)
    }

    pub fn get_application(&self, application_id: i64) -> Result<ApplicationView> {
        self.repo
            .find_by_id(application_id)?
            .map(ApplicationView::from)
            .ok_or_else(|| {
                Error::business(
                    StatusCode::NOT_FOUND,
                    format!("Application {} not found", application_id),
                )
            })
    }

    /// One application, only if `user_id` created it.
    pub fn get_application_by_user(&self, application_id: i64, user_id: &str) -> Result<ApplicationView> {
        let filter = QueryFilter::new().application_id(application_id);
        let page = self.find_page(ApplicationScope::Owner(user_id.to_string()), &filter)?;
        page.items.into_iter().next().ok_or(Error::Forbidden)
    }

    pub fn get_all_application_status(&self) -> Result<StatusList> {
        let statuses = self.repo.find_all_statuses()?;
        log::debug!("Application statuses: {:?}", statuses);
        Ok(StatusList {
            application_status: statuses,
        })
    }

    /// Apply a partial update. A process instance ID can be set but not cleared.
    pub fn update_application(&self, application_id: i64, update: &ApplicationUpdate) -> Result<ApplicationView> {
        if let Some(status) = &update.application_status
            && status.is_empty()
        {
            return Err(Error::MissingField("application_status".to_string()));
        }
        self.repo
            .update(application_id, update)?
            .map(ApplicationView::from)
            .ok_or_else(invalid_application)
    }

    /// Mapper the application was created under.
    pub fn get_application_form_mapper_by_id(&self, application_id: i64) -> Result<MapperView> {
        self.repo
            .find_mapper_by_application_id(application_id)?
            .map(MapperView::from)
            .ok_or_else(invalid_application)
    }
}
