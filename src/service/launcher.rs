//! Workflow start for newly created applications
//!
//! The application row is committed before the engine is called. When the
//! start fails the row stays without a process instance and the error names
//! the application, so the caller can report or retry it.

use std::sync::Arc;

use reqwest::StatusCode;

use crate::client::{ApiResult, BpmApi, ProcessVariables, StartedProcess};
use crate::error::{ApiError, Error, Result};
use crate::store::{Application, ApplicationRepository, ApplicationUpdate, FormProcessMapper};

pub(crate) const GATEWAY_MESSAGE: &str = "Workflow engine not able to create a task";
pub(crate) const REJECTED_MESSAGE: &str = "Process mapper key not provided or rejected";

/// Starts the workflow for an application and records the instance ID
pub struct ProcessLauncher {
    bpm: Arc<dyn BpmApi>,
    repo: Arc<dyn ApplicationRepository>,
}

impl ProcessLauncher {
    pub fn new(bpm: Arc<dyn BpmApi>, repo: Arc<dyn ApplicationRepository>) -> Self {
        Self { bpm, repo }
    }

    /// Start the mapper's process for `application` and attach the instance.
    pub async fn launch(
        &self,
        application: &Application,
        mapper: &FormProcessMapper,
        credential: &str,
    ) -> Result<Application> {
        match self.start(application, mapper, credential).await {
            Ok(started) => {
                log::info!(
                    "Started process {} for application {}",
                    started.id,
                    application.id
                );
                attach_instance(self.repo.as_ref(), application.id, &started.id)
            }
            Err(source @ ApiError::InvalidResponse(_)) => {
                log::error!(
                    "{} (application {}): {}",
                    GATEWAY_MESSAGE,
                    application.id,
                    source
                );
                Err(Error::WorkflowGateway {
                    application_id: application.id,
                    message: GATEWAY_MESSAGE.to_string(),
                    source,
                })
            }
            Err(source) => {
                log::warn!(
                    "{} (application {}): {}",
                    REJECTED_MESSAGE,
                    application.id,
                    source
                );
                Err(Error::WorkflowRejected {
                    application_id: application.id,
                    message: REJECTED_MESSAGE.to_string(),
                    source,
                })
            }
        }
    }

    async fn start(
        &self,
        application: &Application,
        mapper: &FormProcessMapper,
        credential: &str,
    ) -> ApiResult<StartedProcess> {
        let process_key = mapper
            .process_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::MissingProcessKey(mapper.form_id.clone()))?;

        let variables = ProcessVariables {
            application_id: application.id,
            form_url: application.form_url.clone(),
            form_name: application.application_name.clone(),
            submitter_name: application.created_by.clone(),
            submission_date: application.created.to_string(),
        };

        log::debug!(
            "Starting process {} for application {}",
            process_key,
            application.id
        );
        self.bpm
            .start_process(process_key, &variables, credential)
            .await
    }
}

/// Record a process instance on an application with one update.
pub(crate) fn attach_instance(
    repo: &dyn ApplicationRepository,
    application_id: i64,
    instance_id: &str,
) -> Result<Application> {
    repo.update(application_id, &ApplicationUpdate::process_instance(instance_id))?
        .ok_or_else(|| {
            Error::business(
                StatusCode::NOT_FOUND,
                format!("Application {} not found", application_id),
            )
        })
}
