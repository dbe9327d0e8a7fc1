//! Application creation

use reqwest::StatusCode;
use serde::Deserialize;

use super::ApplicationService;
use super::launcher::attach_instance;
use crate::error::{Error, Result};
use crate::store::{Application, NEW_APPLICATION_STATUS, NewApplication};

/// Caller input for a new application.
///
/// There is no status field: every application starts as
/// [`NEW_APPLICATION_STATUS`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateApplicationRequest {
    #[serde(default, alias = "formId")]
    pub form_id: Option<String>,
    #[serde(default, alias = "formUrl")]
    pub form_url: Option<String>,
    /// Attach an existing process instance instead of starting one
    #[serde(default, alias = "processInstanceId")]
    pub process_instance_id: Option<String>,
    #[serde(default, alias = "createdBy")]
    pub created_by: Option<String>,
}

impl ApplicationService {
    /// Persist a new application and associate it with a workflow instance.
    ///
    /// With a caller-supplied `process_instance_id` the engine is not called;
    /// an empty one is rejected before anything is persisted.
    /// Otherwise the mapper's process is started; when that fails the
    /// application stays persisted and the error carries its ID.
    pub async fn create_application(
        &self,
        request: &CreateApplicationRequest,
        credential: &str,
    ) -> Result<Application> {
        let form_id = request
            .form_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingField("form_id".to_string()))?;

        if request.process_instance_id.as_deref() == Some("") {
            return Err(Error::MissingField("process_instance_id".to_string()));
        }

        let mapper = self.repo.find_mapper_by_form_id(form_id)?.ok_or_else(|| {
            Error::business(
                StatusCode::NOT_FOUND,
                format!("No active form process mapper for form {}", form_id),
            )
        })?;

        let application = self.repo.create(&NewApplication {
            application_name: mapper.form_name.clone(),
            application_status: NEW_APPLICATION_STATUS.to_string(),
            form_process_mapper_id: mapper.id,
            form_url: request.form_url.clone(),
            created_by: request.created_by.clone(),
        })?;
        log::info!(
            "Created application {} for form {} (mapper {})",
            application.id,
            form_id,
            mapper.id
        );

        if let Some(instance_id) = request.process_instance_id.as_deref() {
            return attach_instance(self.repo.as_ref(), application.id, instance_id);
        }

        self.launcher.launch(&application, &mapper, credential).await
    }
}
