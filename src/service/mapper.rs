//! Form process mapper registration

use reqwest::StatusCode;

use super::ApplicationService;
use crate::error::{Error, Result};
use crate::models::MapperView;
use crate::store::NewFormProcessMapper;

impl ApplicationService {
    /// Register a mapper from a form to a workflow definition.
    pub fn create_mapper(&self, new: &NewFormProcessMapper) -> Result<MapperView> {
        if new.form_id.is_empty() {
            return Err(Error::MissingField("form_id".to_string()));
        }
        if new.form_name.is_empty() {
            return Err(Error::MissingField("form_name".to_string()));
        }
        let mapper = self.repo.create_mapper(new)?;
        log::info!(
            "Registered mapper {} for form {} (process {:?})",
            mapper.id,
            mapper.form_id,
            mapper.process_key
        );
        Ok(mapper.into())
    }

    /// Active mapper for a form.
    pub fn get_mapper_by_form_id(&self, form_id: &str) -> Result<MapperView> {
        self.repo
            .find_mapper_by_form_id(form_id)?
            .map(MapperView::from)
            .ok_or_else(|| {
                Error::business(
                    StatusCode::NOT_FOUND,
                    format!("No active form process mapper for form {}", form_id),
                )
            })
    }
}
