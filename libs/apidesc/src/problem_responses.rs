//! Problem responses for actions with opinionated API behavior.
//!
//! Actions carrying a filter with [`Capability::ApiBehavior`] validate their input
//! automatically and report failures as RFC 9457 problems. This provider documents
//! those responses, inferring them from the action's shape:
//! - any parameter or bound property → `400` (model validation failed);
//! - a parameter whose name ends in `id` (case-insensitive) → `404`;
//! - always a default (`0`) problem response, last.
//!
//! The `id` check is a plain suffix match: `validId` and `rapid` match,
//! `rapidFire` does not. Characters are compared by their simple uppercase
//! mapping, so `ıd` (dotless i) matches too. Consumers depend on exactly this
//! behavior.

use apidesc_errors::{PROBLEM_MEDIA_TYPES, Problem};
use http::StatusCode;
use std::sync::Arc;

use crate::description::{ApiDescription, ApiResponseFormat, ApiResponseType};
use crate::error::DescriptionError;
use crate::filters::Capability;
use crate::metadata::{ModelMetadata, ModelMetadataProvider, metadata_for};
use crate::provider::{
    ApiDescriptionProvider, ApiDescriptionProviderContext, DEFAULT_PROVIDER_ORDER,
};

/// Runs right after the default provider so base descriptions exist.
pub const PROBLEM_RESPONSES_ORDER: i32 = DEFAULT_PROVIDER_ORDER + 10;

pub struct ProblemResponsesProvider {
    metadata_provider: Arc<dyn ModelMetadataProvider>,
}

impl ProblemResponsesProvider {
    #[must_use]
    pub fn new(metadata_provider: Arc<dyn ModelMetadataProvider>) -> Self {
        Self { metadata_provider }
    }

    /// True when the described action opted into opinionated API behavior.
    #[must_use]
    pub fn applies_to(&self, description: &ApiDescription) -> bool {
        description.action.has_capability(Capability::ApiBehavior)
    }

    /// Problem responses for `description`, in emission order.
    ///
    /// # Errors
    /// Returns the metadata lookup failure for the problem payload.
    pub fn create_problem_response_types(
        &self,
        description: &ApiDescription,
    ) -> Result<Vec<ApiResponseType>, DescriptionError> {
        let metadata = metadata_for::<Problem>(self.metadata_provider.as_ref())?;
        let action = &description.action;
        let mut types = Vec::with_capacity(3);

        if !action.parameters.is_empty() || !action.bound_properties.is_empty() {
            // For validation errors.
            types.push(problem_response(&metadata, StatusCode::BAD_REQUEST.as_u16(), false));

            if action
                .parameters
                .iter()
                .any(|p| ends_with_ignore_case(&p.name, "id"))
            {
                types.push(problem_response(&metadata, StatusCode::NOT_FOUND.as_u16(), false));
            }
        }

        types.push(problem_response(&metadata, 0, true));
        Ok(types)
    }
}

fn problem_response(
    metadata: &Arc<ModelMetadata>,
    status_code: u16,
    is_default_response: bool,
) -> ApiResponseType {
    ApiResponseType {
        status_code,
        is_default_response,
        model_metadata: Some(Arc::clone(metadata)),
        api_response_formats: PROBLEM_MEDIA_TYPES
            .iter()
            .map(|media_type| ApiResponseFormat::new(*media_type))
            .collect(),
    }
}

/// Simple uppercase mapping; characters with a multi-char uppercase map to themselves.
fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Per-character suffix comparison ignoring case.
fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    let mut tail = value.chars().rev();
    suffix
        .chars()
        .rev()
        .all(|s| tail.next().is_some_and(|v| fold(v) == fold(s)))
}

impl ApiDescriptionProvider for ProblemResponsesProvider {
    fn name(&self) -> &'static str {
        "problem-responses"
    }

    fn order(&self) -> i32 {
        PROBLEM_RESPONSES_ORDER
    }

    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DescriptionError> {
        for description in &mut context.results {
            if !self.applies_to(description) {
                continue;
            }

            let types = self.create_problem_response_types(description)?;
            tracing::debug!(
                route = %description.relative_path,
                method = %description.http_method,
                added = types.len(),
                "Added problem response types"
            );
            description.supported_response_types.extend(types);
        }
        Ok(())
    }

    fn on_providers_executed(
        &self,
        _context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DescriptionError> {
        Ok(())
    }
}
