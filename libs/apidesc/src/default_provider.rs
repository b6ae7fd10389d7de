//! Base descriptions from registered actions.

use std::sync::Arc;

use crate::description::{ApiDescription, ApiResponseFormat, ApiResponseType};
use crate::error::DescriptionError;
use crate::metadata::ModelMetadataProvider;
use crate::provider::{
    ApiDescriptionProvider, ApiDescriptionProviderContext, DEFAULT_PROVIDER_ORDER,
};

/// Creates one description per visible action, carrying its declared responses.
pub struct DefaultApiDescriptionProvider {
    metadata_provider: Arc<dyn ModelMetadataProvider>,
}

impl DefaultApiDescriptionProvider {
    #[must_use]
    pub fn new(metadata_provider: Arc<dyn ModelMetadataProvider>) -> Self {
        Self { metadata_provider }
    }

    fn describe(&self, description: &mut ApiDescription) -> Result<(), DescriptionError> {
        for declared in &description.action.responses {
            let model_metadata = declared
                .model
                .as_ref()
                .map(|model| self.metadata_provider.get_metadata_for_type(model))
                .transpose()?;

            description.supported_response_types.push(ApiResponseType {
                status_code: declared.status,
                is_default_response: declared.status == 0,
                model_metadata,
                api_response_formats: vec![ApiResponseFormat::new(declared.content_type)],
            });
        }
        Ok(())
    }
}

impl ApiDescriptionProvider for DefaultApiDescriptionProvider {
    fn name(&self) -> &'static str {
        "default"
    }

    fn order(&self) -> i32 {
        DEFAULT_PROVIDER_ORDER
    }

    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DescriptionError> {
        for action in &context.actions {
            if action.ignore_api {
                tracing::debug!(action = %action.id, "Action hidden from API descriptions");
                continue;
            }
            let mut description = ApiDescription::for_action(Arc::clone(action));
            self.describe(&mut description)?;
            context.results.push(description);
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

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::description::ActionBuilder;
    use crate::metadata::SchemaMetadataProvider;
    use http::StatusCode;

    #[derive(utoipa::ToSchema, serde::Serialize)]
    struct Order {
        id: i64,
    }

    fn run(actions: Vec<crate::description::ActionDescriptor>) -> Vec<ApiDescription> {
        let provider = DefaultApiDescriptionProvider::new(Arc::new(SchemaMetadataProvider::new()));
        let mut context =
            ApiDescriptionProviderContext::new(actions.into_iter().map(Arc::new).collect());
        provider.on_providers_executing(&mut context).unwrap();
        provider.on_providers_executed(&mut context).unwrap();
        context.results
    }

    #[test]
    fn declared_responses_become_response_types() {
        let results = run(vec![
            ActionBuilder::get("/orders/{id}")
                .json_response_with_model::<Order>(StatusCode::OK, "Order")
                .json_response(StatusCode::ACCEPTED, "Queued")
                .build(),
        ]);

        assert_eq!(results.len(), 1);
        let types = &results[0].supported_response_types;
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].status_code, 200);
        assert!(!types[0].is_default_response);
        assert_eq!(
            types[0].model_metadata.as_ref().map(|m| m.schema_name()),
            Some("Order")
        );
        assert_eq!(types[0].api_response_formats[0].media_type, "application/json");
        assert!(types[1].model_metadata.is_none());
    }

    #[test]
    fn ignored_actions_are_skipped() {
        let results = run(vec![
            ActionBuilder::get("/internal").ignore_api().build(),
            ActionBuilder::get("/public").build(),
        ]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relative_path, "public");
    }
}
