//! Configured entry point: provider chain, cache and OpenAPI rendering in one place.

use figment::Figment;
use std::sync::Arc;
use utoipa::openapi::OpenApi;

use crate::config::{ApiExplorerConfig, ConfigError};
use crate::default_provider::DefaultApiDescriptionProvider;
use crate::description::ActionDescriptorCollection;
use crate::error::DescriptionError;
use crate::metadata::ModelMetadataProvider;
use crate::openapi::build_openapi;
use crate::problem_responses::ProblemResponsesProvider;
use crate::provider::{
    ApiDescriptionGroupCollection, ApiDescriptionGroupCollectionProvider, ApiDescriptionProvider,
    ProviderChain,
};

pub struct ApiExplorer {
    config: ApiExplorerConfig,
    metadata: Arc<dyn ModelMetadataProvider>,
    collection: ApiDescriptionGroupCollectionProvider,
}

impl ApiExplorer {
    /// Explorer with the built-in providers enabled by `config`.
    #[must_use]
    pub fn new(config: ApiExplorerConfig, metadata: Arc<dyn ModelMetadataProvider>) -> Self {
        Self::with_providers(config, metadata, Vec::new())
    }

    /// Explorer configured from the `api_explorer` section of `figment`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the section is present but invalid.
    pub fn from_figment(
        figment: &Figment,
        metadata: Arc<dyn ModelMetadataProvider>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(ApiExplorerConfig::from_figment(figment)?, metadata))
    }

    /// Explorer with the built-in providers plus host-supplied `extra` providers.
    #[must_use]
    pub fn with_providers(
        config: ApiExplorerConfig,
        metadata: Arc<dyn ModelMetadataProvider>,
        extra: Vec<Arc<dyn ApiDescriptionProvider>>,
    ) -> Self {
        let mut chain = ProviderChain::new().with_provider(Arc::new(
            DefaultApiDescriptionProvider::new(Arc::clone(&metadata)),
        ));
        if config.problem_responses.enabled {
            chain.register(Arc::new(ProblemResponsesProvider::new(Arc::clone(
                &metadata,
            ))));
        } else {
            tracing::info!("Problem response inference disabled by configuration");
        }
        for provider in extra {
            chain.register(provider);
        }

        Self {
            config,
            metadata,
            collection: ApiDescriptionGroupCollectionProvider::new(chain),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiExplorerConfig {
        &self.config
    }

    #[must_use]
    pub fn chain(&self) -> &ProviderChain {
        self.collection.chain()
    }

    /// Grouped descriptions for `actions`, cached per collection version.
    ///
    /// # Errors
    /// Propagates the first provider failure.
    pub fn describe(
        &self,
        actions: &ActionDescriptorCollection,
    ) -> Result<Arc<ApiDescriptionGroupCollection>, DescriptionError> {
        self.collection.api_description_groups(actions)
    }

    /// OpenAPI document for `actions`.
    ///
    /// # Errors
    /// Fails if the description pass or the rendering fails.
    pub fn openapi(&self, actions: &ActionDescriptorCollection) -> anyhow::Result<OpenApi> {
        let groups = self.describe(actions)?;
        build_openapi(&groups, self.metadata.as_ref(), &self.config.openapi)
    }
}
