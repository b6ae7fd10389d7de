//! Provider chain.
//!
//! A pass builds one [`ApiDescriptionProviderContext`] and hands it to every
//! registered [`ApiDescriptionProvider`] twice:
//! 1. **Executing**: providers in ascending `order` create and augment descriptions.
//! 2. **Executed**: providers in descending `order` finalize and cross-reference.
//!
//! Execution is strictly sequential; a provider owns the context for the
//! duration of its call. The first error aborts the pass.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::description::{ActionDescriptor, ActionDescriptorCollection, ApiDescription};
use crate::error::{DescriptionError, ProviderPhase};

/// Order of the provider that creates base descriptions from actions.
pub const DEFAULT_PROVIDER_ORDER: i32 = -1000;

/// Shared state of one description pass.
#[derive(Debug)]
pub struct ApiDescriptionProviderContext {
    pub actions: Vec<Arc<ActionDescriptor>>,
    pub results: Vec<ApiDescription>,
}

impl ApiDescriptionProviderContext {
    #[must_use]
    pub fn new(actions: Vec<Arc<ActionDescriptor>>) -> Self {
        Self {
            actions,
            results: Vec::new(),
        }
    }
}

/// One stage of the description chain.
pub trait ApiDescriptionProvider: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Lower runs earlier in the executing phase and later in the executed phase.
    fn order(&self) -> i32;

    /// # Errors
    /// Any error aborts the pass.
    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DescriptionError>;

    /// # Errors
    /// Any error aborts the pass.
    fn on_providers_executed(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DescriptionError>;
}

/// Descriptions sharing a group name.
#[derive(Clone, Debug)]
pub struct ApiDescriptionGroup {
    pub group_name: Option<String>,
    pub items: Vec<ApiDescription>,
}

/// Result of a pass, grouped by group name in first-seen order.
#[derive(Clone, Debug)]
pub struct ApiDescriptionGroupCollection {
    pub items: Vec<ApiDescriptionGroup>,
    /// Version of the action collection the groups were built from.
    pub version: u64,
}

impl ApiDescriptionGroupCollection {
    #[must_use]
    pub fn from_results(results: Vec<ApiDescription>, version: u64) -> Self {
        let mut items: Vec<ApiDescriptionGroup> = Vec::new();
        for description in results {
            if let Some(group) = items
                .iter_mut()
                .find(|g| g.group_name == description.group_name)
            {
                group.items.push(description);
            } else {
                items.push(ApiDescriptionGroup {
                    group_name: description.group_name.clone(),
                    items: vec![description],
                });
            }
        }
        Self { items, version }
    }

    /// All descriptions across groups.
    pub fn descriptions(&self) -> impl Iterator<Item = &ApiDescription> {
        self.items.iter().flat_map(|g| g.items.iter())
    }
}

/// Ordered set of providers and the driver running them.
#[derive(Default, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ApiDescriptionProvider>>,
}

impl ProviderChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Providers with equal order keep registration order.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ApiDescriptionProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn register(&mut self, provider: Arc<dyn ApiDescriptionProvider>) {
        self.providers.push(provider);
        self.providers.sort_by_key(|p| p.order());
    }

    /// Provider names in executing order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run both phases over `actions` and return the raw results.
    ///
    /// # Errors
    /// Returns [`DescriptionError::Provider`] wrapping the first provider failure.
    pub fn run(
        &self,
        actions: Vec<Arc<ActionDescriptor>>,
    ) -> Result<Vec<ApiDescription>, DescriptionError> {
        let mut context = ApiDescriptionProviderContext::new(actions);

        for provider in &self.providers {
            tracing::debug!(
                provider = provider.name(),
                order = provider.order(),
                descriptions = context.results.len(),
                "Running provider (executing)"
            );
            provider
                .on_providers_executing(&mut context)
                .map_err(|e| wrap(provider.name(), ProviderPhase::Executing, e))?;
        }

        for provider in self.providers.iter().rev() {
            tracing::debug!(
                provider = provider.name(),
                order = provider.order(),
                descriptions = context.results.len(),
                "Running provider (executed)"
            );
            provider
                .on_providers_executed(&mut context)
                .map_err(|e| wrap(provider.name(), ProviderPhase::Executed, e))?;
        }

        tracing::info!(
            providers = self.providers.len(),
            descriptions = context.results.len(),
            "API description pass complete"
        );
        Ok(context.results)
    }

    /// Run a pass over `actions` and group the results.
    ///
    /// # Errors
    /// See [`ProviderChain::run`].
    pub fn execute(
        &self,
        actions: &ActionDescriptorCollection,
    ) -> Result<ApiDescriptionGroupCollection, DescriptionError> {
        let results = self.run(actions.items.clone())?;
        Ok(ApiDescriptionGroupCollection::from_results(
            results,
            actions.version,
        ))
    }
}

fn wrap(
    provider: &'static str,
    phase: ProviderPhase,
    source: DescriptionError,
) -> DescriptionError {
    DescriptionError::Provider {
        provider,
        phase,
        source: Box::new(source),
    }
}

/// Caches the last grouped result per action-collection version.
pub struct ApiDescriptionGroupCollectionProvider {
    chain: ProviderChain,
    cached: ArcSwapOption<ApiDescriptionGroupCollection>,
}

impl ApiDescriptionGroupCollectionProvider {
    #[must_use]
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain,
            cached: ArcSwapOption::empty(),
        }
    }

    #[must_use]
    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Groups for `actions`, rebuilt only when the collection version changed.
    ///
    /// # Errors
    /// See [`ProviderChain::run`]. A failed pass leaves the previous cache in place.
    pub fn api_description_groups(
        &self,
        actions: &ActionDescriptorCollection,
    ) -> Result<Arc<ApiDescriptionGroupCollection>, DescriptionError> {
        if let Some(current) = self.cached.load_full()
            && current.version == actions.version
        {
            return Ok(current);
        }

        let groups = Arc::new(self.chain.execute(actions)?);
        self.cached.store(Some(Arc::clone(&groups)));
        Ok(groups)
    }
}
