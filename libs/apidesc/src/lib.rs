//! API descriptions with inferred problem responses
//!
//! Registered actions are turned into endpoint descriptions by an ordered chain
//! of providers. The bundled [`ProblemResponsesProvider`] documents the RFC 9457
//! error responses of actions that opted into opinionated API behavior, so
//! documentation and contract tooling see them without per-handler declarations.
//!
//! # Flow
//! 1. **Registration**: the host builds [`ActionDescriptor`]s (see [`ActionBuilder`]).
//! 2. **Description**: [`ProviderChain`] runs every provider's executing phase
//!    in ascending order, then every executed phase in descending order.
//! 3. **Rendering**: [`openapi::build_openapi`] turns the result into an OpenAPI document.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod default_provider;
pub mod description;
pub mod error;
pub mod explorer;
pub mod filters;
pub mod metadata;
pub mod openapi;
pub mod problem_responses;
pub mod provider;

pub use config::{ApiExplorerConfig, ConfigError, OpenApiInfo, ProblemResponsesConfig};
pub use default_provider::DefaultApiDescriptionProvider;
pub use description::{
    ActionBuilder, ActionDescriptor, ActionDescriptorCollection, ApiDescription,
    ApiResponseFormat, ApiResponseType, ParamLocation, ParameterDescriptor, ResponseSpec,
};
pub use error::{DescriptionError, ProviderPhase};
pub use explorer::ApiExplorer;
pub use filters::{
    Capability, ClientErrorResultFilter, Filter, FilterDescriptor, FilterScope,
    ModelStateInvalidFilter,
};
pub use metadata::{
    ModelMetadata, ModelMetadataProvider, ModelType, SchemaMetadataProvider, metadata_for,
};
pub use problem_responses::{PROBLEM_RESPONSES_ORDER, ProblemResponsesProvider};
pub use provider::{
    ApiDescriptionGroup, ApiDescriptionGroupCollection, ApiDescriptionGroupCollectionProvider,
    ApiDescriptionProvider, ApiDescriptionProviderContext, DEFAULT_PROVIDER_ORDER, ProviderChain,
};
