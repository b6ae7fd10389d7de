//! Endpoint description model.
//!
//! [`ActionDescriptor`] is what the host registers for a handler; [`ApiDescription`]
//! is what the provider chain produces for it and what documentation generators
//! read. Response types on a description are append-only for providers.

use http::Method;
use std::sync::Arc;

use crate::filters::{
    Capability, ClientErrorResultFilter, Filter, FilterDescriptor, FilterScope,
    ModelStateInvalidFilter,
};
use crate::metadata::{ModelMetadata, ModelType};

/// Convert route placeholders to OpenAPI-style placeholders.
///
/// Removes the asterisk prefix from catch-all segments `{*path}`.
///
/// # Examples
///
/// ```
/// # use apidesc::description::openapi_path;
/// assert_eq!(openapi_path("/users/{id}"), "/users/{id}");
/// assert_eq!(openapi_path("/static/{*path}"), "/static/{path}");
/// ```
#[must_use]
pub fn openapi_path(route: &str) -> String {
    route.replace("{*", "{")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
}

/// Declared parameter or bound property of an action.
#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,
    /// JSON Schema type (string, integer, ...); component schema name for `Body`.
    pub param_type: String,
}

/// Response declared by the handler author.
#[derive(Clone, Debug)]
pub struct ResponseSpec {
    pub status: u16,
    pub content_type: &'static str,
    pub description: String,
    pub model: Option<ModelType>,
}

/// One registered handler as seen by description providers.
#[derive(Clone, Debug)]
pub struct ActionDescriptor {
    pub id: String,
    pub method: Method,
    pub route: String,
    pub group_name: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub bound_properties: Vec<ParameterDescriptor>,
    pub filters: Vec<FilterDescriptor>,
    pub responses: Vec<ResponseSpec>,
    /// Hidden from API descriptions.
    pub ignore_api: bool,
}

impl ActionDescriptor {
    /// True when any applied filter reports `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.filters
            .iter()
            .any(|f| f.filter.has_capability(capability))
    }
}

/// Content type (and optional example) a response is produced in.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponseFormat {
    pub media_type: String,
    pub example: Option<serde_json::Value>,
}

impl ApiResponseFormat {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            example: None,
        }
    }
}

/// One possible response of an endpoint. Status `0` is the default response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponseType {
    pub status_code: u16,
    pub is_default_response: bool,
    pub model_metadata: Option<Arc<ModelMetadata>>,
    pub api_response_formats: Vec<ApiResponseFormat>,
}

/// Description of one endpoint, produced by the provider chain.
#[derive(Clone, Debug)]
pub struct ApiDescription {
    pub action: Arc<ActionDescriptor>,
    pub http_method: Method,
    /// Route relative to the API root, without leading `/`.
    pub relative_path: String,
    pub group_name: Option<String>,
    pub supported_response_types: Vec<ApiResponseType>,
}

impl ApiDescription {
    /// Base description for `action` with no response types yet.
    #[must_use]
    pub fn for_action(action: Arc<ActionDescriptor>) -> Self {
        let relative_path = openapi_path(action.route.trim_start_matches('/'));
        Self {
            http_method: action.method.clone(),
            group_name: action.group_name.clone(),
            relative_path,
            action,
            supported_response_types: Vec::new(),
        }
    }
}

/// Registered actions, stamped with a version that changes whenever the set changes.
#[derive(Clone, Debug, Default)]
pub struct ActionDescriptorCollection {
    pub items: Vec<Arc<ActionDescriptor>>,
    pub version: u64,
}

impl ActionDescriptorCollection {
    #[must_use]
    pub fn new(items: Vec<ActionDescriptor>, version: u64) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
            version,
        }
    }
}

/// Builder for [`ActionDescriptor`].
///
/// ```
/// # use apidesc::description::ActionBuilder;
/// let action = ActionBuilder::get("/orders/{orderId}")
///     .path_param("orderId", "Order identifier")
///     .api_behavior()
///     .json_response(http::StatusCode::OK, "Order")
///     .build();
/// assert_eq!(action.id, "get:_orders__orderId_");
/// ```
#[must_use]
pub struct ActionBuilder {
    action: ActionDescriptor,
}

impl ActionBuilder {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        let route = route.into();
        let id = format!(
            "{}:{}",
            method.as_str().to_lowercase(),
            route.replace(['/', '{', '}', '*'], "_")
        );

        Self {
            action: ActionDescriptor {
                id,
                method,
                route,
                group_name: None,
                summary: None,
                tags: Vec::new(),
                parameters: Vec::new(),
                bound_properties: Vec::new(),
                filters: Vec::new(),
                responses: Vec::new(),
                ignore_api: false,
            },
        }
    }

    pub fn get(route: impl Into<String>) -> Self {
        Self::new(Method::GET, route)
    }

    pub fn post(route: impl Into<String>) -> Self {
        Self::new(Method::POST, route)
    }

    pub fn put(route: impl Into<String>) -> Self {
        Self::new(Method::PUT, route)
    }

    pub fn delete(route: impl Into<String>) -> Self {
        Self::new(Method::DELETE, route)
    }

    pub fn patch(route: impl Into<String>) -> Self {
        Self::new(Method::PATCH, route)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.action.id = id.into();
        self
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.action.summary = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.action.tags.push(tag.into());
        self
    }

    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.action.group_name = Some(name.into());
        self
    }

    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.action.parameters.push(param);
        self
    }

    /// Add a path parameter (string typed)
    pub fn path_param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.action.parameters.push(ParameterDescriptor {
            name: name.into(),
            location: ParamLocation::Path,
            required: true,
            description: Some(description.into()),
            param_type: "string".to_owned(),
        });
        self
    }

    /// Add a query parameter with explicit JSON Schema type
    pub fn query_param(
        mut self,
        name: impl Into<String>,
        required: bool,
        param_type: impl Into<String>,
    ) -> Self {
        self.action.parameters.push(ParameterDescriptor {
            name: name.into(),
            location: ParamLocation::Query,
            required,
            description: None,
            param_type: param_type.into(),
        });
        self
    }

    /// Add a JSON body parameter referencing a registered component schema
    pub fn body_param(mut self, name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        self.action.parameters.push(ParameterDescriptor {
            name: name.into(),
            location: ParamLocation::Body,
            required: true,
            description: None,
            param_type: schema_name.into(),
        });
        self
    }

    pub fn bound_property(mut self, property: ParameterDescriptor) -> Self {
        self.action.bound_properties.push(property);
        self
    }

    pub fn filter(mut self, filter: Arc<dyn Filter>, scope: FilterScope) -> Self {
        self.action
            .filters
            .push(FilterDescriptor::new(filter, scope));
        self
    }

    /// Filter with an explicit order within its scope.
    pub fn ordered_filter(
        mut self,
        filter: Arc<dyn Filter>,
        scope: FilterScope,
        order: i32,
    ) -> Self {
        self.action
            .filters
            .push(FilterDescriptor::new(filter, scope).with_order(order));
        self
    }

    /// Opt into opinionated API behavior (automatic validation and problem responses).
    pub fn api_behavior(self) -> Self {
        self.filter(Arc::new(ModelStateInvalidFilter), FilterScope::Controller)
            .filter(Arc::new(ClientErrorResultFilter), FilterScope::Controller)
    }

    pub fn response(mut self, resp: ResponseSpec) -> Self {
        self.action.responses.push(resp);
        self
    }

    /// JSON response without a payload model.
    pub fn json_response(
        mut self,
        status: http::StatusCode,
        description: impl Into<String>,
    ) -> Self {
        self.action.responses.push(ResponseSpec {
            status: status.as_u16(),
            content_type: "application/json",
            description: description.into(),
            model: None,
        });
        self
    }

    /// JSON response whose payload is described by `T`.
    pub fn json_response_with_model<T>(
        mut self,
        status: http::StatusCode,
        description: impl Into<String>,
    ) -> Self
    where
        T: utoipa::ToSchema + 'static,
    {
        self.action.responses.push(ResponseSpec {
            status: status.as_u16(),
            content_type: "application/json",
            description: description.into(),
            model: Some(ModelType::of::<T>()),
        });
        self
    }

    pub fn ignore_api(mut self) -> Self {
        self.action.ignore_api = true;
        self
    }

    /// Finish the action; filters are sorted by order, then scope.
    #[must_use]
    pub fn build(mut self) -> ActionDescriptor {
        self.action.filters.sort_by_key(|f| (f.order, f.scope));
        self.action
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Audit;

    impl Filter for Audit {
        fn name(&self) -> &str {
            "audit"
        }
    }

    #[test]
    fn builder_collects_parameters_in_order() {
        let action = ActionBuilder::put("/orders/{orderId}")
            .path_param("orderId", "Order id")
            .query_param("dryRun", false, "boolean")
            .body_param("order", "Order")
            .build();

        let names: Vec<_> = action.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["orderId", "dryRun", "order"]);
        assert_eq!(action.parameters[2].location, ParamLocation::Body);
        assert_eq!(action.method, Method::PUT);
    }

    #[test]
    fn api_behavior_adds_capability_markers() {
        let action = ActionBuilder::get("/health").api_behavior().build();
        assert_eq!(action.filters.len(), 2);
        assert!(action.has_capability(Capability::ApiBehavior));

        let plain = ActionBuilder::get("/health")
            .filter(Arc::new(Audit), FilterScope::Global)
            .build();
        assert!(!plain.has_capability(Capability::ApiBehavior));
    }

    #[test]
    fn description_strips_leading_slash_and_wildcards() {
        let action = Arc::new(ActionBuilder::get("/files/{*path}").group("v1").build());
        let d = ApiDescription::for_action(action);
        assert_eq!(d.relative_path, "files/{path}");
        assert_eq!(d.group_name.as_deref(), Some("v1"));
        assert_eq!(d.http_method, Method::GET);
        assert!(d.supported_response_types.is_empty());
    }

    #[test]
    fn default_id_is_derived_from_method_and_route() {
        let action = ActionBuilder::delete("/users/{id}").build();
        assert_eq!(action.id, "delete:_users__id_");
        let named = ActionBuilder::delete("/users/{id}").id("remove_user").build();
        assert_eq!(named.id, "remove_user");
    }

    #[test]
    fn filters_are_sorted_by_order_then_scope() {
        let action = ActionBuilder::get("/a")
            .filter(Arc::new(Audit), FilterScope::Action)
            .api_behavior()
            .ordered_filter(Arc::new(Audit), FilterScope::Global, 10)
            .ordered_filter(Arc::new(Audit), FilterScope::Global, -5)
            .build();

        let layout: Vec<_> = action
            .filters
            .iter()
            .map(|f| (f.order, f.scope, f.filter.name()))
            .collect();
        assert_eq!(
            layout,
            [
                (-5, FilterScope::Global, "audit"),
                (0, FilterScope::Controller, "model-state-invalid"),
                (0, FilterScope::Controller, "client-error-result"),
                (0, FilterScope::Action, "audit"),
                (10, FilterScope::Global, "audit"),
            ]
        );
    }

    #[test]
    fn collection_wraps_actions() {
        let c = ActionDescriptorCollection::new(vec![ActionBuilder::get("/a").build()], 7);
        assert_eq!(c.items.len(), 1);
        assert_eq!(c.version, 7);
    }
}
