//! OpenAPI rendering of API descriptions.
//!
//! Turns the grouped output of a description pass into a `utoipa` OpenAPI
//! document. Default response types (status `0`) are emitted under the
//! `default` key; every response format becomes one content entry referencing
//! the payload's component schema.

use anyhow::{Result, bail};
use http::{Method, StatusCode};
use utoipa::openapi::{
    OpenApi, OpenApiBuilder, Ref, RefOr, Required,
    content::{Content, ContentBuilder},
    info::InfoBuilder,
    path::{
        HttpMethod, OperationBuilder as UOperationBuilder, ParameterBuilder, ParameterIn,
        PathItemBuilder, PathsBuilder,
    },
    request_body::RequestBodyBuilder,
    response::{ResponseBuilder, ResponsesBuilder},
    schema::{ComponentsBuilder, ObjectBuilder, Schema, SchemaType, Type},
};

use crate::config::OpenApiInfo;
use crate::description::{ApiDescription, ApiResponseType, ParamLocation};
use crate::metadata::ModelMetadataProvider;
use crate::provider::ApiDescriptionGroupCollection;

/// Response key, description and content entries of one rendered response.
type MergedResponse = (String, &'static str, Vec<(String, Content)>);

/// Response key for a response type: the status code, or `default`.
#[must_use]
pub fn response_key(response: &ApiResponseType) -> String {
    if response.is_default_response || response.status_code == 0 {
        "default".to_owned()
    } else {
        response.status_code.to_string()
    }
}

fn response_description(response: &ApiResponseType) -> &'static str {
    if response.is_default_response {
        return "Error";
    }
    StatusCode::from_u16(response.status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Response")
}

fn http_method(method: &Method) -> Result<HttpMethod> {
    Ok(match *method {
        Method::GET => HttpMethod::Get,
        Method::POST => HttpMethod::Post,
        Method::PUT => HttpMethod::Put,
        Method::DELETE => HttpMethod::Delete,
        Method::PATCH => HttpMethod::Patch,
        Method::HEAD => HttpMethod::Head,
        Method::OPTIONS => HttpMethod::Options,
        Method::TRACE => HttpMethod::Trace,
        _ => bail!("HTTP method {method} cannot be documented in OpenAPI"),
    })
}

fn response_content(response: &ApiResponseType) -> Vec<(String, Content)> {
    let schema = response.model_metadata.as_ref().map_or_else(
        || RefOr::T(Schema::Object(ObjectBuilder::new().build())),
        |md| md.schema_ref(),
    );
    response
        .api_response_formats
        .iter()
        .map(|format| {
            let content = ContentBuilder::new()
                .schema(Some(schema.clone()))
                .example(format.example.clone())
                .build();
            (format.media_type.clone(), content)
        })
        .collect()
}

fn build_operation(description: &ApiDescription) -> utoipa::openapi::path::Operation {
    let action = &description.action;
    let mut op = UOperationBuilder::new()
        .operation_id(Some(action.id.clone()))
        .summary(action.summary.clone());

    if action.tags.is_empty() {
        if let Some(group) = &description.group_name {
            op = op.tag(group.clone());
        }
    } else {
        for tag in &action.tags {
            op = op.tag(tag.clone());
        }
    }

    // Parameters
    for p in action.parameters.iter().chain(&action.bound_properties) {
        let in_ = match p.location {
            ParamLocation::Path => ParameterIn::Path,
            ParamLocation::Query => ParameterIn::Query,
            ParamLocation::Header => ParameterIn::Header,
            ParamLocation::Cookie => ParameterIn::Cookie,
            ParamLocation::Body => continue,
        };
        let required = if matches!(p.location, ParamLocation::Path) || p.required {
            Required::True
        } else {
            Required::False
        };
        let schema_type = match p.param_type.as_str() {
            "integer" => SchemaType::Type(Type::Integer),
            "number" => SchemaType::Type(Type::Number),
            "boolean" => SchemaType::Type(Type::Boolean),
            _ => SchemaType::Type(Type::String),
        };
        let schema = Schema::Object(ObjectBuilder::new().schema_type(schema_type).build());

        op = op.parameter(
            ParameterBuilder::new()
                .name(&p.name)
                .parameter_in(in_)
                .required(required)
                .description(p.description.clone())
                .schema(Some(schema))
                .build(),
        );
    }

    // Request body
    if let Some(body) = action
        .parameters
        .iter()
        .find(|p| p.location == ParamLocation::Body)
    {
        let content = ContentBuilder::new()
            .schema(Some(RefOr::Ref(Ref::from_schema_name(body.param_type.clone()))))
            .build();
        let mut rb = RequestBodyBuilder::new()
            .description(body.description.clone())
            .content("application/json", content);
        if body.required {
            rb = rb.required(Some(Required::True));
        }
        op = op.request_body(Some(rb.build()));
    }

    // Responses; response types sharing a key are merged, first description wins.
    let mut merged: Vec<MergedResponse> = Vec::new();
    for response in &description.supported_response_types {
        let key = response_key(response);
        let content = response_content(response);
        if let Some((_, _, existing)) = merged.iter_mut().find(|(k, _, _)| *k == key) {
            for (media_type, c) in content {
                if !existing.iter().any(|(m, _)| *m == media_type) {
                    existing.push((media_type, c));
                }
            }
        } else {
            merged.push((key, response_description(response), content));
        }
    }

    let mut responses = ResponsesBuilder::new();
    for (key, desc, content) in merged {
        let mut resp = ResponseBuilder::new().description(desc);
        for (media_type, c) in content {
            resp = resp.content(media_type, c);
        }
        responses = responses.response(key, resp.build());
    }
    op.responses(responses.build()).build()
}

/// Render `groups` into an OpenAPI document.
///
/// Component schemas are taken from `metadata`, so every payload referenced by
/// a response type resolves inside the document.
///
/// # Errors
/// Fails when a description uses an HTTP method OpenAPI cannot express.
pub fn build_openapi(
    groups: &ApiDescriptionGroupCollection,
    metadata: &dyn ModelMetadataProvider,
    info: &OpenApiInfo,
) -> Result<OpenApi> {
    let mut paths = PathsBuilder::new();
    let mut op_count = 0usize;

    for description in groups.descriptions() {
        let method = http_method(&description.http_method)?;
        let item = PathItemBuilder::new()
            .operation(method, build_operation(description))
            .build();
        paths = paths.path(format!("/{}", description.relative_path), item);
        op_count += 1;
    }

    let mut components = ComponentsBuilder::new();
    for (name, schema) in metadata.schema_components() {
        components = components.schema(name, schema);
    }

    let openapi_info = InfoBuilder::new()
        .title(&info.title)
        .version(&info.version)
        .description(info.description.clone())
        .build();

    tracing::info!(
        operations = op_count,
        version = groups.version,
        "Built OpenAPI document from API descriptions"
    );

    Ok(OpenApiBuilder::new()
        .info(openapi_info)
        .paths(paths.build())
        .components(Some(components.build()))
        .build())
}
