//! Model metadata service.
//!
//! Providers describe payloads through [`ModelMetadata`] obtained from a
//! [`ModelMetadataProvider`] by type identity. The bundled
//! [`SchemaMetadataProvider`] derives metadata from `utoipa::ToSchema`, caches it
//! per type and keeps every schema it has seen in a component registry so
//! documentation generators can emit `#/components/schemas/...` entries.

use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use utoipa::openapi::{schema::Schema, Ref, RefOr};

use crate::error::DescriptionError;

/// Schemas collected for a type: the type itself first, then its dependencies.
pub type SchemaCollection = Vec<(String, RefOr<Schema>)>;

/// Runtime handle on a documentable type.
#[derive(Clone, Copy)]
pub struct ModelType {
    type_id: TypeId,
    type_name: &'static str,
    name: fn() -> Cow<'static, str>,
    schema: fn() -> RefOr<Schema>,
    schemas: fn(&mut SchemaCollection),
}

impl ModelType {
    #[must_use]
    pub fn of<T: utoipa::ToSchema + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            name: T::name,
            schema: <T as utoipa::PartialSchema>::schema,
            schemas: T::schemas,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelType {}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Descriptive metadata of one payload type. Two metadata values are equal when
/// they describe the same type.
#[derive(Clone)]
pub struct ModelMetadata {
    type_id: TypeId,
    type_name: &'static str,
    schema_name: String,
    schema: RefOr<Schema>,
}

impl ModelMetadata {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Component name under `#/components/schemas`.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// The type's own (inline) schema.
    #[must_use]
    pub fn schema(&self) -> &RefOr<Schema> {
        &self.schema
    }

    /// `$ref` pointing at the registered component.
    #[must_use]
    pub fn schema_ref(&self) -> RefOr<Schema> {
        RefOr::Ref(Ref::from_schema_name(self.schema_name.clone()))
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for ModelMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelMetadata {}

impl fmt::Debug for ModelMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMetadata")
            .field("type_name", &self.type_name)
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

/// Lookup of descriptive metadata by type identity.
pub trait ModelMetadataProvider: Send + Sync {
    /// Resolve metadata for `model`.
    ///
    /// # Errors
    /// Returns [`DescriptionError::MetadataUnavailable`] when the type cannot be described.
    fn get_metadata_for_type(
        &self,
        model: &ModelType,
    ) -> Result<Arc<ModelMetadata>, DescriptionError>;

    /// Every component schema registered so far, sorted by name.
    fn schema_components(&self) -> BTreeMap<String, RefOr<Schema>> {
        BTreeMap::new()
    }
}

/// Typed convenience over [`ModelMetadataProvider::get_metadata_for_type`].
///
/// # Errors
/// Propagates the provider's resolution failure.
pub fn metadata_for<T: utoipa::ToSchema + 'static>(
    provider: &dyn ModelMetadataProvider,
) -> Result<Arc<ModelMetadata>, DescriptionError> {
    provider.get_metadata_for_type(&ModelType::of::<T>())
}

/// `utoipa`-backed metadata provider with a per-type cache.
///
/// Uses `DashMap` for the metadata cache and `ArcSwap` for lock-free component
/// reads, so one instance can be shared by every description pass in the process.
pub struct SchemaMetadataProvider {
    cache: DashMap<TypeId, Arc<ModelMetadata>>,
    components: ArcSwap<HashMap<String, RefOr<Schema>>>,
}

impl SchemaMetadataProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            components: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Number of types resolved so far.
    #[must_use]
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    fn register_components(&self, schemas: SchemaCollection) {
        // Snapshot & copy-on-write
        let current = self.components.load();
        let mut reg = (**current).clone();

        for (name, schema) in schemas {
            // Conflict policy: identical → no-op; different → warn & override
            if let Some(existing) = reg.get(&name) {
                let a = serde_json::to_value(existing).ok();
                let b = serde_json::to_value(&schema).ok();
                if a == b {
                    continue;
                }
                tracing::warn!(%name, "Schema content conflict; overriding with latest");
            }
            reg.insert(name, schema);
        }

        self.components.store(Arc::new(reg));
    }
}

impl Default for SchemaMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelMetadataProvider for SchemaMetadataProvider {
    fn get_metadata_for_type(
        &self,
        model: &ModelType,
    ) -> Result<Arc<ModelMetadata>, DescriptionError> {
        if let Some(hit) = self.cache.get(&model.type_id) {
            return Ok(Arc::clone(hit.value()));
        }

        let schema_name = (model.name)().into_owned();
        if schema_name.is_empty() {
            return Err(DescriptionError::MetadataUnavailable {
                type_name: model.type_name,
                reason: "type has no component schema name".to_owned(),
            });
        }

        let schema = (model.schema)();
        let mut collected: SchemaCollection = vec![(schema_name.clone(), schema.clone())];
        (model.schemas)(&mut collected);
        tracing::debug!(
            type_name = model.type_name,
            schema = %schema_name,
            dependencies = collected.len() - 1,
            "Resolved model metadata"
        );
        self.register_components(collected);

        let metadata = Arc::new(ModelMetadata {
            type_id: model.type_id,
            type_name: model.type_name,
            schema_name,
            schema,
        });
        let entry = self.cache.entry(model.type_id).or_insert(metadata);
        Ok(Arc::clone(entry.value()))
    }

    fn schema_components(&self) -> BTreeMap<String, RefOr<Schema>> {
        self.components
            .load()
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use apidesc_errors::Problem;
    use utoipa::openapi::schema::ObjectBuilder;

    #[derive(utoipa::ToSchema, serde::Serialize)]
    struct Order {
        id: i64,
        sku: String,
    }

    #[test]
    fn resolves_problem_metadata() {
        let provider = SchemaMetadataProvider::new();
        let md = metadata_for::<Problem>(&provider).unwrap();

        assert_eq!(md.schema_name(), "Problem");
        assert!(md.is::<Problem>());
        assert!(!md.is::<Order>());
        assert!(provider.schema_components().contains_key("Problem"));
    }

    #[test]
    fn metadata_is_cached_per_type() {
        let provider = SchemaMetadataProvider::new();
        let first = metadata_for::<Problem>(&provider).unwrap();
        let second = metadata_for::<Problem>(&provider).unwrap();
        let other = metadata_for::<Order>(&provider).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_ne!(*first, *other);
        assert_eq!(provider.cached_types(), 2);
    }

    #[test]
    fn schema_ref_points_at_component() {
        let provider = SchemaMetadataProvider::new();
        let md = metadata_for::<Order>(&provider).unwrap();
        let json = serde_json::to_value(md.schema_ref()).unwrap();
        assert_eq!(json["$ref"], "#/components/schemas/Order");
    }

    #[test]
    fn schema_conflict_uses_latest_version() {
        let provider = SchemaMetadataProvider::new();
        let v1 = Schema::Object(ObjectBuilder::new().description(Some("v1")).build());
        let v2 = Schema::Object(ObjectBuilder::new().description(Some("v2")).build());

        provider.register_components(vec![("Thing".to_owned(), RefOr::T(v1))]);
        provider.register_components(vec![("Thing".to_owned(), RefOr::T(v2))]);

        let components = provider.schema_components();
        let json = serde_json::to_value(&components["Thing"]).unwrap();
        assert_eq!(json["description"], "v2");
    }

    struct Nameless;

    impl utoipa::PartialSchema for Nameless {
        fn schema() -> RefOr<Schema> {
            RefOr::T(Schema::Object(ObjectBuilder::new().build()))
        }
    }

    impl utoipa::ToSchema for Nameless {
        fn name() -> std::borrow::Cow<'static, str> {
            std::borrow::Cow::Borrowed("")
        }
    }

    #[test]
    fn empty_schema_name_is_unavailable() {
        let provider = SchemaMetadataProvider::new();
        let err = metadata_for::<Nameless>(&provider).unwrap_err();
        assert!(matches!(err, DescriptionError::MetadataUnavailable { .. }));
        assert_eq!(provider.cached_types(), 0);
    }

    #[test]
    fn model_type_equality_is_type_identity() {
        assert_eq!(ModelType::of::<Problem>(), ModelType::of::<Problem>());
        assert_ne!(ModelType::of::<Problem>(), ModelType::of::<Order>());
        assert!(ModelType::of::<Order>().type_name().ends_with("Order"));
    }
}
