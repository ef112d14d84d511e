//! Field metadata consulted by the projector.
//!
//! A [`ProjectionSchema`] is built once, when the GraphQL schema is loaded, and is read-only
//! afterwards: it can be shared between concurrently running resolvers.
use ahash::HashMap;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;

use crate::configuration::DirectiveNames;
use crate::configuration::ProjectorConfig;
use crate::directives;
use crate::error::FieldMetadataError;

/// How a schema field maps to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Name of the field in the GraphQL schema.
    pub name: Name,
    /// Declared output type of the field.
    pub ty: Type,
    /// Storage fields projected instead of this field. An empty list projects nothing.
    pub override_fields: Option<Vec<String>>,
    /// Name of the field in storage, when it differs from the schema name.
    pub storage_name: Option<String>,
}

impl FieldMetadata {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            ty,
            override_fields: None,
            storage_name: None,
        }
    }

    pub fn with_override_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.override_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Single override field; same as a one-element [`Self::with_override_fields`].
    pub fn with_override_field(self, field: impl Into<String>) -> Self {
        self.with_override_fields([field.into()])
    }

    /// Projects the field as a leaf of its own name, whatever the query selects below it.
    pub fn include_all(self) -> Self {
        let name = self.name.to_string();
        self.with_override_fields([name])
    }

    /// Removes the field from projections.
    pub fn ignored(mut self) -> Self {
        self.override_fields = Some(Vec::new());
        self
    }

    pub fn with_storage_name(mut self, storage_name: impl Into<String>) -> Self {
        self.storage_name = Some(storage_name.into());
        self
    }

    /// Whether the override fields leave room for a sub-selection of the field itself. That is
    /// not the case for ignored fields, nor when the field is already projected as a whole.
    pub fn projects_part_of_field(&self) -> bool {
        match &self.override_fields {
            None => true,
            Some(fields) => {
                !fields.is_empty()
                    && !fields
                        .iter()
                        .any(|field| field == self.name.as_str() || field == self.output_key())
            }
        }
    }

    /// Key under which the field appears in a projection tree.
    pub fn output_key(&self) -> &str {
        self.storage_name.as_deref().unwrap_or(self.name.as_str())
    }
}

/// Field metadata of every object, interface and union type of a schema, keyed by type name
/// and field name.
#[derive(Clone, Debug, Default)]
pub struct ProjectionSchema {
    type_field_metadata: HashMap<Name, HashMap<Name, FieldMetadata>>,
}

impl ProjectionSchema {
    /// Builds the metadata of `schema` using the default directive names.
    pub fn new(schema: &Valid<Schema>) -> Result<Self, FieldMetadataError> {
        Self::with_directives(schema, &DirectiveNames::default())
    }

    /// Builds the metadata of `schema` with the directive names of `config`.
    pub fn with_config(
        schema: &Valid<Schema>,
        config: &ProjectorConfig,
    ) -> Result<Self, FieldMetadataError> {
        Self::with_directives(schema, &config.directives)
    }

    /// Builds the metadata of `schema`, reading projection directives under the given names.
    pub fn with_directives(
        schema: &Valid<Schema>,
        directive_names: &DirectiveNames,
    ) -> Result<Self, FieldMetadataError> {
        let mut projection_schema = Self::default();

        for (type_name, type_) in &schema.types {
            if type_.is_built_in() {
                continue;
            }
            match type_ {
                ExtendedType::Object(ty) => {
                    for field in ty.fields.values() {
                        projection_schema.insert_field_metadata(
                            type_name.clone(),
                            directives::field_metadata(type_name, field, directive_names)?,
                        );
                    }
                }
                ExtendedType::Interface(ty) => {
                    for field in ty.fields.values() {
                        projection_schema.insert_field_metadata(
                            type_name.clone(),
                            directives::field_metadata(type_name, field, directive_names)?,
                        );
                    }
                }
                ExtendedType::Union(_) => {
                    // Only `__typename` can be selected directly on a union
                    projection_schema.insert_type(type_name.clone());
                }
                _ => {
                    // Other types can't be the parent of a selection
                }
            }
        }

        tracing::debug!(
            types = projection_schema.type_field_metadata.len(),
            "built projection schema"
        );
        Ok(projection_schema)
    }

    /// Registers a type that selections can be made on, without any field metadata.
    pub fn insert_type(&mut self, type_name: Name) {
        self.type_field_metadata.entry(type_name).or_default();
    }

    /// Attaches `metadata` to `type_name.<metadata.name>`, returning what was attached before.
    pub fn insert_field_metadata(
        &mut self,
        type_name: Name,
        metadata: FieldMetadata,
    ) -> Option<FieldMetadata> {
        self.type_field_metadata
            .entry(type_name)
            .or_default()
            .insert(metadata.name.clone(), metadata)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.type_field_metadata.contains_key(type_name)
    }

    pub fn field_metadata(&self, type_name: &str, field_name: &str) -> Option<&FieldMetadata> {
        self.type_field_metadata
            .get(type_name)
            .and_then(|fields| fields.get(field_name))
    }
}
