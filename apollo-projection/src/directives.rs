use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast::Directive;
use apollo_compiler::ast::Value;
use apollo_compiler::schema::FieldDefinition;

use crate::configuration::DirectiveNames;
use crate::error::FieldMetadataError;
use crate::schema::FieldMetadata;

/// Definitions of the projection directives under their default names.
///
/// Add them to a schema so that it validates with the directives applied to its fields:
/// - `@projection(field: "email")` or `@projection(fields: ["firstName", "lastName"])` projects
///   the given storage fields instead of the annotated one.
/// - `@projection(storageName: "location")` renames the field in projections.
/// - `@includeAll` projects the field as a leaf, ignoring any sub-selection.
/// - `@ignore` removes the field from projections.
pub const PROJECTION_DIRECTIVES_SDL: &str = r#"
directive @projection(field: String, fields: [String!], storageName: String) on FIELD_DEFINITION
directive @includeAll on FIELD_DEFINITION
directive @ignore on FIELD_DEFINITION
"#;

const FIELD_ARGUMENT_NAME: &str = "field";
const FIELDS_ARGUMENT_NAME: &str = "fields";
const STORAGE_NAME_ARGUMENT_NAME: &str = "storageName";

/// Reads the projection directives applied to `field`.
///
/// `@ignore` takes precedence over `@includeAll`, which takes precedence over the override
/// fields of `@projection`. `storageName` applies regardless.
pub(crate) fn field_metadata(
    type_name: &Name,
    field: &FieldDefinition,
    names: &DirectiveNames,
) -> Result<FieldMetadata, FieldMetadataError> {
    let mut metadata = FieldMetadata::new(field.name.clone(), field.ty.clone());

    if let Some(directive) = field.directives.get(names.projection.as_str()) {
        let reader = ArgumentReader {
            type_name,
            field_name: &field.name,
            directive,
        };
        metadata.override_fields = match reader.string(FIELD_ARGUMENT_NAME)? {
            Some(single) => Some(vec![single.to_string()]),
            None => reader.string_list(FIELDS_ARGUMENT_NAME)?,
        };
        metadata.storage_name = reader
            .string(STORAGE_NAME_ARGUMENT_NAME)?
            .map(str::to_string);
    }

    if field.directives.has(names.ignore.as_str()) {
        metadata = metadata.ignored();
    } else if field.directives.has(names.include_all.as_str()) {
        metadata = metadata.include_all();
    }

    if metadata.override_fields.is_some() || metadata.storage_name.is_some() {
        tracing::trace!(
            type_name = %type_name,
            field_name = %field.name,
            override_fields = ?metadata.override_fields,
            storage_name = ?metadata.storage_name,
            "attached projection metadata"
        );
    }
    Ok(metadata)
}

struct ArgumentReader<'a> {
    type_name: &'a Name,
    field_name: &'a Name,
    directive: &'a Node<Directive>,
}

impl ArgumentReader<'_> {
    fn value(&self, argument: &str) -> Option<&Node<Value>> {
        self.directive
            .specified_argument_by_name(argument)
            .filter(|value| !matches!(***value, Value::Null))
    }

    fn string(&self, argument: &'static str) -> Result<Option<&str>, FieldMetadataError> {
        self.value(argument)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| self.invalid(argument, "must be a string"))
            })
            .transpose()
    }

    /// A list of strings, or a single string coerced into a one-element list.
    fn string_list(
        &self,
        argument: &'static str,
    ) -> Result<Option<Vec<String>>, FieldMetadataError> {
        let Some(value) = self.value(argument) else {
            return Ok(None);
        };
        if let Some(single) = value.as_str() {
            return Ok(Some(vec![single.to_string()]));
        }
        let items = value
            .as_list()
            .ok_or_else(|| self.invalid(argument, "must be a string or a list of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(argument, "list items must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn invalid(&self, argument: &'static str, reason: &'static str) -> FieldMetadataError {
        FieldMetadataError::InvalidArgument {
            coordinate: format!("{}.{}", self.type_name, self.field_name),
            directive: self.directive.name.to_string(),
            argument,
            reason,
        }
    }
}
