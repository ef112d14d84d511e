//! Selection to projection conversion.
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Node;
use apollo_compiler::ast::NamedType;
use apollo_compiler::ast::Type;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::FragmentMap;

use crate::configuration::OverrideMode;
use crate::configuration::ProjectorConfig;
use crate::error::ProjectionError;
use crate::fragments::inline_fragments;
use crate::projection::ProjectionTree;
use crate::schema::ProjectionSchema;

/// What a resolver knows about the field it is resolving.
#[derive(Clone, Debug)]
pub struct ResolveInfo<'a> {
    /// Selections of the field being resolved. There is more than one when the same response
    /// key is selected several times.
    pub field_nodes: Vec<&'a Node<Field>>,
    /// Declared type of the field being resolved.
    pub return_type: &'a Type,
    /// Fragment definitions of the whole document.
    pub fragments: &'a FragmentMap,
    pub schema: &'a ProjectionSchema,
}

impl<'a> ResolveInfo<'a> {
    /// Resolve info of the root field selected under `response_key` by an operation of
    /// `document`.
    pub fn for_root_field(
        document: &'a ExecutableDocument,
        operation_name: Option<&str>,
        response_key: &str,
        schema: &'a ProjectionSchema,
    ) -> Result<Self, ProjectionError> {
        let operation = document.operations.get(operation_name).map_err(|_| {
            ProjectionError::UnknownOperation {
                name: operation_name.unwrap_or("<anonymous>").to_string(),
            }
        })?;
        let field_nodes: Vec<&Node<Field>> =
            inline_fragments(&operation.selection_set, &document.fragments)?
                .into_iter()
                .filter(|field| field.response_key().as_str() == response_key)
                .collect();
        let Some(&first) = field_nodes.first() else {
            return Err(ProjectionError::UnknownRootField {
                response_key: response_key.to_string(),
            });
        };

        Ok(Self {
            return_type: first.ty(),
            field_nodes,
            fragments: &document.fragments,
            schema,
        })
    }
}

/// Computes projections with a given configuration.
#[derive(Clone, Debug, Default)]
pub struct Projector {
    config: ProjectorConfig,
}

impl Projector {
    /// Only `config.override_mode` matters here. Directive names are read when the schema
    /// metadata is built, see [`ProjectionSchema::with_config`].
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Projection of the sub-selections of `info.field_nodes`.
    pub fn project(&self, info: &ResolveInfo<'_>) -> Result<ProjectionTree, ProjectionError> {
        let walk = Walk {
            schema: info.schema,
            fragments: info.fragments,
            override_mode: self.config.override_mode,
        };
        let projection = walk.project_fields(&info.field_nodes, info.return_type)?;
        tracing::debug!(
            return_type = %info.return_type,
            fields = projection.len(),
            "computed projection"
        );
        Ok(projection)
    }
}

/// [`Projector::project`] with the default configuration.
pub fn project(info: &ResolveInfo<'_>) -> Result<ProjectionTree, ProjectionError> {
    Projector::default().project(info)
}

struct Walk<'a> {
    schema: &'a ProjectionSchema,
    fragments: &'a FragmentMap,
    override_mode: OverrideMode,
}

impl Walk<'_> {
    fn project_fields(
        &self,
        field_nodes: &[&Node<Field>],
        return_type: &Type,
    ) -> Result<ProjectionTree, ProjectionError> {
        let type_name = return_type.inner_named_type();
        let mut projection = ProjectionTree::new();

        for field_node in field_nodes {
            let selections = inline_fragments(&field_node.selection_set, self.fragments)?;
            // The type only matters once there is something to look up in it
            if !selections.is_empty() && !self.schema.has_type(type_name) {
                return Err(ProjectionError::UnresolvableType {
                    type_name: type_name.to_string(),
                });
            }
            for selection in selections {
                self.project_selection(&mut projection, type_name, selection)?;
            }
        }

        Ok(projection)
    }

    fn project_selection(
        &self,
        projection: &mut ProjectionTree,
        type_name: &NamedType,
        selection: &Node<Field>,
    ) -> Result<(), ProjectionError> {
        let Some(metadata) = self.schema.field_metadata(type_name, &selection.name) else {
            tracing::trace!(
                type_name = %type_name,
                field_name = %selection.name,
                "no projection metadata, passing field through"
            );
            projection.include(selection.name.as_str());
            return Ok(());
        };
        let has_sub_selection = !selection.selection_set.selections.is_empty();

        if let Some(override_fields) = &metadata.override_fields {
            for override_field in override_fields {
                projection.include(override_field.as_str());
            }
            let merge_sub_selection = has_sub_selection
                && self.override_mode == OverrideMode::Merge
                && metadata.projects_part_of_field();
            if !merge_sub_selection {
                if has_sub_selection {
                    tracing::debug!(
                        type_name = %type_name,
                        field_name = %selection.name,
                        override_fields = ?override_fields,
                        "discarding sub-selection of overridden field"
                    );
                }
                return Ok(());
            }
        }

        let output_key = metadata.output_key();
        if has_sub_selection {
            let inner = self.project_fields(&[selection], &metadata.ty)?;
            projection.merge_nested(output_key, inner);
        } else {
            projection.include(output_key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::Schema;
    use apollo_compiler::name;
    use apollo_compiler::validation::Valid;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;

    use super::*;
    use crate::directives::PROJECTION_DIRECTIVES_SDL;

    const SCHEMA: &str = r#"
        type Query {
          me: User!
          users: [User!]!
        }

        type User {
          id: ID!
          name: String @projection(fields: ["firstName", "lastName"])
          firstName: String
          lastName: String
          address: Address @projection(field: "addressId", storageName: "location")
          tags: [String] @ignore
        }

        type Address {
          street: String
          city: String
        }
    "#;

    fn parse(query: &str) -> (ProjectionSchema, Valid<ExecutableDocument>) {
        let schema = Schema::parse_and_validate(
            format!("{PROJECTION_DIRECTIVES_SDL}{SCHEMA}"),
            "schema.graphql",
        )
        .unwrap();
        let document =
            ExecutableDocument::parse_and_validate(&schema, query, "query.graphql").unwrap();
        (ProjectionSchema::new(&schema).unwrap(), document)
    }

    fn project_with(
        config: ProjectorConfig,
        query: &str,
        root_field: &str,
    ) -> Result<serde_json::Value, ProjectionError> {
        let (schema, document) = parse(query);
        let info = ResolveInfo::for_root_field(&document, None, root_field, &schema)?;
        let projection = Projector::new(config).project(&info)?;
        Ok(serde_json::to_value(projection).unwrap())
    }

    #[test]
    fn empty_selection_projects_nothing() {
        let return_type = Type::Named(name!("NotRealType"));
        let fragments = FragmentMap::default();
        let schema = ProjectionSchema::default();
        let info = ResolveInfo {
            field_nodes: Vec::new(),
            return_type: &return_type,
            fragments: &fragments,
            schema: &schema,
        };

        assert_eq!(project(&info).unwrap(), ProjectionTree::new());
    }

    #[test]
    fn unknown_return_type_is_unresolvable() {
        let (_, document) = parse("{ me { id } }");
        let schema = ProjectionSchema::default();
        let info = ResolveInfo::for_root_field(&document, None, "me", &schema).unwrap();

        assert_eq!(
            project(&info).unwrap_err(),
            ProjectionError::UnresolvableType {
                type_name: "User".to_string()
            }
        );
    }

    #[test]
    fn replace_mode_discards_sub_selection() {
        let projection = project_with(
            ProjectorConfig::default(),
            "{ me { id address { street } } }",
            "me",
        )
        .unwrap();

        assert_eq!(projection, json!({ "id": 1, "addressId": 1 }));
    }

    #[test]
    fn merge_mode_keeps_sub_selection() {
        let config = ProjectorConfig {
            override_mode: OverrideMode::Merge,
            ..Default::default()
        };
        let projection =
            project_with(config, "{ me { id name address { street } } }", "me").unwrap();

        assert_eq!(
            projection,
            json!({
                "id": 1,
                "firstName": 1,
                "lastName": 1,
                "addressId": 1,
                "location": { "street": 1 }
            })
        );
    }

    #[test]
    fn ignored_fields_contribute_nothing() {
        let projection =
            project_with(ProjectorConfig::default(), "{ users { id tags } }", "users").unwrap();

        assert_eq!(projection, json!({ "id": 1 }));
    }

    #[test]
    fn aliases_are_ignored() {
        let projection = project_with(
            ProjectorConfig::default(),
            "{ account: me { key: id surname: lastName } }",
            "account",
        )
        .unwrap();

        assert_eq!(projection, json!({ "id": 1, "lastName": 1 }));
    }

    #[test]
    fn repeated_root_fields_are_merged() {
        let projection = project_with(
            ProjectorConfig::default(),
            "{ me { id } me { lastName } }",
            "me",
        )
        .unwrap();

        assert_eq!(projection, json!({ "id": 1, "lastName": 1 }));
    }

    #[test]
    fn unknown_operation() {
        let (schema, document) = parse("query GetMe { me { id } }");

        assert_eq!(
            ResolveInfo::for_root_field(&document, Some("GetYou"), "me", &schema).unwrap_err(),
            ProjectionError::UnknownOperation {
                name: "GetYou".to_string()
            }
        );
    }

    #[test]
    fn unknown_root_field() {
        let (schema, document) = parse("{ me { id } }");
        let error = ResolveInfo::for_root_field(&document, None, "users", &schema).unwrap_err();

        insta::assert_snapshot!(error, @"root field 'users' is not selected by the operation");
    }
}
