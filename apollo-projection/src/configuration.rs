//! Projector configuration.
//!
//! Can be created through `serde::Deserialize` from various formats, or parsed from YAML with
//! [`str::parse`]:
//!
//! ```yaml
//! override_mode: merge
//! directives:
//!   projection: storage
//!   ignore: skipStorage
//! ```
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// What happens to a sub-selection requested on a field that declares override fields.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverrideMode {
    /// The override fields replace the field entirely; any sub-selection is discarded.
    #[default]
    Replace,
    /// The override fields are added next to the field, and a sub-selection on the field is
    /// still projected under the field's output name. Ignored fields and fields whose
    /// overrides already include the whole field never get a sub-selection.
    Merge,
}

/// Names of the directives read when attaching projection metadata to a schema.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DirectiveNames {
    /// Directive carrying `field`, `fields` and `storageName` arguments.
    pub projection: String,
    /// Directive projecting a field as a same-named leaf.
    pub include_all: String,
    /// Directive removing a field from projections.
    pub ignore: String,
}

impl Default for DirectiveNames {
    fn default() -> Self {
        Self {
            projection: "projection".to_string(),
            include_all: "includeAll".to_string(),
            ignore: "ignore".to_string(),
        }
    }
}

/// Configuration of a [`Projector`](crate::Projector) and of the schema metadata it reads.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectorConfig {
    /// Behavior of fields with override fields and a sub-selection.
    pub override_mode: OverrideMode,
    /// Directive names read by [`crate::ProjectionSchema::with_config`].
    pub directives: DirectiveNames,
}

impl ProjectorConfig {
    /// JSON schema of the configuration, for editor tooling.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ProjectorConfig)
    }
}

/// Parse configuration from a string in YAML syntax
impl FromStr for ProjectorConfig {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}
