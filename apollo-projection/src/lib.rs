//! ## Usage
//!
//! `apollo-projection` computes, for the field a resolver is currently resolving, which
//! storage fields have to be fetched to answer the selection the client asked for.
//!
//! ```ignore
//! let schema = ProjectionSchema::new(&valid_schema)?;
//! let info = ResolveInfo::for_root_field(&document, None, "user", &schema)?;
//! let projection = apollo_projection::project(&info)?;
//! // {"id": 1, "location": {"street": 1}}
//! let dot_paths = apollo_projection::flatten(&projection);
//! // {"id": 1, "location.street": 1}
//! ```
//!
//! Field metadata comes from the `@projection`, `@includeAll` and `@ignore` directives (see
//! [`PROJECTION_DIRECTIVES_SDL`]) or can be attached directly with
//! [`ProjectionSchema::insert_field_metadata`].

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

pub mod configuration;
mod directives;
pub mod dot_path;
pub mod error;
pub(crate) mod fragments;
pub mod projection;
mod projector;
pub mod schema;

pub use crate::configuration::DirectiveNames;
pub use crate::configuration::OverrideMode;
pub use crate::configuration::ProjectorConfig;
pub use crate::directives::PROJECTION_DIRECTIVES_SDL;
pub use crate::dot_path::DotPathProjection;
pub use crate::dot_path::flatten;
pub use crate::dot_path::nest;
pub use crate::error::FieldMetadataError;
pub use crate::error::ProjectionError;
pub use crate::fragments::inline_fragments;
pub use crate::projection::Projection;
pub use crate::projection::ProjectionTree;
pub use crate::projector::Projector;
pub use crate::projector::ResolveInfo;
pub use crate::projector::project;
pub use crate::schema::FieldMetadata;
pub use crate::schema::ProjectionSchema;
