//! Projection errors.
use displaydoc::Display;
use thiserror::Error;

/// Errors raised while projecting a selection.
///
/// None of these are recoverable locally: they propagate unchanged through the recursion and
/// no partial projection is ever returned. A resolver should surface them as a request error.
#[derive(Error, Display, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProjectionError {
    /// unable to find fragment for selection '{name}'
    MissingFragment {
        /// Name used by the fragment spread.
        name: String,
    },

    /// unable to handle selection of kind '{kind}'
    UnsupportedSelection {
        /// The selection kind, e.g. `InlineFragment`.
        kind: &'static str,
    },

    /// could not resolve return type '{type_name}' to an object, interface or union type
    UnresolvableType {
        /// The innermost named type of the return type.
        type_name: String,
    },

    /// operation {name} is not defined in the document
    UnknownOperation {
        /// The requested operation name, or `<anonymous>`.
        name: String,
    },

    /// root field '{response_key}' is not selected by the operation
    UnknownRootField {
        /// Response key (alias or field name) of the requested root field.
        response_key: String,
    },
}

/// Errors raised while attaching projection metadata to a schema.
#[derive(Error, Display, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum FieldMetadataError {
    /// invalid argument `{argument}` of @{directive} on {coordinate}: {reason}
    InvalidArgument {
        /// `Type.field` the directive is applied to.
        coordinate: String,
        /// Directive name, as configured.
        directive: String,
        /// Argument name.
        argument: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },
}
