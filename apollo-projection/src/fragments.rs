//! Named fragment inlining.
use apollo_compiler::Node;
use apollo_compiler::executable::Field;
use apollo_compiler::executable::FragmentMap;
use apollo_compiler::executable::Selection;
use apollo_compiler::executable::SelectionSet;

use crate::error::ProjectionError;

/// Flattens `selection_set` into the concrete fields it selects, expanding fragment spreads in
/// place, depth first and in declaration order.
///
/// An empty selection set (a leaf field) yields no fields. Fragments may spread other
/// fragments to any depth; cycles are not detected; they are rejected by document
/// validation.
pub fn inline_fragments<'a>(
    selection_set: &'a SelectionSet,
    fragments: &'a FragmentMap,
) -> Result<Vec<&'a Node<Field>>, ProjectionError> {
    let mut fields = Vec::with_capacity(selection_set.selections.len());
    collect_fields(selection_set, fragments, &mut fields)?;
    Ok(fields)
}

fn collect_fields<'a>(
    selection_set: &'a SelectionSet,
    fragments: &'a FragmentMap,
    fields: &mut Vec<&'a Node<Field>>,
) -> Result<(), ProjectionError> {
    for selection in &selection_set.selections {
        match selection {
            Selection::Field(field) => fields.push(field),
            Selection::FragmentSpread(spread) => {
                let fragment = fragments
                    .get(spread.fragment_name.as_str())
                    .ok_or_else(|| ProjectionError::MissingFragment {
                        name: spread.fragment_name.to_string(),
                    })?;
                collect_fields(&fragment.selection_set, fragments, fields)?;
            }
            Selection::InlineFragment(_) => {
                return Err(ProjectionError::UnsupportedSelection {
                    kind: "InlineFragment",
                });
            }
        }
    }
    Ok(())
}
