//! Dot-path form of projections, for stores whose query language expects
//! `{ "parent.child": 1 }` rather than nested objects.
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::projection::Projection;
use crate::projection::ProjectionTree;

/// The inclusion marker of a dot path. Serializes as `1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Inclusion;

impl Serialize for Inclusion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(1)
    }
}

impl<'de> Deserialize<'de> for Inclusion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Inclusion),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Unsigned(other.into()),
                &"the inclusion marker 1",
            )),
        }
    }
}

/// Ordered map from dot-joined field path to [`Inclusion`].
pub type DotPathProjection = IndexMap<String, Inclusion>;

/// Flattens `projection` into dot paths. Nested trees without any key contribute nothing.
pub fn flatten(projection: &ProjectionTree) -> DotPathProjection {
    let mut dot_paths = DotPathProjection::new();
    for (key, value) in projection.iter() {
        match value {
            Projection::Leaf => {
                dot_paths.insert(key.to_string(), Inclusion);
            }
            Projection::Nested(tree) => {
                for (path, _) in flatten(tree) {
                    dot_paths.insert(format!("{key}.{path}"), Inclusion);
                }
            }
        }
    }
    dot_paths
}

/// Rebuilds nesting from dot paths.
///
/// A key that is both a path of its own and the prefix of longer paths becomes a nested tree.
pub fn nest(dot_paths: &DotPathProjection) -> ProjectionTree {
    nest_paths(dot_paths.keys().map(String::as_str))
}

fn nest_paths<'a>(paths: impl Iterator<Item = &'a str>) -> ProjectionTree {
    // Sub-paths per first segment; no sub-path means the segment is a leaf
    let mut segments: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for path in paths {
        match path.split_once('.') {
            Some((head, rest)) => segments.entry(head).or_default().push(rest),
            None => {
                segments.entry(path).or_default();
            }
        }
    }
    segments
        .into_iter()
        .map(|(segment, rest)| {
            let projection = if rest.is_empty() {
                Projection::Leaf
            } else {
                Projection::Nested(nest_paths(rest.into_iter()))
            };
            (segment.to_string(), projection)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tree(value: serde_json::Value) -> ProjectionTree {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flattens_nested_trees() {
        let projection = tree(json!({
            "id": 1,
            "location": { "street": 1, "postCode": 1 },
            "favorites": { "id": 1, "actors": { "firstName": 1, "lastName": 1 } }
        }));

        insta::assert_json_snapshot!(flatten(&projection), @r###"
        {
          "id": 1,
          "location.street": 1,
          "location.postCode": 1,
          "favorites.id": 1,
          "favorites.actors.firstName": 1,
          "favorites.actors.lastName": 1
        }
        "###);
    }

    #[test]
    fn empty_nested_trees_are_dropped() {
        let projection = tree(json!({ "id": 1, "tags": {} }));

        assert_eq!(flatten(&projection).keys().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn nest_reverses_flatten() {
        let projection = tree(json!({
            "id": 1,
            "location": { "street": 1 },
            "favorites": { "id": 1, "actors": { "firstName": 1 } }
        }));

        assert_eq!(nest(&flatten(&projection)), projection);
    }

    #[test]
    fn nest_turns_leaves_into_trees() {
        let dot_paths: DotPathProjection =
            serde_json::from_value(json!({ "address": 1, "address.city": 1 })).unwrap();

        assert_eq!(nest(&dot_paths), tree(json!({ "address": { "city": 1 } })));
    }

    #[test]
    fn nest_keeps_existing_trees() {
        let dot_paths: DotPathProjection =
            serde_json::from_value(json!({ "address.city": 1, "address": 1 })).unwrap();

        assert_eq!(nest(&dot_paths), tree(json!({ "address": { "city": 1 } })));
    }

    #[test]
    fn nest_groups_shared_prefixes() {
        let dot_paths: DotPathProjection = serde_json::from_value(json!({
            "favorites.actors.firstName": 1,
            "id": 1,
            "favorites.actors.lastName": 1,
            "favorites.id": 1
        }))
        .unwrap();

        assert_eq!(
            nest(&dot_paths),
            tree(json!({
                "favorites": { "actors": { "firstName": 1, "lastName": 1 }, "id": 1 },
                "id": 1
            }))
        );
    }

    #[test]
    fn rejects_other_markers() {
        assert!(serde_json::from_value::<DotPathProjection>(json!({ "id": 0 })).is_err());
    }
}
