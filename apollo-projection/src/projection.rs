//! The projection tree handed to the data-fetching layer.
//!
//! A projection tree maps output field names to either the inclusion marker (serialized as
//! `1`) or to the projection of a nested field (serialized as an object):
//!
//! ```json
//! { "id": 1, "location": { "street": 1, "postCode": 1 } }
//! ```

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::Visitor;
use serde::ser::SerializeMap;

/// The value of a key in a [`ProjectionTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    /// Include this field as a whole.
    Leaf,
    /// Include only these sub-fields of this field.
    Nested(ProjectionTree),
}

impl Projection {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Projection::Leaf)
    }

    pub fn as_nested(&self) -> Option<&ProjectionTree> {
        match self {
            Projection::Leaf => None,
            Projection::Nested(tree) => Some(tree),
        }
    }
}

/// Ordered map from output field name to [`Projection`].
///
/// Keys are unique. Inserting an existing key overwrites the previous value but keeps its
/// position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectionTree {
    fields: IndexMap<String, Projection>,
}

impl ProjectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Projection> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Projection)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Marks `key` as included, replacing whatever was recorded for it.
    pub fn include(&mut self, key: impl Into<String>) {
        self.fields.insert(key.into(), Projection::Leaf);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Projection) -> Option<Projection> {
        self.fields.insert(key.into(), value)
    }

    /// Merges `tree` into the nested tree stored under `key`. An absent key or a leaf is
    /// replaced by `tree`.
    pub fn merge_nested(&mut self, key: impl Into<String>, tree: ProjectionTree) {
        match self.fields.entry(key.into()) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Projection::Nested(existing) => existing.merge(tree),
                Projection::Leaf => {
                    entry.insert(Projection::Nested(tree));
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(Projection::Nested(tree));
            }
        }
    }

    /// Copies every key of `other` into `self`. On collision the value from `other` wins.
    pub fn merge(&mut self, other: ProjectionTree) {
        self.fields.extend(other.fields);
    }
}

impl FromIterator<(String, Projection)> for ProjectionTree {
    fn from_iter<T: IntoIterator<Item = (String, Projection)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ProjectionTree {
    type Item = (String, Projection);
    type IntoIter = indexmap::map::IntoIter<String, Projection>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Projection::Leaf => serializer.serialize_u8(1),
            Projection::Nested(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for ProjectionTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ProjectionVisitor;

impl<'de> Visitor<'de> for ProjectionVisitor {
    type Value = Projection;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("the inclusion marker 1 or a nested projection object")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Projection, E> {
        if value == 1 {
            Ok(Projection::Leaf)
        } else {
            Err(E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Projection, E> {
        if value == 1 {
            Ok(Projection::Leaf)
        } else {
            Err(E::invalid_value(de::Unexpected::Signed(value), &self))
        }
    }

    fn visit_map<A: de::MapAccess<'de>>(self, map: A) -> Result<Projection, A::Error> {
        ProjectionTreeVisitor.visit_map(map).map(Projection::Nested)
    }
}

impl<'de> Deserialize<'de> for Projection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProjectionVisitor)
    }
}

struct ProjectionTreeVisitor;

impl<'de> Visitor<'de> for ProjectionTreeVisitor {
    type Value = ProjectionTree;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a projection object")
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<ProjectionTree, A::Error> {
        let mut tree = ProjectionTree::new();
        while let Some((key, value)) = map.next_entry::<String, Projection>()? {
            tree.insert(key, value);
        }
        Ok(tree)
    }
}

impl<'de> Deserialize<'de> for ProjectionTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProjectionTreeVisitor)
    }
}
