//! The row model: an insertion-ordered column-to-value mapping.

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// Field separator inside one (name, tag, value) triple of a key.
const KEY_FIELD_SEP: char = '\u{1}';
/// Separator between triples.
const KEY_PAIR_SEP: char = '\u{2}';

/// A row of named values.
///
/// Column names are case-sensitive and keep their insertion order, so
/// `SELECT *` output mirrors what the producer supplied. A missing key and
/// a present-but-null value are distinct states; `IS NULL` and `COUNT`
/// treat them alike, nothing else does.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a column by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    /// Returns true if the column is present (even when null).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Inserts or replaces a column.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.columns.insert(name.into(), value);
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter()
    }

    /// Iterates column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.columns.keys()
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.values()
    }

    /// A canonical key for DISTINCT: sorted (name, type-tag, rendering)
    /// triples joined with sentinel bytes, so two rows collide exactly when
    /// they agree on names, families, and renderings.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let mut pairs: Vec<(&String, &Value)> = self.columns.iter().collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut key = String::new();
        for (name, value) in pairs {
            key.push_str(name);
            key.push(KEY_FIELD_SEP);
            key.push_str(value.type_tag());
            key.push(KEY_FIELD_SEP);
            key.push_str(&value.render());
            key.push(KEY_PAIR_SEP);
        }
        key
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Builds a deterministic grouping key over the given columns.
///
/// Encodes (column name, type tag, rendering) per column, so an integer
/// `1` and the string `"1"` land in different groups. A column missing
/// from the row keys as null.
#[must_use]
pub fn column_key(row: &Row, columns: &[String]) -> String {
    let mut key = String::new();
    for name in columns {
        let value = row.get(name).unwrap_or(&Value::Null);
        key.push_str(name);
        key.push(KEY_FIELD_SEP);
        key.push_str(value.type_tag());
        key.push(KEY_FIELD_SEP);
        key.push_str(&value.render());
        key.push(KEY_PAIR_SEP);
    }
    key
}
