use crate::types::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column name to value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    data: IndexMap<String, Value>,
}

impl Row {
    /// Inserting an existing column replaces its value in place.
    pub fn insert(&mut self, column: String, value: Value) {
        self.data.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.data.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn get_as_string(&self, column: &str) -> String {
        self.data
            .get(column)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    pub fn from_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
