use crate::constant::*;
use crate::model::{Cardinality, Value};
use crate::store::{Lookup, Store, StoreError};

/// An in-memory [`Store`], standing in for externally parsed configuration.
///
/// Repeating a name records another occurrence.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{Cardinality, MemoryStore, Store, Value};
///
/// let store = MemoryStore::named("config.ini")
///     .with("tag", "a")
///     .with("tag", "b");
/// let lookup = store.get("tag", Cardinality::List).unwrap();
/// assert_eq!(lookup.count, 2);
/// assert_eq!(
///     lookup.value,
///     Some(Value::List(vec!["a".to_string(), "b".to_string()]))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    source: String,
    entries: Vec<(String, String)>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::named(MEMORY_SOURCE)
    }
}

impl MemoryStore {
    /// Create an empty store reporting as `source`.
    pub fn named(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::default(),
        }
    }

    /// Record one occurrence of `value` for the rule `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }
}

impl Store for MemoryStore {
    fn source(&self) -> &str {
        &self.source
    }

    fn get(&self, name: &str, _cardinality: Cardinality) -> Result<Lookup, StoreError> {
        let mut values: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect();

        Ok(match values.len() {
            0 => Lookup::none(),
            1 => Lookup::of(Value::Scalar(values.remove(0)), 1),
            count => Lookup::of(Value::List(values), count),
        })
    }
}
