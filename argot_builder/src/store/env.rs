use std::collections::HashMap;

use crate::constant::*;
use crate::model::{Cardinality, Value};
use crate::store::{Lookup, Store, StoreError};

/// The environment provider.
///
/// Holds a snapshot of the variables taken when it is created.
/// A variable that is absent or empty counts as zero occurrences.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{Cardinality, EnvStore, Store, Value};
///
/// let env = EnvStore::from_pairs(vec![("PORT", "8080"), ("EMPTY", "")]);
/// let lookup = env.get("PORT", Cardinality::Scalar).unwrap();
/// assert_eq!(lookup.value, Some(Value::Scalar("8080".to_string())));
/// assert_eq!(lookup.count, 1);
/// assert_eq!(env.get("EMPTY", Cardinality::Scalar).unwrap().count, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvStore {
    variables: HashMap<String, String>,
}

impl EnvStore {
    /// Snapshot the process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn process() -> Self {
        Self {
            variables: std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }

    /// Use precisely these variables.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            variables: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Store for EnvStore {
    fn source(&self) -> &str {
        ENV_SOURCE
    }

    fn get(&self, name: &str, _cardinality: Cardinality) -> Result<Lookup, StoreError> {
        match self.variables.get(name) {
            Some(value) if !value.is_empty() => {
                debug!("Environment variable '{name}' found.");
                Ok(Lookup::of(Value::Scalar(value.clone()), 1))
            }
            _ => Ok(Lookup::none()),
        }
    }
}
