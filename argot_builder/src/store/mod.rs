use crate::model::{Cardinality, Value};

mod env;
mod memory;

pub use env::EnvStore;
pub use memory::MemoryStore;

/// The error a [`Store`] fails with.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// The answer of a [`Store`] for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lookup {
    /// The value, in the shape native to the store.
    pub value: Option<Value>,
    /// The number of occurrences seen; `0` means the store has nothing for the rule.
    pub count: usize,
}

impl Lookup {
    /// Nothing found.
    pub fn none() -> Self {
        Self::default()
    }

    /// `value` found across `count` occurrences.
    pub fn of(value: Value, count: usize) -> Self {
        Self {
            value: Some(value),
            count,
        }
    }
}

/// A source of values for rules, queried by rule name.
///
/// The command line, the environment, and any stores added via
/// [`CommandLineParser::store`](./struct.CommandLineParser.html#method.store) are all providers.
/// Providers return values in their native shape; the parser shapes them to each rule's [`Cardinality`].
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{Cardinality, Lookup, Store, StoreError, Value};
///
/// struct Fixed;
///
/// impl Store for Fixed {
///     fn source(&self) -> &str {
///         "fixed"
///     }
///
///     fn get(&self, name: &str, _cardinality: Cardinality) -> Result<Lookup, StoreError> {
///         match name {
///             "port" => Ok(Lookup::of(Value::Scalar("8080".to_string()), 1)),
///             "broken" => Err("disk on fire".into()),
///             _ => Ok(Lookup::none()),
///         }
///     }
/// }
///
/// assert_eq!(Fixed.get("port", Cardinality::Scalar).unwrap().count, 1);
/// assert_eq!(Fixed.get("other", Cardinality::Scalar).unwrap(), Lookup::none());
/// ```
pub trait Store {
    /// The name of this store, used in error messages.
    fn source(&self) -> &str;

    /// Look up the value for the rule `name`, whose resolved value will have `cardinality`.
    fn get(&self, name: &str, cardinality: Cardinality) -> Result<Lookup, StoreError>;
}
