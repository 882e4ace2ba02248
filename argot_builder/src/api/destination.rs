use std::collections::HashMap;

use crate::api::convert::*;
use crate::error::CoercionError;
use crate::model::{Cardinality, Value};
use crate::store::StoreError;

/// A caller defined sink for resolved values.
///
/// `set_from_string` is called once per discrete value, in order: once for a scalar,
/// once per item of a list, and once per `key=value` entry of a map (sorted by key).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{Cardinality, CommandLineParser, Destination, Parameter, SetFromString, StoreError};
///
/// struct Upper(Vec<String>);
///
/// impl SetFromString for Upper {
///     fn set_from_string(&mut self, value: &str) -> Result<(), StoreError> {
///         if value.is_empty() {
///             return Err("empty words are not allowed".into());
///         }
///         self.0.push(value.to_uppercase());
///         Ok(())
///     }
/// }
///
/// let mut upper = Upper(Vec::default());
/// let mut parser = CommandLineParser::new("program")
///     .add(
///         Parameter::option("word")
///             .repeatable(true)
///             .cardinality(Cardinality::List)
///             .store(Destination::Custom(Box::new(&mut upper))),
///     );
///
/// parser.parse_tokens(vec!["--word", "a", "--word", "bc"].as_slice()).unwrap();
/// drop(parser);
///
/// assert_eq!(upper.0, vec!["A".to_string(), "BC".to_string()]);
/// ```
pub trait SetFromString {
    /// Accept one value.
    fn set_from_string(&mut self, value: &str) -> Result<(), StoreError>;
}

impl<T: SetFromString + ?Sized> SetFromString for &mut T {
    fn set_from_string(&mut self, value: &str) -> Result<(), StoreError> {
        (**self).set_from_string(value)
    }
}

/// Where a rule stores its resolved value.
///
/// The destination decides the default [`Cardinality`] of its rule: lists are [`Cardinality::List`],
/// maps [`Cardinality::Map`], and everything else [`Cardinality::Scalar`].
/// An option whose destinations are all [`Destination::Set`] or [`Destination::Count`] takes no value.
///
/// Values of another shape are converted: [`Destination::Str`] receives JSON text for a list or map,
/// [`Destination::Int`] and [`Destination::Count`] receive the number of items,
/// [`Destination::Bool`] and [`Destination::Set`] receive `true`,
/// and [`Destination::StrList`] receives `key=value` items for a map.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use std::collections::HashMap;
/// use argot::{CommandLineParser, Destination, Parameter};
///
/// let mut verbosity: usize = 0;
/// let mut port: i64 = 0;
/// let mut labels: HashMap<String, String> = HashMap::default();
/// let mut parser = CommandLineParser::new("program")
///     .add(Parameter::option("verbose").alias("v").store(Destination::Count(&mut verbosity)))
///     .add(Parameter::option("port").store(Destination::Int(&mut port)))
///     .add(Parameter::option("label").store(Destination::StrMap(&mut labels)));
///
/// parser.parse_tokens(vec!["-v", "--port", "0x50", "-v", "--label", "a=1,b=2"].as_slice()).unwrap();
/// drop(parser);
///
/// assert_eq!(verbosity, 2);
/// assert_eq!(port, 80);
/// assert_eq!(labels.len(), 2);
/// ```
pub enum Destination<'a> {
    #[allow(missing_docs)]
    Str(&'a mut String),
    /// Any base; see [`parse_int`](./fn.parse_int.html).
    Int(&'a mut i64),
    /// See [`parse_bool`](./fn.parse_bool.html).
    Bool(&'a mut bool),
    /// `true` when the flag is present.
    Set(&'a mut bool),
    /// The number of times the flag is present.
    Count(&'a mut usize),
    #[allow(missing_docs)]
    StrList(&'a mut Vec<String>),
    #[allow(missing_docs)]
    IntList(&'a mut Vec<i64>),
    #[allow(missing_docs)]
    BoolList(&'a mut Vec<bool>),
    #[allow(missing_docs)]
    StrMap(&'a mut HashMap<String, String>),
    #[allow(missing_docs)]
    IntMap(&'a mut HashMap<String, i64>),
    #[allow(missing_docs)]
    BoolMap(&'a mut HashMap<String, bool>),
    /// A caller defined sink; takes the rule's declared (or scalar) cardinality.
    Custom(Box<dyn SetFromString + 'a>),
}

impl<'a> std::fmt::Debug for Destination<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = match self {
            Destination::Str(_) => "Str",
            Destination::Int(_) => "Int",
            Destination::Bool(_) => "Bool",
            Destination::Set(_) => "Set",
            Destination::Count(_) => "Count",
            Destination::StrList(_) => "StrList",
            Destination::IntList(_) => "IntList",
            Destination::BoolList(_) => "BoolList",
            Destination::StrMap(_) => "StrMap",
            Destination::IntMap(_) => "IntMap",
            Destination::BoolMap(_) => "BoolMap",
            Destination::Custom(_) => "Custom",
        };
        write!(f, "Destination::{shape}")
    }
}

/// A value converted for a specific [`Destination`], not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Converted {
    Str(String),
    Int(i64),
    Bool(bool),
    Count(usize),
    StrList(Vec<String>),
    IntList(Vec<i64>),
    BoolList(Vec<bool>),
    StrMap(HashMap<String, String>),
    IntMap(HashMap<String, i64>),
    BoolMap(HashMap<String, bool>),
    Raw(Vec<String>),
}

impl<'a> Destination<'a> {
    /// The cardinality this destination implies, if any.
    pub(crate) fn cardinality(&self) -> Option<Cardinality> {
        match self {
            Destination::Str(_)
            | Destination::Int(_)
            | Destination::Bool(_)
            | Destination::Set(_)
            | Destination::Count(_) => Some(Cardinality::Scalar),
            Destination::StrList(_) | Destination::IntList(_) | Destination::BoolList(_) => {
                Some(Cardinality::List)
            }
            Destination::StrMap(_) | Destination::IntMap(_) | Destination::BoolMap(_) => {
                Some(Cardinality::Map)
            }
            Destination::Custom(_) => None,
        }
    }

    pub(crate) fn is_flag(&self) -> bool {
        matches!(self, Destination::Set(_) | Destination::Count(_))
    }

    /// Convert `value` without storing it.
    ///
    /// `occurrences` is the occurrence count of a rule that takes a value; [`Destination::Set`] and
    /// [`Destination::Count`] store from it. Without it, `value` itself is the count (or a boolean).
    pub(crate) fn convert(
        &self,
        value: &Value,
        occurrences: Option<usize>,
    ) -> Result<Converted, CoercionError> {
        match self {
            Destination::Str(_) => Ok(Converted::Str(match value {
                Value::Scalar(s) => s.clone(),
                Value::List(items) => serde_json::Value::from(items.clone()).to_string(),
                Value::Map(map) => serde_json::Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                        .collect(),
                )
                .to_string(),
            })),
            Destination::Int(_) => Ok(Converted::Int(match value {
                Value::Scalar(s) => parse_int(s)?,
                Value::List(items) => items.len() as i64,
                Value::Map(map) => map.len() as i64,
            })),
            Destination::Bool(_) => Ok(Converted::Bool(match value {
                Value::Scalar(s) => parse_bool(s)?,
                Value::List(_) | Value::Map(_) => true,
            })),
            Destination::Set(_) => Ok(Converted::Bool(match (occurrences, value) {
                (Some(count), _) => count > 0,
                // An occurrence count, or a boolean from another source.
                (None, Value::Scalar(s)) => match parse_int(s) {
                    Ok(n) => n > 0,
                    Err(_) => parse_bool(s)?,
                },
                (None, Value::List(_) | Value::Map(_)) => true,
            })),
            Destination::Count(_) => Ok(Converted::Count(match (occurrences, value) {
                (Some(count), _) => count,
                (None, Value::Scalar(s)) => usize::try_from(parse_int(s)?)
                    .map_err(|_| CoercionError::NotAnInteger(s.clone()))?,
                (None, Value::List(items)) => items.len(),
                (None, Value::Map(map)) => map.len(),
            })),
            Destination::StrList(_) => Ok(Converted::StrList(items(value))),
            Destination::IntList(_) => Ok(Converted::IntList(
                items(value)
                    .iter()
                    .map(|item| parse_int(item.trim()))
                    .collect::<Result<_, _>>()?,
            )),
            Destination::BoolList(_) => Ok(Converted::BoolList(
                items(value)
                    .iter()
                    .map(|item| parse_bool(item.trim()))
                    .collect::<Result<_, _>>()?,
            )),
            Destination::StrMap(_) => Ok(Converted::StrMap(entries(value)?)),
            Destination::IntMap(_) => Ok(Converted::IntMap(
                entries(value)?
                    .into_iter()
                    .map(|(k, v)| Ok((k, parse_int(v.trim())?)))
                    .collect::<Result<_, CoercionError>>()?,
            )),
            Destination::BoolMap(_) => Ok(Converted::BoolMap(
                entries(value)?
                    .into_iter()
                    .map(|(k, v)| Ok((k, parse_bool(v.trim())?)))
                    .collect::<Result<_, CoercionError>>()?,
            )),
            Destination::Custom(_) => Ok(Converted::Raw(items(value))),
        }
    }

    /// Store a value produced by [`Destination::convert`] on this same destination.
    pub(crate) fn commit(&mut self, converted: Converted) -> Result<(), CoercionError> {
        match (self, converted) {
            (Destination::Str(variable), Converted::Str(value)) => **variable = value,
            (Destination::Int(variable), Converted::Int(value)) => **variable = value,
            (Destination::Bool(variable), Converted::Bool(value)) => **variable = value,
            (Destination::Set(variable), Converted::Bool(value)) => **variable = value,
            (Destination::Count(variable), Converted::Count(value)) => **variable = value,
            (Destination::StrList(variable), Converted::StrList(value)) => **variable = value,
            (Destination::IntList(variable), Converted::IntList(value)) => **variable = value,
            (Destination::BoolList(variable), Converted::BoolList(value)) => **variable = value,
            (Destination::StrMap(variable), Converted::StrMap(value)) => **variable = value,
            (Destination::IntMap(variable), Converted::IntMap(value)) => **variable = value,
            (Destination::BoolMap(variable), Converted::BoolMap(value)) => **variable = value,
            (Destination::Custom(sink), Converted::Raw(values)) => {
                for value in values {
                    sink.set_from_string(&value)
                        .map_err(|error| CoercionError::Custom {
                            message: error.to_string(),
                            value,
                        })?;
                }
            }
            (destination, converted) => {
                unreachable!(
                    "internal error - {converted:?} must not be committed to {destination:?}"
                );
            }
        }

        Ok(())
    }
}

// The discrete items of a value; map entries become sorted `key=value` items.
fn items(value: &Value) -> Vec<String> {
    match value {
        Value::Scalar(s) => vec![s.clone()],
        Value::List(items) => items.clone(),
        Value::Map(map) => {
            let mut entries: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
            entries.sort();
            entries
        }
    }
}

fn entries(value: &Value) -> Result<HashMap<String, String>, CoercionError> {
    match value {
        Value::Scalar(s) => parse_map(s),
        Value::List(items) => {
            let mut merged = HashMap::default();
            for item in items {
                merged.extend(parse_map(item)?);
            }
            Ok(merged)
        }
        Value::Map(map) => Ok(map.clone()),
    }
}
