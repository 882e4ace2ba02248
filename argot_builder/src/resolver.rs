use std::collections::HashMap;
use std::rc::Rc;

use crate::api::{parse_map, split_list, Converted, Destination};
use crate::constant::*;
use crate::error::{CoercionError, Error, ResolutionError};
use crate::model::{Cardinality, Kind, ParserConfig, Value};
use crate::rules::{Rule, RuleSet};
use crate::scanner::{CommandLineStore, MatchTable};
use crate::store::{Lookup, Store};

/// The merged value of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub value: Value,
    pub count: usize,
    pub source: String,
}

/// Converted values waiting to be stored, indexed by rule sequence.
pub(crate) type Pending = Vec<(usize, Vec<Converted>)>;

/// Merges the values of every provider, in precedence order: the Cli, the external stores, the environment.
/// The declared default applies only when every provider reports zero occurrences.
pub(crate) struct Resolver<'p> {
    rule_set: &'p RuleSet,
    table: &'p MatchTable,
    stores: &'p [Rc<dyn Store>],
    environment: &'p dyn Store,
    config: &'p ParserConfig,
}

impl<'p> Resolver<'p> {
    pub(crate) fn new(
        rule_set: &'p RuleSet,
        table: &'p MatchTable,
        stores: &'p [Rc<dyn Store>],
        environment: &'p dyn Store,
        config: &'p ParserConfig,
    ) -> Self {
        Self {
            rule_set,
            table,
            stores,
            environment,
            config,
        }
    }

    /// Find the first provider with an occurrence of `rule`, or fall back to its default.
    pub(crate) fn resolve(&self, rule: &Rule) -> Result<Option<Resolved>, Error> {
        if rule.kind == Kind::SubCommand {
            return Ok(self.resolve_command(rule));
        }

        let command_line = CommandLineStore::new(self.table, self.rule_set);
        let mut providers: Vec<(&dyn Store, String)> = Vec::default();

        if matches!(rule.kind, Kind::Option | Kind::PositionalArgument) {
            providers.push((&command_line, rule.name.clone()));
        }

        for store in self.stores {
            providers.push((store.as_ref(), rule.name.clone()));
        }

        if let Some(var) = &rule.env_var {
            providers.push((self.environment, self.config.env_var_name(var)));
        }

        for (store, key) in providers {
            let lookup = store
                .get(&key, rule.cardinality)
                .map_err(|cause| Error::Provider {
                    store: store.source().to_string(),
                    cause,
                })?;

            if lookup.count > 0 {
                debug!("Rule '{}' resolved from '{}'.", rule.name, store.source());
                return Ok(Some(shape(rule, lookup, store.source())?));
            }
        }

        match &rule.default {
            Some(default) => {
                debug!("Rule '{}' resolved from its default.", rule.name);
                let lookup = Lookup::of(Value::Scalar(default.clone()), 0);
                Ok(Some(shape(rule, lookup, DEFAULT_SOURCE)?))
            }
            None => Ok(None),
        }
    }

    fn resolve_command(&self, rule: &Rule) -> Option<Resolved> {
        let (_, id) = self.table.command()?;

        if self.rule_set.rule(id).name != rule.name {
            return None;
        }

        Some(Resolved {
            value: Value::Scalar(rule.display_name().to_string()),
            count: 1,
            source: CLI_SOURCE.to_string(),
        })
    }

    /// Validate and convert the value of every rule, in declaration order, without storing anything.
    pub(crate) fn prepare(&self, chains: &[Vec<Destination>]) -> Result<Pending, Error> {
        let mut pending = Pending::default();

        for rule in self.rule_set.iter().filter(|rule| !rule.builtin) {
            let chain = match chains.get(rule.sequence) {
                Some(chain) => chain,
                None => continue,
            };
            let resolved = match self.resolve(rule)? {
                Some(resolved) => resolved,
                None => {
                    if rule.behaviour.required {
                        return Err(ResolutionError::Required {
                            kind: rule.kind,
                            name: rule.display_name().to_string(),
                        }
                        .into());
                    }

                    continue;
                }
            };

            validate(rule, &resolved)?;
            // A flag option's value is already its count.
            let occurrences = if rule.kind == Kind::Option && !rule.behaviour.expects_value {
                None
            } else {
                Some(resolved.count)
            };
            let converted = chain
                .iter()
                .map(|destination| {
                    destination
                        .convert(&resolved.value, occurrences)
                        .map_err(|cause| store_error(rule, cause))
                })
                .collect::<Result<Vec<_>, _>>()?;
            pending.push((rule.sequence, converted));
        }

        Ok(pending)
    }
}

/// Store every converted value.
///
/// Custom sinks are the only destinations that may fail, so every custom sink is written before any other destination.
/// A failing sink leaves the other destinations untouched, although earlier sinks keep what they accepted.
pub(crate) fn commit(
    rule_set: &RuleSet,
    chains: &mut [Vec<Destination>],
    pending: Pending,
) -> Result<(), Error> {
    let mut deferred: Vec<(&Rule, usize, Converted)> = Vec::default();

    for (sequence, converted) in pending {
        let rule = match rule_set.iter().find(|rule| rule.sequence == sequence) {
            Some(rule) => rule,
            None => unreachable!("internal error - pending value for undeclared rule {sequence}"),
        };

        for (index, value) in converted.into_iter().enumerate() {
            let destination = &mut chains[sequence][index];

            if matches!(destination, Destination::Custom(_)) {
                destination
                    .commit(value)
                    .map_err(|cause| store_error(rule, cause))?;
            } else {
                deferred.push((rule, index, value));
            }
        }
    }

    for (rule, index, value) in deferred {
        chains[rule.sequence][index]
            .commit(value)
            .map_err(|cause| store_error(rule, cause))?;
    }

    Ok(())
}

fn store_error(rule: &Rule, cause: CoercionError) -> Error {
    Error::Store {
        kind: rule.kind,
        name: rule.display_name().to_string(),
        cause,
    }
}

fn validate(rule: &Rule, resolved: &Resolved) -> Result<(), ResolutionError> {
    if resolved.count > 1
        && rule.kind == Kind::Option
        && rule.cardinality == Cardinality::Scalar
        && rule.behaviour.expects_value
        && !rule.behaviour.repeatable
    {
        return Err(ResolutionError::DuplicateOption(rule.name.clone()));
    }

    if !rule.choices.is_empty() {
        let values: Vec<&String> = match &resolved.value {
            Value::Scalar(value) => vec![value],
            Value::List(items) => items.iter().collect(),
            Value::Map(_) => Vec::default(),
        };

        for value in values {
            if !rule.choices.contains(value) {
                return Err(ResolutionError::InvalidChoice {
                    value: value.clone(),
                    name: rule.display_name().to_string(),
                    choices: rule.choices.clone(),
                });
            }
        }
    }

    Ok(())
}

// Shape a provider's native value to the cardinality of `rule`.
fn shape(rule: &Rule, lookup: Lookup, source: &str) -> Result<Resolved, Error> {
    let count = lookup.count;
    let value = lookup
        .value
        .unwrap_or_else(|| Value::Scalar(count.to_string()));
    let map_error = |cause: crate::error::CoercionError| Error::Provider {
        store: source.to_string(),
        cause: Box::new(cause),
    };

    let value = match rule.cardinality {
        Cardinality::Scalar => match value {
            Value::List(mut items) if !items.is_empty() => Value::Scalar(items.remove(0)),
            Value::List(_) => Value::Scalar(String::default()),
            other => other,
        },
        Cardinality::List => match value {
            Value::Scalar(s) => Value::List(split(rule, s)),
            Value::List(mut items) if items.len() == 1 => Value::List(split(rule, items.remove(0))),
            Value::Map(map) => {
                let mut entries: Vec<String> =
                    map.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
                entries.sort();
                Value::List(entries)
            }
            other => other,
        },
        Cardinality::Map => match value {
            Value::Scalar(s) => Value::Map(parse_map(&s).map_err(map_error)?),
            Value::List(items) => {
                let mut merged: HashMap<String, String> = HashMap::default();
                for item in items {
                    merged.extend(parse_map(&item).map_err(map_error)?);
                }
                Value::Map(merged)
            }
            other => other,
        },
    };

    Ok(Resolved {
        value,
        count,
        source: source.to_string(),
    })
}

fn split(rule: &Rule, value: String) -> Vec<String> {
    if rule.behaviour.no_split {
        vec![value]
    } else {
        split_list(&value)
    }
}
