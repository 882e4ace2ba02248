use crate::constant::*;
use crate::model::{Cardinality, Value};
use crate::rules::{RuleId, RuleSet};
use crate::store::{Lookup, Store, StoreError};

/// One occurrence of a rule on the Cli.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Claim {
    pub rule: RuleId,
    pub value: Option<String>,
}

impl Claim {
    pub(crate) fn flag(rule: RuleId) -> Self {
        Self { rule, value: None }
    }

    pub(crate) fn valued(rule: RuleId, value: impl Into<String>) -> Self {
        Self {
            rule,
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Unclaimed,
    Unknown,
    Claimed(Vec<Claim>),
    // The value token of the flag at this position.
    ValueOf(usize),
}

/// The result of scanning one argv: one slot per token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatchTable {
    tokens: Vec<String>,
    slots: Vec<Slot>,
    // The position of the claimed sub-command token.
    command: Option<(usize, RuleId)>,
}

impl MatchTable {
    pub(crate) fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            slots: vec![Slot::Unclaimed; tokens.len()],
            command: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn token(&self, position: usize) -> &str {
        &self.tokens[position]
    }

    pub(crate) fn slot(&self, position: usize) -> &Slot {
        &self.slots[position]
    }

    pub(crate) fn claim(&mut self, position: usize, claims: Vec<Claim>) {
        self.slots[position] = Slot::Claimed(claims);
    }

    pub(crate) fn link(&mut self, position: usize, owner: usize) {
        self.slots[position] = Slot::ValueOf(owner);
    }

    pub(crate) fn unknown(&mut self, position: usize) {
        self.slots[position] = Slot::Unknown;
    }

    pub(crate) fn command(&self) -> Option<(usize, RuleId)> {
        self.command
    }

    pub(crate) fn set_command(&mut self, position: usize, rule: RuleId) {
        self.slots[position] = Slot::Claimed(vec![Claim::flag(rule)]);
        self.command.replace((position, rule));
    }

    /// Positions after the sub-command belong to its parser.
    pub(crate) fn is_deferred(&self, position: usize) -> bool {
        match self.command {
            Some((command, _)) => position > command,
            None => false,
        }
    }

    /// The claims of `rule` in Cli order.
    pub(crate) fn claims(&self, rule: RuleId) -> impl Iterator<Item = &Claim> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Claimed(claims) => Some(claims),
                _ => None,
            })
            .flatten()
            .filter(move |claim| claim.rule == rule)
    }

    /// Whether `rule` is claimed before the sub-command (if any).
    pub(crate) fn is_claimed_before_command(&self, rule: RuleId) -> bool {
        self.slots.iter().enumerate().any(|(position, slot)| {
            !self.is_deferred(position)
                && matches!(slot, Slot::Claimed(claims) if claims.iter().any(|c| c.rule == rule))
        })
    }

    /// The tokens left unmatched outside of the sub-command tail.
    pub(crate) fn unrecognized(&self) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(position, slot)| {
                !self.is_deferred(*position)
                    && matches!(slot, Slot::Unclaimed | Slot::Unknown)
            })
            .map(|(position, _)| self.tokens[position].clone())
            .collect()
    }

    /// The tokens after the sub-command that the sub-command's parser must handle.
    ///
    /// Claims of `keep` (the help rule) are left for the sub-command too.
    pub(crate) fn tail(&self, keep: Option<RuleId>) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(position, slot)| {
                self.is_deferred(*position)
                    && match slot {
                        Slot::Unclaimed | Slot::Unknown => true,
                        Slot::Claimed(claims) => {
                            keep.is_some() && claims.iter().all(|c| Some(c.rule) == keep)
                        }
                        Slot::ValueOf(_) => false,
                    }
            })
            .map(|(position, _)| self.tokens[position].clone())
            .collect()
    }
}

/// The command line provider: answers from the claims of a [`MatchTable`].
pub(crate) struct CommandLineStore<'t> {
    table: &'t MatchTable,
    rule_set: &'t RuleSet,
}

impl<'t> CommandLineStore<'t> {
    pub(crate) fn new(table: &'t MatchTable, rule_set: &'t RuleSet) -> Self {
        Self { table, rule_set }
    }
}

impl<'t> Store for CommandLineStore<'t> {
    fn source(&self) -> &str {
        CLI_SOURCE
    }

    fn get(&self, name: &str, _cardinality: Cardinality) -> Result<Lookup, StoreError> {
        let id = match self.rule_set.id_of(name) {
            Some(id) => id,
            None => return Ok(Lookup::none()),
        };
        let claims: Vec<&Claim> = self.table.claims(id).collect();
        let count = claims.len();

        if count == 0 {
            return Ok(Lookup::none());
        }

        if !self.rule_set.rule(id).behaviour.expects_value {
            return Ok(Lookup::of(Value::Scalar(count.to_string()), count));
        }

        let mut values: Vec<String> = claims
            .into_iter()
            .filter_map(|claim| claim.value.clone())
            .collect();

        Ok(if values.len() == 1 {
            Lookup::of(Value::Scalar(values.remove(0)), count)
        } else {
            Lookup::of(Value::List(values), count)
        })
    }
}
