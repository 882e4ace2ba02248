use crate::error::ScanError;
use crate::model::{Kind, ScanMode};
use crate::rules::{RuleId, RuleSet};
use crate::scanner::model::{Claim, MatchTable, Slot};

// The claims of one option token, and whether it consumed the following token.
#[derive(Debug, PartialEq, Eq)]
struct Matched {
    claims: Vec<Claim>,
    consumes_next: bool,
}

/// Matches argv tokens against the rules of a [`RuleSet`].
pub(crate) struct Scanner<'r> {
    rule_set: &'r RuleSet,
    mode: ScanMode,
}

impl<'r> Scanner<'r> {
    pub(crate) fn new(rule_set: &'r RuleSet, mode: ScanMode) -> Self {
        Self { rule_set, mode }
    }

    pub(crate) fn scan(&self, tokens: &[&str]) -> Result<MatchTable, ScanError> {
        let mut table = MatchTable::new(tokens);
        self.scan_options(tokens, &mut table)?;
        self.assign_positionals(&mut table);

        if !self.mode.unknown_args() && !self.help_requested(&table) {
            check_unknown(&table)?;
        }

        Ok(table)
    }

    fn scan_options(&self, tokens: &[&str], table: &mut MatchTable) -> Result<(), ScanError> {
        let mut position = 0;

        while position < tokens.len() {
            let token = tokens[position];
            let next = tokens.get(position + 1).copied();
            let prefix = option_prefix(token);

            if prefix > 0 {
                match self.match_option(token, &token[prefix..], next, self.mode.combined_options())? {
                    Some(matched) => {
                        debug!("Matched option '{token}' at {position}: {:?}.", matched.claims);
                        position += self.record(table, position, matched);
                        continue;
                    }
                    None => {
                        debug!("Unknown option '{token}' at {position}.");
                        table.unknown(position);
                    }
                }
            } else if self.mode.unprefixed_options() && !token.is_empty() {
                if let Some(matched) =
                    self.match_option(token, token, next, self.mode.combined_options())?
                {
                    debug!("Matched unprefixed option '{token}' at {position}: {:?}.", matched.claims);
                    position += self.record(table, position, matched);
                    continue;
                }
            }

            position += 1;
        }

        Ok(())
    }

    // Returns how many tokens were consumed.
    fn record(&self, table: &mut MatchTable, position: usize, matched: Matched) -> usize {
        table.claim(position, matched.claims);

        if matched.consumes_next {
            table.link(position + 1, position);
            2
        } else {
            1
        }
    }

    // Match `text` (the token with its prefix stripped) against the aliases, longest first.
    // A rule whose alias leaves unusable trailing text is skipped for the next shorter alias.
    fn match_option(
        &self,
        token: &str,
        text: &str,
        next: Option<&str>,
        cluster: bool,
    ) -> Result<Option<Matched>, ScanError> {
        for (alias, id) in self.rule_set.option_aliases() {
            let rest = match text.strip_prefix(alias.as_str()) {
                Some(rest) => rest,
                None => continue,
            };
            let rule = self.rule_set.rule(*id);

            if rule.behaviour.expects_value {
                if rest.is_empty() {
                    return match next {
                        Some(value) => Ok(Some(Matched {
                            claims: vec![Claim::valued(*id, value)],
                            consumes_next: true,
                        })),
                        None => Err(ScanError::MissingValue(token.to_string())),
                    };
                }

                if let Some(value) = rest.strip_prefix('=') {
                    if value.is_empty() {
                        return Err(ScanError::EmptyValue(token.to_string()));
                    }

                    return Ok(Some(single(*id, value)));
                }

                if self.mode.combined_values() {
                    return Ok(Some(single(*id, rest)));
                }
            } else {
                if rest.is_empty() {
                    return Ok(Some(Matched {
                        claims: vec![Claim::flag(*id)],
                        consumes_next: false,
                    }));
                }

                if cluster {
                    if let Some(mut matched) = self.match_option(token, rest, next, cluster)? {
                        matched.claims.insert(0, Claim::flag(*id));
                        return Ok(Some(matched));
                    }
                }
            }
        }

        Ok(None)
    }

    fn assign_positionals(&self, table: &mut MatchTable) {
        let positionals: Vec<(RuleId, bool)> = self
            .rule_set
            .ids()
            .filter(|(_, rule)| rule.kind == Kind::PositionalArgument)
            .map(|(id, rule)| (id, rule.behaviour.repeatable))
            .collect();
        let mut current = 0;

        for position in 0..table.len() {
            if table.slot(position) != &Slot::Unclaimed {
                continue;
            }

            let token = table.token(position).to_string();

            if let Some(id) = self.sub_command(&token) {
                debug!("Sub-command '{token}' at {position}; deferring the remainder.");
                table.set_command(position, id);
                break;
            }

            if let Some((id, repeatable)) = positionals.get(current) {
                debug!("Argument '{token}' at {position} assigned to {id:?}.");
                table.claim(position, vec![Claim::valued(*id, token)]);

                if !repeatable {
                    current += 1;
                }
            }
        }
    }

    fn sub_command(&self, token: &str) -> Option<RuleId> {
        self.rule_set
            .ids()
            .filter(|(_, rule)| rule.kind == Kind::SubCommand)
            .find(|(_, rule)| rule.aliases.iter().any(|alias| alias == token))
            .map(|(id, _)| id)
    }
}

fn single(rule: RuleId, value: &str) -> Matched {
    Matched {
        claims: vec![Claim::valued(rule, value)],
        consumes_next: false,
    }
}

// The length of the option prefix (`-` or `--`); a bare `-` or `--` is not an option.
fn option_prefix(token: &str) -> usize {
    if token.len() > 2 && token.starts_with("--") {
        2
    } else if token.len() > 1 && token.starts_with('-') && token != "--" {
        1
    } else {
        0
    }
}

impl<'r> Scanner<'r> {
    // A help request takes precedence over unknown tokens.
    fn help_requested(&self, table: &MatchTable) -> bool {
        self.rule_set
            .help_rule()
            .and_then(|rule| self.rule_set.id_of(rule.name()))
            .map_or(false, |id| table.is_claimed_before_command(id))
    }
}

// Report the lexically smallest unmatched token, outside of any sub-command tail.
fn check_unknown(table: &MatchTable) -> Result<(), ScanError> {
    match table.unrecognized().into_iter().min() {
        Some(token) => Err(ScanError::UnknownArgument(token)),
        None => Ok(()),
    }
}
