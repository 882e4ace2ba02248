use std::collections::{HashMap, HashSet};

use crate::constant::*;
use crate::error::DeclarationError;
use crate::model::Kind;
use crate::rules::{Rule, RuleId};

/// An ordered, validated collection of [`Rule`]s.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{CommandLineParser, Destination, Kind, Parameter};
///
/// let mut verbose = false;
/// let mut file = String::default();
/// let parser = CommandLineParser::new("program")
///     .add(Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose)))
///     .add(Parameter::argument("file").store(Destination::Str(&mut file)));
///
/// let rule_set = parser.rules().unwrap();
/// assert_eq!(rule_set.by_alias("v").unwrap().name(), "verbose");
/// assert_eq!(rule_set.positionals().count(), 1);
/// // The help option is added by the parser.
/// assert_eq!(rule_set.by_kind(Kind::Option).count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    // Option aliases, longest first; equal lengths in declaration order.
    option_aliases: Vec<(String, RuleId)>,
    // Non-builtin rules of every ancestor, outermost first.
    inherited: Vec<Rule>,
}

impl RuleSet {
    /// Validate `rules`, optionally against the rules of the `parent` this set is forked from.
    /// The `parent`'s own inherited rules are checked as well, so names and aliases stay unique across every ancestor.
    ///
    /// Validation is idempotent: re-validating the rules of a valid set produces the same set.
    pub fn validate(
        mut rules: Vec<Rule>,
        parent: Option<&RuleSet>,
    ) -> Result<RuleSet, DeclarationError> {
        rules.sort_by_key(|rule| rule.sequence);
        // The parent's builtin rules are owned by each parser separately.
        let inherited: Vec<Rule> = match parent {
            Some(parent) => parent
                .inherited
                .iter()
                .chain(parent.iter().filter(|rule| !rule.builtin))
                .cloned()
                .collect(),
            None => Vec::default(),
        };
        let ancestors: Vec<&Rule> = inherited.iter().collect();

        check_names(&rules, &ancestors)?;
        check_aliases(&rules, &ancestors)?;
        check_characters(&rules)?;
        check_prefixes(&rules)?;
        check_greedy(&rules)?;

        let mut option_aliases: Vec<(String, RuleId)> = rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.kind == Kind::Option)
            .flat_map(|(index, rule)| {
                rule.matchable()
                    .map(move |alias| (alias.to_string(), RuleId(index)))
            })
            .collect();
        // Stable, so equal lengths keep declaration order.
        option_aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(RuleSet {
            rules,
            option_aliases,
            inherited,
        })
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rules declared by the parsers this set is forked from, outermost first.
    /// These take part in validation only; they are never matched.
    pub fn inherited(&self) -> &[Rule] {
        &self.inherited
    }

    /// Iterate the rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[allow(missing_docs)]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Find the rule with precisely this `name`.
    pub fn by_name(&self, name: &str) -> Option<&Rule> {
        self.id_of(name).map(|id| &self.rules[id.0])
    }

    /// Find the rule matched by precisely this `alias`.
    pub fn by_alias(&self, alias: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.matchable().any(|a| a == alias))
    }

    #[allow(missing_docs)]
    pub fn by_kind(&self, kind: Kind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.kind == kind)
    }

    /// The positional arguments, in the order they are matched.
    pub fn positionals(&self) -> impl Iterator<Item = &Rule> {
        self.by_kind(Kind::PositionalArgument)
    }

    #[allow(missing_docs)]
    pub fn sub_commands(&self) -> impl Iterator<Item = &Rule> {
        self.by_kind(Kind::SubCommand)
    }

    /// The help rule added by the parser, if any.
    pub fn help_rule(&self) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.builtin)
    }

    pub(crate) fn id_of(&self, name: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .map(RuleId)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (RuleId(index), rule))
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub(crate) fn option_aliases(&self) -> &[(String, RuleId)] {
        &self.option_aliases
    }
}

fn check_names(rules: &[Rule], inherited: &[&Rule]) -> Result<(), DeclarationError> {
    let mut names: HashSet<&str> = inherited.iter().map(|rule| rule.name.as_str()).collect();

    for rule in rules {
        if !names.insert(rule.name.as_str()) {
            return Err(DeclarationError::DuplicateName(
                rule.display_name().to_string(),
            ));
        }
    }

    Ok(())
}

fn check_aliases(rules: &[Rule], inherited: &[&Rule]) -> Result<(), DeclarationError> {
    let mut owners: HashMap<&str, &Rule> = HashMap::default();

    for rule in inherited.iter().copied().chain(rules.iter()) {
        for alias in rule.matchable() {
            if let Some(first) = owners.get(alias) {
                // An option may repeat its own name as an alias.
                if first.name != rule.name {
                    return Err(DeclarationError::DuplicateAlias {
                        alias: alias.to_string(),
                        first: first.display_name().to_string(),
                        second: rule.display_name().to_string(),
                    });
                }
            } else {
                owners.insert(alias, rule);
            }
        }
    }

    Ok(())
}

fn check_characters(rules: &[Rule]) -> Result<(), DeclarationError> {
    for rule in rules {
        let invalid = rule.name.is_empty()
            || rule
                .name
                .chars()
                .any(|c| c.is_whitespace() || RESERVED_CHARACTERS.contains(&c));

        if invalid && !rule.is_sub_command_marked() {
            return Err(DeclarationError::InvalidName {
                kind: rule.kind,
                name: rule.name.clone(),
            });
        }
    }

    Ok(())
}

fn check_prefixes(rules: &[Rule]) -> Result<(), DeclarationError> {
    for rule in rules {
        let name = if rule.is_sub_command_marked() {
            None
        } else {
            Some(rule.name.as_str())
        };

        for candidate in name.into_iter().chain(rule.aliases.iter().map(String::as_str)) {
            if !starts_with_word(candidate) {
                return Err(DeclarationError::InvalidPrefix {
                    kind: rule.kind,
                    name: candidate.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn check_greedy(rules: &[Rule]) -> Result<(), DeclarationError> {
    let mut greedy: Option<&Rule> = None;

    for rule in rules.iter().filter(|r| r.kind == Kind::PositionalArgument) {
        if let Some(greedy) = greedy {
            return Err(DeclarationError::AmbiguousGreedy {
                name: rule.name.clone(),
                greedy: greedy.name.clone(),
            });
        }

        if rule.behaviour.repeatable {
            greedy.replace(rule);
        }
    }

    Ok(())
}

fn starts_with_word(value: &str) -> bool {
    match value.chars().next() {
        Some(c) => c.is_alphanumeric() || c == '_',
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::thread_rng;
    use rstest::rstest;

    fn option(sequence: usize, name: &str, aliases: &[&str]) -> Rule {
        let mut rule = Rule::new(sequence, name, Kind::Option);
        rule.aliases = aliases.iter().map(|a| a.to_string()).collect();
        rule.behaviour.expects_value = true;
        rule
    }

    fn argument(sequence: usize, name: &str, repeatable: bool) -> Rule {
        let mut rule = Rule::new(sequence, name, Kind::PositionalArgument);
        rule.behaviour.expects_value = true;
        rule.behaviour.repeatable = repeatable;
        rule
    }

    fn sub_command(sequence: usize, command: &str) -> Rule {
        let mut rule = Rule::new(
            sequence,
            format!("{SUB_COMMAND_PREFIX}{command}"),
            Kind::SubCommand,
        );
        rule.aliases = vec![command.to_string()];
        rule
    }

    #[test]
    fn validate_empty() {
        let rule_set = RuleSet::validate(Vec::default(), None).unwrap();
        assert!(rule_set.is_empty());
        assert!(rule_set.option_aliases().is_empty());
    }

    #[test]
    fn validate() {
        let rule_set = RuleSet::validate(
            vec![
                option(0, "amend", &["a"]),
                argument(1, "file", false),
                sub_command(2, "serve"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(rule_set.len(), 3);
        assert_eq!(rule_set.by_name("amend").unwrap().sequence(), 0);
        assert_eq!(rule_set.by_alias("a").unwrap().name(), "amend");
        assert_eq!(rule_set.by_alias("serve").unwrap().display_name(), "serve");
        assert_eq!(rule_set.by_alias("file"), None);
        assert_eq!(rule_set.positionals().count(), 1);
        assert_eq!(rule_set.sub_commands().count(), 1);
        assert_eq!(
            rule_set.option_aliases(),
            &[
                ("amend".to_string(), RuleId(0)),
                ("a".to_string(), RuleId(0))
            ]
        );
    }

    #[test]
    fn validate_idempotent() {
        let rule_set = RuleSet::validate(
            vec![
                option(0, "amend", &["a"]),
                option(1, "all", &["l"]),
                argument(2, "files", true),
            ],
            None,
        )
        .unwrap();

        let again = RuleSet::validate(rule_set.rules().to_vec(), None).unwrap();
        assert_eq!(again, rule_set);
    }

    #[test]
    fn validate_declaration_order() {
        let mut rules = vec![
            option(0, "ab", &[]),
            option(1, "cd", &[]),
            option(2, "abc", &[]),
            option(3, "e", &[]),
            argument(4, "first", false),
            argument(5, "second", false),
        ];

        for _ in 0..10 {
            rules.shuffle(&mut thread_rng());
            let rule_set = RuleSet::validate(rules.clone(), None).unwrap();
            let names: Vec<&str> = rule_set.iter().map(|r| r.name()).collect();
            assert_eq!(names, vec!["ab", "cd", "abc", "e", "first", "second"]);
            let aliases: Vec<&str> = rule_set
                .option_aliases()
                .iter()
                .map(|(alias, _)| alias.as_str())
                .collect();
            assert_eq!(aliases, vec!["abc", "ab", "cd", "e"]);
        }
    }

    #[test]
    fn duplicate_name() {
        let error = RuleSet::validate(
            vec![option(0, "foo", &[]), argument(1, "foo", false)],
            None,
        )
        .unwrap_err();
        assert_eq!(error, DeclarationError::DuplicateName("foo".to_string()));
        assert_eq!(
            error.to_string(),
            "duplicate argument or option 'foo' defined"
        );
    }

    #[test]
    fn duplicate_alias() {
        let error = RuleSet::validate(
            vec![option(0, "foo", &["f"]), option(1, "fizz", &["f"])],
            None,
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "duplicate alias 'f' for 'foo' redefined by 'fizz'"
        );
    }

    #[test]
    fn duplicate_alias_against_name() {
        let error = RuleSet::validate(
            vec![option(0, "verbose", &["v"]), option(1, "v", &[])],
            None,
        )
        .unwrap_err();
        assert_matches!(error, DeclarationError::DuplicateAlias { alias, .. } if alias == "v");
    }

    #[test]
    fn own_name_as_alias() {
        RuleSet::validate(vec![option(0, "v", &["v"])], None).unwrap();
    }

    #[rstest]
    #[case("")]
    #[case("*bar")]
    #[case("ba r")]
    #[case("bar!")]
    #[case("b{a}r")]
    #[case("a/b")]
    #[case("tab\t")]
    fn invalid_name(#[case] name: &str) {
        let error = RuleSet::validate(vec![option(0, name, &[])], None).unwrap_err();
        assert_matches!(error, DeclarationError::InvalidName { kind: Kind::Option, name: n } if n == name);
    }

    #[test]
    fn invalid_name_message() {
        let error = RuleSet::validate(vec![argument(0, "*bar", false)], None).unwrap_err();
        assert_eq!(
            error.to_string(),
            "bad argument '*bar'; contains invalid characters"
        );
    }

    #[rstest]
    #[case("-foo", &[])]
    #[case("--foo", &[])]
    #[case("foo", &["-f"])]
    #[case("foo", &[""])]
    #[case("foo", &["@f"])]
    fn invalid_prefix(#[case] name: &str, #[case] aliases: &[&str]) {
        let error = RuleSet::validate(vec![option(0, name, aliases)], None).unwrap_err();
        assert_matches!(error, DeclarationError::InvalidPrefix { .. });
    }

    #[test]
    fn sub_command_marker() {
        RuleSet::validate(vec![sub_command(0, "serve")], None).unwrap();

        let error = RuleSet::validate(vec![sub_command(0, "-serve")], None).unwrap_err();
        assert_eq!(
            error,
            DeclarationError::InvalidPrefix {
                kind: Kind::SubCommand,
                name: "-serve".to_string(),
            }
        );
    }

    #[test]
    fn ambiguous_greedy() {
        let error = RuleSet::validate(
            vec![
                argument(0, "first", true),
                option(1, "flag", &[]),
                argument(2, "second", false),
            ],
            None,
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "'second' is ambiguous when following greedy argument 'first'"
        );
    }

    #[test]
    fn greedy_last() {
        RuleSet::validate(
            vec![
                argument(0, "first", false),
                argument(1, "rest", true),
                option(2, "flag", &[]),
            ],
            None,
        )
        .unwrap();
    }

    #[test]
    fn check_order() {
        // Duplicate names are reported before invalid characters.
        let error = RuleSet::validate(
            vec![option(0, "*bar", &[]), option(1, "*bar", &[])],
            None,
        )
        .unwrap_err();
        assert_matches!(error, DeclarationError::DuplicateName(_));

        // Invalid characters are reported before invalid prefixes.
        let error = RuleSet::validate(vec![option(0, "*bar", &[])], None).unwrap_err();
        assert_matches!(error, DeclarationError::InvalidName { .. });
    }

    #[test]
    fn against_parent() {
        let parent = RuleSet::validate(
            vec![
                option(0, "verbose", &["v"]),
                sub_command(1, "serve"),
                Rule::help_rule(2, true),
            ],
            None,
        )
        .unwrap();

        let error =
            RuleSet::validate(vec![option(0, "verbose", &[])], Some(&parent)).unwrap_err();
        assert_eq!(error, DeclarationError::DuplicateName("verbose".to_string()));

        let error =
            RuleSet::validate(vec![option(0, "value", &["v"])], Some(&parent)).unwrap_err();
        assert_eq!(
            error,
            DeclarationError::DuplicateAlias {
                alias: "v".to_string(),
                first: "verbose".to_string(),
                second: "value".to_string(),
            }
        );

        // The child carries its own help rule.
        let child = RuleSet::validate(
            vec![option(0, "port", &["p"]), Rule::help_rule(1, true)],
            Some(&parent),
        )
        .unwrap();
        assert_eq!(child.len(), 2);
        assert!(child.help_rule().is_some());
        assert_eq!(child.inherited().len(), 2);
    }

    #[rstest]
    #[case(vec![option(0, "verbose", &[])], DeclarationError::DuplicateName("verbose".to_string()))]
    #[case(vec![option(0, "port", &[])], DeclarationError::DuplicateName("port".to_string()))]
    #[case(
        vec![option(0, "loud", &["v"])],
        DeclarationError::DuplicateAlias {
            alias: "v".to_string(),
            first: "verbose".to_string(),
            second: "loud".to_string(),
        }
    )]
    fn against_grandparent(#[case] rules: Vec<Rule>, #[case] expected: DeclarationError) {
        let root = RuleSet::validate(
            vec![
                option(0, "verbose", &["v"]),
                sub_command(1, "remote"),
                Rule::help_rule(2, true),
            ],
            None,
        )
        .unwrap();
        let middle = RuleSet::validate(
            vec![
                option(0, "port", &["p"]),
                sub_command(1, "add"),
                Rule::help_rule(2, true),
            ],
            Some(&root),
        )
        .unwrap();
        assert_eq!(middle.inherited().len(), 2);

        let error = RuleSet::validate(rules, Some(&middle)).unwrap_err();
        assert_eq!(error, expected);
    }
}
