use crate::constant::*;
use crate::model::{Behaviour, Cardinality, Kind};

/// The position of a [`Rule`] within its [`RuleSet`](./struct.RuleSet.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    /// The index of the rule in declaration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A declared option, argument, environment binding, or sub-command.
///
/// Rules are metadata only: the destinations a rule stores into are owned by the
/// [`CommandLineParser`](./struct.CommandLineParser.html) that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) sequence: usize,
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) kind: Kind,
    pub(crate) cardinality: Cardinality,
    pub(crate) behaviour: Behaviour,
    pub(crate) default: Option<String>,
    pub(crate) choices: Vec<String>,
    pub(crate) env_var: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) builtin: bool,
}

impl Rule {
    pub(crate) fn new(sequence: usize, name: impl Into<String>, kind: Kind) -> Self {
        Self {
            sequence,
            name: name.into(),
            aliases: Vec::default(),
            kind,
            cardinality: Cardinality::Scalar,
            behaviour: Behaviour::default(),
            default: None,
            choices: Vec::default(),
            env_var: None,
            help: None,
            builtin: false,
        }
    }

    pub(crate) fn help_rule(sequence: usize, with_short: bool) -> Self {
        let mut rule = Self::new(sequence, HELP_NAME, Kind::Option);
        if with_short {
            rule.aliases.push(HELP_SHORT.to_string());
        }
        rule.behaviour.hidden = true;
        rule.help.replace(HELP_MESSAGE.to_string());
        rule.builtin = true;
        rule
    }

    /// Creation order of the rule.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The unique name of the rule.
    ///
    /// Sub-command rules carry an internal marker; see [`Rule::display_name`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name as shown to a user.
    pub fn display_name(&self) -> &str {
        self.name
            .strip_prefix(SUB_COMMAND_PREFIX)
            .unwrap_or(&self.name)
    }

    #[allow(missing_docs)]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[allow(missing_docs)]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[allow(missing_docs)]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[allow(missing_docs)]
    pub fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    #[allow(missing_docs)]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[allow(missing_docs)]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[allow(missing_docs)]
    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    #[allow(missing_docs)]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The strings this rule is matched by on the Cli.
    ///
    /// An option is matched by its name and aliases; every other kind only by its aliases.
    pub fn matchable(&self) -> impl Iterator<Item = &str> {
        let name = match self.kind {
            Kind::Option => Some(self.name.as_str()),
            _ => None,
        };
        name.into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether the rule was added by the parser itself (ex: `--help`).
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub(crate) fn is_sub_command_marked(&self) -> bool {
        self.name.starts_with(SUB_COMMAND_PREFIX)
    }
}
