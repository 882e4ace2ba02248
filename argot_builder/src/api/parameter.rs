use crate::api::Destination;
use crate::constant::*;
use crate::error::DeclarationError;
use crate::model::{Behaviour, Cardinality, Kind};
use crate::rules::Rule;

pub(crate) struct ParameterInner<'a> {
    kind: Kind,
    name: String,
    aliases: Vec<String>,
    chain: Vec<Destination<'a>>,
    default: Option<String>,
    choices: Vec<String>,
    env_var: Option<String>,
    help: Option<String>,
    required: bool,
    repeatable: bool,
    hidden: bool,
    no_split: bool,
    cardinality: Option<Cardinality>,
}

impl<'a> std::fmt::Debug for ParameterInner<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match &self.kind {
            Kind::Option => format!("--{n}", n = self.name),
            _ => self.name.clone(),
        };
        let env = match &self.env_var {
            Some(var) => format!(" ${var}"),
            None => "".to_string(),
        };

        write!(f, "{kind}[{name}{env}, {chain:?}]", kind = self.kind, chain = self.chain)
    }
}

/// A declaration of an option, argument, environment binding, or sub-command.
///
/// Each parameter becomes one [`Rule`](./struct.Rule.html) when added to a
/// [`CommandLineParser`](./struct.CommandLineParser.html).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{CommandLineParser, Destination, Parameter};
///
/// let mut level = String::default();
/// let mut parser = CommandLineParser::new("program")
///     .add(
///         Parameter::option("level")
///             .alias("l")
///             .choices(vec!["debug", "info"])
///             .default("info")
///             .help("The logging level.")
///             .store(Destination::Str(&mut level)),
///     );
///
/// parser.parse_tokens(vec!["-l", "debug"].as_slice()).unwrap();
/// drop(parser);
/// assert_eq!(level, "debug");
/// ```
#[derive(Debug)]
pub struct Parameter<'a>(ParameterInner<'a>);

impl<'a> Parameter<'a> {
    fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self(ParameterInner {
            kind,
            name: name.into(),
            aliases: Vec::default(),
            chain: Vec::default(),
            default: None,
            choices: Vec::default(),
            env_var: None,
            help: None,
            required: false,
            repeatable: false,
            hidden: false,
            no_split: false,
            cardinality: None,
        })
    }

    /// Create an option parameter: `--NAME [VALUE]`.
    /// The name is also its long alias.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Destination, Parameter};
    ///
    /// let mut verbose = false;
    /// Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose));
    /// ```
    pub fn option(name: impl Into<String>) -> Self {
        Self::new(Kind::Option, name)
    }

    /// Create a positional argument parameter.
    /// Arguments are matched in the order they are added.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Destination, Parameter};
    ///
    /// let mut files: Vec<String> = Vec::default();
    /// Parameter::argument("files").repeatable(true).store(Destination::StrList(&mut files));
    /// ```
    pub fn argument(name: impl Into<String>) -> Self {
        Self::new(Kind::PositionalArgument, name)
    }

    /// Create a parameter read only from the environment variable `var`.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Destination, Parameter};
    ///
    /// let mut token = String::default();
    /// Parameter::env("token", "API_TOKEN").required(true).store(Destination::Str(&mut token));
    /// ```
    pub fn env(name: impl Into<String>, var: impl Into<String>) -> Self {
        let mut parameter = Self::new(Kind::EnvBinding, name);
        parameter.0.env_var.replace(var.into());
        parameter
    }

    /// Create a sub-command parameter, matched by the exact token `command`.
    /// The remainder of the Cli is deferred to the sub-command's parser.
    ///
    /// A destination is optional; if given it receives the command name.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Destination, Parameter};
    ///
    /// let mut command = String::default();
    /// Parameter::sub_command("serve").store(Destination::Str(&mut command));
    /// ```
    pub fn sub_command(command: impl Into<String>) -> Self {
        Self::new(Kind::SubCommand, command)
    }

    /// Add an alias (without `-`/`--` prefix).
    /// May be repeated.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.0.aliases.push(alias.into());
        self
    }

    /// Add a destination to the store chain.
    /// May be repeated; every destination receives the resolved value.
    pub fn store(mut self, destination: Destination<'a>) -> Self {
        self.0.chain.push(destination);
        self
    }

    /// The value used when no source provides one.
    /// If repeated, only the final default will apply.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.0.default.replace(value.into());
        self
    }

    /// Limit the accepted values.
    pub fn choices(mut self, choices: Vec<impl Into<String>>) -> Self {
        self.0.choices = choices.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Also read the value from the environment variable `var`.
    pub fn env_var(mut self, var: impl Into<String>) -> Self {
        self.0.env_var.replace(var.into());
        self
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.0.help.replace(description.into());
        self
    }

    /// Fail the parse when no source provides a value (and there is no default).
    pub fn required(mut self, required: bool) -> Self {
        self.0.required = required;
        self
    }

    /// Allow more than one occurrence.
    /// A repeatable argument consumes every remaining argument.
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.0.repeatable = repeatable;
        self
    }

    /// Omit from generated help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.0.hidden = hidden;
        self
    }

    /// Do not comma split a single occurrence of a list.
    pub fn no_split(mut self, no_split: bool) -> Self {
        self.0.no_split = no_split;
        self
    }

    /// Override the cardinality implied by the destinations.
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.0.cardinality.replace(cardinality);
        self
    }

    /// Convert into a rule and its store chain.
    pub(crate) fn to_rule(
        self,
        sequence: usize,
    ) -> Result<(Rule, Vec<Destination<'a>>), DeclarationError> {
        let inner = self.0;

        if inner.name.is_empty() {
            return Err(DeclarationError::MissingName(inner.kind));
        }

        if inner.chain.is_empty() && inner.kind != Kind::SubCommand {
            return Err(DeclarationError::MissingStore {
                kind: inner.kind,
                name: inner.name,
            });
        }

        let implied = implied_cardinality(&inner.chain).map_err(|reason| {
            DeclarationError::InvalidStore {
                kind: inner.kind,
                name: inner.name.clone(),
                reason,
            }
        })?;

        let expects_value = match inner.kind {
            Kind::SubCommand => false,
            Kind::Option => !inner.chain.iter().all(Destination::is_flag),
            Kind::PositionalArgument | Kind::EnvBinding => true,
        };

        let (name, aliases) = match inner.kind {
            Kind::SubCommand => {
                let mut aliases = vec![inner.name.clone()];
                aliases.extend(inner.aliases);
                (format!("{SUB_COMMAND_PREFIX}{}", inner.name), aliases)
            }
            _ => (inner.name, inner.aliases),
        };

        let mut rule = Rule::new(sequence, name, inner.kind);
        rule.aliases = aliases;
        rule.cardinality = inner.cardinality.or(implied).unwrap_or(Cardinality::Scalar);
        rule.behaviour = Behaviour {
            expects_value,
            repeatable: inner.repeatable,
            required: inner.required,
            hidden: inner.hidden,
            no_split: inner.no_split,
        };
        rule.default = inner.default;
        rule.choices = inner.choices;
        rule.env_var = inner.env_var;
        rule.help = inner.help;

        Ok((rule, inner.chain))
    }
}

fn implied_cardinality(chain: &[Destination]) -> Result<Option<Cardinality>, String> {
    let mut implied: Option<Cardinality> = None;

    for cardinality in chain.iter().filter_map(Destination::cardinality) {
        match implied {
            Some(existing) if existing != cardinality => {
                return Err(format!(
                    "destinations of conflicting shapes {existing} and {cardinality}"
                ));
            }
            _ => {
                implied.replace(cardinality);
            }
        }
    }

    Ok(implied)
}
