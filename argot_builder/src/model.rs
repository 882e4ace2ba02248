use std::collections::HashMap;

/// What a rule is declared as.
///
/// A rule has precisely one kind, fixed when the [`Parameter`](./struct.Parameter.html) is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `--NAME [VALUE]`: matched by alias anywhere on the Cli.
    Option,
    /// `VALUE`: matched by position.
    PositionalArgument,
    /// Read only from the environment.
    EnvBinding,
    /// `COMMAND ..`: matched by exact token, deferring the rest of the Cli.
    SubCommand,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Option => write!(f, "option"),
            Kind::PositionalArgument => write!(f, "argument"),
            Kind::EnvBinding => write!(f, "environment variable"),
            Kind::SubCommand => write!(f, "sub-command"),
        }
    }
}

/// How the raw strings collected for a rule combine into its resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// A single string.
    Scalar,
    /// An ordered list of strings.
    List,
    /// A string-keyed map of strings.
    Map,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Independent behavioural switches of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Behaviour {
    /// Consumes a value (`--NAME VALUE`, `--NAME=VALUE`).
    pub expects_value: bool,
    /// May occur more than once; a repeatable positional argument is greedy.
    pub repeatable: bool,
    /// Must resolve to a value from some source.
    pub required: bool,
    /// Omitted from generated help.
    pub hidden: bool,
    /// A single occurrence of a list is not comma split.
    pub no_split: bool,
}

/// A value as produced by a [`Store`](./trait.Store.html), or as resolved for a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single string.
    Scalar(String),
    /// An ordered list of strings.
    List(Vec<String>),
    /// A string-keyed map of strings.
    Map(HashMap<String, String>),
}

/// Token scanning switches.
///
/// All switches are off by default.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::ScanMode;
///
/// let mode = ScanMode::default()
///     .allow_combined_options(true)
///     .allow_unknown_args(true);
/// assert!(mode.combined_options());
/// assert!(!mode.combined_values());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanMode {
    unprefixed_options: bool,
    combined_options: bool,
    combined_values: bool,
    unknown_args: bool,
}

impl ScanMode {
    /// Match options without a `-`/`--` prefix (ex: `verbose` for `--verbose`).
    pub fn allow_unprefixed_options(mut self, allow: bool) -> Self {
        self.unprefixed_options = allow;
        self
    }

    /// Expand short flag clusters (ex: `-abc` for `-a -b -c`).
    pub fn allow_combined_options(mut self, allow: bool) -> Self {
        self.combined_options = allow;
        self
    }

    /// Accept a value directly after its alias (ex: `-n5` for `-n 5`).
    pub fn allow_combined_values(mut self, allow: bool) -> Self {
        self.combined_values = allow;
        self
    }

    /// Tolerate tokens that match no rule, rather than failing the parse.
    pub fn allow_unknown_args(mut self, allow: bool) -> Self {
        self.unknown_args = allow;
        self
    }

    #[allow(missing_docs)]
    pub fn unprefixed_options(&self) -> bool {
        self.unprefixed_options
    }

    #[allow(missing_docs)]
    pub fn combined_options(&self) -> bool {
        self.combined_options
    }

    #[allow(missing_docs)]
    pub fn combined_values(&self) -> bool {
        self.combined_values
    }

    #[allow(missing_docs)]
    pub fn unknown_args(&self) -> bool {
        self.unknown_args
    }
}

/// Configuration for a [`CommandLineParser`](./struct.CommandLineParser.html).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{ParserConfig, ScanMode};
///
/// let config = ParserConfig::default()
///     .mode(ScanMode::default().allow_combined_options(true))
///     .env_prefix("DEMO_")
///     .help(false);
/// assert_eq!(config.env_var_name("PORT"), "DEMO_PORT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    mode: ScanMode,
    env_prefix: Option<String>,
    help: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            env_prefix: None,
            help: true,
        }
    }
}

impl ParserConfig {
    /// Set the token scanning switches.
    pub fn mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Prefix every environment variable name with `prefix` when reading the environment.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix.replace(prefix.into());
        self
    }

    /// Whether to add the `-h, --help` rule (default: `true`).
    /// It is never added when a rule named `help` is declared.
    pub fn help(mut self, enabled: bool) -> Self {
        self.help = enabled;
        self
    }

    pub(crate) fn scan_mode(&self) -> ScanMode {
        self.mode
    }

    pub(crate) fn adds_help(&self) -> bool {
        self.help
    }

    /// The environment variable actually read for the declared variable `name`.
    pub fn env_var_name(&self, name: &str) -> String {
        match &self.env_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}
