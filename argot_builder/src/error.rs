use thiserror::Error;

use crate::constant::*;
use crate::model::Kind;
use crate::store::StoreError;

/// An error in how the rules were declared.
///
/// These are accumulated while adding parameters and reported at the start of parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[allow(missing_docs)]
    #[error("duplicate argument or option '{0}' defined")]
    DuplicateName(String),

    #[allow(missing_docs)]
    #[error("duplicate alias '{alias}' for '{first}' redefined by '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[allow(missing_docs)]
    #[error("bad {kind} '{name}'; contains invalid characters")]
    InvalidName { kind: Kind, name: String },

    #[allow(missing_docs)]
    #[error("'{name}' is an invalid name or alias for {kind}; prefixes are not allowed")]
    InvalidPrefix { kind: Kind, name: String },

    #[allow(missing_docs)]
    #[error("'{name}' is ambiguous when following greedy argument '{greedy}'")]
    AmbiguousGreedy { name: String, greedy: String },

    #[allow(missing_docs)]
    #[error("refusing to add {0} with no name")]
    MissingName(Kind),

    #[allow(missing_docs)]
    #[error("no destination provided while adding {kind} '{name}'")]
    MissingStore { kind: Kind, name: String },

    #[allow(missing_docs)]
    #[error("invalid destination while adding {kind} '{name}': {reason}")]
    InvalidStore {
        kind: Kind,
        name: String,
        reason: String,
    },
}

/// An error matching the Cli tokens against the rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    #[allow(missing_docs)]
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    #[allow(missing_docs)]
    #[error("expected option '{0}' to have a value")]
    MissingValue(String),

    #[allow(missing_docs)]
    #[error("expected option '{0}' to have a value after '='")]
    EmptyValue(String),
}

/// An error validating the merged values against the rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[allow(missing_docs)]
    #[error("{} is required", describe(*.kind, .name))]
    Required { kind: Kind, name: String },

    #[allow(missing_docs)]
    #[error("unexpected duplicate option '--{0}' provided")]
    DuplicateOption(String),

    #[allow(missing_docs)]
    #[error("'{value}' is an invalid argument for '{name}' choose from ({})", .choices.join(", "))]
    InvalidChoice {
        value: String,
        name: String,
        choices: Vec<String>,
    },
}

/// An error converting a string value into a destination type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[allow(missing_docs)]
    #[error("'{0}' is not a boolean")]
    NotABoolean(String),

    #[allow(missing_docs)]
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[allow(missing_docs)]
    #[error("{message} at position '{position}'; map values should be 'key=value' separated by commas, or a JSON object")]
    MapSyntax { message: String, position: usize },

    #[allow(missing_docs)]
    #[error("'{value}' was rejected: {message}")]
    Custom { value: String, message: String },
}

/// The error of a parse.
#[derive(Debug, Error)]
pub enum Error {
    #[allow(missing_docs)]
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[allow(missing_docs)]
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A [`Store`](./trait.Store.html) failed, or produced a value that could not be shaped to the rule.
    #[error("while reading from store '{store}': {cause}")]
    Provider {
        /// The source name of the store.
        store: String,
        /// What went wrong.
        cause: StoreError,
    },

    #[allow(missing_docs)]
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A destination could not accept the resolved value.
    #[error("invalid value for {kind} '{name}': {cause}")]
    Store {
        /// The kind of the rule.
        kind: Kind,
        /// The name of the rule.
        name: String,
        /// What went wrong.
        cause: CoercionError,
    },

    /// Not a failure: the help rule was specified on the Cli.
    #[error("user asked for help")]
    HelpRequested,
}

impl Error {
    /// Whether this is the [`Error::HelpRequested`] sentinel.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::HelpRequested)
    }

    /// The conventional process exit code: `0` when help was requested, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_help() {
            HELP_CODE
        } else {
            ERROR_CODE
        }
    }
}

fn describe(kind: Kind, name: &str) -> String {
    match kind {
        Kind::Option => format!("option '--{name}'"),
        Kind::PositionalArgument => format!("argument '{name}'"),
        Kind::EnvBinding => format!("environment variable '{name}'"),
        Kind::SubCommand => format!("sub-command '{name}'"),
    }
}
