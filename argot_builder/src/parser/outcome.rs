use std::rc::Rc;

use crate::model::ParserConfig;
use crate::rules::RuleSet;
use crate::store::{EnvStore, Store};

/// The result of a successful parse.
///
/// By the time this is returned, every destination of the parser has been written.
#[derive(Debug)]
pub struct Parsed {
    pub(crate) unrecognized: Vec<String>,
    pub(crate) dispatch: Option<Dispatch>,
    pub(crate) rules: Rc<RuleSet>,
}

impl Parsed {
    /// The sub-command claimed on the command line, if any.
    pub fn sub_command(&self) -> Option<&Dispatch> {
        self.dispatch.as_ref()
    }

    /// Tokens no rule claimed.
    /// Only ever non-empty under [`ScanMode::allow_unknown_args`](./struct.ScanMode.html#method.allow_unknown_args).
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    /// The validated rules the parse ran against, including the help rule when one was added.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// Hands a claimed sub-command over to its own parser.
///
/// Build that parser with [`CommandLineParser::fork`](./struct.CommandLineParser.html#method.fork), and parse it with [`Dispatch::tokens`].
pub struct Dispatch {
    pub(crate) program: String,
    pub(crate) command: String,
    pub(crate) tail: Vec<String>,
    pub(crate) rules: Rc<RuleSet>,
    pub(crate) config: ParserConfig,
    pub(crate) stores: Vec<Rc<dyn Store>>,
    pub(crate) environment: Option<EnvStore>,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dispatch[{}, {:?}]", self.command, self.tail)
    }
}

impl Dispatch {
    /// The sub-command, as typed.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The program name for the sub-command's parser: `PROGRAM COMMAND`.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The tokens after the sub-command that the parent did not claim.
    pub fn remaining(&self) -> &[String] {
        &self.tail
    }

    /// The remaining tokens, in the shape [`CommandLineParser::parse_tokens`](./struct.CommandLineParser.html#method.parse_tokens) takes.
    pub fn tokens(&self) -> Vec<&str> {
        self.tail.iter().map(String::as_str).collect()
    }
}
