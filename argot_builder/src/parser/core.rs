use std::rc::Rc;

use crate::api::{Destination, Parameter};
use crate::constant::*;
use crate::error::{DeclarationError, Error};
use crate::model::ParserConfig;
use crate::parser::{Dispatch, Parsed};
use crate::resolver::{commit, Resolver};
use crate::rules::{Rule, RuleSet};
use crate::scanner::Scanner;
use crate::store::{EnvStore, Store};

/// The command line parser.
///
/// Values are looked up in order: the command line, the external stores (in the order they are added),
/// the environment, and finally the declared default.
/// The first source that has a value wins outright.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use std::rc::Rc;
/// use argot::{CommandLineParser, Destination, EnvStore, MemoryStore, Parameter};
///
/// let mut host = String::default();
/// let mut port: i64 = 0;
/// let mut parser = CommandLineParser::new("program")
///     .add(Parameter::option("host").env_var("HOST").store(Destination::Str(&mut host)))
///     .add(Parameter::option("port").default("80").store(Destination::Int(&mut port)))
///     .store(Rc::new(MemoryStore::named("config.ini").with("port", "8080")))
///     .environment(EnvStore::from_pairs(vec![("HOST", "localhost")]));
///
/// parser.parse_tokens(empty::slice()).unwrap();
/// drop(parser);
///
/// assert_eq!(host, "localhost");
/// assert_eq!(port, 8080);
/// ```
pub struct CommandLineParser<'a> {
    program: String,
    about: Option<String>,
    config: ParserConfig,
    rules: Vec<Rule>,
    chains: Vec<Vec<Destination<'a>>>,
    stores: Vec<Rc<dyn Store>>,
    environment: Option<EnvStore>,
    parent: Option<Rc<RuleSet>>,
    deferred_error: Option<DeclarationError>,
}

impl<'a> CommandLineParser<'a> {
    /// Create a command line parser.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::CommandLineParser;
    ///
    /// let mut parser = CommandLineParser::new("program");
    /// parser.parse_tokens(empty::slice()).unwrap();
    /// ```
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            config: ParserConfig::default(),
            rules: Vec::default(),
            chains: Vec::default(),
            stores: Vec::default(),
            environment: None,
            parent: None,
            deferred_error: None,
        }
    }

    /// Build the parser for the sub-command that `dispatch` hands over.
    ///
    /// The sub-command's parser shares the configuration, the external stores, and the environment of its parent.
    /// Its rules are validated against those of the parent and of every parser above it, so none may reuse a name or alias of another.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{CommandLineParser, Destination, Parameter};
    ///
    /// let mut verbose = false;
    /// let mut port: i64 = 0;
    /// let mut parser = CommandLineParser::new("program")
    ///     .add(Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose)))
    ///     .add(Parameter::sub_command("serve"));
    ///
    /// let parsed = parser.parse_tokens(vec!["serve", "--port", "8080", "-v"].as_slice()).unwrap();
    /// let dispatch = parsed.sub_command().unwrap();
    /// assert_eq!(dispatch.command(), "serve");
    ///
    /// let mut serve = CommandLineParser::fork(dispatch)
    ///     .add(Parameter::option("port").store(Destination::Int(&mut port)));
    /// serve.parse_tokens(dispatch.tokens().as_slice()).unwrap();
    /// drop(parser);
    /// drop(serve);
    ///
    /// assert!(verbose);
    /// assert_eq!(port, 8080);
    /// ```
    pub fn fork(dispatch: &Dispatch) -> Self {
        Self {
            program: dispatch.program.clone(),
            about: None,
            config: dispatch.config.clone(),
            rules: Vec::default(),
            chains: Vec::default(),
            stores: dispatch.stores.clone(),
            environment: dispatch.environment.clone(),
            parent: Some(dispatch.rules.clone()),
            deferred_error: None,
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Set the parser configuration.
    /// If repeated, only the final configuration will apply.
    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Add an option, argument, environment binding, or sub-command.
    ///
    /// The order of arguments corresponds to their positional order during parsing.
    /// A malformed parameter is reported by the next parse; only the first such error is kept.
    pub fn add(mut self, parameter: Parameter<'a>) -> Self {
        match parameter.to_rule(self.rules.len()) {
            Ok((rule, chain)) => {
                self.rules.push(rule);
                self.chains.push(chain);
            }
            Err(error) => {
                if self.deferred_error.is_none() {
                    self.deferred_error.replace(error);
                }
            }
        }

        self
    }

    /// Add an external store, consulted after the command line and before the environment.
    /// Stores added earlier take precedence over those added later.
    pub fn store(mut self, store: Rc<dyn Store>) -> Self {
        self.stores.push(store);
        self
    }

    /// Read environment variables from `environment` rather than from the process environment.
    pub fn environment(mut self, environment: EnvStore) -> Self {
        self.environment.replace(environment);
        self
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The about message, if documented.
    pub fn about_message(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Validate the declared rules, along with the help rule when the parser adds one.
    pub fn rules(&self) -> Result<RuleSet, DeclarationError> {
        if let Some(error) = &self.deferred_error {
            return Err(error.clone());
        }

        let mut rules = self.rules.clone();

        if self.config.adds_help() && !self.declares(|rule| rule.name == HELP_NAME) {
            let with_short = !self.declares(|rule| rule.matchable().any(|a| a == HELP_SHORT));
            rules.push(Rule::help_rule(self.rules.len(), with_short));
        }

        RuleSet::validate(rules, self.parent.as_deref())
    }

    // Whether a declared or inherited rule satisfies `predicate`.
    fn declares(&self, predicate: impl Fn(&Rule) -> bool) -> bool {
        let inherited = self
            .parent
            .iter()
            .flat_map(|parent| parent.inherited().iter().chain(parent.iter()))
            .filter(|rule| !rule.is_builtin());
        self.rules.iter().chain(inherited).any(predicate)
    }

    /// Parse the tokens of the command line, and store the resolved values into the destinations.
    ///
    /// `tokens` excludes the program name.
    /// Parsing stops at the first error, in which case no destination is written.
    /// When help is requested, [`Error::HelpRequested`] is returned before any destination is written.
    ///
    /// The parser may parse more than once; each parse starts over from `tokens`.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{CommandLineParser, Destination, Error, Parameter};
    ///
    /// let mut name = String::default();
    /// let mut parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument("name").store(Destination::Str(&mut name)));
    ///
    /// let error = parser.parse_tokens(vec!["--help"].as_slice()).unwrap_err();
    /// assert!(error.is_help());
    /// assert_eq!(error.exit_code(), 0);
    ///
    /// let error = parser.parse_tokens(vec!["a", "b"].as_slice()).unwrap_err();
    /// assert_eq!(error.to_string(), "unknown argument 'b'");
    /// assert_eq!(error.exit_code(), 1);
    ///
    /// parser.parse_tokens(vec!["a"].as_slice()).unwrap();
    /// drop(parser);
    /// assert_eq!(name, "a");
    /// ```
    pub fn parse_tokens(&mut self, tokens: &[&str]) -> Result<Parsed, Error> {
        let rule_set = Rc::new(self.rules()?);
        let table = Scanner::new(&rule_set, self.config.scan_mode()).scan(tokens)?;
        let help = rule_set
            .help_rule()
            .and_then(|rule| rule_set.id_of(rule.name()));

        if let Some(id) = help {
            if table.is_claimed_before_command(id) {
                debug!("Help requested for '{}'.", self.program);
                return Err(Error::HelpRequested);
            }
        }

        let process;
        let environment = match &self.environment {
            Some(environment) => environment,
            None => {
                process = EnvStore::process();
                &process
            }
        };
        let resolver = Resolver::new(
            &rule_set,
            &table,
            &self.stores,
            environment,
            &self.config,
        );
        let pending = resolver.prepare(&self.chains)?;
        commit(&rule_set, &mut self.chains, pending)?;

        let dispatch = table.command().map(|(_, id)| {
            let command = rule_set.rule(id).display_name().to_string();
            debug!("Dispatching '{}' to sub-command '{command}'.", self.program);
            Dispatch {
                program: format!("{} {command}", self.program),
                command,
                tail: table.tail(help),
                rules: rule_set.clone(),
                config: self.config.clone(),
                stores: self.stores.clone(),
                environment: self.environment.clone(),
            }
        });

        Ok(Parsed {
            unrecognized: table.unrecognized(),
            dispatch,
            rules: rule_set,
        })
    }

    /// Parse the command line of this process (excluding the program name).
    ///
    /// Fails with [`Error::HelpRequested`] when help is requested; see [`CommandLineParser::parse_tokens`].
    pub fn parse(&mut self) -> Result<Parsed, Error> {
        let arguments: Vec<String> = std::env::args().skip(1).collect();
        let tokens: Vec<&str> = arguments.iter().map(String::as_str).collect();
        self.parse_tokens(tokens.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ResolutionError, ScanError};
    use crate::model::{Kind, ScanMode};
    use crate::api::SetFromString;
    use crate::store::{MemoryStore, StoreError};
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::collections::HashMap;

    #[test]
    fn empty() {
        let mut parser = CommandLineParser::new("program");
        let parsed = parser.parse_tokens(empty::slice()).unwrap();
        assert!(parsed.sub_command().is_none());
        assert!(parsed.unrecognized().is_empty());
        assert_eq!(parsed.rules().len(), 1);
    }

    #[test]
    fn deferred_error_first_wins() {
        let mut flag = false;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option(""))
            .add(Parameter::argument("missing"))
            .add(Parameter::option("flag").store(Destination::Set(&mut flag)));

        let error = parser.parse_tokens(vec!["--flag"].as_slice()).unwrap_err();
        assert_matches!(
            error,
            Error::Declaration(DeclarationError::MissingName(Kind::Option))
        );
        assert_eq!(error.to_string(), "refusing to add option with no name");
        drop(parser);
        assert!(!flag);
    }

    #[test]
    fn validation_error() {
        let mut a = String::default();
        let mut b = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("name").store(Destination::Str(&mut a)))
            .add(Parameter::argument("name").store(Destination::Str(&mut b)));

        let error = parser.parse_tokens(empty::slice()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "duplicate argument or option 'name' defined"
        );
    }

    #[rstest]
    #[case(vec!["--help"], true)]
    #[case(vec!["-h"], true)]
    #[case(vec!["x", "--help", "y"], true)]
    #[case(vec!["x"], false)]
    fn help(#[case] tokens: Vec<&str>, #[case] requested: bool) {
        let mut name = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::argument("name").required(true).store(Destination::Str(&mut name)));

        let result = parser.parse_tokens(&tokens);
        drop(parser);

        if requested {
            assert_matches!(result, Err(Error::HelpRequested));
            assert_eq!(name, "");
        } else {
            result.unwrap();
            assert_eq!(name, "x");
        }
    }

    #[test]
    fn help_disabled() {
        let mut parser =
            CommandLineParser::new("program").config(ParserConfig::default().help(false));

        let error = parser.parse_tokens(vec!["--help"].as_slice()).unwrap_err();
        assert_matches!(error, Error::Scan(ScanError::UnknownArgument(ref token)) if token == "--help");
        assert!(parser.rules().unwrap().help_rule().is_none());
    }

    #[test]
    fn help_user_declared() {
        let mut help = false;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("help").store(Destination::Set(&mut help)));

        parser.parse_tokens(vec!["--help"].as_slice()).unwrap();
        assert!(parser.rules().unwrap().help_rule().is_none());
        drop(parser);
        assert!(help);
    }

    #[test]
    fn help_short_taken() {
        let mut host = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("host").alias("h").store(Destination::Str(&mut host)));

        let rule_set = parser.rules().unwrap();
        let help = rule_set.help_rule().unwrap();
        assert!(help.aliases().is_empty());

        assert_matches!(
            parser.parse_tokens(vec!["--help"].as_slice()),
            Err(Error::HelpRequested)
        );
        parser.parse_tokens(vec!["-h", "abc"].as_slice()).unwrap();
        drop(parser);
        assert_eq!(host, "abc");
    }

    #[test]
    fn nothing_written_on_error() {
        let mut name = "before".to_string();
        let mut port: i64 = 1;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("name").store(Destination::Str(&mut name)))
            .add(Parameter::option("port").store(Destination::Int(&mut port)));

        let error = parser
            .parse_tokens(vec!["--name", "after", "--port", "x"].as_slice())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value for option 'port': 'x' is not an integer"
        );
        drop(parser);
        assert_eq!(name, "before");
        assert_eq!(port, 1);
    }

    #[test]
    fn reparse() {
        let mut names: Vec<String> = Vec::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::argument("names").repeatable(true).store(Destination::StrList(&mut names)));

        parser.parse_tokens(vec!["a", "b"].as_slice()).unwrap();
        parser.parse_tokens(vec!["c"].as_slice()).unwrap();
        drop(parser);
        assert_eq!(names, vec!["c".to_string()]);
    }

    #[test]
    fn required() {
        let mut token = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::env("token", "TOKEN").required(true).store(Destination::Str(&mut token)))
            .environment(EnvStore::default());

        let error = parser.parse_tokens(empty::slice()).unwrap_err();
        assert_matches!(
            error,
            Error::Resolution(ResolutionError::Required {
                kind: Kind::EnvBinding,
                ..
            })
        );
        assert_contains!(error.to_string(), "'token'");
    }

    #[test]
    fn env_prefix() {
        let mut port: i64 = 0;
        let mut parser = CommandLineParser::new("program")
            .config(ParserConfig::default().env_prefix("APP_"))
            .add(Parameter::option("port").env_var("PORT").store(Destination::Int(&mut port)))
            .environment(EnvStore::from_pairs(vec![("PORT", "1"), ("APP_PORT", "2")]));

        parser.parse_tokens(empty::slice()).unwrap();
        drop(parser);
        assert_eq!(port, 2);
    }

    #[test]
    fn external_store_order() {
        let mut port: i64 = 0;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("port").store(Destination::Int(&mut port)))
            .store(Rc::new(MemoryStore::named("first")))
            .store(Rc::new(MemoryStore::named("second").with("port", "2")))
            .store(Rc::new(MemoryStore::named("third").with("port", "3")));

        parser.parse_tokens(empty::slice()).unwrap();
        drop(parser);
        assert_eq!(port, 2);
    }

    struct Failing;

    impl Store for Failing {
        fn source(&self) -> &str {
            "broken.ini"
        }

        fn get(
            &self,
            _name: &str,
            _cardinality: crate::model::Cardinality,
        ) -> Result<crate::store::Lookup, crate::store::StoreError> {
            Err("unreadable".into())
        }
    }

    #[test]
    fn provider_error() {
        let mut port: i64 = 0;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("port").store(Destination::Int(&mut port)))
            .store(Rc::new(Failing));

        // The command line wins before the store is consulted.
        parser.parse_tokens(vec!["--port", "1"].as_slice()).unwrap();

        let error = parser.parse_tokens(empty::slice()).unwrap_err();
        assert_matches!(error, Error::Provider { .. });
        assert_eq!(
            error.to_string(),
            "while reading from store 'broken.ini': unreadable"
        );
    }

    #[test]
    fn unknown_allowed() {
        let mut name = String::default();
        let mut parser = CommandLineParser::new("program")
            .config(ParserConfig::default().mode(ScanMode::default().allow_unknown_args(true)))
            .add(Parameter::argument("name").store(Destination::Str(&mut name)));

        let parsed = parser
            .parse_tokens(vec!["--zzz", "a", "b", "--yyy"].as_slice())
            .unwrap();
        assert_eq!(
            parsed.unrecognized(),
            &["--zzz".to_string(), "b".to_string(), "--yyy".to_string()]
        );
        drop(parser);
        assert_eq!(name, "a");
    }

    #[test]
    fn choices() {
        let mut level = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("level").choices(vec!["debug", "info"]).store(Destination::Str(&mut level)));

        let error = parser
            .parse_tokens(vec!["--level", "trace"].as_slice())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "'trace' is an invalid argument for 'level' choose from (debug, info)"
        );
    }

    #[test]
    fn duplicate_option() {
        let mut level = String::default();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("level").store(Destination::Str(&mut level)));

        let error = parser
            .parse_tokens(vec!["--level", "a", "--level", "b"].as_slice())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "unexpected duplicate option '--level' provided"
        );
    }

    #[test]
    fn store_chain() {
        let mut text = String::default();
        let mut number: i64 = 0;
        let mut labels: HashMap<String, i64> = HashMap::default();
        let mut parser = CommandLineParser::new("program")
            .add(
                Parameter::option("value")
                    .store(Destination::Str(&mut text))
                    .store(Destination::Int(&mut number)),
            )
            .add(Parameter::option("label").store(Destination::IntMap(&mut labels)));

        parser
            .parse_tokens(vec!["--value=0b101", "--label", r#"{"a": 1, "b": "0x2"}"#].as_slice())
            .unwrap();
        drop(parser);
        assert_eq!(text, "0b101");
        assert_eq!(number, 5);
        assert_eq!(labels, HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]));
    }

    #[test]
    fn sub_command() {
        let mut verbose = false;
        let mut command = String::default();
        let mut file = String::default();
        let mut force = false;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose)))
            .add(Parameter::sub_command("rm").store(Destination::Str(&mut command)))
            .add(Parameter::sub_command("ls"));

        let parsed = parser
            .parse_tokens(vec!["rm", "-v", "--force", "a.txt", "--help"].as_slice())
            .unwrap();
        let dispatch = parsed.sub_command().unwrap();
        assert_eq!(dispatch.command(), "rm");
        assert_eq!(dispatch.program(), "program rm");
        assert_eq!(dispatch.tokens(), vec!["--force", "a.txt", "--help"]);

        let mut child = CommandLineParser::fork(dispatch)
            .add(Parameter::option("force").alias("f").store(Destination::Set(&mut force)))
            .add(Parameter::argument("file").store(Destination::Str(&mut file)));
        assert_matches!(
            child.parse_tokens(dispatch.tokens().as_slice()),
            Err(Error::HelpRequested)
        );
        child
            .parse_tokens(&dispatch.tokens()[..2])
            .unwrap();

        drop(parser);
        drop(child);
        assert!(verbose);
        assert_eq!(command, "rm");
        assert!(force);
        assert_eq!(file, "a.txt");
    }

    #[test]
    fn sub_command_help_before() {
        let mut parser = CommandLineParser::new("program").add(Parameter::sub_command("rm"));

        assert_matches!(
            parser.parse_tokens(vec!["--help", "rm"].as_slice()),
            Err(Error::HelpRequested)
        );
    }

    #[test]
    fn sub_command_not_claimed() {
        let mut command = "none".to_string();
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::sub_command("rm").store(Destination::Str(&mut command)));

        let parsed = parser.parse_tokens(empty::slice()).unwrap();
        assert!(parsed.sub_command().is_none());
        drop(parser);
        assert_eq!(command, "none");
    }

    #[test]
    fn fork_conflicts_with_parent() {
        let mut verbose = false;
        let mut child_verbose = false;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose)))
            .add(Parameter::sub_command("rm"));

        let parsed = parser.parse_tokens(vec!["rm"].as_slice()).unwrap();
        let mut child = CommandLineParser::fork(parsed.sub_command().unwrap())
            .add(Parameter::option("loud").alias("v").store(Destination::Set(&mut child_verbose)));

        let error = child.parse_tokens(empty::slice()).unwrap_err();
        assert_matches!(
            error,
            Error::Declaration(DeclarationError::DuplicateAlias { .. })
        );
    }

    #[test]
    fn fork_conflicts_with_grandparent() {
        let mut verbose = false;
        let mut port: i64 = 0;
        let mut loud = false;
        let mut parser = CommandLineParser::new("tool")
            .add(Parameter::option("verbose").alias("v").store(Destination::Set(&mut verbose)))
            .add(Parameter::sub_command("remote"));

        let parsed = parser.parse_tokens(vec!["remote", "add"].as_slice()).unwrap();
        let remote = parsed.sub_command().unwrap();
        let mut middle = CommandLineParser::fork(remote)
            .add(Parameter::option("port").store(Destination::Int(&mut port)))
            .add(Parameter::sub_command("add"));

        let parsed = middle.parse_tokens(remote.tokens().as_slice()).unwrap();
        let add = parsed.sub_command().unwrap();
        assert_eq!(add.program(), "tool remote add");
        let mut child = CommandLineParser::fork(add)
            .add(Parameter::option("loud").alias("v").store(Destination::Set(&mut loud)));

        let error = child.parse_tokens(empty::slice()).unwrap_err();
        assert_matches!(
            error,
            Error::Declaration(DeclarationError::DuplicateAlias { ref alias, ref first, ref second })
                if alias == "v" && first == "verbose" && second == "loud"
        );
    }

    #[rstest]
    #[case(vec!["--name", "alice"], "alice", true)]
    #[case(vec!["--name", "0"], "0", true)]
    #[case(vec![], "", false)]
    fn set_after_value(
        #[case] tokens: Vec<&str>,
        #[case] expected_name: &str,
        #[case] expected_given: bool,
    ) {
        let mut name = String::default();
        let mut given = false;
        let mut parser = CommandLineParser::new("program").add(
            Parameter::option("name")
                .store(Destination::Str(&mut name))
                .store(Destination::Set(&mut given)),
        );

        parser.parse_tokens(&tokens).unwrap();
        drop(parser);
        assert_eq!(name, expected_name);
        assert_eq!(given, expected_given);
    }

    #[rstest]
    #[case(vec!["--level", "7", "--level", "9"], 2, "7")]
    #[case(vec!["--level", "5"], 1, "5")]
    #[case(vec!["--level=0"], 1, "0")]
    fn count_of_values(
        #[case] tokens: Vec<&str>,
        #[case] expected_count: usize,
        #[case] expected_first: &str,
    ) {
        let mut count: usize = 0;
        let mut first = String::default();
        let mut parser = CommandLineParser::new("program").add(
            Parameter::option("level")
                .repeatable(true)
                .store(Destination::Count(&mut count))
                .store(Destination::Str(&mut first)),
        );

        parser.parse_tokens(&tokens).unwrap();
        drop(parser);
        assert_eq!(count, expected_count);
        assert_eq!(first, expected_first);
    }

    struct Refuse;

    impl SetFromString for Refuse {
        fn set_from_string(&mut self, value: &str) -> Result<(), StoreError> {
            Err(format!("'{value}' is refused").into())
        }
    }

    #[test]
    fn custom_failure_writes_nothing() {
        let mut name = "before".to_string();
        let mut size: i64 = -1;
        let mut refuse = Refuse;
        let mut parser = CommandLineParser::new("program")
            .add(Parameter::option("name").store(Destination::Str(&mut name)))
            .add(Parameter::option("size").store(Destination::Int(&mut size)))
            .add(Parameter::option("x").store(Destination::Custom(Box::new(&mut refuse))));

        let error = parser
            .parse_tokens(vec!["--name", "after", "--size", "3", "--x", "1"].as_slice())
            .unwrap_err();
        assert_matches!(error, Error::Store { ref name, .. } if name == "x");
        drop(parser);
        assert_eq!(name, "before");
        assert_eq!(size, -1);
    }
}
