//! `argot` is a declarative parser for command line arguments, options and environment variables.
//!
//! Declare what your program accepts as *rules*, and `argot` fills your variables from every place a value may come from.
//! Specifically, `argot` is built around the following concerns:
//! * *Declarative rules*:
//! Options, positional arguments, environment bindings and sub-commands are declared up front, and validated as a whole before any token is read.
//! * *Multiple sources*:
//! A value may come from the command line, from external stores (ex: a parsed configuration file), from the environment, or from a declared default.
//! The first source with a value wins outright; values are never unioned across sources.
//! * *Typed destinations*:
//! The user does not convert strings.
//! Each rule stores into one or more [`Destination`]s, which decide both the conversion and the shape of the value.
//! * *All or nothing*:
//! A parse either writes every destination, or none of them.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/complete.rs")]
//! ```
//!
//! ```console
//! $ DEPLOY_TOKEN=secret deploy -vv -l team=core,tier=web up api worker
//! verbosity: 2
//! region: eu-west
//! labels: {"team": "core", "tier": "web"}
//! token set: true
//! up ["api", "worker"] (dry run: false)
//!
//! $ deploy --region mars
//! 'mars' is an invalid argument for 'region' choose from (eu-west, us-east)
//! ```
//!
//! # Rules
//! Configure `argot` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are four kinds of parameters:
//! * [`Parameter::option`]: `--NAME [VALUE]`, matched by any of its aliases anywhere on the Cli.
//! Single character aliases are typically used with one dash (`-v`), and longer ones with two (`--verbose`), although either prefix matches any alias.
//! * [`Parameter::argument`]: matched by position, in the order the arguments are added.
//! A repeatable argument consumes every remaining positional token, so nothing may follow it.
//! * [`Parameter::env`]: read only from an environment variable.
//! * [`Parameter::sub_command`]: matched by the exact token.
//! The tokens after it are handed to the sub-command's parser through a [`Dispatch`].
//!
//! Options and arguments may also read an environment variable through [`Parameter::env_var`].
//!
//! ### Matching
//! Option tokens match the *longest* alias that prefixes them.
//! For example, with the aliases `a` and `amend`, `--amend` matches `amend` while `-a` matches `a`.
//! A value is given either as the next token (`--name value`) or after `=` (`--name=value`).
//! The [`ScanMode`] switches additionally allow combined flags (`-abc`), combined values (`-nvalue`), unprefixed options, and unknown tokens.
//!
//! ### Destinations & Cardinality
//! The [`Destination`] of a rule decides its [`Cardinality`]: a single value, a list, or a map.
//! A single list occurrence is split on commas (quoted segments are kept whole) unless [`Parameter::no_split`] is set.
//! Map values are written either as `key=value` pairs separated by commas, or as a JSON object.
//!
//! ```
//! use std::collections::HashMap;
//! use argot::{CommandLineParser, Destination, Parameter};
//!
//! let mut a: HashMap<String, String> = HashMap::default();
//! let mut b: HashMap<String, String> = HashMap::default();
//! let mut parser = CommandLineParser::new("program")
//!     .add(Parameter::option("a").store(Destination::StrMap(&mut a)))
//!     .add(Parameter::option("b").store(Destination::StrMap(&mut b)));
//!
//! parser.parse_tokens(vec!["--a", "k1=v1,k2=v2", "--b", r#"{"k1":"v1","k2":"v2"}"#].as_slice()).unwrap();
//! drop(parser);
//! assert_eq!(a, b);
//! ```
//!
//! ### Stores
//! External sources implement the [`Store`] trait, and are consulted after the command line and before the environment.
//! [`MemoryStore`] is a ready made store for name/value pairs.
//!
//! ### Errors
//! Every failure is returned as an [`Error`]; `argot` never prints or exits.
//! Errors in the declarations are reported when parsing starts.
//! A help request (`-h`, `--help`) is reported as [`Error::HelpRequested`], so that the program may print its own usage.
//! [`Error::exit_code`] gives the conventional exit code of each error.
//!
//! # Features
//! * `tracing_debug`: emit debug events through [`tracing`](https://docs.rs/tracing) while matching and resolving.
pub use argot_builder::*;
