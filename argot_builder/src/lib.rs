//! Builder module for `argot`.
//! See [documentation root](https://docs.rs/argot/latest/argot/index.html) for full details.
#![deny(missing_docs)]
#[macro_use]
mod macros;

mod api;
mod constant;
mod error;
mod model;
mod parser;
mod resolver;
mod rules;
mod scanner;
mod store;

pub use api::*;
pub use error::*;
pub use model::*;
pub use parser::{CommandLineParser, Dispatch, Parsed};
pub use rules::{Rule, RuleId, RuleSet};
pub use store::{EnvStore, Lookup, MemoryStore, Store, StoreError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
