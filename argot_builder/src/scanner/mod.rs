mod core;
mod model;

pub(crate) use self::core::Scanner;
pub(crate) use model::{CommandLineStore, MatchTable};
