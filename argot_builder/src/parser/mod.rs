mod core;
mod outcome;

pub use self::core::CommandLineParser;
pub use outcome::{Dispatch, Parsed};
