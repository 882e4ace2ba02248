mod rule;
mod set;

pub use rule::{Rule, RuleId};
pub use set::RuleSet;
