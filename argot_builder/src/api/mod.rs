mod convert;
mod destination;
mod parameter;

pub use convert::{parse_bool, parse_int, parse_map, split_list};
pub(crate) use destination::Converted;
pub use destination::{Destination, SetFromString};
pub use parameter::Parameter;
