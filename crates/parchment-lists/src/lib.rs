mod plugin;
mod query;
mod transform;

pub use crate::plugin::*;
pub use crate::query::*;
pub use crate::transform::*;
