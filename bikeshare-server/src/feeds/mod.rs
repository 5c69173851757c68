//! Feed resolution: pick a language's feed list out of the directory, then
//! fetch and unwrap each sub-feed it names.

mod collect;
mod directory;

pub use collect::{Cancelled, Collected, collect};
pub use directory::resolve_language;
