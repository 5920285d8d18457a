mod git_source;
mod source;

pub use git_source::{GitRefSource, GitRefSourceError};
pub use source::{RefSource, RefSourceError, RefSourceTrait};
