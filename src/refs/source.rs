use snafu::Snafu;

use crate::refs::{GitRefSource, GitRefSourceError};

pub trait RefSourceTrait {
    // Lists the current full ref names, one delimiter-separated name per entry
    async fn list_refs(&self) -> Result<Vec<String>, RefSourceError>;
}

/// The enumerator a tree is seeded from.
#[derive(Debug, Clone)]
pub enum RefSource {
    Git(GitRefSource),
}

impl RefSourceTrait for RefSource {
    async fn list_refs(&self) -> Result<Vec<String>, RefSourceError> {
        match self {
            RefSource::Git(source) => source.list_refs().await,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum RefSourceError {
    #[snafu(display("Failed to enumerate refs"))]
    EnumerationError { source: GitRefSourceError },
}
