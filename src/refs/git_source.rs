use std::path::PathBuf;
use std::process::Stdio;

use compio::{io::compat::AsyncStream, process::Command};
use futures::{AsyncBufReadExt, StreamExt, io::BufReader};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

use super::{RefSourceError, RefSourceTrait};

const FOR_EACH_REF_FORMAT: &str = "--format=%(refname:short)";
const LOCAL_REF_PATTERN: &str = "refs/heads";
const REMOTE_REF_PATTERN: &str = "refs/remotes";

/// Enumerates branch names by running `git for-each-ref` in the repository
/// root. `%(refname:short)` already strips the `refs/heads/` prefix, so each
/// line is a full slash-separated branch name.
#[derive(Debug, Clone)]
pub struct GitRefSource {
    root: PathBuf,
    include_remotes: bool,
}

impl GitRefSource {
    pub fn new(root: PathBuf, include_remotes: bool) -> Self {
        Self {
            root,
            include_remotes,
        }
    }

    fn ref_patterns(&self) -> Vec<&'static str> {
        if self.include_remotes {
            vec![LOCAL_REF_PATTERN, REMOTE_REF_PATTERN]
        } else {
            vec![LOCAL_REF_PATTERN]
        }
    }

    /// Creates and configures the command with proper stdio settings
    fn create_command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("for-each-ref");
        cmd.arg(FOR_EACH_REF_FORMAT);
        cmd.args(self.ref_patterns());
        cmd.current_dir(&self.root);
        let _ = cmd.stdout(Stdio::piped());
        cmd
    }
}

impl RefSourceTrait for GitRefSource {
    async fn list_refs(&self) -> Result<Vec<String>, RefSourceError> {
        debug!(
            "Listing refs under {}",
            self.root.best_effort_path_display()
        );
        let mut cmd = self.create_command();

        let mut handle = cmd
            .spawn()
            .context(SpawnSnafu {
                root: self.root.best_effort_path_display(),
            })
            .map_err(|err| RefSourceError::EnumerationError { source: err })?;

        let mut refs = Vec::new();
        if let Some(stdout) = handle.stdout.take() {
            let reader = BufReader::new(AsyncStream::new(stdout));
            let mut lines = reader.lines();

            while let Some(line_result) = lines.next().await {
                match line_result {
                    Ok(line) => {
                        let name = line.trim();
                        if !name.is_empty() {
                            refs.push(name.to_string());
                        }
                    }
                    Err(e) => {
                        debug!("Error reading git output: {}", e);
                    }
                }
            }
        }

        let status = handle
            .wait()
            .await
            .context(WaitSnafu {
                root: self.root.best_effort_path_display(),
            })
            .map_err(|err| RefSourceError::EnumerationError { source: err })?;

        if status.success() {
            info!("Enumerated {} refs", refs.len());
            Ok(refs)
        } else {
            Err(RefSourceError::EnumerationError {
                source: GitRefSourceError::UnsuccessfulExecution {
                    root: self.root.best_effort_path_display(),
                    status: status.code().unwrap_or(-1),
                },
            })
        }
    }
}

#[derive(Debug, Snafu)]
pub enum GitRefSourceError {
    #[snafu(display("Failed to spawn git in '{}'", root))]
    SpawnError {
        root: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for git in '{}'", root))]
    WaitError {
        root: String,
        source: std::io::Error,
    },
    #[snafu(display("git for-each-ref in '{}' failed with exit code {}", root, status))]
    UnsuccessfulExecution { root: String, status: i32 },
}
