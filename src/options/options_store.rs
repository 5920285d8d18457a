use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use compio::fs;
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;

const OPTIONS_FILE_PATH: &str = ".reftree/options.bin";

/// How many recent lookups are remembered
const MAX_RECENT_LOOKUPS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Default, Decode, Encode)]
struct Options {
    recent_lookups: Vec<String>,
    selected_path: Option<String>,
}

/// Mutable per-repository state, persisted between runs.
///
/// An explicit handle owned by the application: `read` at startup, `write`
/// at the end of the run. A missing or undecodable file starts fresh and
/// writes are best-effort, so the store never fails a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsStore {
    path: PathBuf,
    options: Options,
}

impl OptionsStore {
    /// Reads the options from the repository's dot-directory
    pub async fn read(root: &Path) -> Self {
        let path = root.join(OPTIONS_FILE_PATH);
        debug!("Reading options from {}", path.best_effort_path_display());

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("No existing options found, starting fresh");
                return Self {
                    path,
                    options: Options::default(),
                };
            }
        };

        let options = bincode::decode_from_slice(&bytes, bincode::config::standard())
            .map(|(options, _)| options)
            .unwrap_or_default();
        debug!("Successfully read options: {:?}", options);
        Self { path, options }
    }

    /// Remembers a successful lookup: promotes it to the front of the
    /// recent list, deduplicated and capped, and marks it selected.
    pub fn record_lookup(&mut self, path: &str) {
        self.options.recent_lookups.retain(|known| known != path);
        self.options.recent_lookups.insert(0, path.to_string());
        self.options.recent_lookups.truncate(MAX_RECENT_LOOKUPS);
        self.options.selected_path = Some(path.to_string());
    }

    pub fn recent_lookups(&self) -> &[String] {
        &self.options.recent_lookups
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.options.selected_path.as_deref()
    }

    /// Saves the options next to the repository. Failures are logged, never
    /// propagated.
    pub async fn write(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent).await;
        }

        match bincode::encode_to_vec(&self.options, bincode::config::standard()) {
            Ok(bytes) => {
                let _ = fs::write(&self.path, bytes).await;
            }
            Err(e) => warn!("Failed to encode options: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn read_starts_fresh_when_file_is_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let store = OptionsStore::read(temp_dir.path()).await;

        assert!(store.recent_lookups().is_empty());
        assert!(store.selected_path().is_none());
    }

    #[compio::test]
    async fn write_then_read_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let mut store = OptionsStore::read(temp_dir.path()).await;
        store.record_lookup("feature/login");
        store.record_lookup("main");
        store.write().await;

        let reloaded = OptionsStore::read(temp_dir.path()).await;
        assert_eq!(reloaded, store);
        assert_eq!(reloaded.selected_path(), Some("main"));
    }

    #[compio::test]
    async fn read_starts_fresh_when_file_is_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(OPTIONS_FILE_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create dot dir");
        std::fs::write(&path, b"not bincode").expect("Failed to write garbage");

        let store = OptionsStore::read(temp_dir.path()).await;

        assert!(store.recent_lookups().is_empty());
    }

    #[test]
    fn record_lookup_promotes_and_dedupes() {
        let mut store = OptionsStore {
            path: PathBuf::from(OPTIONS_FILE_PATH),
            options: Options::default(),
        };

        store.record_lookup("a");
        store.record_lookup("b");
        store.record_lookup("a");

        assert_eq!(store.recent_lookups(), ["a", "b"]);
        assert_eq!(store.selected_path(), Some("a"));
    }

    #[test]
    fn record_lookup_caps_the_recent_list() {
        let mut store = OptionsStore {
            path: PathBuf::from(OPTIONS_FILE_PATH),
            options: Options::default(),
        };

        for index in 0..10 {
            store.record_lookup(&format!("branch-{index}"));
        }

        assert_eq!(store.recent_lookups().len(), MAX_RECENT_LOOKUPS);
        assert_eq!(store.recent_lookups()[0], "branch-9");
    }
}
