use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::Snafu;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

const SETTINGS_FILE_NAME: &str = "reftree.yaml";
const DEFAULT_DELIMITER: char = '/';

fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Run settings from the optional `reftree.yaml` in the repository root:
///
/// ```yaml
/// tree:
///   root_label: Branches
///   delimiter: "/"
/// source:
///   include_remotes: true
/// ```
///
/// A missing or empty file means defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root_label: Option<String>,
    pub delimiter: char,
    pub include_remotes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_label: None,
            delimiter: DEFAULT_DELIMITER,
            include_remotes: false,
        }
    }
}

impl Settings {
    pub async fn read(root: &Path) -> Result<Self, SettingsCreationError> {
        let path = get_settings_file_path(root);
        debug!("Reading settings file: {}", path.best_effort_path_display());

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("No settings file found, using defaults");
                return Ok(Self::default());
            }
        };

        String::from_utf8_lossy(&bytes).as_ref().try_into()
    }

    fn parse_tree_section(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<(Option<String>, char), SettingsCreationError> {
        let empty = Yaml::Mapping(LinkedHashMap::new());
        let section = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("tree"))))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(SettingsCreationError::TreeSectionNotMap)?;

        let root_label = section
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("root_label"))))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        let delimiter = match section
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("delimiter"))))
            .and_then(|value| value.as_str())
        {
            Some(value) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(delimiter), None) => delimiter,
                    _ => {
                        return Err(SettingsCreationError::DelimiterNotSingleChar {
                            value: value.to_string(),
                        });
                    }
                }
            }
            None => DEFAULT_DELIMITER,
        };

        Ok((root_label, delimiter))
    }

    fn parse_source_section(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<bool, SettingsCreationError> {
        let empty = Yaml::Mapping(LinkedHashMap::new());
        let section = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("source"))))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(SettingsCreationError::SourceSectionNotMap)?;

        let include_remotes = section
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed(
                "include_remotes",
            ))))
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        Ok(include_remotes)
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| SettingsCreationError::ParseError { source: e })?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document
            .as_mapping()
            .ok_or(SettingsCreationError::TopLevelNotMap)?;

        for key in top_level.keys() {
            match key.as_str() {
                Some("tree") | Some("source") => {}
                _ => debug!("Skipping unknown settings entry: {:?}", key),
            }
        }

        let (root_label, delimiter) = Self::parse_tree_section(top_level)?;
        let include_remotes = Self::parse_source_section(top_level)?;

        Ok(Settings {
            root_label,
            delimiter,
            include_remotes,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsCreationError {
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The tree section should be a map"))]
    TreeSectionNotMap,
    #[snafu(display("The source section should be a map"))]
    SourceSectionNotMap,
    #[snafu(display("The delimiter should be a single character, got '{}'", value))]
    DelimiterNotSingleChar { value: String },
}
