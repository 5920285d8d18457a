mod settings;

pub use settings::{Settings, SettingsCreationError};
