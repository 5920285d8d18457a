use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;
use tracing::info;

use crate::application::RuntimeConfig;
use crate::config::Settings;
use crate::config::SettingsCreationError;
use crate::options::OptionsStore;
use crate::refs::GitRefSource;
use crate::refs::RefSource;
use crate::refs::RefSourceError;
use crate::refs::RefSourceTrait;
use crate::render::Renderer;
use crate::tree::PathTree;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let settings = Settings::read(&app_config.root).await.context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        let mut options = OptionsStore::read(&app_config.root).await;
        if let Some(selected) = options.selected_path() {
            debug!("Previously selected path: {}", selected);
        }

        let source = RefSource::Git(GitRefSource::new(
            app_config.root.clone(),
            settings.include_remotes,
        ));
        let refs = source.list_refs().await.context(RefEnumerationSnafu)?;
        info!("Seeding tree with {} refs", refs.len());

        let mut tree = PathTree::new(settings.delimiter);
        tree.set(settings.root_label.as_deref(), refs);
        debug!("Tree revision {} after initial set", tree.revision());

        let renderer = Renderer::from_env();
        match &app_config.path {
            Some(path) => {
                let node = tree
                    .find(path)
                    .context(PathNotFoundSnafu { path: path.clone() })?;
                print!("{}", renderer.render_from(&tree, node));
                options.record_lookup(path);
                options.write().await;
            }
            None => print!("{}", renderer.render(&tree)),
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading settings"))]
    SettingsError { source: SettingsCreationError },
    #[snafu(display("Critical failure encountered while enumerating refs"))]
    RefEnumerationError { source: RefSourceError },
    #[snafu(display("No ref named '{}' exists in this repository", path))]
    PathNotFound { path: String },
}
