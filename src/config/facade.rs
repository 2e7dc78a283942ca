//! Config loader: assembles sources in precedence order and deserializes.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file, workspace_file};
use super::StackStateConfig;
use crate::error::QueryError;
use config::File;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, workspace files, environment.
    pub fn load(workspace_root: &Path) -> Result<StackStateConfig, QueryError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: StackStateConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from an explicit file; environment still overrides it.
    pub fn load_from_file(path: &Path) -> Result<StackStateConfig, QueryError> {
        if !path.exists() {
            return Err(QueryError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?.add_source(File::from(path));
        let builder = environment::add_to_builder(builder);

        let config: StackStateConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
