//! Config loader: assembles sources in precedence order and deserializes.

use super::merge::merge_policy;
use super::sources::{env, global_file};
use super::BrowserConfig;
use crate::error::BrowserError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`BrowserConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence (lowest to highest): defaults, global file, environment,
    /// `explicit` file. A missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<BrowserConfig, BrowserError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let mut builder = env::add_to_builder(builder);

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(BrowserError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            debug!(config_path = %path.display(), "Adding explicit configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: BrowserConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Load defaults plus a single file, ignoring global and environment sources.
    pub fn load_from_file(path: &Path) -> Result<BrowserConfig, BrowserError> {
        let config: BrowserConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Built-in defaults only.
    pub fn default() -> BrowserConfig {
        BrowserConfig::default()
    }

    /// Location of the global configuration file, whether or not it exists.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
