//! Config loader: assembles the sources in precedence order.

use crate::config::{merge, sources, TreehashConfig};
use crate::error::ApiError;
use std::path::Path;

/// Loads [`TreehashConfig`] from defaults, files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the global config file, then `explicit` (which must exist when given).
    pub fn load(explicit: Option<&Path>) -> Result<TreehashConfig, ApiError> {
        let global = sources::global_config_path();
        Self::load_with(global.as_deref(), explicit)
    }

    /// Load from a single file plus defaults and environment, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<TreehashConfig, ApiError> {
        Self::load_with(None, Some(path))
    }

    /// Load with an explicit global file location.
    pub fn load_with(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<TreehashConfig, ApiError> {
        let mut builder = merge::builder_with_defaults()?;
        if let Some(global) = global {
            builder = sources::add_file(builder, global, false)?;
        }
        if let Some(explicit) = explicit {
            builder = sources::add_file(builder, explicit, true)?;
        }
        builder = sources::add_environment(builder);

        let config: TreehashConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
