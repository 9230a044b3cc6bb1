//! Environment variable source: MFS_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses MFS_ prefix and __ as separator for nested keys, e.g. `MFS__CHUNKER__CHUNK_SIZE`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("MFS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    ))
}
