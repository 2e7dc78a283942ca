//! Built-in defaults: the lowest configuration layer.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Key/value defaults applied before any file or environment source.
pub const DEFAULTS: [(&str, &str); 4] = [
    ("storage.store_path", ".stackstate/store"),
    ("logging.level", "info"),
    ("logging.format", "text"),
    ("logging.output", "stderr"),
];

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    DEFAULTS
        .iter()
        .try_fold(Config::builder(), |builder, (key, value)| {
            builder.set_default(*key, *value)
        })
}
