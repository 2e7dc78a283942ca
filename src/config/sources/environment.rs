//! Environment source: STACKSTATE__SECTION__KEY

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("STACKSTATE")
            .prefix_separator("__")
            .separator("__"),
    )
}
