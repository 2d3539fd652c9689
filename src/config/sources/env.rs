//! Environment source: BUCKETBROWSER_<SECTION>__<KEY>

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "BUCKETBROWSER";

/// Add environment overrides, e.g. `BUCKETBROWSER_BROWSER__READ_ONLY=true`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
