//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Sources added afterwards override these in the order they are added: global
/// file, environment, explicit file, then CLI overrides.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("browser.open_timeout", "1s")?
        .set_default("browser.read_only", false)?
        .set_default("browser.no_value", false)?
        .set_default("browser.message_timeout_ms", 2000_i64)?
        .set_default("browser.split_width", 80_i64)?
        .set_default("logging.enabled", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "file")
}
