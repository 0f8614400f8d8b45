use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Dashboard, Dataset, Export, Logging};
pub use telemetry::init_tracing;

/// The configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "sales-lens.toml";

/// Prefix of environment overrides, e.g. `SALES_LENS__DASHBOARD__TOP_N=5`.
pub const ENV_PREFIX: &str = "SALES_LENS";

/// Loads the application configuration from `sales-lens.toml`.
///
/// The file is optional; environment variables override it, and anything left
/// unset takes its default. The result is validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name(CONFIG_FILE).required(false), environment())
}

/// Loads the application configuration from an explicit file, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    build(config::File::from(path.as_ref()).required(true), environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build(
    file: config::File<config::FileSourceFile, config::FileFormat>,
    environment: config::Environment,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
