use config::{Config, Environment, File};
use haven_domain::config::StudioConfig;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name of the configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "haven";
/// Prefix of environment overrides (`HAVEN__PREVIEW__ASSET_ROOT`).
pub const ENV_PREFIX: &str = "HAVEN";

/// Custom error type for config loading.
#[haven_derive::haven_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader: a file, then `HAVEN__` environment overrides.
///
/// 1. **File**: an explicit `path` must exist. Without one, `haven.{toml,json,yaml,...}`
///    in the working directory is used when present; every field has a default.
/// 2. **Environment**: variables prefixed with `HAVEN__`, nested with double
///    underscores (`HAVEN__PREVIEW__READINESS_INTERVAL_MS=250`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or any layer
/// fails to deserialize into `T`.
///
/// # Example
/// ```rust
/// use haven_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct PreviewOnly {
///     readiness_interval_ms: u64,
/// }
///
/// let cfg: PreviewOnly = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the [`StudioConfig`] used by both browsing contexts.
///
/// # Errors
/// See [`load_config`].
pub fn load_studio_config(path: Option<&Path>) -> Result<StudioConfig, ConfigError> {
    let config: StudioConfig = load_config(path)?;
    debug!(
        asset_root = %config.preview.asset_root.display(),
        readiness_interval_ms = config.preview.readiness_interval_ms,
        origin = %config.host.origin,
        "Studio config resolved"
    );
    Ok(config)
}
