//! Viewer settings loading.
//!
//! Settings come from defaults, then an optional TOML file, then `CAPVIEW_*`
//! environment variables (`CAPVIEW_JSON_INDENT=4`, `CAPVIEW_MAX_FILE_SIZE=...`).

use std::path::{Path, PathBuf};

use capview_domain::ViewerSettings;
use config::{Config, Environment, File, FileFormat, Map};

/// Prefix of environment variables that override settings.
pub const ENV_PREFIX: &str = "CAPVIEW";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The configuration file does not exist.
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),

    /// A source could not be read or a value has the wrong type.
    #[error("invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Loads settings from `path` (if any) and the process environment.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or if a value fails
/// validation.
pub fn load_settings(path: Option<&Path>) -> Result<ViewerSettings, SettingsError> {
    load_settings_with_env(path, None)
}

/// Same as [`load_settings`], but reads environment overrides from `env`
/// instead of the process environment when given.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or if a value fails
/// validation.
pub fn load_settings_with_env(
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<ViewerSettings, SettingsError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }
        builder = builder.add_source(File::from(path).format(FileFormat::Toml));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let settings: ViewerSettings = config.try_deserialize()?;
    validate(&settings)?;

    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

fn validate(settings: &ViewerSettings) -> Result<(), SettingsError> {
    if settings.max_file_size == 0 {
        return Err(SettingsError::Invalid {
            key: "max_file_size",
            reason: "must be greater than zero".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&settings.fuzzy_threshold) {
        return Err(SettingsError::Invalid {
            key: "fuzzy_threshold",
            reason: format!("{} is outside 0.0..=1.0", settings.fuzzy_threshold),
        });
    }
    Ok(())
}
