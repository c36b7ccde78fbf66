//! Resolution of the collaborator's API key, model, and endpoint.
//!
//! Settings come from an optional `config.toml` in the app directory with
//! environment overrides layered on top. A missing file and a missing key are
//! both fine; the caption fetch degrades to the fallback caption instead.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::app_dirs;

/// Filename of the optional settings file inside the app directory.
pub const SETTINGS_FILE_NAME: &str = "config.toml";

const API_KEY_ENV: &str = "BUNKMATE_API_KEY";
const API_KEY_ENV_FALLBACK: &str = "GEMINI_API_KEY";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Collaborator connection settings after file and env resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// API key, if any source provided one.
    pub api_key: Option<String>,
    /// Model name appended to the generate-content route.
    pub model: String,
    /// Service base URL, overridable for tests and proxies.
    pub endpoint: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// On-disk shape of the settings file; every field optional.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    api_key: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

/// Errors while reading the optional settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Offending file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file exists but is not valid TOML for this shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Offending file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Path of the settings file, when an app directory can be resolved.
pub fn settings_path() -> Option<PathBuf> {
    app_dirs::app_root_dir()
        .ok()
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
}

/// Load settings from the app config file, then apply env overrides.
///
/// A missing file yields defaults; a malformed file is an error the caller
/// is expected to log and replace with defaults.
pub fn load_or_default() -> Result<GeneratorSettings, SettingsError> {
    let file = match settings_path() {
        Some(path) => load_file(&path)?,
        None => SettingsFile::default(),
    };
    Ok(resolve(file, env_api_key()))
}

fn load_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .or_else(|_| std::env::var(API_KEY_ENV_FALLBACK))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Combine file contents with the env-provided key; env wins for the key,
/// file wins for model/endpoint, defaults fill the rest.
fn resolve(file: SettingsFile, env_key: Option<String>) -> GeneratorSettings {
    let defaults = GeneratorSettings::default();
    let endpoint = file
        .endpoint
        .filter(|endpoint| match url::Url::parse(endpoint) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("Ignoring invalid endpoint override {endpoint:?}: {err}");
                false
            }
        })
        .map(|endpoint| endpoint.trim_end_matches('/').to_string())
        .unwrap_or(defaults.endpoint);
    GeneratorSettings {
        api_key: env_key.or(file.api_key),
        model: file.model.unwrap_or(defaults.model),
        endpoint,
    }
}
