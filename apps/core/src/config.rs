//! Runtime configuration.
//!
//! Everything comes from the environment (with `.env` support through
//! `dotenv`). Paths are resolved to absolute paths once, here, so nothing
//! downstream depends on the process working directory.

use crate::error::AppError;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PATTERNS_DIR: &str = "aiml_files";
pub const DEFAULT_PROFILE_PATH: &str = "data/jkuat_data.json";
pub const DEFAULT_INSTITUTION_NAME: &str = "JKUAT";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

/// Settings for the hosted generative model.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` when no key is configured; the client then refuses to build.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absolute path of the directory holding pattern category files.
    pub patterns_dir: PathBuf,
    /// Absolute path of the institution profile JSON document.
    pub profile_path: PathBuf,
    /// Display name of the active institution.
    pub institution_name: String,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Loads `.env` (if any) and then reads the configuration from the environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads the configuration from the current environment only.
    pub fn from_env() -> Result<Self, AppError> {
        let base = env::current_dir()?;

        let patterns_dir = absolute(&base, &var_or("AMANDA_PATTERNS_DIR", DEFAULT_PATTERNS_DIR));
        let profile_path = absolute(&base, &var_or("AMANDA_PROFILE_PATH", DEFAULT_PROFILE_PATH));
        let institution_name = var_or("AMANDA_INSTITUTION_NAME", DEFAULT_INSTITUTION_NAME);

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let timeout_secs = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds ({}): {}", raw, e))
            })?,
            Err(_) => DEFAULT_GEMINI_TIMEOUT_SECS,
        };

        Ok(Self {
            patterns_dir,
            profile_path,
            institution_name,
            gemini: GeminiConfig {
                api_key,
                model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn absolute(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
