//! Start-up wiring: configuration → matcher, fallback, profile → `ChatbotCore`.
//!
//! Failures here are logged and degrade the core (no matcher, no fallback,
//! placeholder facts) rather than stopping it.

use crate::brain::{CategoryMatcher, ChatbotCore, PatternMatcher};
use crate::config::{AppConfig, GeminiConfig};
use crate::error::ProfileError;
use crate::llm::{Fallback, GeminiClient};
use crate::profile::{load_profile, InstitutionProfile};
use std::path::Path;
use tracing::{error, info, warn};

/// Loads the category matcher from `dir`, or `None` if it cannot be loaded.
pub fn build_matcher(dir: &Path) -> Option<Box<dyn PatternMatcher>> {
    if !dir.is_dir() {
        warn!("Patterns directory {} not found", dir.display());
        return None;
    }
    match CategoryMatcher::load_or_learn(dir) {
        Ok(matcher) => {
            info!("Pattern brain loaded with {} categories", matcher.len());
            Some(Box::new(matcher))
        }
        Err(e) => {
            error!("Error loading pattern brain from {}: {}", dir.display(), e);
            None
        }
    }
}

/// Builds the fallback handle; a configuration error is recorded as `Absent`.
pub fn build_fallback(config: &GeminiConfig) -> Fallback {
    match GeminiClient::new(config) {
        Ok(client) => Fallback::configured(client),
        Err(e) => {
            warn!("Generative model not configured: {}", e);
            Fallback::absent(e.to_string())
        }
    }
}

/// Loads the profile, logging the distinct failure kinds; `None` on failure.
pub fn load_profile_logged(path: &Path) -> Option<InstitutionProfile> {
    match load_profile(path) {
        Ok(profile) => Some(profile),
        Err(e @ ProfileError::NotFound(_)) => {
            error!("{}. Run `amanda generate` to create it.", e);
            None
        }
        Err(e @ ProfileError::Parse(_)) => {
            error!("{}. Check the document for syntax errors.", e);
            None
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// Builds a ready-to-use core from configuration.
///
/// Without a profile the core keeps its placeholder facts but still answers
/// under the configured institution name.
pub fn build_core(config: &AppConfig) -> ChatbotCore {
    let matcher = build_matcher(&config.patterns_dir);
    let fallback = build_fallback(&config.gemini);
    let mut core = ChatbotCore::new(matcher, fallback);

    let profile = load_profile_logged(&config.profile_path).unwrap_or_else(|| {
        warn!("Continuing with an empty profile for {}", config.institution_name);
        InstitutionProfile::default()
    });
    core.set_institution_data(&profile, &config.institution_name);
    core
}
