use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One exchange with the chatbot. Logged, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// What the user typed.
    pub input: String,
    /// What the chatbot answered.
    pub output: String,
    /// How the answer was produced (`matched`, `generated`, ...).
    pub source: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(input: impl Into<String>, resolution: crate::brain::Resolution) -> Self {
        use crate::brain::Resolution;

        let source = match &resolution {
            Resolution::Matched(_) => "matched",
            Resolution::Generated(_) => "generated",
            Resolution::FallbackAbsent(_) => "fallback_absent",
            Resolution::FallbackFailed(_) => "fallback_failed",
            Resolution::FallbackEmpty(_) => "fallback_empty",
        };
        Self {
            input: input.into(),
            output: resolution.into_text(),
            source: source.to_string(),
            at: Utc::now(),
        }
    }
}
