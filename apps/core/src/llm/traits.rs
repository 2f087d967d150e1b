use crate::error::AppError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Defines the public interface for a generative language model.
///
/// This trait abstracts the model backend, allowing the hosted client to be
/// swapped for a mock in tests.
#[async_trait]
pub trait FallbackClient: Send + Sync + 'static {
    /// Generates a free-text answer for a prompt.
    async fn generate(&self, prompt: String) -> Result<String, AppError>;
}

/// The generative model the pipeline may fall back to.
#[derive(Clone)]
pub enum Fallback {
    Configured(Arc<dyn FallbackClient>),
    /// No client; `reason` records why (e.g. the configuration error at start-up).
    Absent { reason: String },
}

impl Fallback {
    pub fn configured(client: impl FallbackClient) -> Self {
        Fallback::Configured(Arc::new(client))
    }

    pub fn absent(reason: impl Into<String>) -> Self {
        Fallback::Absent {
            reason: reason.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Fallback::Configured(_))
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Configured(_) => f.write_str("Fallback::Configured"),
            Fallback::Absent { reason } => write!(f, "Fallback::Absent({})", reason),
        }
    }
}
