//! # Generative model
//!
//! - `traits`: the fallback capability and the explicit `Fallback` handle
//! - `gemini`: hosted Gemini client
//! - `extractor`: offline profile generation with bounded retries

pub mod extractor;
pub mod gemini;
pub mod traits;

pub use extractor::{GenerationOutcome, ProfileGenerator};
pub use gemini::GeminiClient;
pub use traits::{Fallback, FallbackClient};
