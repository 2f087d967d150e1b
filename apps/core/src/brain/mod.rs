//! # Brain Module
//!
//! Rule-based answering for Amanda, with a generative model behind it.
//!
//! ## Components
//! - `normalizer`: canonical token string for matching
//! - `matcher`: pattern matcher capability and the category engine
//! - `cleaner`: markdown cleanup of generated answers
//! - `pipeline`: main orchestrator (`ChatbotCore`)

pub mod cleaner;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;

pub use cleaner::clean;
pub use matcher::{Category, CategoryMatcher, PatternMatcher};
pub use normalizer::TextNormalizer;
pub use pipeline::{ChatbotCore, Resolution};
