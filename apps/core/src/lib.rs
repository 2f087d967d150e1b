//! Amanda - smart enquiry chatbot for universities.
//!
//! Canned answers come from a rule-based pattern matcher fed with facts
//! about the active institution; anything it cannot answer falls back to a
//! hosted generative model.

pub mod brain;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod profile;
pub mod setup;

pub use brain::ChatbotCore;
pub use error::{AppError, ProfileError};

#[cfg(test)]
mod tests;
