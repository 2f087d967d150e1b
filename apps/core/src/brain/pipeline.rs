//! Resolution pipeline.
//!
//! `Normalizing → Matching → Matched | (Falling back → Cleaning)`, ending with
//! exactly one reply string. Canned answers are returned verbatim; only
//! generated answers are cleaned. No error ever leaves [`ChatbotCore::get_response`].

use tracing::{debug, error, info, instrument, warn};

use super::cleaner::clean;
use super::matcher::PatternMatcher;
use super::normalizer::TextNormalizer;
use crate::llm::traits::Fallback;
use crate::profile::facts::{project, FactKey, FactSet, DEFAULT_INSTITUTION_NAME};
use crate::profile::schema::InstitutionProfile;

/// Reply when the model call fails.
pub const CALL_FAILED_REPLY: &str = "I'm sorry, I couldn't get an answer at the moment.";

/// Reply when the model answered with nothing usable.
pub const EMPTY_REPLY: &str = "I couldn't process that at the moment.";

/// How a reply was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canned answer from the pattern matcher.
    Matched(String),
    /// Cleaned answer from the generative model.
    Generated(String),
    /// No match and no model configured.
    FallbackAbsent(String),
    /// The model call failed.
    FallbackFailed(String),
    /// The model answered with empty or unusable text.
    FallbackEmpty(String),
}

impl Resolution {
    pub fn text(&self) -> &str {
        match self {
            Resolution::Matched(text)
            | Resolution::Generated(text)
            | Resolution::FallbackAbsent(text)
            | Resolution::FallbackFailed(text)
            | Resolution::FallbackEmpty(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Resolution::Matched(text)
            | Resolution::Generated(text)
            | Resolution::FallbackAbsent(text)
            | Resolution::FallbackFailed(text)
            | Resolution::FallbackEmpty(text) => text,
        }
    }
}

/// Reply when nothing matched and there is no model to ask.
pub fn absent_reply(institution_name: &str) -> String {
    format!(
        "I'm sorry, I don't have information on that about {name}. \
         Can you try asking about something else related to {name}?",
        name = institution_name
    )
}

/// The fallback prompt: fixed instructions plus the user's raw question.
pub fn fallback_prompt(institution_name: &str, question: &str) -> String {
    format!(
        "You are the official {name} enquiry chatbot. Your purpose is to assist students \
         by providing concise, factual information about {name}. \
         Always use available information. Avoid stating 'I don't know'.\n\n\
         Provide a direct, concise answer to the following question. \
         If a list or explanation is requested, limit it to under 100 words. \
         Question: {question}",
        name = institution_name,
        question = question
    )
}

/// The chatbot: pattern matcher first, generative model as fallback.
pub struct ChatbotCore {
    normalizer: TextNormalizer,
    matcher: Option<Box<dyn PatternMatcher>>,
    fallback: Fallback,
    facts: FactSet,
}

impl ChatbotCore {
    /// Creates a core with the empty profile already applied, so every
    /// predicate holds its placeholder until real data is set.
    pub fn new(matcher: Option<Box<dyn PatternMatcher>>, fallback: Fallback) -> Self {
        if matcher.is_none() {
            warn!("No pattern matcher available, every query will use the fallback");
        }
        if let Fallback::Absent { reason } = &fallback {
            warn!("Generative fallback disabled: {}", reason);
        }

        let mut core = Self {
            normalizer: TextNormalizer::new(),
            matcher,
            fallback,
            facts: FactSet::default(),
        };
        core.set_institution_data(&InstitutionProfile::default(), DEFAULT_INSTITUTION_NAME);
        core
    }

    /// Replaces the active institution wholesale and pushes its facts to the matcher.
    pub fn set_institution_data(&mut self, profile: &InstitutionProfile, name: &str) {
        let facts = project(profile, name);
        if let Some(matcher) = self.matcher.as_mut() {
            for (key, value) in facts.iter() {
                matcher.set_predicate(key.name(), value);
            }
        }
        self.facts = facts;
        info!("Data for '{}' loaded and set", self.institution_name());
    }

    pub fn institution_name(&self) -> &str {
        self.facts.get(FactKey::InstitutionName)
    }

    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_configured()
    }

    /// Canonical form of `text`, as submitted to the matcher.
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Resolves one user utterance.
    #[instrument(skip_all)]
    pub async fn resolve(&self, user_input: &str) -> Resolution {
        let canonical = self.normalizer.normalize(user_input);
        debug!("Processed input for matching: '{}'", canonical);

        if let Some(reply) = self.match_canned(&canonical) {
            return Resolution::Matched(reply);
        }

        let client = match &self.fallback {
            Fallback::Configured(client) => client,
            Fallback::Absent { .. } => {
                return Resolution::FallbackAbsent(absent_reply(self.institution_name()));
            }
        };

        info!("No canned answer, consulting the generative model");
        let prompt = fallback_prompt(self.institution_name(), user_input);
        match client.generate(prompt).await {
            Ok(raw) if raw.trim().is_empty() => {
                warn!("Generative model returned an empty answer");
                Resolution::FallbackEmpty(EMPTY_REPLY.to_string())
            }
            Ok(raw) => {
                let cleaned = clean(&raw);
                if cleaned.is_empty() {
                    warn!("Generative model answer was empty after cleaning");
                    Resolution::FallbackEmpty(EMPTY_REPLY.to_string())
                } else {
                    Resolution::Generated(cleaned)
                }
            }
            Err(e) => {
                error!("Error calling the generative model: {}", e);
                Resolution::FallbackFailed(CALL_FAILED_REPLY.to_string())
            }
        }
    }

    /// Resolves one user utterance to the reply text.
    pub async fn get_response(&self, user_input: &str) -> String {
        self.resolve(user_input).await.into_text()
    }

    fn match_canned(&self, canonical: &str) -> Option<String> {
        if canonical.is_empty() {
            return None;
        }
        self.matcher
            .as_ref()?
            .respond(canonical)
            .filter(|reply| !reply.trim().is_empty())
    }
}
