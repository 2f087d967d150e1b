//! Offline institution profile generation.
//!
//! Asks the generative model for a profile document that follows the fixed
//! schema, with a bounded retry loop and a fixed backoff. Each attempt has an
//! explicit outcome instead of an error bubbling out of the loop.

use crate::error::AppError;
use crate::llm::traits::FallbackClient;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// Result of a single generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(Value),
    /// The model answered, but not with a JSON object.
    ParseError(String),
    /// The model call itself failed.
    CallError(String),
}

/// Result of the whole retry loop.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(Value),
    Exhausted { attempts: u32, last_error: String },
}

/// Generates institution profile documents with a generative model.
pub struct ProfileGenerator {
    client: Arc<dyn FallbackClient>,
    max_attempts: u32,
    backoff: Duration,
}

impl ProfileGenerator {
    pub fn new(client: Arc<dyn FallbackClient>) -> Self {
        Self {
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Overrides the retry policy. At least one attempt is always made.
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// Builds the schema-constrained generation prompt.
    pub fn build_prompt(institute_name: &str, additional_context: Option<&str>) -> String {
        let schema = serde_json::to_string_pretty(&profile_schema()).unwrap_or_default();

        let mut lines = vec![
            "You are an expert at providing structured information about educational institutions.".to_string(),
            format!("Based on your general knowledge, provide details about '{}' and strictly", institute_name),
            "adhere to the provided JSON schema. Fill in as much information as possible from your knowledge base.".to_string(),
            "If a specific piece of information is not available or not clearly known, omit that key or set its".to_string(),
            "value to null based on the schema's type hints (e.g., \"string | null\").".to_string(),
            "Ensure all extracted text is concise and relevant.".to_string(),
            String::new(),
            "For lists (like 'phone_numbers' or 'required_documents'), provide all relevant items you know.".to_string(),
            String::new(),
            "JSON Schema to follow:".to_string(),
            "```json".to_string(),
            schema,
            "```".to_string(),
            String::new(),
        ];

        match additional_context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => lines.push(format!("Additional context for {}: {}\n", institute_name, context)),
            None => lines.push(String::new()),
        }

        lines.push(
            "Output ONLY the JSON object, formatted exactly as per the schema, with no additional text or markdown outside the JSON block."
                .to_string(),
        );
        lines.join("\n")
    }

    /// One model call, classified.
    pub async fn attempt(&self, prompt: &str) -> AttemptOutcome {
        match self.client.generate(prompt.to_string()).await {
            Ok(raw) => parse_document(&raw),
            Err(e) => AttemptOutcome::CallError(e.to_string()),
        }
    }

    /// Runs the bounded retry loop for one institution.
    pub async fn generate(&self, institute_name: &str, additional_context: Option<&str>) -> GenerationOutcome {
        let prompt = Self::build_prompt(institute_name, additional_context);
        info!("Requesting '{}' data...", institute_name);

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match self.attempt(&prompt).await {
                AttemptOutcome::Success(value) => {
                    info!("Successfully generated data for '{}'", institute_name);
                    return GenerationOutcome::Generated(value);
                }
                AttemptOutcome::ParseError(e) => {
                    warn!("Attempt {}: error decoding JSON for '{}': {}", attempt, institute_name, e);
                    last_error = e;
                }
                AttemptOutcome::CallError(e) => {
                    warn!("Attempt {}: error in call for '{}': {}", attempt, institute_name, e);
                    last_error = e;
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        error!(
            "Failed to generate data for '{}' after {} attempts",
            institute_name, self.max_attempts
        );
        GenerationOutcome::Exhausted {
            attempts: self.max_attempts,
            last_error,
        }
    }

    /// Generates a profile and writes it, pretty-printed, to `output`.
    ///
    /// The top-level `institute_name` is set to the requested display name.
    pub async fn generate_to_file(
        &self,
        institute_name: &str,
        additional_context: Option<&str>,
        output: &Path,
    ) -> Result<(), AppError> {
        let mut document = match self.generate(institute_name, additional_context).await {
            GenerationOutcome::Generated(value) => value,
            GenerationOutcome::Exhausted { attempts, last_error } => {
                return Err(AppError::Llm(format!(
                    "Failed to generate data for '{}' after {} attempts: {}",
                    institute_name, attempts, last_error
                )));
            }
        };
        document["institute_name"] = Value::String(institute_name.to_string());

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, serde_json::to_string_pretty(&document)?)?;
        info!("Saved data for {} to {}", institute_name, output.display());
        Ok(())
    }
}

/// Strips a surrounding ```json / ``` fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim();
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }
    text
}

fn parse_document(raw: &str) -> AttemptOutcome {
    match serde_json::from_str::<Value>(strip_code_fences(raw)) {
        Ok(value) if value.is_object() => AttemptOutcome::Success(value),
        Ok(_) => AttemptOutcome::ParseError("expected a JSON object".to_string()),
        Err(e) => AttemptOutcome::ParseError(e.to_string()),
    }
}

/// The profile schema the model is asked to follow, with type hints as values.
pub fn profile_schema() -> Value {
    json!({
        "institute_name": "string",
        "university_overview": overview_schema(),
        "admissions_general": admissions_schema(),
        "fees_information": fees_schema(),
        "contact_details": contacts_schema(),
        "admission_faqs": [{ "question": "string", "answer": "string" }],
        "courses_offered": [course_schema()],
        "campus_facilities": {
            "libraries": "string | null",
            "hostels_accommodation": "string | null",
            "sports_facilities": "string | null",
            "health_services": "string | null"
        },
        "student_life": {
            "clubs_societies": "string | null",
            "events_traditions": "string | null"
        },
        "research_innovation": {
            "key_research_areas": "list of strings | null",
            "research_centers": "list of strings | null",
            "publications_highlights": "string | null"
        },
        "alumni_relations": { "alumni_association_info": "string | null" },
        "rankings_accreditations": {
            "national_rankings": "string | null",
            "international_rankings": "string | null",
            "accrediting_bodies": "list of strings | null"
        }
    })
}

fn overview_schema() -> Value {
    json!({
        "motto": "string | null",
        "vision": "string | null",
        "mission": "string | null",
        "general_overview": "string | null",
        "location": {
            "city": "string | null",
            "county": "string | null",
            "country": "string | null",
            "coordinates": "string | null"
        },
        "vice_chancellor": { "name": "string | null" },
        "establishment_year": "string | null",
        "type": "string | null"
    })
}

fn admissions_schema() -> Value {
    let requirements = json!({
        "kenyan_students": {
            "kcse_minimum": "string | null",
            "diploma_entry_requirements": "string | null"
        },
        "international_students": { "equivalent_qualifications": "string | null" }
    });
    let application = json!({
        "required_documents": "list of strings | null",
        "application_portal_link": "string | null",
        "application_deadlines": "string | null"
    });
    json!({
        "undergraduate_programs": {
            "general_requirements": requirements,
            "application_process": application
        },
        "postgraduate_programs": { "general_requirements": "string | null" }
    })
}

fn fees_schema() -> Value {
    json!({
        "tuition_and_fees": {
            "general_information": "string | null",
            "common_fee_structures": {
                "government_sponsored_students": { "approximate_fee_range_per_year_kes": "string | null" },
                "self_sponsored_students": { "approximate_fee_range_per_year_kes": "string | null" },
                "international_students": { "approximate_fee_range_per_year_usd": "string | null" }
            }
        }
    })
}

fn contacts_schema() -> Value {
    json!({
        "main_contact_information": {
            "general_enquiries": { "phone_numbers": "list of strings | null", "email": "string | null" },
            "admissions_office": { "phone_numbers": "list of strings | null", "email": "string | null" },
            "physical_address": "string | null"
        }
    })
}

fn course_schema() -> Value {
    json!({
        "course_name": "string",
        "degree_level": "string | null",
        "duration": "string | null",
        "fees_kes": "string | null",
        "entry_requirements": "string | null",
        "department": "string | null"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted replies, one per call.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, AppError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, AppError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl FallbackClient for ScriptedClient {
        async fn generate(&self, _prompt: String) -> Result<String, AppError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Internal("script exhausted".to_string())))
        }
    }

    fn generator(client: Arc<ScriptedClient>) -> ProfileGenerator {
        ProfileGenerator::new(client).with_retry(3, Duration::ZERO)
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_prompt_embeds_schema_and_context() {
        let prompt = ProfileGenerator::build_prompt("University of Nairobi", Some("Highlight the main campus."));
        assert!(prompt.contains("'University of Nairobi'"));
        assert!(prompt.contains("\"kcse_minimum\": \"string | null\""));
        assert!(prompt.contains("Additional context for University of Nairobi: Highlight the main campus."));
        assert!(prompt.ends_with("with no additional text or markdown outside the JSON block."));
    }

    #[test]
    fn test_schema_sections() {
        let schema = profile_schema();
        assert_eq!(schema["university_overview"]["location"]["city"], "string | null");
        assert_eq!(
            schema["admissions_general"]["undergraduate_programs"]["general_requirements"]["kenyan_students"]
                ["kcse_minimum"],
            "string | null"
        );
        assert_eq!(schema["courses_offered"][0]["course_name"], "string");
        assert_eq!(schema["rankings_accreditations"]["accrediting_bodies"], "list of strings | null");
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let client = ScriptedClient::new(vec![
            Err(AppError::Http("connection reset".to_string())),
            Ok("Sure! Here is the data you asked for.".to_string()),
            Ok("```json\n{\"university_overview\": {\"motto\": \"Setting Trends\"}}\n```".to_string()),
        ]);

        let outcome = generator(client.clone()).generate("JKUAT", None).await;

        assert_eq!(
            outcome,
            GenerationOutcome::Generated(json!({ "university_overview": { "motto": "Setting Trends" } }))
        );
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let client = ScriptedClient::new(vec![
            Ok("[1, 2, 3]".to_string()),
            Ok("not json".to_string()),
            Ok("still not json".to_string()),
            Ok("{}".to_string()),
        ]);

        let outcome = generator(client.clone()).generate("JKUAT", None).await;

        match outcome {
            GenerationOutcome::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("Expected Exhausted, got {:?}", other),
        }
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_attempt_classification() {
        let client = ScriptedClient::new(vec![
            Err(AppError::Timeout("slow".to_string())),
            Ok("\"just a string\"".to_string()),
        ]);
        let generator = generator(client);

        assert!(matches!(generator.attempt("p").await, AttemptOutcome::CallError(_)));
        assert!(matches!(generator.attempt("p").await, AttemptOutcome::ParseError(_)));
    }

    #[tokio::test]
    async fn test_generate_to_file_sets_name_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data").join("jkuat_data.json");
        let client = ScriptedClient::new(vec![Ok("{\"institute_name\": \"JKUAT\"}".to_string())]);

        generator(client)
            .generate_to_file("Jomo Kenyatta University of Agriculture and Technology", None, &output)
            .await
            .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written["institute_name"],
            "Jomo Kenyatta University of Agriculture and Technology"
        );
    }

    #[tokio::test]
    async fn test_generate_to_file_reports_exhaustion() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        let client = ScriptedClient::new(vec![]);

        let result = generator(client).generate_to_file("JKUAT", None, &output).await;

        assert!(matches!(result, Err(AppError::Llm(_))));
        assert!(!output.exists());
    }
}
