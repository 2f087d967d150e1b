//! Typed institution profile.
//!
//! Every field is optional and every nested section defaults when absent.
//! Deserialization never fails on shape: a value of the wrong JSON type is
//! treated as missing, blank strings and nulls included. Only the location
//! and vice-chancellor entries keep a raw scalar, because generated documents
//! often flatten them to a plain string.
//!
//! Only the fields the fact projection reads are typed. The rest of a
//! generated document (course durations, research centres, rankings text)
//! is accepted and ignored.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstitutionProfile {
    #[serde(deserialize_with = "text")]
    pub institute_name: Option<String>,
    #[serde(deserialize_with = "section")]
    pub university_overview: Overview,
    #[serde(deserialize_with = "section")]
    pub admissions_general: Admissions,
    #[serde(deserialize_with = "section")]
    pub fees_information: FeesInformation,
    #[serde(deserialize_with = "section")]
    pub contact_details: ContactDetails,
    #[serde(deserialize_with = "entries")]
    pub admission_faqs: Vec<Faq>,
    #[serde(deserialize_with = "entries")]
    pub courses_offered: Vec<Course>,
    #[serde(deserialize_with = "section")]
    pub campus_facilities: CampusFacilities,
    #[serde(deserialize_with = "section")]
    pub student_life: StudentLife,
    #[serde(deserialize_with = "section")]
    pub research_innovation: ResearchInnovation,
    #[serde(deserialize_with = "section")]
    pub rankings_accreditations: Rankings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Overview {
    #[serde(deserialize_with = "text")]
    pub motto: Option<String>,
    #[serde(deserialize_with = "text")]
    pub vision: Option<String>,
    #[serde(deserialize_with = "text")]
    pub mission: Option<String>,
    #[serde(deserialize_with = "text")]
    pub general_overview: Option<String>,
    pub location: Shaped<Location>,
    pub vice_chancellor: Shaped<ViceChancellor>,
    #[serde(deserialize_with = "text")]
    pub establishment_year: Option<String>,
    #[serde(rename = "type", deserialize_with = "text")]
    pub institution_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "text")]
    pub county: Option<String>,
    #[serde(deserialize_with = "text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "text")]
    pub coordinates: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViceChancellor {
    #[serde(deserialize_with = "text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Admissions {
    #[serde(deserialize_with = "section")]
    pub undergraduate_programs: UndergraduatePrograms,
    #[serde(deserialize_with = "section")]
    pub postgraduate_programs: PostgraduatePrograms,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UndergraduatePrograms {
    #[serde(deserialize_with = "section")]
    pub general_requirements: GeneralRequirements,
    #[serde(deserialize_with = "section")]
    pub application_process: ApplicationProcess,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneralRequirements {
    #[serde(deserialize_with = "section")]
    pub kenyan_students: KenyanStudents,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KenyanStudents {
    #[serde(deserialize_with = "text")]
    pub kcse_minimum: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationProcess {
    #[serde(deserialize_with = "text_list")]
    pub required_documents: Vec<String>,
    #[serde(deserialize_with = "text")]
    pub application_portal_link: Option<String>,
    #[serde(deserialize_with = "text")]
    pub application_deadlines: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostgraduatePrograms {
    #[serde(deserialize_with = "text")]
    pub general_requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeesInformation {
    #[serde(deserialize_with = "section")]
    pub tuition_and_fees: TuitionAndFees,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuitionAndFees {
    #[serde(deserialize_with = "text")]
    pub general_information: Option<String>,
    #[serde(deserialize_with = "section")]
    pub common_fee_structures: FeeStructures,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeeStructures {
    #[serde(deserialize_with = "section")]
    pub government_sponsored_students: FeeRange,
    #[serde(deserialize_with = "section")]
    pub self_sponsored_students: FeeRange,
    #[serde(deserialize_with = "section")]
    pub international_students: FeeRange,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeeRange {
    #[serde(deserialize_with = "text")]
    pub approximate_fee_range_per_year_kes: Option<String>,
    #[serde(deserialize_with = "text")]
    pub approximate_fee_range_per_year_usd: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    #[serde(deserialize_with = "section")]
    pub main_contact_information: MainContacts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MainContacts {
    #[serde(deserialize_with = "section")]
    pub general_enquiries: ContactPoint,
    #[serde(deserialize_with = "section")]
    pub admissions_office: ContactPoint,
    #[serde(deserialize_with = "text")]
    pub physical_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactPoint {
    #[serde(deserialize_with = "text_list")]
    pub phone_numbers: Vec<String>,
    #[serde(deserialize_with = "text")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Faq {
    #[serde(deserialize_with = "text")]
    pub question: Option<String>,
    #[serde(deserialize_with = "text")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Course {
    #[serde(deserialize_with = "text")]
    pub course_name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub degree_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CampusFacilities {
    #[serde(deserialize_with = "text")]
    pub libraries: Option<String>,
    #[serde(deserialize_with = "text")]
    pub hostels_accommodation: Option<String>,
    #[serde(deserialize_with = "text")]
    pub sports_facilities: Option<String>,
    #[serde(deserialize_with = "text")]
    pub health_services: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentLife {
    #[serde(deserialize_with = "text")]
    pub clubs_societies: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResearchInnovation {
    #[serde(deserialize_with = "text_list")]
    pub key_research_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rankings {
    #[serde(deserialize_with = "text_list")]
    pub accrediting_bodies: Vec<String>,
}

/// A field that is normally an object but may arrive as a bare scalar.
#[derive(Debug, Clone)]
pub enum Shaped<T> {
    Missing,
    Object(T),
    /// Non-empty scalar (or list) rendered as display text.
    Raw(String),
}

impl<T> Default for Shaped<T> {
    fn default() -> Self {
        Shaped::Missing
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Shaped<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(_) => T::deserialize(value).map(Shaped::Object).unwrap_or(Shaped::Missing),
            Value::Array(items) => {
                let joined = items.iter().filter_map(display_text).collect::<Vec<_>>().join(", ");
                if joined.is_empty() {
                    Shaped::Missing
                } else {
                    Shaped::Raw(joined)
                }
            }
            other => display_text(&other).map(Shaped::Raw).unwrap_or(Shaped::Missing),
        })
    }
}

/// Non-blank strings, numbers and booleans as trimmed display text.
fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(display_text(&value))
}

/// A list of display strings; a lone scalar counts as a one-item list.
fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Array(items) => items.iter().filter_map(display_text).collect(),
        other => display_text(other).into_iter().collect(),
    })
}

/// A nested section; anything but an object yields the empty section.
fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A list of objects; non-object entries are skipped.
fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_and_blanks_are_absent() {
        let profile: InstitutionProfile = serde_json::from_value(json!({
            "university_overview": { "motto": null, "vision": "   ", "mission": "Excellence" }
        }))
        .unwrap();
        assert_eq!(profile.university_overview.motto, None);
        assert_eq!(profile.university_overview.vision, None);
        assert_eq!(profile.university_overview.mission.as_deref(), Some("Excellence"));
    }

    #[test]
    fn test_untyped_fields_are_ignored() {
        let profile: InstitutionProfile = serde_json::from_value(json!({
            "courses_offered": [{
                "course_name": "BSc Computer Science",
                "degree_level": "Undergraduate",
                "duration": "4 years",
                "department": "Computing"
            }],
            "research_innovation": { "key_research_areas": ["Biotechnology"], "research_centers": ["IBR"] },
            "alumni_relations": { "alumni_association_info": "JKUAT Alumni Association" }
        }))
        .unwrap();
        assert_eq!(profile.courses_offered.len(), 1);
        assert_eq!(profile.courses_offered[0].course_name.as_deref(), Some("BSc Computer Science"));
        assert_eq!(profile.research_innovation.key_research_areas, vec!["Biotechnology".to_string()]);
    }

    #[test]
    fn test_wrong_shapes_degrade() {
        let profile: InstitutionProfile = serde_json::from_value(json!({
            "university_overview": {
                "location": "Juja, Kenya",
                "vice_chancellor": ["Prof. A", "Prof. B"],
                "establishment_year": 1994
            },
            "admissions_general": "see website",
            "admission_faqs": [ "not an object", { "question": "Q?", "answer": 42 } ],
            "contact_details": { "main_contact_information": {
                "general_enquiries": { "phone_numbers": "+254 67 587 0001" }
            } }
        }))
        .unwrap();

        let overview = &profile.university_overview;
        assert!(matches!(&overview.location, Shaped::Raw(s) if s == "Juja, Kenya"));
        assert!(matches!(&overview.vice_chancellor, Shaped::Raw(s) if s == "Prof. A, Prof. B"));
        assert_eq!(overview.establishment_year.as_deref(), Some("1994"));
        assert!(profile
            .admissions_general
            .undergraduate_programs
            .application_process
            .required_documents
            .is_empty());
        assert_eq!(profile.admission_faqs.len(), 1);
        assert_eq!(profile.admission_faqs[0].answer.as_deref(), Some("42"));
        assert_eq!(
            profile.contact_details.main_contact_information.general_enquiries.phone_numbers,
            vec!["+254 67 587 0001".to_string()]
        );
    }
}
