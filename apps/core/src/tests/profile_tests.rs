//! Profile Tests
//!
//! Fact projection over complete, partial and oddly shaped profile documents.

use crate::profile::facts::{
    DEFAULT_FEES_INFO, DEFAULT_INSTITUTION_NAME, NOT_AVAILABLE, NOT_FOUND, NO_DOCUMENTS, NO_FAQS,
};
use crate::profile::{parse_profile, project, FactKey, FactSet, InstitutionProfile};
use serde_json::{json, Value};

fn profile(value: Value) -> InstitutionProfile {
    parse_profile(value.to_string().as_bytes()).unwrap()
}

fn faqs(count: usize) -> Value {
    (1..=count)
        .map(|i| json!({ "question": format!("Question {}?", i), "answer": format!("Answer {}.", i) }))
        .collect()
}

#[test]
fn test_every_fact_is_non_empty() {
    let documents = [
        json!({}),
        json!({ "university_overview": null, "admission_faqs": "none" }),
        json!({ "university_overview": { "location": {} , "vice_chancellor": {} } }),
    ];
    for document in documents {
        let facts = project(&profile(document.clone()), "JKUAT");
        assert_eq!(facts.len(), FactKey::ALL.len());
        for (key, value) in facts.iter() {
            assert!(!value.trim().is_empty(), "{} empty for {}", key.name(), document);
        }
    }
}

#[test]
fn test_default_fact_set_uses_placeholders() {
    let facts = FactSet::default();

    assert_eq!(facts.get(FactKey::InstitutionName), DEFAULT_INSTITUTION_NAME);
    assert_eq!(facts.get(FactKey::Motto), NOT_FOUND);
    assert_eq!(facts.get(FactKey::Location), NOT_FOUND);
    assert_eq!(facts.get(FactKey::AdmissionRequirements), NOT_AVAILABLE);
    assert_eq!(facts.get(FactKey::GeneralPhone), NOT_AVAILABLE);
    assert_eq!(facts.get(FactKey::AdmissionDocumentsRequired), NO_DOCUMENTS);
    assert_eq!(facts.get(FactKey::AdmissionFaqsSummary), NO_FAQS);
    assert_eq!(facts.get(FactKey::FeesInfo), DEFAULT_FEES_INFO);
    assert_eq!(facts.get(FactKey::CoursesSummary), NOT_FOUND);
}

#[test]
fn test_blank_name_falls_back_to_placeholder() {
    let facts = project(&InstitutionProfile::default(), "   ");
    assert_eq!(facts.get(FactKey::InstitutionName), DEFAULT_INSTITUTION_NAME);
}

#[test]
fn test_fact_names_round_trip() {
    for key in FactKey::ALL {
        assert!(key.name().starts_with("institution_"));
        assert_eq!(FactKey::from_name(key.name()), Some(key));
    }
    assert_eq!(FactKey::from_name("institution_weather"), None);
}

// ============================================================================
// Location and vice-chancellor
// ============================================================================

#[test]
fn test_location_without_coordinates() {
    let facts = project(
        &profile(json!({ "university_overview": { "location": {
            "city": "Juja", "county": "Kiambu", "country": "Kenya", "coordinates": "N/A"
        } } })),
        "JKUAT",
    );
    assert_eq!(facts.get(FactKey::Location), "Juja, Kiambu, Kenya");
}

#[test]
fn test_location_with_coordinates() {
    let facts = project(
        &profile(json!({ "university_overview": { "location": {
            "city": "Juja", "county": "Kiambu", "country": "Kenya", "coordinates": "-1.10, 37.01"
        } } })),
        "JKUAT",
    );
    assert_eq!(facts.get(FactKey::Location), "Juja, Kiambu, Kenya (-1.10, 37.01)");
}

#[test]
fn test_location_partial_and_flat() {
    let partial = project(
        &profile(json!({ "university_overview": { "location": { "city": "Juja", "coordinates": "n/a" } } })),
        "JKUAT",
    );
    assert_eq!(partial.get(FactKey::Location), "Juja, N/A, N/A");

    let flat = project(
        &profile(json!({ "university_overview": { "location": "Juja, Kenya" } })),
        "JKUAT",
    );
    assert_eq!(flat.get(FactKey::Location), "Juja, Kenya");
}

#[test]
fn test_vice_chancellor_shapes() {
    let object = project(
        &profile(json!({ "university_overview": { "vice_chancellor": { "name": "Prof. Victoria Ngumi" } } })),
        "JKUAT",
    );
    assert_eq!(object.get(FactKey::ViceChancellor), "Prof. Victoria Ngumi");

    let flat = project(
        &profile(json!({ "university_overview": { "vice_chancellor": "Prof. Victoria Ngumi" } })),
        "JKUAT",
    );
    assert_eq!(flat.get(FactKey::ViceChancellor), "Prof. Victoria Ngumi");

    let nameless = project(
        &profile(json!({ "university_overview": { "vice_chancellor": {} } })),
        "JKUAT",
    );
    assert_eq!(nameless.get(FactKey::ViceChancellor), NOT_FOUND);
}

// ============================================================================
// Summaries
// ============================================================================

#[test]
fn test_faq_summary_takes_first_three() {
    let facts = project(&profile(json!({ "admission_faqs": faqs(5) })), "JKUAT");
    let summary = facts.get(FactKey::AdmissionFaqsSummary);

    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "1. Q: Question 1? / A: Answer 1.");
    assert_eq!(lines[2], "3. Q: Question 3? / A: Answer 3.");
    assert!(!summary.contains("Question 4"));
}

#[test]
fn test_faq_summary_without_faqs() {
    let facts = project(&profile(json!({ "admission_faqs": [] })), "JKUAT");
    assert_eq!(facts.get(FactKey::AdmissionFaqsSummary), NO_FAQS);
}

#[test]
fn test_courses_summary_takes_first_five() {
    let courses: Vec<Value> = (1..=7)
        .map(|i| json!({ "course_name": format!("Course {}", i), "degree_level": "Undergraduate" }))
        .collect();
    let facts = project(&profile(json!({ "courses_offered": courses })), "JKUAT");

    let summary = facts.get(FactKey::CoursesSummary);
    assert_eq!(summary.split("; ").count(), 5);
    assert!(summary.starts_with("Course 1 (Undergraduate); Course 2 (Undergraduate)"));
    assert!(!summary.contains("Course 6"));
}

#[test]
fn test_courses_summary_separator_and_levels() {
    let facts = project(
        &profile(json!({ "courses_offered": [
            { "course_name": "BSc Civil Engineering", "degree_level": "Undergraduate" },
            { "course_name": "Certificate in ICT" },
            { "degree_level": "Masters" }
        ] })),
        "JKUAT",
    );
    assert_eq!(
        facts.get(FactKey::CoursesSummary),
        "BSc Civil Engineering (Undergraduate); Certificate in ICT"
    );

    let empty = project(&profile(json!({ "courses_offered": [] })), "JKUAT");
    assert_eq!(empty.get(FactKey::CoursesSummary), NOT_FOUND);
}

#[test]
fn test_contacts_and_documents() {
    let facts = project(
        &profile(json!({
            "admissions_general": { "undergraduate_programs": { "application_process": {
                "required_documents": ["KCSE certificate", "National ID"]
            } } },
            "contact_details": { "main_contact_information": {
                "general_enquiries": { "phone_numbers": ["+254 67 587 0001", "+254 67 587 0225"], "email": "info@jkuat.ac.ke" },
                "admissions_office": { "phone_numbers": [] }
            } }
        })),
        "JKUAT",
    );

    assert_eq!(facts.get(FactKey::GeneralPhone), "+254 67 587 0001, +254 67 587 0225");
    assert_eq!(facts.get(FactKey::GeneralEmail), "info@jkuat.ac.ke");
    assert_eq!(facts.get(FactKey::AdmissionsPhone), NOT_AVAILABLE);
    assert_eq!(facts.get(FactKey::AdmissionsEmail), NOT_AVAILABLE);
    assert_eq!(
        facts.get(FactKey::AdmissionDocumentsRequired),
        "You will typically need: KCSE certificate, National ID."
    );
}

#[test]
fn test_fees_sentences() {
    let facts = project(
        &profile(json!({ "fees_information": { "tuition_and_fees": {
            "general_information": "Fees vary by programme.",
            "common_fee_structures": {
                "government_sponsored_students": { "approximate_fee_range_per_year_kes": "16,000 - 70,000" },
                "international_students": { "approximate_fee_range_per_year_usd": "2,000 - 6,000" }
            }
        } } })),
        "JKUAT",
    );

    assert_eq!(
        facts.get(FactKey::FeesInfo),
        "Fees vary by programme. \
         For government-sponsored students, approximate annual fees: KES 16,000 - 70,000. \
         For international students, approximate annual fees (USD): 2,000 - 6,000."
    );
}
