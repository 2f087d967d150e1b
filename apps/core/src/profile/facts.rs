//! Fact projection.
//!
//! Flattens an [`InstitutionProfile`] into the named display strings the
//! pattern matcher interpolates into its templates. The key space is the
//! [`FactKey`] enum and every key has a literal default, so a projected
//! [`FactSet`] always holds a non-empty value for every key.

use super::schema::{ContactPoint, FeeRange, InstitutionProfile, Shaped};
use std::collections::BTreeMap;

pub const NOT_FOUND: &str = "Information not found.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_INSTITUTION_NAME: &str = "the institution";
pub const NO_FAQS: &str = "No specific admission FAQs available at the moment.";
pub const NO_DOCUMENTS: &str = "Information on required documents is currently unavailable.";
pub const DEFAULT_FEES_INFO: &str =
    "Please check the official institution fees page for comprehensive details.";

const FAQ_SUMMARY_LIMIT: usize = 3;
const COURSE_SUMMARY_LIMIT: usize = 5;

/// Names of every fact projected from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactKey {
    InstitutionName,
    Motto,
    Vision,
    Mission,
    GeneralOverview,
    Location,
    ViceChancellor,
    EstablishmentYear,
    InstitutionType,
    AdmissionRequirements,
    AdmissionDocumentsRequired,
    ApplicationPortal,
    ApplicationDeadlines,
    PostgraduateRequirements,
    FeesInfo,
    GeneralPhone,
    GeneralEmail,
    AdmissionsPhone,
    AdmissionsEmail,
    PhysicalAddress,
    AdmissionFaqsSummary,
    CoursesSummary,
    Libraries,
    Hostels,
    SportsFacilities,
    HealthServices,
    ClubsSocieties,
    ResearchAreas,
    AccreditingBodies,
}

impl FactKey {
    pub const ALL: [FactKey; 29] = [
        FactKey::InstitutionName,
        FactKey::Motto,
        FactKey::Vision,
        FactKey::Mission,
        FactKey::GeneralOverview,
        FactKey::Location,
        FactKey::ViceChancellor,
        FactKey::EstablishmentYear,
        FactKey::InstitutionType,
        FactKey::AdmissionRequirements,
        FactKey::AdmissionDocumentsRequired,
        FactKey::ApplicationPortal,
        FactKey::ApplicationDeadlines,
        FactKey::PostgraduateRequirements,
        FactKey::FeesInfo,
        FactKey::GeneralPhone,
        FactKey::GeneralEmail,
        FactKey::AdmissionsPhone,
        FactKey::AdmissionsEmail,
        FactKey::PhysicalAddress,
        FactKey::AdmissionFaqsSummary,
        FactKey::CoursesSummary,
        FactKey::Libraries,
        FactKey::Hostels,
        FactKey::SportsFacilities,
        FactKey::HealthServices,
        FactKey::ClubsSocieties,
        FactKey::ResearchAreas,
        FactKey::AccreditingBodies,
    ];

    /// Predicate name used in pattern templates.
    pub fn name(self) -> &'static str {
        match self {
            FactKey::InstitutionName => "institution_name",
            FactKey::Motto => "institution_motto",
            FactKey::Vision => "institution_vision",
            FactKey::Mission => "institution_mission",
            FactKey::GeneralOverview => "institution_general_overview",
            FactKey::Location => "institution_location",
            FactKey::ViceChancellor => "institution_vice_chancellor",
            FactKey::EstablishmentYear => "institution_establishment_year",
            FactKey::InstitutionType => "institution_type",
            FactKey::AdmissionRequirements => "institution_admission_requirements",
            FactKey::AdmissionDocumentsRequired => "institution_admission_documents_required",
            FactKey::ApplicationPortal => "institution_application_portal",
            FactKey::ApplicationDeadlines => "institution_application_deadlines",
            FactKey::PostgraduateRequirements => "institution_postgraduate_requirements",
            FactKey::FeesInfo => "institution_fees_info",
            FactKey::GeneralPhone => "institution_general_phone",
            FactKey::GeneralEmail => "institution_general_email",
            FactKey::AdmissionsPhone => "institution_admissions_phone",
            FactKey::AdmissionsEmail => "institution_admissions_email",
            FactKey::PhysicalAddress => "institution_physical_address",
            FactKey::AdmissionFaqsSummary => "institution_admission_faqs_summary",
            FactKey::CoursesSummary => "institution_courses_summary",
            FactKey::Libraries => "institution_libraries",
            FactKey::Hostels => "institution_hostels",
            FactKey::SportsFacilities => "institution_sports_facilities",
            FactKey::HealthServices => "institution_health_services",
            FactKey::ClubsSocieties => "institution_clubs_societies",
            FactKey::ResearchAreas => "institution_research_areas",
            FactKey::AccreditingBodies => "institution_accrediting_bodies",
        }
    }

    pub fn from_name(name: &str) -> Option<FactKey> {
        FactKey::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Total mapping from [`FactKey`] to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSet {
    values: BTreeMap<FactKey, String>,
}

impl FactSet {
    pub fn get(&self, key: FactKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or(NOT_FOUND)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FactKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl Default for FactSet {
    fn default() -> Self {
        project(&InstitutionProfile::default(), DEFAULT_INSTITUTION_NAME)
    }
}

/// Projects a profile into its fact set. Never fails.
pub fn project(profile: &InstitutionProfile, name: &str) -> FactSet {
    let values = FactKey::ALL
        .into_iter()
        .map(|key| (key, project_fact(profile, name, key)))
        .collect();
    FactSet { values }
}

fn project_fact(profile: &InstitutionProfile, name: &str, key: FactKey) -> String {
    let overview = &profile.university_overview;
    let undergraduate = &profile.admissions_general.undergraduate_programs;
    let contacts = &profile.contact_details.main_contact_information;
    let facilities = &profile.campus_facilities;

    match key {
        FactKey::InstitutionName => or(Some(name.trim()).filter(|n| !n.is_empty()), DEFAULT_INSTITUTION_NAME),
        FactKey::Motto => or(overview.motto.as_deref(), NOT_FOUND),
        FactKey::Vision => or(overview.vision.as_deref(), NOT_FOUND),
        FactKey::Mission => or(overview.mission.as_deref(), NOT_FOUND),
        FactKey::GeneralOverview => or(overview.general_overview.as_deref(), NOT_FOUND),
        FactKey::Location => location(&overview.location),
        FactKey::ViceChancellor => match &overview.vice_chancellor {
            Shaped::Object(vc) => or(vc.name.as_deref(), NOT_FOUND),
            Shaped::Raw(raw) => raw.clone(),
            Shaped::Missing => NOT_FOUND.to_string(),
        },
        FactKey::EstablishmentYear => or(overview.establishment_year.as_deref(), NOT_FOUND),
        FactKey::InstitutionType => or(overview.institution_type.as_deref(), NOT_FOUND),
        FactKey::AdmissionRequirements => or(
            undergraduate.general_requirements.kenyan_students.kcse_minimum.as_deref(),
            NOT_AVAILABLE,
        ),
        FactKey::AdmissionDocumentsRequired => {
            let documents = &undergraduate.application_process.required_documents;
            if documents.is_empty() {
                NO_DOCUMENTS.to_string()
            } else {
                format!("You will typically need: {}.", documents.join(", "))
            }
        }
        FactKey::ApplicationPortal => or(
            undergraduate.application_process.application_portal_link.as_deref(),
            NOT_AVAILABLE,
        ),
        FactKey::ApplicationDeadlines => or(
            undergraduate.application_process.application_deadlines.as_deref(),
            NOT_AVAILABLE,
        ),
        FactKey::PostgraduateRequirements => or(
            profile.admissions_general.postgraduate_programs.general_requirements.as_deref(),
            NOT_FOUND,
        ),
        FactKey::FeesInfo => fees(profile),
        FactKey::GeneralPhone => phones(&contacts.general_enquiries),
        FactKey::GeneralEmail => or(contacts.general_enquiries.email.as_deref(), NOT_AVAILABLE),
        FactKey::AdmissionsPhone => phones(&contacts.admissions_office),
        FactKey::AdmissionsEmail => or(contacts.admissions_office.email.as_deref(), NOT_AVAILABLE),
        FactKey::PhysicalAddress => or(contacts.physical_address.as_deref(), NOT_AVAILABLE),
        FactKey::AdmissionFaqsSummary => faq_summary(profile),
        FactKey::CoursesSummary => courses_summary(profile),
        FactKey::Libraries => or(facilities.libraries.as_deref(), NOT_FOUND),
        FactKey::Hostels => or(facilities.hostels_accommodation.as_deref(), NOT_FOUND),
        FactKey::SportsFacilities => or(facilities.sports_facilities.as_deref(), NOT_FOUND),
        FactKey::HealthServices => or(facilities.health_services.as_deref(), NOT_FOUND),
        FactKey::ClubsSocieties => or(profile.student_life.clubs_societies.as_deref(), NOT_FOUND),
        FactKey::ResearchAreas => joined(&profile.research_innovation.key_research_areas, NOT_FOUND),
        FactKey::AccreditingBodies => joined(&profile.rankings_accreditations.accrediting_bodies, NOT_FOUND),
    }
}

fn or(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

fn joined(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

fn location(location: &Shaped<super::schema::Location>) -> String {
    match location {
        Shaped::Object(loc) => {
            let mut text = format!(
                "{}, {}, {}",
                loc.city.as_deref().unwrap_or(NOT_AVAILABLE),
                loc.county.as_deref().unwrap_or(NOT_AVAILABLE),
                loc.country.as_deref().unwrap_or(NOT_AVAILABLE),
            );
            if let Some(coordinates) = loc
                .coordinates
                .as_deref()
                .filter(|c| !c.eq_ignore_ascii_case(NOT_AVAILABLE))
            {
                text.push_str(&format!(" ({})", coordinates));
            }
            text
        }
        Shaped::Raw(raw) => raw.clone(),
        Shaped::Missing => NOT_FOUND.to_string(),
    }
}

fn phones(contact: &ContactPoint) -> String {
    joined(&contact.phone_numbers, NOT_AVAILABLE)
}

fn fees(profile: &InstitutionProfile) -> String {
    let tuition = &profile.fees_information.tuition_and_fees;
    let structures = &tuition.common_fee_structures;

    let mut parts = vec![or(tuition.general_information.as_deref(), DEFAULT_FEES_INFO)];
    let kes = |range: &FeeRange| range.approximate_fee_range_per_year_kes.clone();

    if let Some(range) = kes(&structures.government_sponsored_students) {
        parts.push(format!(
            "For government-sponsored students, approximate annual fees: KES {}.",
            range
        ));
    }
    if let Some(range) = kes(&structures.self_sponsored_students) {
        parts.push(format!(
            "For self-sponsored students, approximate annual fees: KES {}.",
            range
        ));
    }
    if let Some(range) = &structures.international_students.approximate_fee_range_per_year_usd {
        parts.push(format!(
            "For international students, approximate annual fees (USD): {}.",
            range
        ));
    }

    parts.join(" ")
}

fn faq_summary(profile: &InstitutionProfile) -> String {
    if profile.admission_faqs.is_empty() {
        return NO_FAQS.to_string();
    }
    profile
        .admission_faqs
        .iter()
        .take(FAQ_SUMMARY_LIMIT)
        .enumerate()
        .map(|(i, faq)| {
            format!(
                "{}. Q: {} / A: {}",
                i + 1,
                faq.question.as_deref().unwrap_or(""),
                faq.answer.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn courses_summary(profile: &InstitutionProfile) -> String {
    let courses: Vec<String> = profile
        .courses_offered
        .iter()
        .filter_map(|course| {
            let name = course.course_name.as_deref()?;
            Some(match course.degree_level.as_deref() {
                Some(level) => format!("{} ({})", name, level),
                None => name.to_string(),
            })
        })
        .take(COURSE_SUMMARY_LIMIT)
        .collect();
    if courses.is_empty() {
        NOT_FOUND.to_string()
    } else {
        courses.join("; ")
    }
}
