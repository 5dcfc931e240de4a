//! Projection of job and profile records onto a single labelled text.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{EmbeddableRecord, JobRecord, ProfileRecord};

/// Separator placed between labelled fields.
pub const FIELD_SEPARATOR: &str = " | ";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Collapse whitespace runs and drop blank values.
fn clean(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(WHITESPACE.replace_all(value, " ").into_owned())
}

fn push_field(parts: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = clean(value) {
        parts.push(format!("{label}: {value}"));
    }
}

/// Zero budgets are treated as absent.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| *amount != 0.0 && amount.is_finite())
}

/// Build the embedding text for a job posting.
///
/// Fields are emitted in the order title, skills required, description,
/// experience required, qualifications, responsibilities, category, job type,
/// location, benefits and budget. A single budget wins over a budget range,
/// and the range is only emitted when both bounds are present.
pub fn job_embedding_prompt(job: &JobRecord) -> String {
    let mut parts = Vec::with_capacity(11);

    push_field(&mut parts, "Job Title", job.title.as_deref());
    push_field(&mut parts, "Skills Required", job.skills_required.as_deref());
    push_field(&mut parts, "Description", job.description.as_deref());
    push_field(
        &mut parts,
        "Experience Required",
        job.experience_required.as_deref(),
    );
    push_field(&mut parts, "Qualifications", job.qualifications.as_deref());
    push_field(&mut parts, "Responsibilities", job.responsibilities.as_deref());
    push_field(&mut parts, "Category", job.category.as_deref());
    push_field(&mut parts, "Job Type", job.job_type.as_deref());
    push_field(&mut parts, "Location", job.location.as_deref());
    push_field(&mut parts, "Benefits", job.benefits.as_deref());

    if let Some(budget) = positive(job.budget) {
        parts.push(format!("Budget: {budget}"));
    } else if let (Some(min), Some(max)) = (positive(job.budget_min), positive(job.budget_max)) {
        parts.push(format!("Budget Range: {min} - {max}"));
    }

    parts.join(FIELD_SEPARATOR)
}

/// Build the embedding text for a user profile.
pub fn user_embedding_prompt(profile: &ProfileRecord) -> String {
    let mut parts = Vec::with_capacity(8);

    push_field(
        &mut parts,
        "Professional Title",
        profile.professional_title.as_deref(),
    );
    push_field(&mut parts, "Bio", profile.bio.as_deref());
    push_field(&mut parts, "Skills", profile.skills.as_deref());
    push_field(&mut parts, "Experience", profile.experience.as_deref());
    push_field(&mut parts, "Education", profile.education.as_deref());
    push_field(&mut parts, "Location", profile.location.as_deref());
    push_field(&mut parts, "Role", profile.primary_role.as_deref());
    push_field(&mut parts, "Company", profile.company_name.as_deref());

    parts.join(FIELD_SEPARATOR)
}

pub fn record_embedding_prompt(record: &EmbeddableRecord) -> String {
    match record {
        EmbeddableRecord::Job(job) => job_embedding_prompt(job),
        EmbeddableRecord::Profile(profile) => user_embedding_prompt(profile),
    }
}
