use serde::Serialize;

use super::domain::{CandidateDraft, CandidateField};
use super::form::StepValues;
use super::steps::Step;

/// A rule failure attached to the field that should display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: CandidateField,
    pub message: String,
}

impl Violation {
    pub fn new(field: CandidateField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate one step submission.
///
/// Per-field rules run on the decoded values first. Only when they pass are the cross-field
/// rules evaluated against the draft merged with the submission, and only violations on
/// fields owned by `step` are kept: a rule whose target field belongs to a later step waits
/// until that step is submitted.
pub fn validate_step(
    step: Step,
    values: &StepValues,
    accumulated: &CandidateDraft,
) -> Vec<Violation> {
    let violations = field_rules(values);
    if !violations.is_empty() {
        return violations;
    }

    let mut merged = accumulated.clone();
    values.clone().apply(&mut merged);
    cross_field_rules(&merged)
        .into_iter()
        .filter(|violation| step.owns(violation.field))
        .collect()
}

/// Validate a complete draft before it is committed.
pub fn validate_draft(draft: &CandidateDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    require_text(
        &mut violations,
        CandidateField::FirstName,
        draft.first_name.as_deref(),
        "Le prénom est obligatoire.",
    );
    require_text(
        &mut violations,
        CandidateField::LastName,
        draft.last_name.as_deref(),
        "Le nom est obligatoire.",
    );
    check_email(&mut violations, draft.email.as_deref());
    violations.extend(cross_field_rules(draft));
    violations
}

fn field_rules(values: &StepValues) -> Vec<Violation> {
    let mut violations = Vec::new();
    match values {
        StepValues::Identity {
            first_name,
            last_name,
            email,
            ..
        } => {
            require_text(
                &mut violations,
                CandidateField::FirstName,
                Some(first_name.as_str()),
                "Le prénom est obligatoire.",
            );
            require_text(
                &mut violations,
                CandidateField::LastName,
                Some(last_name.as_str()),
                "Le nom est obligatoire.",
            );
            check_email(&mut violations, Some(email.as_str()));
        }
        StepValues::Experience { .. }
        | StepValues::Availability { .. }
        | StepValues::Consent { .. }
        | StepValues::Confirmation => {}
    }
    violations
}

fn cross_field_rules(draft: &CandidateDraft) -> Vec<Violation> {
    let mut violations = Vec::new();

    if draft.has_experience() && is_blank(draft.experience_details.as_deref()) {
        violations.push(Violation::new(
            CandidateField::ExperienceDetails,
            "Veuillez détailler votre expérience professionnelle.",
        ));
    }

    if !draft.is_immediately_available() && draft.availability_date.is_none() {
        violations.push(Violation::new(
            CandidateField::AvailabilityDate,
            "Veuillez indiquer une date de disponibilité.",
        ));
    }

    if !draft.has_consented() {
        violations.push(Violation::new(
            CandidateField::ConsentRgpd,
            "Vous devez accepter le consentement RGPD pour soumettre votre candidature.",
        ));
    }

    violations
}

fn require_text(
    violations: &mut Vec<Violation>,
    field: CandidateField,
    value: Option<&str>,
    message: &str,
) {
    if is_blank(value) {
        violations.push(Violation::new(field, message));
    }
}

fn check_email(violations: &mut Vec<Violation>, value: Option<&str>) {
    match value.map(str::trim) {
        None | Some("") => violations.push(Violation::new(
            CandidateField::Email,
            "L'email est obligatoire.",
        )),
        Some(email) if !is_valid_email(email) => violations.push(Violation::new(
            CandidateField::Email,
            format!("L'adresse email \"{email}\" n'est pas valide."),
        )),
        Some(_) => {}
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

/// Loose address syntax: a non-empty local part, a single `@`, and a dotted domain whose
/// labels are non-empty. Whitespace is rejected anywhere.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
