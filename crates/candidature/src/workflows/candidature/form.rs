use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{CandidateDraft, CandidateField};
use super::steps::Step;
use super::validation::Violation;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Navigation requested alongside a step submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    #[default]
    Next,
    Back,
    Reset,
}

/// Raw values posted by the wizard form. Checkboxes follow HTML semantics: an unticked box
/// is simply absent from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub has_experience: Option<String>,
    pub experience_details: Option<String>,
    pub availability_date: Option<String>,
    pub is_immediately_available: Option<String>,
    #[serde(rename = "consentRGPD")]
    pub consent_rgpd: Option<String>,
    pub transition: Option<Transition>,
}

impl StepSubmission {
    pub fn transition(&self) -> Transition {
        self.transition.unwrap_or_default()
    }

    pub fn raw(&self, field: CandidateField) -> Option<&str> {
        let value = match field {
            CandidateField::FirstName => &self.first_name,
            CandidateField::LastName => &self.last_name,
            CandidateField::Email => &self.email,
            CandidateField::Phone => &self.phone,
            CandidateField::HasExperience => &self.has_experience,
            CandidateField::ExperienceDetails => &self.experience_details,
            CandidateField::AvailabilityDate => &self.availability_date,
            CandidateField::IsImmediatelyAvailable => &self.is_immediately_available,
            CandidateField::ConsentRgpd => &self.consent_rgpd,
        };
        value.as_deref()
    }

    /// Echo back what was posted for `step`, so a rejected form re-renders with the user's
    /// input rather than the last accepted values.
    pub fn echo(&self, step: Step) -> BTreeMap<CandidateField, Value> {
        step.fields()
            .iter()
            .filter_map(|spec| {
                self.raw(spec.field)
                    .map(|raw| (spec.field, Value::String(raw.to_string())))
            })
            .collect()
    }
}

/// Typed values decoded for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValues {
    Identity {
        first_name: String,
        last_name: String,
        email: String,
        phone: Option<String>,
        has_experience: bool,
    },
    Experience {
        experience_details: String,
    },
    Availability {
        availability_date: Option<NaiveDate>,
        is_immediately_available: bool,
    },
    Consent {
        consent_rgpd: bool,
    },
    Confirmation,
}

impl StepValues {
    /// Decode the fields owned by `step`. Only syntactic problems (an unparseable date) are
    /// reported here; emptiness and cross-field rules belong to validation.
    pub fn decode(step: Step, submission: &StepSubmission) -> Result<Self, Vec<Violation>> {
        let values = match step.number() {
            1 => StepValues::Identity {
                first_name: text(submission.first_name.as_deref()),
                last_name: text(submission.last_name.as_deref()),
                email: text(submission.email.as_deref()),
                phone: optional_text(submission.phone.as_deref()),
                has_experience: checkbox(submission.has_experience.as_deref()),
            },
            2 => StepValues::Experience {
                experience_details: text(submission.experience_details.as_deref()),
            },
            3 => StepValues::Availability {
                availability_date: date(submission.availability_date.as_deref())?,
                is_immediately_available: checkbox(
                    submission.is_immediately_available.as_deref(),
                ),
            },
            4 => StepValues::Consent {
                consent_rgpd: checkbox(submission.consent_rgpd.as_deref()),
            },
            _ => StepValues::Confirmation,
        };
        Ok(values)
    }

    /// Merge into the accumulated draft. Answers that make an earlier capture irrelevant
    /// clear it, so the draft never holds experience details for a candidate without
    /// experience, nor a date for someone immediately available.
    pub fn apply(self, draft: &mut CandidateDraft) {
        match self {
            StepValues::Identity {
                first_name,
                last_name,
                email,
                phone,
                has_experience,
            } => {
                draft.first_name = Some(first_name);
                draft.last_name = Some(last_name);
                draft.email = Some(email);
                draft.phone = phone;
                draft.has_experience = Some(has_experience);
                if !has_experience {
                    draft.experience_details = None;
                }
            }
            StepValues::Experience { experience_details } => {
                draft.experience_details = Some(experience_details);
            }
            StepValues::Availability {
                availability_date,
                is_immediately_available,
            } => {
                draft.is_immediately_available = Some(is_immediately_available);
                draft.availability_date = if is_immediately_available {
                    None
                } else {
                    availability_date
                };
            }
            StepValues::Consent { consent_rgpd } => {
                draft.consent_rgpd = Some(consent_rgpd);
            }
            StepValues::Confirmation => {}
        }
    }
}

/// Current draft values for the fields of `step`, as rendered into the form.
pub fn draft_values(step: Step, draft: &CandidateDraft) -> BTreeMap<CandidateField, Value> {
    step.fields()
        .iter()
        .filter_map(|spec| {
            let value = match spec.field {
                CandidateField::FirstName => draft.first_name.clone().map(Value::String),
                CandidateField::LastName => draft.last_name.clone().map(Value::String),
                CandidateField::Email => draft.email.clone().map(Value::String),
                CandidateField::Phone => draft.phone.clone().map(Value::String),
                CandidateField::HasExperience => draft.has_experience.map(Value::Bool),
                CandidateField::ExperienceDetails => {
                    draft.experience_details.clone().map(Value::String)
                }
                CandidateField::AvailabilityDate => draft
                    .availability_date
                    .map(|date| Value::String(date.format(DATE_FORMAT).to_string())),
                CandidateField::IsImmediatelyAvailable => {
                    draft.is_immediately_available.map(Value::Bool)
                }
                CandidateField::ConsentRgpd => draft.consent_rgpd.map(Value::Bool),
            };
            value.map(|value| (spec.field, value))
        })
        .collect()
}

fn text(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn checkbox(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "on" | "true" | "yes"
        ),
        None => false,
    }
}

fn date(raw: Option<&str>) -> Result<Option<NaiveDate>, Vec<Violation>> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            vec![Violation::new(
                CandidateField::AvailabilityDate,
                "La date de disponibilité n'est pas valide.",
            )]
        })
}
