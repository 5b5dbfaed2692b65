use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the repository when a candidature is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<u64>().map(CandidateId)
    }
}

/// Lifecycle of a candidature. Only `Draft -> Submitted` is a legal transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    Draft,
    Submitted,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Draft => "draft",
            CandidateStatus::Submitted => "submitted",
        }
    }

    pub fn submit(self) -> Result<Self, StatusTransitionError> {
        match self {
            CandidateStatus::Draft => Ok(CandidateStatus::Submitted),
            CandidateStatus::Submitted => Err(StatusTransitionError::AlreadySubmitted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusTransitionError {
    #[error("candidature has already been submitted")]
    AlreadySubmitted,
}

/// Form fields collected by the wizard, keyed the way the HTML form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateField {
    #[serde(rename = "firstName")]
    FirstName,
    #[serde(rename = "lastName")]
    LastName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "hasExperience")]
    HasExperience,
    #[serde(rename = "experienceDetails")]
    ExperienceDetails,
    #[serde(rename = "availabilityDate")]
    AvailabilityDate,
    #[serde(rename = "isImmediatelyAvailable")]
    IsImmediatelyAvailable,
    #[serde(rename = "consentRGPD")]
    ConsentRgpd,
}

impl CandidateField {
    pub const fn key(self) -> &'static str {
        match self {
            CandidateField::FirstName => "firstName",
            CandidateField::LastName => "lastName",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::HasExperience => "hasExperience",
            CandidateField::ExperienceDetails => "experienceDetails",
            CandidateField::AvailabilityDate => "availabilityDate",
            CandidateField::IsImmediatelyAvailable => "isImmediatelyAvailable",
            CandidateField::ConsentRgpd => "consentRGPD",
        }
    }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Partial candidature accumulated across wizard steps.
///
/// Every field stays `None` until the step that owns it has been submitted successfully, so
/// the skip predicate and cross-field rules can tell "unset" apart from "answered no".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub has_experience: Option<bool>,
    pub experience_details: Option<String>,
    pub availability_date: Option<NaiveDate>,
    pub is_immediately_available: Option<bool>,
    #[serde(rename = "consentRGPD")]
    pub consent_rgpd: Option<bool>,
    #[serde(default)]
    pub status: CandidateStatus,
}

impl CandidateDraft {
    pub fn has_experience(&self) -> bool {
        self.has_experience.unwrap_or(false)
    }

    pub fn is_immediately_available(&self) -> bool {
        self.is_immediately_available.unwrap_or(false)
    }

    pub fn has_consented(&self) -> bool {
        self.consent_rgpd.unwrap_or(false)
    }

    /// Promote a fully validated draft to a record ready for insertion.
    pub fn into_submission(self) -> Result<NewCandidate, DraftError> {
        let status = self.status.submit()?;
        let first_name = self
            .first_name
            .ok_or(DraftError::MissingField(CandidateField::FirstName))?;
        let last_name = self
            .last_name
            .ok_or(DraftError::MissingField(CandidateField::LastName))?;
        let email = self
            .email
            .ok_or(DraftError::MissingField(CandidateField::Email))?;
        let has_experience = self.has_experience.unwrap_or(false);
        let consent_rgpd = self
            .consent_rgpd
            .ok_or(DraftError::MissingField(CandidateField::ConsentRgpd))?;

        Ok(NewCandidate {
            first_name,
            last_name,
            email,
            phone: self.phone,
            has_experience,
            experience_details: if has_experience {
                self.experience_details
            } else {
                None
            },
            availability_date: self.availability_date,
            is_immediately_available: self.is_immediately_available.unwrap_or(false),
            consent_rgpd,
            status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("draft is missing required field {0}")]
    MissingField(CandidateField),
    #[error(transparent)]
    Status(#[from] StatusTransitionError),
}

impl DraftError {
    /// Field a form should highlight for this error. A status error can only come from a
    /// replayed final step, so it is reported on the consent checkbox that submits the form.
    pub fn field(&self) -> CandidateField {
        match self {
            DraftError::MissingField(field) => *field,
            DraftError::Status(_) => CandidateField::ConsentRgpd,
        }
    }
}

/// Submitted candidature that has not been persisted yet; it carries no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub has_experience: bool,
    pub experience_details: Option<String>,
    pub availability_date: Option<NaiveDate>,
    pub is_immediately_available: bool,
    #[serde(rename = "consentRGPD")]
    pub consent_rgpd: bool,
    pub status: CandidateStatus,
}

/// Stored candidature row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub has_experience: bool,
    pub experience_details: Option<String>,
    pub availability_date: Option<NaiveDate>,
    pub is_immediately_available: bool,
    #[serde(rename = "consentRGPD")]
    pub consent_rgpd: bool,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Materialize the row written on first persist.
    pub fn persisted(id: CandidateId, candidate: NewCandidate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            phone: candidate.phone,
            has_experience: candidate.has_experience,
            experience_details: candidate.experience_details,
            availability_date: candidate.availability_date,
            is_immediately_available: candidate.is_immediately_available,
            consent_rgpd: candidate.consent_rgpd,
            status: candidate.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a write; `updated_at` never moves backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
