use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use super::domain::{Candidate, CandidateField, CandidateId};
use super::flow::{StepProgress, WizardState};
use super::form::draft_values;
use super::steps::{FieldSpec, Step, STEP_COUNT};
use super::validation::Violation;

const NEXT_LABEL: &str = "Suivant";
const SUBMIT_LABEL: &str = "CONFIRMER LA MISSION";

/// Everything a client needs to render the form for the current step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub step: Step,
    pub step_count: u8,
    pub title: String,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub values: BTreeMap<CandidateField, Value>,
    pub progress: Vec<StepProgress>,
    pub can_go_back: bool,
    pub submit_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

impl StepView {
    pub fn for_state(state: &WizardState) -> Self {
        let step = state.current_step;
        let is_last_input = step.following().all(|next| next.is_confirmation());
        Self {
            step,
            step_count: STEP_COUNT,
            title: format!("Postuler - Étape {} sur {}", step.number(), STEP_COUNT),
            label: step.label(),
            fields: step.fields(),
            values: draft_values(step, &state.draft),
            progress: state.progress(),
            can_go_back: step != Step::FIRST,
            submit_label: if is_last_input { SUBMIT_LABEL } else { NEXT_LABEL },
            errors: Vec::new(),
        }
    }

    /// Re-render after a rejected submission, echoing the posted values.
    pub fn rejected(
        state: &WizardState,
        values: BTreeMap<CandidateField, Value>,
        errors: Vec<Violation>,
    ) -> Self {
        let mut view = Self::for_state(state);
        view.values.extend(values);
        view.errors = errors;
        view
    }

    pub fn errors_for(&self, field: CandidateField) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(move |violation| violation.field == field)
            .map(|violation| violation.message.as_str())
    }
}

/// Read-only summary shown once a candidature has been submitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    pub id: CandidateId,
    pub title: &'static str,
    pub status: &'static str,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub has_experience: bool,
    pub experience_details: Option<String>,
    pub is_immediately_available: bool,
    pub availability_date: Option<NaiveDate>,
    #[serde(rename = "consentRGPD")]
    pub consent_rgpd: bool,
    pub submitted_at: DateTime<Utc>,
    pub summary: Vec<String>,
}

impl From<&Candidate> for ConfirmationView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id,
            title: "Candidature envoyée avec succès !",
            status: candidate.status.label(),
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            has_experience: candidate.has_experience,
            experience_details: candidate.experience_details.clone(),
            is_immediately_available: candidate.is_immediately_available,
            availability_date: candidate.availability_date,
            consent_rgpd: candidate.consent_rgpd,
            submitted_at: candidate.created_at,
            summary: summary_lines(candidate),
        }
    }
}

fn summary_lines(candidate: &Candidate) -> Vec<String> {
    let mut lines = vec![
        format!("Prénom : {}", candidate.first_name),
        format!("Nom : {}", candidate.last_name),
        format!("Email : {}", candidate.email),
        format!(
            "Téléphone : {}",
            candidate.phone.as_deref().unwrap_or("Non renseigné")
        ),
        format!("Expérience : {}", yes_no(candidate.has_experience)),
    ];

    if let Some(details) = &candidate.experience_details {
        lines.push(format!("Détails de l'expérience : {details}"));
    }

    let availability = match (candidate.is_immediately_available, candidate.availability_date) {
        (true, _) => "Immédiate".to_string(),
        (false, Some(date)) => format!("À partir du {}", date.format("%d/%m/%Y")),
        (false, None) => "Non renseignée".to_string(),
    };
    lines.push(format!("Disponibilité : {availability}"));
    lines.push(format!(
        "Consentement RGPD : {}",
        if candidate.consent_rgpd {
            "Accepté"
        } else {
            "Refusé"
        }
    ));
    lines
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Oui"
    } else {
        "Non"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::candidature::domain::CandidateStatus;
    use chrono::TimeZone;

    fn candidate() -> Candidate {
        let now = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Candidate {
            id: CandidateId(3),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test.user@example.com".to_string(),
            phone: Some("0123456789".to_string()),
            has_experience: true,
            experience_details: Some("2 years as a developer.".to_string()),
            availability_date: None,
            is_immediately_available: true,
            consent_rgpd: true,
            status: CandidateStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn confirmation_summary_lists_answers() {
        let view = ConfirmationView::from(&candidate());
        assert_eq!(view.status, "submitted");
        for expected in [
            "Prénom : Test",
            "Nom : User",
            "Email : test.user@example.com",
            "Téléphone : 0123456789",
            "Expérience : Oui",
            "Détails de l'expérience : 2 years as a developer.",
            "Disponibilité : Immédiate",
            "Consentement RGPD : Accepté",
        ] {
            assert!(
                view.summary.iter().any(|line| line == expected),
                "missing line {expected}"
            );
        }
    }

    #[test]
    fn dated_availability_is_formatted() {
        let mut candidate = candidate();
        candidate.is_immediately_available = false;
        candidate.availability_date = NaiveDate::from_ymd_opt(2025, 11, 3);
        let view = ConfirmationView::from(&candidate);
        assert!(view
            .summary
            .contains(&"Disponibilité : À partir du 03/11/2025".to_string()));
    }

    #[test]
    fn first_step_view_has_title_and_next_button() {
        let view = StepView::for_state(&WizardState::start());
        assert_eq!(view.title, "Postuler - Étape 1 sur 5");
        assert_eq!(view.submit_label, "Suivant");
        assert!(!view.can_go_back);
        assert!(view.values.is_empty());
    }

    #[test]
    fn consent_step_uses_submit_label() {
        let state = WizardState {
            current_step: Step::new(4).expect("step 4"),
            ..WizardState::start()
        };
        let view = StepView::for_state(&state);
        assert_eq!(view.submit_label, "CONFIRMER LA MISSION");
        assert!(view.can_go_back);
    }
}
