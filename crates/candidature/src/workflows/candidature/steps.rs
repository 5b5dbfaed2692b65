use serde::{Deserialize, Serialize};

use super::domain::CandidateField;

/// Number of steps in the wizard, confirmation included.
pub const STEP_COUNT: u8 = 5;

/// A wizard step, guaranteed to lie in `1..=STEP_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const CONFIRMATION: Step = Step(STEP_COUNT);

    pub const fn new(number: u8) -> Option<Step> {
        if number >= 1 && number <= STEP_COUNT {
            Some(Step(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn is_confirmation(self) -> bool {
        self.0 == STEP_COUNT
    }

    /// Steps in declaration order.
    pub fn all() -> impl Iterator<Item = Step> {
        (1..=STEP_COUNT).map(Step)
    }

    /// Steps strictly after this one.
    pub fn following(self) -> impl Iterator<Item = Step> {
        (self.0 + 1..=STEP_COUNT).map(Step)
    }

    /// Steps strictly before this one, nearest first.
    pub fn preceding(self) -> impl Iterator<Item = Step> {
        (1..self.0).rev().map(Step)
    }

    pub fn spec(self) -> &'static StepSpec {
        &STEPS[usize::from(self.0 - 1)]
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        self.spec().fields
    }

    pub fn owns(self, field: CandidateField) -> bool {
        self.fields().iter().any(|spec| spec.field == field)
    }
}

impl TryFrom<u8> for Step {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::new(value).ok_or(InvalidStep(value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("step {0} is outside the wizard")]
pub struct InvalidStep(pub u8);

/// Widget used to render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Textarea,
    Date,
    Checkbox,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Textarea => "textarea",
            InputKind::Date => "date",
            InputKind::Checkbox => "checkbox",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: CandidateField,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSpec {
    pub step: u8,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn field(
    field: CandidateField,
    label: &'static str,
    kind: InputKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        field,
        label,
        kind,
        required,
    }
}

/// Step table rendered by the wizard. Step 5 only confirms and carries no inputs.
pub static STEPS: [StepSpec; STEP_COUNT as usize] = [
    StepSpec {
        step: 1,
        label: "Informations personnelles",
        fields: &[
            field(CandidateField::FirstName, "Prénom", InputKind::Text, true),
            field(CandidateField::LastName, "Nom", InputKind::Text, true),
            field(CandidateField::Email, "Email", InputKind::Email, true),
            field(CandidateField::Phone, "Téléphone", InputKind::Text, false),
            field(
                CandidateField::HasExperience,
                "Avez-vous de l'expérience ?",
                InputKind::Checkbox,
                false,
            ),
        ],
    },
    StepSpec {
        step: 2,
        label: "Expérience",
        fields: &[field(
            CandidateField::ExperienceDetails,
            "Détails de l'expérience",
            InputKind::Textarea,
            true,
        )],
    },
    StepSpec {
        step: 3,
        label: "Disponibilité",
        fields: &[
            field(
                CandidateField::AvailabilityDate,
                "Date de disponibilité",
                InputKind::Date,
                false,
            ),
            field(
                CandidateField::IsImmediatelyAvailable,
                "Disponible immédiatement",
                InputKind::Checkbox,
                false,
            ),
        ],
    },
    StepSpec {
        step: 4,
        label: "Consentement",
        fields: &[field(
            CandidateField::ConsentRgpd,
            "J'accepte les conditions RGPD",
            InputKind::Checkbox,
            true,
        )],
    },
    StepSpec {
        step: 5,
        label: "Confirmation",
        fields: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_are_bounded() {
        assert!(Step::new(0).is_none());
        assert!(Step::new(6).is_none());
        assert_eq!(Step::try_from(3u8).map(Step::number), Ok(3));
        assert_eq!(Step::try_from(9u8), Err(InvalidStep(9)));
    }

    #[test]
    fn table_matches_step_numbers() {
        for step in Step::all() {
            assert_eq!(step.spec().step, step.number());
        }
        assert!(Step::CONFIRMATION.fields().is_empty());
    }

    #[test]
    fn identity_step_lists_fields_in_order() {
        let keys: Vec<_> = Step::FIRST
            .fields()
            .iter()
            .map(|spec| spec.field.key())
            .collect();
        assert_eq!(
            keys,
            vec!["firstName", "lastName", "email", "phone", "hasExperience"]
        );
        assert_eq!(Step::FIRST.fields()[2].kind, InputKind::Email);
    }

    #[test]
    fn every_field_belongs_to_exactly_one_step() {
        let mut seen = Vec::new();
        for step in Step::all() {
            for spec in step.fields() {
                assert!(!seen.contains(&spec.field), "{} listed twice", spec.field);
                seen.push(spec.field);
            }
        }
        assert_eq!(seen.len(), 9);
        let availability = Step::new(3).expect("step 3");
        assert!(availability.owns(CandidateField::AvailabilityDate));
        assert!(availability.owns(CandidateField::IsImmediatelyAvailable));
        assert!(!availability.owns(CandidateField::ConsentRgpd));
    }

    #[test]
    fn neighbours_iterate_in_expected_direction() {
        let third = Step::new(3).expect("step 3");
        let after: Vec<_> = third.following().map(Step::number).collect();
        let before: Vec<_> = third.preceding().map(Step::number).collect();
        assert_eq!(after, vec![4, 5]);
        assert_eq!(before, vec![2, 1]);
    }
}
