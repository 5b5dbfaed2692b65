use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateDraft, NewCandidate};
use super::form::{StepSubmission, StepValues};
use super::skip::{next_step, previous_step, should_skip};
use super::steps::Step;
use super::validation::{validate_draft, validate_step, Violation};

/// Wizard progress for one session.
///
/// `revision` is owned by the session store: it is bumped on every save and checked when the
/// final step claims the state, so two racing final submissions cannot both commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: Step,
    pub draft: CandidateDraft,
    #[serde(default)]
    pub revision: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::start()
    }
}

/// Result of submitting the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The submission was rejected; the state is untouched.
    Invalid(Vec<Violation>),
    /// The submission was merged and the wizard moved to the given step.
    Advanced(Step),
    /// The last input step passed; the record is ready to be persisted. The state is left
    /// untouched so a failed commit can be retried from the same step.
    ReadyToCommit(NewCandidate),
}

impl WizardState {
    pub fn start() -> Self {
        Self {
            current_step: Step::FIRST,
            draft: CandidateDraft::default(),
            revision: 0,
        }
    }

    pub fn submit(&mut self, submission: &StepSubmission) -> FlowOutcome {
        let step = self.current_step;
        let values = match StepValues::decode(step, submission) {
            Ok(values) => values,
            Err(violations) => return FlowOutcome::Invalid(violations),
        };

        let violations = validate_step(step, &values, &self.draft);
        if !violations.is_empty() {
            return FlowOutcome::Invalid(violations);
        }

        let mut merged = self.draft.clone();
        values.apply(&mut merged);

        let next = next_step(step, &merged);
        if !next.is_confirmation() {
            self.draft = merged;
            self.current_step = next;
            return FlowOutcome::Advanced(next);
        }

        let violations = validate_draft(&merged);
        if !violations.is_empty() {
            return FlowOutcome::Invalid(violations);
        }

        match merged.into_submission() {
            Ok(candidate) => FlowOutcome::ReadyToCommit(candidate),
            Err(err) => FlowOutcome::Invalid(vec![Violation::new(err.field(), err.to_string())]),
        }
    }

    /// Return to the nearest earlier step that is not skipped. The draft is kept so the
    /// revisited step renders with its previous answers.
    pub fn back(&mut self) -> Step {
        if let Some(previous) = previous_step(self.current_step, &self.draft) {
            self.current_step = previous;
        }
        self.current_step
    }

    /// Position of every step relative to the current one.
    pub fn progress(&self) -> Vec<StepProgress> {
        // Nothing is known to be skipped before the identity step has been answered.
        let skip_known = self.draft.has_experience.is_some();
        Step::all()
            .map(|step| {
                let state = match step.cmp(&self.current_step) {
                    Ordering::Equal => ProgressState::Current,
                    _ if skip_known && should_skip(step, &self.draft) => ProgressState::Skipped,
                    Ordering::Less => ProgressState::Done,
                    Ordering::Greater => ProgressState::Pending,
                };
                StepProgress {
                    step,
                    label: step.label(),
                    state,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    Done,
    Current,
    Pending,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: Step,
    pub label: &'static str,
    pub state: ProgressState,
}
