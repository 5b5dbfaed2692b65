//! Multi-step candidature wizard.
//!
//! A candidate fills five steps (identity, experience, availability, consent, confirmation).
//! Step data accumulates in a per-session [`WizardState`]; the experience step is skipped for
//! candidates without experience, and only the final step writes a [`Candidate`] through the
//! [`CandidateRepository`].

pub mod domain;
pub mod flow;
pub mod form;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod skip;
pub mod steps;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateDraft, CandidateField, CandidateId, CandidateStatus, NewCandidate,
};
pub use flow::{FlowOutcome, ProgressState, StepProgress, WizardState};
pub use form::{StepSubmission, Transition};
pub use repository::{CandidateRepository, RepositoryError};
pub use router::{candidature_router, success_path, APPLY_PATH};
pub use service::{CandidatureService, CandidatureServiceError, StepOutcome};
pub use session::{SessionCookie, SessionError, SessionId, SessionStore};
pub use skip::should_skip;
pub use steps::{FieldSpec, InputKind, Step, StepSpec, STEPS, STEP_COUNT};
pub use validation::Violation;
pub use views::{ConfirmationView, StepView};
