use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::domain::{Candidate, CandidateId};
use super::flow::{FlowOutcome, WizardState};
use super::form::{StepSubmission, Transition};
use super::repository::{CandidateRepository, RepositoryError};
use super::session::{SessionError, SessionId, SessionStore};
use super::steps::Step;
use super::views::StepView;

/// Service composing the wizard state machine, the session store, and the repository.
pub struct CandidatureService<R, S> {
    repository: Arc<R>,
    sessions: Arc<S>,
}

/// What the caller should do after a step submission.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Advanced(Step),
    SteppedBack(Step),
    Reset,
    Invalid(Box<StepView>),
    Completed(Candidate),
}

impl<R, S> CandidatureService<R, S>
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    pub fn new(repository: Arc<R>, sessions: Arc<S>) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Resolve the step the session is on, initializing the wizard on first visit.
    pub fn current_step(&self, session: &SessionId) -> Result<StepView, CandidatureServiceError> {
        let state = match self.sessions.load(session)? {
            Some(state) => state,
            None => {
                debug!(%session, "starting candidature wizard");
                self.sessions.save(session, WizardState::start())?
            }
        };
        Ok(StepView::for_state(&state))
    }

    /// Handle a posted step, including back/reset transitions.
    pub fn submit(
        &self,
        session: &SessionId,
        submission: StepSubmission,
    ) -> Result<StepOutcome, CandidatureServiceError> {
        match submission.transition() {
            Transition::Reset => {
                self.reset(session)?;
                return Ok(StepOutcome::Reset);
            }
            Transition::Back => {
                let mut state = self.sessions.load(session)?.unwrap_or_default();
                let step = state.back();
                self.sessions.save(session, state)?;
                return Ok(StepOutcome::SteppedBack(step));
            }
            Transition::Next => {}
        }

        let mut state = self.sessions.load(session)?.unwrap_or_default();
        let step = state.current_step;
        let revision = state.revision;

        match state.submit(&submission) {
            FlowOutcome::Invalid(violations) => {
                debug!(
                    %session,
                    step = step.number(),
                    violations = violations.len(),
                    "step rejected"
                );
                let view = StepView::rejected(&state, submission.echo(step), violations);
                Ok(StepOutcome::Invalid(Box::new(view)))
            }
            FlowOutcome::Advanced(next) => {
                self.sessions.save(session, state)?;
                debug!(%session, from = step.number(), to = next.number(), "step accepted");
                Ok(StepOutcome::Advanced(next))
            }
            FlowOutcome::ReadyToCommit(candidate) => {
                let claimed = match self.sessions.claim(session, revision) {
                    Ok(claimed) => claimed,
                    Err(SessionError::Missing | SessionError::Stale { .. }) => {
                        warn!(%session, "final step submitted twice; keeping the first commit");
                        return Err(CandidatureServiceError::DuplicateSubmission);
                    }
                    Err(other) => return Err(other.into()),
                };

                match self.repository.insert(candidate, Utc::now()) {
                    Ok(stored) => {
                        info!(%session, candidate_id = %stored.id, "candidature submitted");
                        Ok(StepOutcome::Completed(stored))
                    }
                    Err(err) => {
                        error!(%session, error = %err, "failed to persist candidature");
                        if let Err(restore) = self.sessions.save(session, claimed) {
                            error!(%session, error = %restore, "failed to restore wizard state");
                        }
                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Abandon the wizard for this session.
    pub fn reset(&self, session: &SessionId) -> Result<(), CandidatureServiceError> {
        self.sessions.clear(session)?;
        info!(%session, "candidature wizard reset");
        Ok(())
    }

    /// Fetch a submitted candidature for the confirmation page.
    pub fn confirmation(&self, id: CandidateId) -> Result<Candidate, CandidatureServiceError> {
        let candidate = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(candidate)
    }
}

/// Error raised by the candidature service.
#[derive(Debug, thiserror::Error)]
pub enum CandidatureServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("candidature was already submitted from this session")]
    DuplicateSubmission,
}
