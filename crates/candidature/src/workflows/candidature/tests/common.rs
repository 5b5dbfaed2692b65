use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::candidature::domain::{Candidate, CandidateId, NewCandidate};
use crate::workflows::candidature::flow::WizardState;
use crate::workflows::candidature::form::{StepSubmission, Transition};
use crate::workflows::candidature::repository::{CandidateRepository, RepositoryError};
use crate::workflows::candidature::session::{
    SessionCookie, SessionError, SessionId, SessionStore,
};
use crate::workflows::candidature::{candidature_router, CandidatureService};

pub(super) fn identity_step(has_experience: bool) -> StepSubmission {
    StepSubmission {
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        email: Some("test.user@example.com".to_string()),
        phone: Some("0123456789".to_string()),
        has_experience: has_experience.then(|| "1".to_string()),
        ..StepSubmission::default()
    }
}

pub(super) fn experience_step() -> StepSubmission {
    StepSubmission {
        experience_details: Some("2 years as a developer.".to_string()),
        ..StepSubmission::default()
    }
}

pub(super) fn availability_step(immediately: bool, date: Option<&str>) -> StepSubmission {
    StepSubmission {
        is_immediately_available: immediately.then(|| "1".to_string()),
        availability_date: date.map(str::to_string),
        ..StepSubmission::default()
    }
}

pub(super) fn consent_step(consent: bool) -> StepSubmission {
    StepSubmission {
        consent_rgpd: consent.then(|| "1".to_string()),
        ..StepSubmission::default()
    }
}

pub(super) fn transition(transition: Transition) -> StepSubmission {
    StepSubmission {
        transition: Some(transition),
        ..StepSubmission::default()
    }
}

pub(super) fn session() -> SessionId {
    SessionId::generate()
}

pub(super) fn build_service() -> (
    CandidatureService<MemoryRepository, MemorySessions>,
    Arc<MemoryRepository>,
    Arc<MemorySessions>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let sessions = Arc::new(MemorySessions::default());
    let service = CandidatureService::new(repository.clone(), sessions.clone());
    (service, repository, sessions)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    sequence: AtomicU64,
    records: Mutex<HashMap<CandidateId, Candidate>>,
}

impl MemoryRepository {
    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl CandidateRepository for MemoryRepository {
    fn insert(
        &self,
        candidate: NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, RepositoryError> {
        let id = CandidateId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = Candidate::persisted(id, candidate, now);
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

/// Repository that fails inserts until `recover` is called.
#[derive(Default)]
pub(super) struct FlakyRepository {
    recovered: AtomicBool,
    inner: MemoryRepository,
}

impl FlakyRepository {
    pub(super) fn recover(&self) {
        self.recovered.store(true, Ordering::Release);
    }

    pub(super) fn count(&self) -> usize {
        self.inner.count()
    }
}

impl CandidateRepository for FlakyRepository {
    fn insert(
        &self,
        candidate: NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, RepositoryError> {
        if self.recovered.load(Ordering::Acquire) {
            self.inner.insert(candidate, now)
        } else {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }

    fn fetch(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.fetch(id)
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    states: Mutex<HashMap<SessionId, WizardState>>,
}

impl MemorySessions {
    pub(super) fn get(&self, session: &SessionId) -> Option<WizardState> {
        self.states
            .lock()
            .expect("session mutex poisoned")
            .get(session)
            .cloned()
    }
}

impl SessionStore for MemorySessions {
    fn load(&self, session: &SessionId) -> Result<Option<WizardState>, SessionError> {
        Ok(self.get(session))
    }

    fn save(
        &self,
        session: &SessionId,
        mut state: WizardState,
    ) -> Result<WizardState, SessionError> {
        let mut guard = self.states.lock().expect("session mutex poisoned");
        let current = guard.get(session).map_or(0, |stored| stored.revision);
        state.revision = current.max(state.revision) + 1;
        guard.insert(session.clone(), state.clone());
        Ok(state)
    }

    fn claim(&self, session: &SessionId, revision: u64) -> Result<WizardState, SessionError> {
        let mut guard = self.states.lock().expect("session mutex poisoned");
        let found = guard
            .get(session)
            .map(|stored| stored.revision)
            .ok_or(SessionError::Missing)?;
        if found != revision {
            return Err(SessionError::Stale {
                expected: revision,
                found,
            });
        }
        guard.remove(session).ok_or(SessionError::Missing)
    }

    fn clear(&self, session: &SessionId) -> Result<(), SessionError> {
        self.states
            .lock()
            .expect("session mutex poisoned")
            .remove(session);
        Ok(())
    }
}

pub(super) fn router_with_service(
    service: CandidatureService<MemoryRepository, MemorySessions>,
) -> axum::Router {
    candidature_router(Arc::new(service), SessionCookie::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
