use candidature::workflows::candidature::{
    Candidate, CandidateId, CandidateRepository, NewCandidate, RepositoryError, SessionError,
    SessionId, SessionStore, WizardState,
};
use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Candidate store with auto-increment identifiers.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    sequence: Arc<AtomicU64>,
    records: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(
        &self,
        candidate: NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, RepositoryError> {
        let id = CandidateId(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        let record = Candidate::persisted(id, candidate, now);
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    states: Arc<Mutex<HashMap<SessionId, WizardState>>>,
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session: &SessionId) -> Result<Option<WizardState>, SessionError> {
        let guard = self.states.lock().expect("session mutex poisoned");
        Ok(guard.get(session).cloned())
    }

    fn save(&self, session: &SessionId, mut state: WizardState) -> Result<WizardState, SessionError> {
        let mut guard = self.states.lock().expect("session mutex poisoned");
        let stored = guard.get(session).map_or(0, |current| current.revision);
        state.revision = stored.max(state.revision) + 1;
        guard.insert(session.clone(), state.clone());
        Ok(state)
    }

    fn claim(&self, session: &SessionId, revision: u64) -> Result<WizardState, SessionError> {
        let mut guard = self.states.lock().expect("session mutex poisoned");
        match guard.get(session) {
            None => Err(SessionError::Missing),
            Some(current) if current.revision != revision => Err(SessionError::Stale {
                expected: revision,
                found: current.revision,
            }),
            Some(_) => guard.remove(session).ok_or(SessionError::Missing),
        }
    }

    fn clear(&self, session: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.states.lock().expect("session mutex poisoned");
        guard.remove(session);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
