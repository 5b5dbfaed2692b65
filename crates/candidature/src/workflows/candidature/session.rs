use std::fmt;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::flow::WizardState;

pub const DEFAULT_COOKIE_NAME: &str = "candidature_session";

/// Opaque identifier of a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept only identifiers this service could have issued.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .map(|uuid| Self(uuid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for wizard state, keyed by session.
pub trait SessionStore: Send + Sync {
    fn load(&self, session: &SessionId) -> Result<Option<WizardState>, SessionError>;

    /// Store `state`, bumping its revision past the one currently stored. Returns the state
    /// as saved.
    fn save(&self, session: &SessionId, state: WizardState) -> Result<WizardState, SessionError>;

    /// Remove and return the stored state, provided its revision is still `revision`.
    fn claim(&self, session: &SessionId, revision: u64) -> Result<WizardState, SessionError>;

    fn clear(&self, session: &SessionId) -> Result<(), SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no wizard state stored for this session")]
    Missing,
    #[error("wizard state changed concurrently (expected revision {expected}, found {found})")]
    Stale { expected: u64, found: u64 },
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Cookie carrying the session identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

/// Session resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub id: SessionId,
    /// True when the request carried no usable cookie and a new identifier was minted.
    pub issued: bool,
}

impl SessionCookie {
    pub fn resolve(&self, headers: &HeaderMap) -> ResolvedSession {
        match self.read(headers) {
            Some(id) => ResolvedSession { id, issued: false },
            None => ResolvedSession {
                id: SessionId::generate(),
                issued: true,
            },
        }
    }

    pub fn read(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| SessionId::parse(value))
    }

    pub fn header_value(&self, session: &SessionId) -> Option<HeaderValue> {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, session);
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }

    /// Attach `Set-Cookie` when the session was minted for this request.
    pub fn attach(&self, session: &ResolvedSession, mut response: Response) -> Response {
        if !session.issued {
            return response;
        }
        match self.header_value(&session.id) {
            Some(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            None => {
                tracing::warn!(cookie = %self.name, "session cookie is not a valid header value")
            }
        }
        response
    }
}
