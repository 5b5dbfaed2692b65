use std::collections::BTreeSet;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Regular account holding only `ROLE_USER`.
    pub fn member(id: UserId) -> Self {
        Self {
            id,
            roles: BTreeSet::from([Role::User]),
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self {
            id,
            roles: BTreeSet::from([Role::User, Role::Admin]),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub author: UserId,
}

/// Whoever issued the request; anonymous callers carry no user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal::Authenticated(user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskAction {
    Edit,
    View,
    Delete,
}

impl TaskAction {
    /// Parse a voter attribute; unknown attributes are not handled by this voter.
    pub fn supports(attribute: &str) -> Option<Self> {
        match attribute {
            "EDIT" => Some(TaskAction::Edit),
            "VIEW" => Some(TaskAction::View),
            "DELETE" => Some(TaskAction::Delete),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskAction::Edit => "EDIT",
            TaskAction::View => "VIEW",
            TaskAction::Delete => "DELETE",
        }
    }
}

/// Answer for a raw attribute, following the voter protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Granted,
    Denied,
    Abstain,
}

/// Refusal raised by [`TaskVoter::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access denied")]
pub struct AuthorizationDenied;

impl IntoResponse for AuthorizationDenied {
    fn into_response(self) -> Response {
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Decides which principals may act on a task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskVoter;

impl TaskVoter {
    pub fn new() -> Self {
        Self
    }

    pub fn vote(&self, action: TaskAction, task: &Task, principal: &Principal) -> bool {
        let Some(user) = principal.user() else {
            return false;
        };

        match action {
            // Deleting tasks is disabled, administrators included.
            TaskAction::Delete => false,
            TaskAction::Edit | TaskAction::View => {
                user.has_role(Role::Admin) || user.id == task.author
            }
        }
    }

    /// Vote on a raw attribute string, abstaining on anything this voter does not handle.
    pub fn vote_on_attribute(&self, attribute: &str, task: &Task, principal: &Principal) -> Vote {
        match TaskAction::supports(attribute) {
            None => Vote::Abstain,
            Some(action) if self.vote(action, task, principal) => Vote::Granted,
            Some(_) => Vote::Denied,
        }
    }

    pub fn authorize(
        &self,
        action: TaskAction,
        task: &Task,
        principal: &Principal,
    ) -> Result<(), AuthorizationDenied> {
        if self.vote(action, task, principal) {
            Ok(())
        } else {
            tracing::debug!(
                action = action.as_str(),
                task_id = task.id,
                user_id = principal.user().map(|user| user.id.0),
                "task access denied"
            );
            Err(AuthorizationDenied)
        }
    }
}
