//! Access policy for task resources.
//!
//! Independent of the candidature wizard: the voter answers whether a principal may
//! edit, view, or delete a task, and `AuthorizationDenied` turns a refusal into a 403.

mod voter;

pub use voter::{
    AuthorizationDenied, Principal, Role, Task, TaskAction, TaskVoter, User, UserId, Vote,
};
