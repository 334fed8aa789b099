//! Who may act on which task.
//!
//! `can_act` is the single decision function for every task operation. The
//! storage layer never calls it row by row; it receives a `TaskScope` derived
//! from the same rules and folds it into the query predicate, so a record the
//! caller may not touch is simply never matched.

use crate::auth::Identity;
use crate::models::{Role, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Pure decision over `(identity, operation, record)`.
///
/// Admins may do anything to any record. Users may act only on records they own.
/// Creation is always allowed: the new record's owner is the creator.
pub fn can_act(identity: &Identity, operation: Operation, task: &Task) -> bool {
    match (identity.role, operation) {
        (_, Operation::Create) => true,
        (Role::Admin, Operation::Read | Operation::Update | Operation::Delete) => true,
        (Role::User, Operation::Read | Operation::Update | Operation::Delete) => {
            task.user_id == identity.user_id
        }
    }
}

/// The predicate a storage query applies on behalf of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Every record, regardless of owner.
    All,
    /// Only records owned by this user id.
    OwnedBy(i32),
}

impl TaskScope {
    pub fn for_identity(identity: &Identity) -> Self {
        match identity.role {
            Role::Admin => TaskScope::All,
            Role::User => TaskScope::OwnedBy(identity.user_id),
        }
    }

    /// Owner id to filter on, or `None` when unrestricted.
    pub fn owner_filter(&self) -> Option<i32> {
        match self {
            TaskScope::All => None,
            TaskScope::OwnedBy(user_id) => Some(*user_id),
        }
    }

    /// Whether this scope matches `task`. Used by stores that filter in-process.
    pub fn admits(&self, task: &Task) -> bool {
        match self {
            TaskScope::All => true,
            TaskScope::OwnedBy(user_id) => task.user_id == *user_id,
        }
    }

    /// Cross-owner results get annotated with the owner's name.
    pub fn annotates_owner(&self) -> bool {
        matches!(self, TaskScope::All)
    }
}
