use crate::contract::error::{DirectoryError, ErrorKind};
use crate::contract::model::Role;

/// What an admin asked the backend to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    UpdateRole(Role),
    SetApproval(bool),
    Deactivate,
}

/// Lifecycle of one mutation: `Pending` until the backend answers, then
/// `Succeeded` or `Failed`. A new mutation may start only from a settled state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Pending,
    Succeeded,
    Failed { kind: ErrorKind, message: String },
}

impl MutationStatus {
    pub fn failed(err: &DirectoryError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Latest mutation tracked for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationState {
    pub op: MutationOp,
    pub status: MutationStatus,
}
