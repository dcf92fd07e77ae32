use async_trait::async_trait;

use crate::contract::{
    error::DirectoryError,
    model::{DirectoryQuery, PageView, Role, UserProfile},
};
use crate::domain::mutation::MutationState;

/// Public API of the admin user directory
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Re-fetch the full profile list from the backend.
    async fn refresh(&self) -> Result<usize, DirectoryError>;

    /// Filtered, paged view over the last fetched list.
    fn view(
        &self,
        query: &DirectoryQuery,
        page: usize,
        page_size: usize,
    ) -> PageView<UserProfile>;

    /// Profiles awaiting approval.
    fn pending_approvals(&self) -> Vec<UserProfile>;

    /// Change a user's role; the local list follows on success.
    async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError>;

    /// Approve or revoke a user; the local list follows on success.
    async fn set_approval(&self, id: &str, approved: bool) -> Result<UserProfile, DirectoryError>;

    /// Deactivate a user; removed from the local list on success.
    async fn deactivate(&self, id: &str) -> Result<(), DirectoryError>;

    /// State of the latest mutation issued for a user.
    fn mutation_status(&self, id: &str) -> Option<MutationState>;
}
