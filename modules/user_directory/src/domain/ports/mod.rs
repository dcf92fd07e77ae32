use async_trait::async_trait;

use crate::contract::error::DirectoryError;
use crate::contract::model::{Role, UserProfile};

/// Port for the hosted backend that owns user profiles.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    /// Fetch the complete profile list.
    async fn fetch_profiles(&self) -> Result<Vec<UserProfile>, DirectoryError>;
    /// Change a user's role; returns the stored profile.
    async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError>;
    /// Approve or revoke a user; returns the stored profile.
    async fn set_approval(&self, id: &str, approved: bool) -> Result<UserProfile, DirectoryError>;
    /// Deactivate a user account.
    async fn deactivate(&self, id: &str) -> Result<(), DirectoryError>;
}
