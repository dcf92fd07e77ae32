use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::DirectoryApi,
    error::DirectoryError,
    model::{DirectoryQuery, PageView, Role, UserProfile},
};
use crate::domain::mutation::MutationState;
use crate::domain::service::UserDirectory;

/// Local implementation of `DirectoryApi` that delegates to the domain service
pub struct DirectoryLocalClient {
    service: Arc<UserDirectory>,
}

impl DirectoryLocalClient {
    pub fn new(service: Arc<UserDirectory>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DirectoryApi for DirectoryLocalClient {
    async fn refresh(&self) -> Result<usize, DirectoryError> {
        self.service.refresh().await
    }

    fn view(
        &self,
        query: &DirectoryQuery,
        page: usize,
        page_size: usize,
    ) -> PageView<UserProfile> {
        self.service.view(query, page, page_size)
    }

    fn pending_approvals(&self) -> Vec<UserProfile> {
        self.service.pending_approvals()
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError> {
        self.service.update_role(id, role).await
    }

    async fn set_approval(&self, id: &str, approved: bool) -> Result<UserProfile, DirectoryError> {
        self.service.set_approval(id, approved).await
    }

    async fn deactivate(&self, id: &str) -> Result<(), DirectoryError> {
        self.service.deactivate(id).await
    }

    fn mutation_status(&self, id: &str) -> Option<MutationState> {
        self.service.mutation_status(id)
    }
}
