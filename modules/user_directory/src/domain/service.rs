use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::error::DirectoryError;
use crate::contract::model::{DirectoryQuery, PageView, Role, UserProfile};
use crate::domain::filter::filter_profiles;
use crate::domain::mutation::{MutationOp, MutationState, MutationStatus};
use crate::domain::pagination::paginate;
use crate::domain::ports::ProfileBackend;

/// Configuration for the directory service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Local view of the user directory.
///
/// Holds the last fetched profile list and reconciles admin mutations into
/// it once the backend confirms them. Locks are never held across `.await`.
pub struct UserDirectory {
    backend: Arc<dyn ProfileBackend>,
    profiles: Mutex<Vec<UserProfile>>,
    mutations: Mutex<HashMap<String, MutationState>>,
    config: ServiceConfig,
}

impl UserDirectory {
    pub fn new(backend: Arc<dyn ProfileBackend>, config: ServiceConfig) -> Self {
        Self {
            backend,
            profiles: Mutex::new(Vec::new()),
            mutations: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Replace local state with the backend's full list. On failure the
    /// previous list stays in place.
    #[instrument(name = "user_directory.service.refresh", skip(self))]
    pub async fn refresh(&self) -> Result<usize, DirectoryError> {
        let fetched = self.backend.fetch_profiles().await.map_err(|e| {
            warn!(kind = ?e.kind(), "Profile fetch failed: {}", e);
            e
        })?;
        let count = fetched.len();
        *self.profiles.lock() = fetched;
        info!(count, "Directory refreshed");
        Ok(count)
    }

    /// Seed local state from a list fetched elsewhere.
    pub fn replace_profiles(&self, profiles: Vec<UserProfile>) {
        *self.profiles.lock() = profiles;
    }

    pub fn profiles(&self) -> Vec<UserProfile> {
        self.profiles.lock().clone()
    }

    pub fn filtered(&self, query: &DirectoryQuery) -> Vec<UserProfile> {
        filter_profiles(&self.profiles.lock(), query)
    }

    /// Filter, then page. `page_size` 0 means the configured default; larger
    /// values are capped at the configured maximum.
    #[instrument(name = "user_directory.service.view", skip(self))]
    pub fn view(
        &self,
        query: &DirectoryQuery,
        page: usize,
        page_size: usize,
    ) -> PageView<UserProfile> {
        let page_size = if page_size == 0 {
            self.config.default_page_size
        } else {
            page_size.min(self.config.max_page_size)
        };
        let view = paginate(self.filtered(query), page, page_size);
        debug!(
            total = view.total_items,
            page = view.page,
            "Built directory view"
        );
        view
    }

    /// Profiles waiting for an admin to approve them.
    pub fn pending_approvals(&self) -> Vec<UserProfile> {
        self.profiles
            .lock()
            .iter()
            .filter(|p| !p.is_approved)
            .cloned()
            .collect()
    }

    pub fn mutation_status(&self, id: &str) -> Option<MutationState> {
        self.mutations.lock().get(id).cloned()
    }

    #[instrument(name = "user_directory.service.update_role", skip(self), fields(user_id = %id))]
    pub async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError> {
        self.begin(id, MutationOp::UpdateRole(role))?;
        let result = self.backend.update_role(id, role).await;
        self.settle_with_replacement(id, result)
    }

    #[instrument(name = "user_directory.service.set_approval", skip(self), fields(user_id = %id))]
    pub async fn set_approval(
        &self,
        id: &str,
        approved: bool,
    ) -> Result<UserProfile, DirectoryError> {
        self.begin(id, MutationOp::SetApproval(approved))?;
        let result = self.backend.set_approval(id, approved).await;
        self.settle_with_replacement(id, result)
    }

    #[instrument(name = "user_directory.service.deactivate", skip(self), fields(user_id = %id))]
    pub async fn deactivate(&self, id: &str) -> Result<(), DirectoryError> {
        self.begin(id, MutationOp::Deactivate)?;
        match self.backend.deactivate(id).await {
            Ok(()) => {
                self.profiles.lock().retain(|p| p.id != id);
                self.mark(id, MutationStatus::Succeeded);
                info!("User deactivated");
                Ok(())
            }
            Err(e) => Err(self.fail(id, e)),
        }
    }

    // --- state machine helpers ---

    /// Unknown ids and in-flight mutations are rejected before any backend call.
    fn begin(&self, id: &str, op: MutationOp) -> Result<(), DirectoryError> {
        if !self.profiles.lock().iter().any(|p| p.id == id) {
            return Err(DirectoryError::user_not_found(id));
        }

        let mut mutations = self.mutations.lock();
        if let Some(state) = mutations.get(id) {
            if !state.status.is_settled() {
                return Err(DirectoryError::mutation_pending(id));
            }
        }
        debug!(?op, "Mutation pending");
        mutations.insert(
            id.to_string(),
            MutationState {
                op,
                status: MutationStatus::Pending,
            },
        );
        Ok(())
    }

    fn settle_with_replacement(
        &self,
        id: &str,
        result: Result<UserProfile, DirectoryError>,
    ) -> Result<UserProfile, DirectoryError> {
        match result {
            Ok(updated) => {
                {
                    let mut profiles = self.profiles.lock();
                    if let Some(slot) = profiles.iter_mut().find(|p| p.id == id) {
                        *slot = updated.clone();
                    }
                }
                self.mark(id, MutationStatus::Succeeded);
                info!("User profile updated");
                Ok(updated)
            }
            Err(e) => Err(self.fail(id, e)),
        }
    }

    fn fail(&self, id: &str, err: DirectoryError) -> DirectoryError {
        warn!(kind = ?err.kind(), "Mutation failed: {}", err);
        self.mark(id, MutationStatus::failed(&err));
        err
    }

    fn mark(&self, id: &str, status: MutationStatus) {
        if let Some(state) = self.mutations.lock().get_mut(id) {
            state.status = status;
        }
    }
}
