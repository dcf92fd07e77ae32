use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use user_directory::contract::error::{DirectoryError, ErrorKind};
use user_directory::contract::model::{DirectoryQuery, Role, UserProfile};
use user_directory::domain::mutation::{MutationOp, MutationStatus};
use user_directory::domain::ports::ProfileBackend;
use user_directory::domain::service::{ServiceConfig, UserDirectory};
use user_directory::local_client;

// In-memory backend; `fail_with` makes every call return that error.
#[derive(Default)]
struct MockBackend {
    profiles: Mutex<Vec<UserProfile>>,
    fail_with: Mutex<Option<DirectoryError>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            ..Self::default()
        }
    }

    fn gated(profiles: Vec<UserProfile>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::with_profiles(profiles)
        }
    }

    fn fail(&self, err: DirectoryError) {
        *self.fail_with.lock() = Some(err);
    }

    async fn enter(&self, call: String) -> Result<(), DirectoryError> {
        self.calls.lock().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.fail_with.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn stored(&self, id: &str) -> Result<UserProfile, DirectoryError> {
        self.profiles
            .lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::validation(format!("no profile {id}")))
    }
}

#[async_trait]
impl ProfileBackend for MockBackend {
    async fn fetch_profiles(&self) -> Result<Vec<UserProfile>, DirectoryError> {
        self.enter("fetch".into()).await?;
        Ok(self.profiles.lock().clone())
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError> {
        self.enter(format!("role:{id}:{role}")).await?;
        if let Some(p) = self.profiles.lock().iter_mut().find(|p| p.id == id) {
            p.role = role.to_string();
        }
        self.stored(id)
    }

    async fn set_approval(&self, id: &str, approved: bool) -> Result<UserProfile, DirectoryError> {
        self.enter(format!("approval:{id}:{approved}")).await?;
        if let Some(p) = self.profiles.lock().iter_mut().find(|p| p.id == id) {
            p.is_approved = approved;
        }
        self.stored(id)
    }

    async fn deactivate(&self, id: &str) -> Result<(), DirectoryError> {
        self.enter(format!("deactivate:{id}")).await?;
        self.profiles.lock().retain(|p| p.id != id);
        Ok(())
    }
}

fn roster() -> Vec<UserProfile> {
    vec![
        UserProfile::new("1", Role::Trainer)
            .with_display_name("Jess")
            .with_email("j@x.com"),
        UserProfile::new("2", Role::Client)
            .with_display_name("Sam")
            .with_email("s@x.com"),
        UserProfile::new("3", Role::Nutritionist)
            .with_display_name("Nina")
            .with_email("n@x.com")
            .with_approved(false),
    ]
}

async fn loaded(backend: Arc<MockBackend>) -> UserDirectory {
    let dir = UserDirectory::new(backend, ServiceConfig::default());
    dir.refresh().await.unwrap();
    dir
}

#[tokio::test]
async fn refresh_replaces_local_list() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let dir = UserDirectory::new(backend.clone(), ServiceConfig::default());
    assert!(dir.profiles().is_empty());

    assert_eq!(dir.refresh().await.unwrap(), 3);
    assert_eq!(dir.profiles(), roster());
}

#[tokio::test]
async fn failed_refresh_keeps_last_known_list() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let dir = loaded(backend.clone()).await;

    backend.fail(DirectoryError::network("offline"));
    let err = dir.refresh().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(dir.profiles(), roster());
}

#[tokio::test]
async fn view_filters_then_pages() {
    let dir = loaded(Arc::new(MockBackend::with_profiles(roster()))).await;

    let view = dir.view(&DirectoryQuery::new().search("sam"), 1, 0);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].id, "2");

    let view = dir.view(&DirectoryQuery::new().role("trainer"), 1, 0);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].id, "1");

    let view = dir.view(&DirectoryQuery::new().search("x.com"), 2, 2);
    assert_eq!(view.total_items, 3);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.items[0].id, "3");
}

#[tokio::test]
async fn page_size_defaults_and_caps() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let dir = UserDirectory::new(
        backend,
        ServiceConfig {
            default_page_size: 2,
            max_page_size: 2,
        },
    );
    dir.refresh().await.unwrap();

    assert_eq!(dir.view(&DirectoryQuery::new(), 1, 0).page_size, 2);
    assert_eq!(dir.view(&DirectoryQuery::new(), 1, 50).page_size, 2);
}

#[tokio::test]
async fn pending_approvals_lists_unapproved() {
    let dir = loaded(Arc::new(MockBackend::with_profiles(roster()))).await;
    let pending = dir.pending_approvals();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "3");
}

#[tokio::test]
async fn update_role_replaces_record_in_place() {
    let dir = loaded(Arc::new(MockBackend::with_profiles(roster()))).await;

    let updated = dir.update_role("2", Role::Trainer).await.unwrap();

    assert_eq!(updated.parsed_role(), Some(Role::Trainer));
    let ids: Vec<String> = dir.profiles().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(dir.profiles()[1].parsed_role(), Some(Role::Trainer));

    let state = dir.mutation_status("2").unwrap();
    assert_eq!(state.op, MutationOp::UpdateRole(Role::Trainer));
    assert_eq!(state.status, MutationStatus::Succeeded);
}

#[tokio::test]
async fn approval_moves_user_out_of_queue() {
    let dir = loaded(Arc::new(MockBackend::with_profiles(roster()))).await;

    let approved = dir.set_approval("3", true).await.unwrap();

    assert!(approved.is_approved);
    assert!(dir.pending_approvals().is_empty());
}

#[tokio::test]
async fn deactivate_removes_record() {
    let dir = loaded(Arc::new(MockBackend::with_profiles(roster()))).await;

    dir.deactivate("1").await.unwrap();

    let ids: Vec<String> = dir.profiles().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(
        dir.mutation_status("1").unwrap().status,
        MutationStatus::Succeeded
    );
}

#[tokio::test]
async fn failed_mutation_leaves_list_and_surfaces_error() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let dir = loaded(backend.clone()).await;

    backend.fail(DirectoryError::permission("admins only"));
    let err = dir.update_role("2", Role::Admin).await.unwrap_err();

    assert_eq!(err, DirectoryError::permission("admins only"));
    assert_eq!(dir.profiles(), roster());
    match dir.mutation_status("2").unwrap().status {
        MutationStatus::Failed { kind, message } => {
            assert_eq!(kind, ErrorKind::Permission);
            assert!(message.contains("admins only"));
        }
        other => panic!("Expected Failed, got {other:?}"),
    }

    let err = dir.deactivate("2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert_eq!(dir.profiles().len(), 3);
}

#[tokio::test]
async fn unknown_user_is_rejected_without_backend_call() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let dir = loaded(backend.clone()).await;

    let err = dir.set_approval("99", true).await.unwrap_err();

    assert_eq!(err, DirectoryError::user_not_found("99"));
    assert_eq!(*backend.calls.lock(), vec!["fetch".to_string()]);
    assert!(dir.mutation_status("99").is_none());
}

#[tokio::test]
async fn pending_state_is_observable_and_blocks_a_second_mutation() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MockBackend::gated(roster(), gate.clone()));
    let dir = Arc::new(UserDirectory::new(backend.clone(), ServiceConfig::default()));

    // let the initial fetch through
    gate.notify_one();
    dir.refresh().await.unwrap();

    let task = {
        let dir = dir.clone();
        tokio::spawn(async move { dir.update_role("2", Role::Nutritionist).await })
    };

    // wait until the backend call has started
    while backend.calls.lock().len() < 2 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        dir.mutation_status("2").unwrap().status,
        MutationStatus::Pending
    );
    assert_eq!(dir.profiles()[1].parsed_role(), Some(Role::Client));
    assert_eq!(
        dir.deactivate("2").await.unwrap_err(),
        DirectoryError::mutation_pending("2")
    );

    gate.notify_one();
    let updated = task.await.unwrap().unwrap();

    assert_eq!(updated.parsed_role(), Some(Role::Nutritionist));
    assert_eq!(
        dir.mutation_status("2").unwrap().status,
        MutationStatus::Succeeded
    );
}

#[tokio::test]
async fn local_client_delegates_to_service() {
    let backend = Arc::new(MockBackend::with_profiles(roster()));
    let api = local_client(Arc::new(UserDirectory::new(
        backend,
        ServiceConfig::default(),
    )));

    assert_eq!(api.refresh().await.unwrap(), 3);
    assert_eq!(api.pending_approvals().len(), 1);
    api.set_approval("3", true).await.unwrap();

    let view = api.view(&DirectoryQuery::new().role("nutritionist"), 1, 10);
    assert!(view.items[0].is_approved);
    assert!(api.mutation_status("3").is_some());
}
