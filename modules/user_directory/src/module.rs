use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};
use url::Url;

use crate::config::DirectoryConfig;
use crate::contract::client::DirectoryApi;
use crate::domain::service::{ServiceConfig, UserDirectory};
use crate::gateways::local::DirectoryLocalClient;
use crate::infra::HttpProfileBackend;

/// Wire the HTTP backend into a directory service.
pub fn build_directory(cfg: &DirectoryConfig) -> anyhow::Result<Arc<UserDirectory>> {
    info!("Initializing user_directory module");
    debug!(
        base_url = %cfg.base_url,
        timeout_ms = cfg.timeout_ms,
        default_page_size = cfg.default_page_size,
        max_page_size = cfg.max_page_size,
        "Loaded user_directory config"
    );

    let base = Url::parse(&cfg.base_url)
        .with_context(|| format!("Invalid user_directory.base_url '{}'", cfg.base_url))?;
    let backend = HttpProfileBackend::new(base, Duration::from_millis(cfg.timeout_ms))?;

    let service = UserDirectory::new(
        Arc::new(backend),
        ServiceConfig {
            default_page_size: cfg.default_page_size.max(1),
            max_page_size: cfg.max_page_size.max(1),
        },
    );
    Ok(Arc::new(service))
}

/// In-process client over a built directory.
pub fn local_client(service: Arc<UserDirectory>) -> Arc<dyn DirectoryApi> {
    Arc::new(DirectoryLocalClient::new(service))
}
