use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use crate::contract::error::DirectoryError;
use crate::contract::model::{Role, UserProfile};
use crate::domain::decode::decode_profiles;
use crate::domain::ports::ProfileBackend;

/// REST adapter for the hosted profile API.
///
/// Routes, relative to `base`:
///  - GET   api/profiles
///  - PATCH api/profiles/{id}/role       {"role": "..."}
///  - PATCH api/profiles/{id}/approval   {"isApproved": bool}
///  - POST  api/profiles/{id}/deactivate
pub struct HttpProfileBackend {
    client: Client,
    base: Url,
}

impl HttpProfileBackend {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::unknown(format!("HTTP client setup failed: {e}")))?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DirectoryError::validation(format!("invalid backend base URL '{}'", self.base))
            })?
            .pop_if_empty()
            .push("api")
            .push("profiles")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, DirectoryError> {
        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DirectoryError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::unknown(format!("malformed response body: {e}")))
    }
}

/// Failures before an HTTP status was received.
fn classify_transport(err: reqwest::Error) -> DirectoryError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        DirectoryError::network(err.to_string())
    } else {
        DirectoryError::unknown(err.to_string())
    }
}

fn classify_status(status: StatusCode, body: &str) -> DirectoryError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DirectoryError::permission(message),
        StatusCode::BAD_REQUEST
        | StatusCode::NOT_FOUND
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => DirectoryError::validation(message),
        s if s.is_server_error() => DirectoryError::server(s.as_u16(), message),
        _ => DirectoryError::unknown(message),
    }
}

#[async_trait]
impl ProfileBackend for HttpProfileBackend {
    #[instrument(
        name = "user_directory.http.fetch_profiles",
        skip_all,
        fields(base = %self.base)
    )]
    async fn fetch_profiles(&self) -> Result<Vec<UserProfile>, DirectoryError> {
        let url = self.url(&[])?;
        // Decoded per record so one bad row does not hide the rest.
        let raw: Vec<serde_json::Value> = self.send_json(self.client.get(url)).await?;
        let profiles = decode_profiles(raw);
        debug!(count = profiles.len(), "Fetched profiles");
        Ok(profiles)
    }

    #[instrument(
        name = "user_directory.http.update_role",
        skip_all,
        fields(user_id = %id, role = %role)
    )]
    async fn update_role(&self, id: &str, role: Role) -> Result<UserProfile, DirectoryError> {
        let url = self.url(&[id, "role"])?;
        self.send_json(self.client.patch(url).json(&json!({ "role": role })))
            .await
    }

    #[instrument(
        name = "user_directory.http.set_approval",
        skip_all,
        fields(user_id = %id, approved = approved)
    )]
    async fn set_approval(&self, id: &str, approved: bool) -> Result<UserProfile, DirectoryError> {
        let url = self.url(&[id, "approval"])?;
        self.send_json(
            self.client
                .patch(url)
                .json(&json!({ "isApproved": approved })),
        )
        .await
    }

    #[instrument(name = "user_directory.http.deactivate", skip_all, fields(user_id = %id))]
    async fn deactivate(&self, id: &str) -> Result<(), DirectoryError> {
        let url = self.url(&[id, "deactivate"])?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }
}
