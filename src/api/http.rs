//! reqwest-backed [`RecordsApi`].
//!
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::message::success_message;
use super::{RecordId, RecordsApi, UserPayload, UserRecord};
use crate::error::ApiError;

/// Client for a collection endpoint such as `http://localhost:8000/api/users/`.
#[derive(Clone, Debug)]
pub struct HttpRecordsApi {
    http: Client,
    collection_url: String,
}

impl HttpRecordsApi {
    /// Validate `base_url` and build a client with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{trimmed}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let mut collection_url = parsed.to_string();
        if !collection_url.ends_with('/') {
            collection_url.push('/');
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(format!("user-records-tui/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// Path of a single record: `<collection>/<id>/`.
    pub fn record_url(&self, id: RecordId) -> String {
        format!("{}{}/", self.collection_url, id)
    }
}

/// Pass success responses through; turn anything else into [`ApiError::Status`]
/// carrying the JSON body when there is one.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).ok(),
        Err(e) => {
            debug!(error = %e, "could not read error body");
            None
        }
    };
    warn!(status = status.as_u16(), body = ?body, "API returned an error status");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Success bodies of writes are optional; only the confirmation text is kept.
async fn confirmation(response: Response) -> Result<Option<String>, ApiError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_slice(&bytes)
        .ok()
        .and_then(|value| success_message(&value)))
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        debug!(url = %self.collection_url, "GET users");
        let response = self.http.get(&self.collection_url).send().await?;
        let response = check_status(response).await?;
        response
            .json::<Vec<UserRecord>>()
            .await
            .map_err(|e| ApiError::Decode(format!("user list: {e}")))
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<Option<String>, ApiError> {
        debug!(url = %self.collection_url, name = %payload.name, "POST user");
        let response = self
            .http
            .post(&self.collection_url)
            .json(payload)
            .send()
            .await?;
        confirmation(check_status(response).await?).await
    }

    async fn update_user(
        &self,
        id: RecordId,
        payload: &UserPayload,
    ) -> Result<Option<String>, ApiError> {
        let url = self.record_url(id);
        debug!(url = %url, id, "PUT user");
        let response = self.http.put(&url).json(payload).send().await?;
        confirmation(check_status(response).await?).await
    }

    async fn delete_user(&self, id: RecordId) -> Result<(), ApiError> {
        let url = self.record_url(id);
        debug!(url = %url, id, "DELETE user");
        let response = self.http.delete(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(url: &str) -> Result<HttpRecordsApi, ApiError> {
        HttpRecordsApi::new(url, Duration::from_secs(5))
    }

    #[test]
    fn collection_url_gets_trailing_slash() {
        let client = api("http://localhost:8000/api/users").unwrap();
        assert_eq!(client.collection_url(), "http://localhost:8000/api/users/");
        let client = api("http://localhost:8000/api/users/").unwrap();
        assert_eq!(client.collection_url(), "http://localhost:8000/api/users/");
    }

    #[test]
    fn record_url_ends_with_id_and_slash() {
        let client = api("https://example.com/api/users/").unwrap();
        assert_eq!(client.record_url(7), "https://example.com/api/users/7/");
    }

    #[test]
    fn rejects_empty_and_foreign_schemes() {
        assert!(matches!(api("   "), Err(ApiError::InvalidUrl(msg)) if msg.contains("empty")));
        assert!(matches!(api("ftp://example.com/users"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(api("not a url"), Err(ApiError::InvalidUrl(_))));
    }
}
