//! Remote user-record API: wire types, the client trait and its HTTP implementation.
//!
pub mod http;
pub mod message;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub use http::HttpRecordsApi;

/// Identifier assigned by the remote store.
pub type RecordId = i64;

/// A user record as served by the collection endpoint.
///
/// Also used as the form draft; a draft that does not belong to a stored
/// record carries the id `0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(id: RecordId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Body of create and update requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for UserPayload {
    fn from(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}

/// The four calls the view makes, used to pick error extraction and fallback text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch users",
            Operation::Add => "Failed to add user",
            Operation::Update => "Failed to update user",
            Operation::Delete => "Failed to delete user",
        }
    }

    /// Default notification for a completed mutation. Fetching is silent.
    pub fn success_message(self) -> Option<&'static str> {
        match self {
            Operation::Fetch => None,
            Operation::Add => Some("User added successfully"),
            Operation::Update => Some("User updated successfully"),
            Operation::Delete => Some("User deleted successfully"),
        }
    }
}

/// Client for the user-record collection.
///
/// Create and update return the server's own confirmation text when it sends one.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;
    async fn create_user(&self, payload: &UserPayload) -> Result<Option<String>, ApiError>;
    async fn update_user(
        &self,
        id: RecordId,
        payload: &UserPayload,
    ) -> Result<Option<String>, ApiError>;
    async fn delete_user(&self, id: RecordId) -> Result<(), ApiError>;
}
