//! Running API requests off the UI thread.
//!
//! View operations return an [`ApiRequest`] instead of doing I/O. The
//! [`Dispatcher`] runs it on the tokio runtime and posts the [`ApiOutcome`]
//! back over a channel that the event loop drains every tick.
//!
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::api::{Operation, RecordId, RecordsApi, UserPayload, UserRecord};

/// A single call against the collection endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiRequest {
    List,
    Create(UserPayload),
    Update { id: RecordId, payload: UserPayload },
    Delete { id: RecordId },
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::List => Operation::Fetch,
            ApiRequest::Create(_) => Operation::Add,
            ApiRequest::Update { .. } => Operation::Update,
            ApiRequest::Delete { .. } => Operation::Delete,
        }
    }
}

/// Result of an [`ApiRequest`].
///
/// Errors are already reduced to the text shown to the operator; successful
/// writes carry the server's confirmation text when it sent one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiOutcome {
    Listed(Result<Vec<UserRecord>, String>),
    Created(Result<Option<String>, String>),
    Updated(Result<Option<String>, String>),
    Deleted(Result<(), String>),
}

/// Perform `request` against `api` and reduce the result to an outcome.
pub async fn execute(api: &dyn RecordsApi, request: ApiRequest) -> ApiOutcome {
    let op = request.operation();
    let describe = |e: crate::error::ApiError| {
        warn!(operation = ?op, error = %e, "request failed");
        e.user_message(op)
    };
    match request {
        ApiRequest::List => {
            let res = api.list_users().await.map_err(describe);
            if let Ok(users) = &res {
                debug!(count = users.len(), "fetched users");
            }
            ApiOutcome::Listed(res)
        }
        ApiRequest::Create(payload) => {
            let res = api.create_user(&payload).await.map_err(describe);
            if res.is_ok() {
                info!(name = %payload.name, "user created");
            }
            ApiOutcome::Created(res)
        }
        ApiRequest::Update { id, payload } => {
            let res = api.update_user(id, &payload).await.map_err(describe);
            if res.is_ok() {
                info!(id, "user updated");
            }
            ApiOutcome::Updated(res)
        }
        ApiRequest::Delete { id } => {
            let res = api.delete_user(id).await.map_err(describe);
            if res.is_ok() {
                info!(id, "user deleted");
            }
            ApiOutcome::Deleted(res)
        }
    }
}

/// Spawns requests on a runtime and reports outcomes over a channel.
///
/// Requests are never de-duplicated or cancelled; outcomes arrive in
/// completion order.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn RecordsApi>,
    runtime: Handle,
    outcomes: Sender<ApiOutcome>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn RecordsApi>, runtime: Handle) -> (Self, Receiver<ApiOutcome>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                api,
                runtime,
                outcomes: tx,
            },
            rx,
        )
    }

    pub fn dispatch(&self, request: ApiRequest) {
        debug!(request = ?request, "dispatching");
        let api = Arc::clone(&self.api);
        let tx = self.outcomes.clone();
        self.runtime.spawn(async move {
            let outcome = execute(api.as_ref(), request).await;
            // The receiver is gone only once the UI has shut down.
            let _ = tx.send(outcome);
        });
    }
}
