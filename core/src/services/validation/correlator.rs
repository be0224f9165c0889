//! Correlation of asynchronous matching responses with waiting requests.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use crate::domain::entities::validation::ValidationOutcome;
use crate::services::recent_ids::RecentIds;

/// Receiving half handed to a request waiting for its answer
pub struct PendingResponse {
    message_id: String,
    receiver: oneshot::Receiver<ValidationOutcome>,
}

impl PendingResponse {
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}

/// Routes matching responses to the request that is waiting for them
///
/// A response is delivered at most once per message id; repeated deliveries
/// and responses nobody waits for are dropped.
pub struct ResponseCorrelator {
    pending: Mutex<HashMap<String, oneshot::Sender<ValidationOutcome>>>,
    delivered: Mutex<RecentIds>,
    timeout: Duration,
}

impl ResponseCorrelator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            delivered: Mutex::new(RecentIds::default()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Registers interest in `message_id`; call before sending the request
    pub async fn register(&self, message_id: impl Into<String>) -> PendingResponse {
        let message_id = message_id.into();
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().await.insert(message_id.clone(), sender);
        PendingResponse {
            message_id,
            receiver,
        }
    }

    /// Waits for the response, `None` on timeout
    pub async fn wait(&self, pending: PendingResponse) -> Option<ValidationOutcome> {
        let PendingResponse {
            message_id,
            receiver,
        } = pending;

        match tokio::time::timeout(self.timeout, receiver).await {
            Ok(Ok(outcome)) => Some(outcome),
            Ok(Err(_)) => None,
            Err(_) => {
                self.pending.lock().await.remove(&message_id);
                tracing::warn!(message_id = %message_id, "Timed out waiting for validation response");
                None
            }
        }
    }

    /// Hands a response to its waiter
    ///
    /// Returns `false` for duplicates and for ids nobody waits for.
    pub async fn deliver(&self, message_id: &str, outcome: ValidationOutcome) -> bool {
        if !self.delivered.lock().await.insert(message_id) {
            tracing::debug!(message_id = %message_id, "Duplicate validation response ignored");
            return false;
        }

        let Some(sender) = self.pending.lock().await.remove(message_id) else {
            tracing::warn!(message_id = %message_id, "No pending request for validation response");
            return false;
        };

        sender.send(outcome).is_ok()
    }

    /// Forgets a registration whose request was never sent
    pub async fn cancel(&self, message_id: &str) {
        self.pending.lock().await.remove(message_id);
    }

    /// Number of requests currently waiting
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}
