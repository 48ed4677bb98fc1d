//! Kill action for a running deployment

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;

/// Something that asks the server to kill the deployment
#[async_trait]
pub trait KillAction: Send + Sync {
    async fn send(&self) -> Result<(), ConsoleError>;
}

/// POSTs to the deployment's kill endpoint
pub struct HttpKillAction {
    client: HttpClient,
    url: String,
}

impl HttpKillAction {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl KillAction for HttpKillAction {
    async fn send(&self) -> Result<(), ConsoleError> {
        self.client.post_empty(&self.url).await
    }
}

/// Fires the kill action at most once.
///
/// The request result is only logged. The page learns that the kill took
/// effect from the `KILL_RECEIVED` entry on the live stream.
pub struct KillTrigger {
    action: Arc<dyn KillAction>,
    requested: AtomicBool,
}

impl KillTrigger {
    pub fn new(action: Arc<dyn KillAction>) -> Self {
        Self {
            action,
            requested: AtomicBool::new(false),
        }
    }

    pub fn was_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Send the kill request in the background. Returns `None` when it was
    /// already sent.
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        if self.requested.swap(true, Ordering::SeqCst) {
            warn!("Kill already requested, ignoring");
            return None;
        }

        info!("Requesting deployment kill");
        let action = self.action.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = action.send().await {
                error!("Kill request failed: {}", e);
            }
        }))
    }
}
