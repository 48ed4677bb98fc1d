//! Shared fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use deploy_console::app::context::{DeploymentPhase, PageContext};
use deploy_console::app::options::SessionOptions;
use deploy_console::errors::ConsoleError;
use deploy_console::http::kill::KillAction;
use deploy_console::stream::session::{LiveLogSession, SessionViews};
use deploy_console::ui::favicon::default_icon;
use deploy_console::ui::views::MemoryPage;
use tokio_tungstenite::tungstenite::protocol::Message;

#[derive(Default)]
pub struct CountingKill {
    sent: AtomicUsize,
}

impl CountingKill {
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KillAction for CountingKill {
    async fn send(&self) -> Result<(), ConsoleError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn context(phase: DeploymentPhase) -> PageContext {
    PageContext {
        phase,
        stream_path: Some("localhost:8080/app/deployments/42/log".to_string()),
        kill_path: Some("localhost:8080/app/deployments/42/kill".to_string()),
        secure: false,
    }
}

pub fn session_with(
    context: PageContext,
    options: SessionOptions,
) -> (LiveLogSession, MemoryPage, Arc<CountingKill>) {
    let page = MemoryPage::new();
    let kill = Arc::new(CountingKill::default());
    let views = SessionViews {
        log: Box::new(page.clone()),
        status: Box::new(page.clone()),
        kill: Box::new(page.clone()),
        icon: Box::new(page.clone()),
    };

    let session = LiveLogSession::new(
        context,
        &options,
        default_icon(32),
        views,
        Some(kill.clone() as Arc<dyn KillAction>),
    );
    (session, page, kill)
}

pub fn session(phase: DeploymentPhase) -> (LiveLogSession, MemoryPage, Arc<CountingKill>) {
    session_with(context(phase), SessionOptions::default())
}

/// A JSON log message as the server sends it
pub fn entry_json(entry_type: &str, id: i64) -> String {
    serde_json::json!({
        "id": id,
        "timestamp": "2015-06-01T10:00:00Z",
        "deployment_id": 42,
        "origin": "applikatoni",
        "entry_type": entry_type,
        "message": format!("message {}", id),
    })
    .to_string()
}

pub fn text(body: String) -> Result<Message, tokio_tungstenite::tungstenite::Error> {
    Ok(Message::Text(body.into()))
}
