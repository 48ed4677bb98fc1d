//! Live log session: one per opened deployment view.
//!
//! The session owns the stream connection and runs every inbound message
//! through decode, render, append and the derived signals before it looks
//! at the next one. User events are handled on the same loop, so nothing
//! touches the page concurrently.

use std::future::Future;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use http::header::{HeaderValue, USER_AGENT};
use image::RgbaImage;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::context::PageContext;
use crate::app::options::SessionOptions;
use crate::errors::{ConsoleError, DecodeError};
use crate::http::kill::{KillAction, KillTrigger};
use crate::models::log_entry::{EntryType, LogEntry};
use crate::render::log_templates::{render, render_decode_error};
use crate::stream::decoder::{decode, decode_bytes};
use crate::ui::favicon::Favicon;
use crate::ui::layout::Viewport;
use crate::ui::log_appender::LogAppender;
use crate::ui::signals::{AnimationState, DerivedState, KillAvailability};
use crate::ui::views::{IconSink, KillControlView, LogView, StatusView};

pub type LiveStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where the session draws
pub struct SessionViews {
    pub log: Box<dyn LogView>,
    pub status: Box<dyn StatusView>,
    pub kill: Box<dyn KillControlView>,
    pub icon: Box<dyn IconSink>,
}

/// Interaction coming from the user of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    KillClicked,
    Resized(Viewport),
    VisibilityChanged { hidden: bool },
}

/// Why a session stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The deployment has no live stream
    NoStream,

    /// The server sent a close frame
    Closed,

    /// The transport stopped yielding messages
    StreamEnded,

    /// The connection failed; there is no reconnect
    TransportError(String),

    /// The view was torn down
    Shutdown,
}

pub struct LiveLogSession {
    id: Uuid,
    context: PageContext,
    show_decode_errors: bool,
    appender: LogAppender,
    state: DerivedState,
    favicon: Favicon,
    status_view: Box<dyn StatusView>,
    kill_view: Box<dyn KillControlView>,
    kill_trigger: Option<KillTrigger>,
    received: usize,
    decode_errors: Vec<DecodeError>,
}

impl LiveLogSession {
    /// Set up the page for `context`: size the log and show the initial
    /// status and kill control
    pub fn new(
        context: PageContext,
        options: &SessionOptions,
        icon: RgbaImage,
        views: SessionViews,
        kill_action: Option<Arc<dyn KillAction>>,
    ) -> Self {
        let kill_trigger = match (&context.kill_path, kill_action) {
            (Some(_), Some(action)) => Some(KillTrigger::new(action)),
            _ => None,
        };

        let state = DerivedState::new(context.phase, kill_trigger.is_some());
        let mut appender = LogAppender::new(views.log, context.phase);
        appender.resize(&options.viewport);

        let mut session = Self {
            id: Uuid::new_v4(),
            show_decode_errors: options.show_decode_errors,
            appender,
            state,
            favicon: Favicon::new(options.favicon.clone(), icon, views.icon),
            status_view: views.status,
            kill_view: views.kill,
            kill_trigger,
            received: 0,
            decode_errors: Vec::new(),
            context,
        };
        session.status_view.show_status(session.state.status());
        session.kill_view.show_kill(session.state.kill());

        info!(
            "Session {} opened for {} deployment",
            session.id,
            session.context.phase.as_str()
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn state(&self) -> &DerivedState {
        &self.state
    }

    pub fn favicon(&self) -> &Favicon {
        &self.favicon
    }

    /// Messages received, decodable or not
    pub fn received(&self) -> usize {
        self.received
    }

    /// Entries shown in the log, error entries included
    pub fn appended(&self) -> usize {
        self.appender.len()
    }

    pub fn decode_errors(&self) -> &[DecodeError] {
        &self.decode_errors
    }

    pub fn kill_requested(&self) -> bool {
        self.kill_trigger
            .as_ref()
            .map(|t| t.was_requested())
            .unwrap_or(false)
    }

    /// Handle one transport message. Returns how the session ends if this
    /// message ends it.
    pub fn handle_message(&mut self, message: Message) -> Option<SessionEnd> {
        match message {
            Message::Text(text) => {
                let _ = self.handle_text(text.as_str());
                None
            }
            Message::Binary(bytes) => {
                self.received += 1;
                let decoded = decode_bytes(&bytes);
                let _ = self.handle_decoded(decoded);
                None
            }
            Message::Close(frame) => {
                info!("Live log closed by server: {:?}", frame);
                Some(SessionEnd::Closed)
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
        }
    }

    /// Decode, render, append and apply one text frame
    pub fn handle_text(&mut self, text: &str) -> Result<EntryType, DecodeError> {
        self.received += 1;
        self.handle_decoded(decode(text))
    }

    fn handle_decoded(
        &mut self,
        decoded: Result<LogEntry, DecodeError>,
    ) -> Result<EntryType, DecodeError> {
        let entry = match decoded {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Session {}: undecodable log message: {}", self.id, e);
                if self.show_decode_errors {
                    self.appender.append(&render_decode_error(&e));
                }
                self.decode_errors.push(e.clone());
                return Err(e);
            }
        };

        let entry_type = entry.entry_type();
        debug!("Session {}: {} #{}", self.id, entry_type, entry.payload().id);

        self.appender.append(&render(&entry));
        self.apply_signals(entry_type);
        Ok(entry_type)
    }

    fn apply_signals(&mut self, entry_type: EntryType) {
        let changes = self.state.apply(entry_type);
        if changes.is_empty() {
            return;
        }

        match changes.animation {
            Some(AnimationState::Rotating) => self.favicon.start(),
            Some(AnimationState::Stopped) => self.favicon.stop(),
            None => {}
        }
        if let Some(status) = changes.status {
            info!("Deployment status: {}", status.caption());
            self.status_view.show_status(status);
        }
        if let Some(kill) = changes.kill {
            self.kill_view.show_kill(kill);
        }
    }

    pub fn handle_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::KillClicked => {
                if self.state.kill() != KillAvailability::Available {
                    debug!("Kill control is {:?}, ignoring click", self.state.kill());
                    return;
                }
                match &self.kill_trigger {
                    Some(trigger) => {
                        trigger.trigger();
                    }
                    None => debug!("No kill endpoint for this deployment"),
                }
            }
            UserEvent::Resized(viewport) => self.appender.resize(&viewport),
            UserEvent::VisibilityChanged { hidden } => {
                self.favicon.visibility().set_hidden(hidden)
            }
        }
    }

    /// Process `stream` until it closes, fails or `shutdown` completes.
    /// Messages are handled one at a time in delivery order.
    pub async fn run<S, F>(
        &mut self,
        stream: &mut S,
        mut events: mpsc::UnboundedReceiver<UserEvent>,
        shutdown: F,
    ) -> SessionEnd
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut events_open = true;

        let end = loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Session {} shutting down", self.id);
                    break SessionEnd::Shutdown;
                }
                event = events.recv(), if events_open => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => events_open = false,
                    }
                }
                msg = stream.next() => {
                    match msg {
                        Some(Ok(message)) => {
                            if let Some(end) = self.handle_message(message) {
                                break end;
                            }
                        }
                        Some(Err(e)) => {
                            error!("Live log connection lost: {}. Not reconnecting.", e);
                            break SessionEnd::TransportError(e.to_string());
                        }
                        None => {
                            info!("Live log stream ended");
                            break SessionEnd::StreamEnded;
                        }
                    }
                }
            }
        };

        self.teardown();
        end
    }

    /// Connect to the live stream and run until it ends. Deployments
    /// without a stream path return immediately.
    pub async fn connect_and_run<F>(
        &mut self,
        events: mpsc::UnboundedReceiver<UserEvent>,
        shutdown: F,
    ) -> Result<SessionEnd, ConsoleError>
    where
        F: Future<Output = ()>,
    {
        let Some(mut ws_stream) = connect(&self.context).await? else {
            info!("No live log for this deployment");
            return Ok(SessionEnd::NoStream);
        };

        let end = self.run(&mut ws_stream, events, shutdown).await;
        if matches!(end, SessionEnd::Shutdown) {
            if let Err(e) = ws_stream.close(None).await {
                debug!("Failed to close live log cleanly: {}", e);
            }
        }
        Ok(end)
    }

    /// Clear the animation timer; the page stays as it is
    pub fn teardown(&mut self) {
        self.favicon.stop();
    }
}

/// Open the live log WebSocket for `context`, if it has one
pub async fn connect(context: &PageContext) -> Result<Option<LiveStream>, ConsoleError> {
    let Some(url) = context.stream_url() else {
        return Ok(None);
    };

    info!("Connecting to live log: {}", url);
    let mut request = url.as_str().into_client_request()?;
    request.headers_mut().insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("deploy-console/", env!("CARGO_PKG_VERSION"))),
    );

    let (ws_stream, response) = connect_async(request).await?;
    info!("Connected to live log ({})", response.status());
    Ok(Some(ws_stream))
}
