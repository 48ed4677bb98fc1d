//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::context::PageContext;
use crate::app::options::{AppOptions, SectionOptions};
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::http::kill::{HttpKillAction, KillAction};
use crate::http::sections::{load_branches, load_diff, load_pull_requests};
use crate::stream::session::{LiveLogSession, SessionEnd, SessionViews, UserEvent};
use crate::ui::deploy_form::DeployForm;
use crate::ui::favicon::{default_icon, load_icon};
use crate::ui::layout::Viewport;
use crate::ui::terminal::{
    FileIconSink, NullIconSink, TerminalKillControl, TerminalLogView, TerminalSection,
    TerminalStatusView,
};
use crate::ui::views::IconSink;

/// Show the requested dashboard sections, then follow the live log of the
/// deployment described by `context` until it ends or `shutdown_signal`
/// completes
pub async fn run(
    options: AppOptions,
    context: PageContext,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<SessionEnd, ConsoleError> {
    info!("Initializing deployment console...");

    let http_client = HttpClient::new(&options.dashboard_base_url, options.http_timeout)?;

    if !options.sections.is_empty() {
        show_sections(&http_client, &options.sections).await;
    }

    let mut session = init_session(&options, context, http_client)?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    spawn_input_reader(events_tx, options.session.viewport);

    let end = session.connect_and_run(events_rx, shutdown_signal).await?;
    info!(
        "Session {} ended: {:?} ({} messages, {} undecodable)",
        session.id(),
        end,
        session.received(),
        session.decode_errors().len()
    );
    Ok(end)
}

// =============================== INITIALIZATION ================================== //

fn init_session(
    options: &AppOptions,
    context: PageContext,
    http_client: HttpClient,
) -> Result<LiveLogSession, ConsoleError> {
    let icon = init_icon(options)?;

    let icon_sink: Box<dyn IconSink> = match &options.icon_output_path {
        Some(path) => Box::new(FileIconSink::new(path.clone())),
        None => Box::new(NullIconSink),
    };

    let kill_action: Option<Arc<dyn KillAction>> = context
        .kill_url()
        .map(|url| Arc::new(HttpKillAction::new(http_client, url)) as Arc<dyn KillAction>);

    let views = SessionViews {
        log: Box::new(TerminalLogView),
        status: Box::new(TerminalStatusView),
        kill: Box::new(TerminalKillControl),
        icon: icon_sink,
    };

    Ok(LiveLogSession::new(
        context,
        &options.session,
        icon,
        views,
        kill_action,
    ))
}

fn init_icon(options: &AppOptions) -> Result<RgbaImage, ConsoleError> {
    match &options.icon_path {
        Some(path) => {
            info!("Loading favicon from {:?}", path);
            load_icon(path)
        }
        None => Ok(default_icon(options.session.favicon.size)),
    }
}

async fn show_sections(client: &HttpClient, sections: &SectionOptions) {
    if let Some(path) = &sections.pulls_path {
        let mut view = TerminalSection::new("Pull requests");
        load_pull_requests(client, path, &mut view).await;
    }

    if let Some(path) = &sections.branches_path {
        let mut view = TerminalSection::new("Branches");
        load_branches(client, path, &mut view).await;
    }

    if let Some(diff_path) = &sections.diff_path {
        let mut form = DeployForm::new(sections.target.clone().unwrap_or_default());
        let sha = sections.commit_sha.clone().unwrap_or_default();
        match form.set_commit_sha(&sha) {
            Some(query) => {
                let mut view = TerminalSection::new("Diff");
                load_diff(client, diff_path, &query, &mut view).await;
            }
            None => warn!("Diff needs a full commit sha, got {:?}", sha),
        }
    }
}

/// Turn lines typed on stdin into page events:
/// `kill`, `hide`, `show` and `resize <height> <log offset>`.
///
/// Reads on a plain thread: a blocking stdin read must not hold up runtime
/// shutdown. The thread ends with stdin or once the session is gone.
fn spawn_input_reader(events_tx: mpsc::UnboundedSender<UserEvent>, initial_viewport: Viewport) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(event) = parse_input(&line, initial_viewport) else {
                debug!("Ignoring input {:?}", line);
                continue;
            };
            if events_tx.send(event).is_err() {
                break;
            }
        }
    });
}

fn parse_input(line: &str, current: Viewport) -> Option<UserEvent> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "kill" => Some(UserEvent::KillClicked),
        "hide" => Some(UserEvent::VisibilityChanged { hidden: true }),
        "show" => Some(UserEvent::VisibilityChanged { hidden: false }),
        "resize" => {
            let height = words.next()?.parse().ok()?;
            let log_offset_top = match words.next() {
                Some(offset) => offset.parse().ok()?,
                None => current.log_offset_top,
            };
            Some(UserEvent::Resized(Viewport {
                height,
                log_offset_top,
            }))
        }
        _ => None,
    }
}
