//! Live log session tests

use std::time::Duration;

use deploy_console::app::context::DeploymentPhase;
use deploy_console::app::options::SessionOptions;
use deploy_console::errors::DecodeError;
use deploy_console::models::log_entry::EntryType;
use deploy_console::stream::session::{SessionEnd, UserEvent};
use deploy_console::ui::layout::Viewport;
use deploy_console::ui::signals::{AnimationState, KillAvailability, StatusLabel};
use futures::stream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::common::{context, entry_json, session, session_with, text};

/// One inbound frame: a known tag, or something that fails to decode
#[derive(Debug, Clone, Copy)]
enum Frame {
    Entry(EntryType),
    Malformed,
    UnknownTag,
}

fn frames() -> Vec<Frame> {
    EntryType::ALL
        .iter()
        .map(|t| Frame::Entry(*t))
        .chain([Frame::Malformed, Frame::UnknownTag])
        .collect()
}

fn frame_sequences(len: usize) -> Vec<Vec<Frame>> {
    let mut out = vec![Vec::new()];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                frames().into_iter().map(move |frame| {
                    let mut next = prefix.clone();
                    next.push(frame);
                    next
                })
            })
            .collect();
    }
    out
}

fn frame_text(frame: Frame, id: i64) -> String {
    match frame {
        Frame::Entry(entry_type) => entry_json(entry_type.as_str(), id),
        Frame::Malformed => format!("{{\"entry_type\": \"STAGE_START\", \"id\": {}", id),
        Frame::UnknownTag => entry_json("STAGE_SKIPPED", id),
    }
}

fn closed_events() -> mpsc::UnboundedReceiver<UserEvent> {
    let (_tx, rx) = mpsc::unbounded_channel();
    rx
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_successful_deployment_scenario() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);
    let tags = [
        "STAGE_START",
        "COMMAND_START",
        "COMMAND_SUCCESS",
        "STAGE_SUCCESS",
        "DEPLOYMENT_SUCCESS",
    ];
    let mut messages = stream::iter(
        tags.iter()
            .enumerate()
            .map(|(i, tag)| text(entry_json(tag, i as i64 + 1)))
            .collect::<Vec<_>>(),
    );

    let end = session
        .run(&mut messages, closed_events(), futures::future::pending())
        .await;

    assert_eq!(end, SessionEnd::StreamEnded);
    assert_eq!(session.state().status(), StatusLabel::Succeeded);
    assert_eq!(session.state().animation(), AnimationState::Stopped);
    assert_eq!(session.state().kill(), KillAvailability::Removed);
    assert!(!session.favicon().is_rotating());

    let snapshot = page.snapshot();
    assert_eq!(snapshot.status, Some(StatusLabel::Succeeded));
    assert_eq!(snapshot.kill, Some(KillAvailability::Removed));
    assert_eq!(snapshot.entries.len(), 5);
    let modifiers = [
        "logentry-stage-start",
        "logentry-command-start",
        "logentry-command-success",
        "logentry-stage-success",
        "logentry-deployment-success",
    ];
    for (i, (markup, modifier)) in snapshot.entries.iter().zip(modifiers).enumerate() {
        assert!(markup.contains(modifier), "entry {} is {}", i, markup);
        assert!(markup.contains(&format!("data-entry-id=\"{}\"", i + 1)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_log_order_matches_input_order() {
    for sequence in frame_sequences(3) {
        let (mut session, page, _kill) = session(DeploymentPhase::Active);
        let mut messages = stream::iter(
            sequence
                .iter()
                .enumerate()
                .map(|(i, frame)| text(frame_text(*frame, i as i64 + 1)))
                .collect::<Vec<_>>(),
        );

        let end = session
            .run(&mut messages, closed_events(), futures::future::pending())
            .await;
        assert_eq!(end, SessionEnd::StreamEnded);

        let entries = page.snapshot().entries;
        assert_eq!(entries.len(), sequence.len(), "{:?}", sequence);
        for (i, (markup, frame)) in entries.iter().zip(&sequence).enumerate() {
            match frame {
                Frame::Entry(_) => assert!(
                    markup.contains(&format!("data-entry-id=\"{}\"", i + 1)),
                    "{:?} entry {} is {}",
                    sequence,
                    i,
                    markup
                ),
                Frame::Malformed | Frame::UnknownTag => {
                    assert!(markup.contains("logentry-error"), "{:?} entry {}", sequence, i);
                    assert!(!markup.contains("data-entry-id"));
                }
            }
        }
    }
}

#[tokio::test]
async fn test_kill_received_disables_without_removing() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);

    assert_eq!(
        session.handle_text(&entry_json("DEPLOYMENT_START", 1)),
        Ok(EntryType::DeploymentStart)
    );
    assert_eq!(session.state().animation(), AnimationState::Rotating);
    assert!(session.favicon().is_rotating());

    session.handle_text(&entry_json("KILL_RECEIVED", 2)).unwrap();
    assert_eq!(session.state().kill(), KillAvailability::Disabled);
    assert_eq!(page.snapshot().kill, Some(KillAvailability::Disabled));
    assert!(!session.state().status().is_terminal());
    assert_eq!(session.state().animation(), AnimationState::Rotating);

    session.teardown();
    assert!(!session.favicon().is_rotating());
}

#[tokio::test]
async fn test_malformed_message_then_failure() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);
    let mut messages = stream::iter(vec![
        text("{not json".to_string()),
        text(entry_json("DEPLOYMENT_FAIL", 2)),
    ]);

    session
        .run(&mut messages, closed_events(), futures::future::pending())
        .await;

    assert_eq!(session.decode_errors().len(), 1);
    assert!(matches!(session.decode_errors()[0], DecodeError::Malformed(_)));
    assert_eq!(session.state().status(), StatusLabel::Failed);
    assert_eq!(session.state().animation(), AnimationState::Stopped);

    let entries = page.snapshot().entries;
    assert_eq!(entries.len(), 2);
    assert!(entries[0].contains("logentry-error"));
    assert!(entries[1].contains("logentry-deployment-fail"));
}

#[tokio::test]
async fn test_unknown_entry_type_is_reported_and_skipped() {
    let options = SessionOptions {
        show_decode_errors: false,
        ..Default::default()
    };
    let (mut session, page, _kill) = session_with(context(DeploymentPhase::Active), options);

    let result = session.handle_text(r#"{"entry_type": "DEPLOYMENT_PAUSED"}"#);
    assert_eq!(
        result,
        Err(DecodeError::UnknownEntryType("DEPLOYMENT_PAUSED".to_string()))
    );
    assert!(page.snapshot().entries.is_empty());

    session.handle_text(&entry_json("STAGE_START", 2)).unwrap();
    assert_eq!(session.received(), 2);
    assert_eq!(session.appended(), 1);
    assert_eq!(session.decode_errors().len(), 1);
}

#[tokio::test]
async fn test_follow_tail_only_for_live_phases() {
    for (phase, scrolls) in [
        (DeploymentPhase::New, 3),
        (DeploymentPhase::Active, 3),
        (DeploymentPhase::Successful, 0),
        (DeploymentPhase::Failed, 0),
    ] {
        let (mut session, page, _kill) = session(phase);
        for id in 1..=3 {
            session.handle_text(&entry_json("COMMAND_STDOUT_OUTPUT", id)).unwrap();
        }
        let snapshot = page.snapshot();
        assert_eq!(snapshot.entries.len(), 3);
        assert_eq!(snapshot.scroll_count, scrolls, "{:?}", phase);
    }
}

#[tokio::test]
async fn test_repeated_success_is_idempotent() {
    let (mut once, _, _) = session(DeploymentPhase::Active);
    once.handle_text(&entry_json("DEPLOYMENT_SUCCESS", 1)).unwrap();

    let (mut twice, _, _) = session(DeploymentPhase::Active);
    twice.handle_text(&entry_json("DEPLOYMENT_SUCCESS", 1)).unwrap();
    twice.handle_text(&entry_json("DEPLOYMENT_SUCCESS", 2)).unwrap();

    assert_eq!(once.state(), twice.state());
}

#[tokio::test]
async fn test_kill_click_fires_once_while_available() {
    let (mut session, _page, kill) = session(DeploymentPhase::Active);

    session.handle_event(UserEvent::KillClicked);
    session.handle_event(UserEvent::KillClicked);
    settle().await;

    assert!(session.kill_requested());
    assert_eq!(kill.sent(), 1);
    // Sending the request does not change the page by itself
    assert_eq!(session.state().kill(), KillAvailability::Available);
}

#[tokio::test]
async fn test_kill_click_ignored_after_kill_received() {
    let (mut session, _page, kill) = session(DeploymentPhase::Active);
    session.handle_text(&entry_json("KILL_RECEIVED", 1)).unwrap();

    session.handle_event(UserEvent::KillClicked);
    settle().await;

    assert!(!session.kill_requested());
    assert_eq!(kill.sent(), 0);
}

#[tokio::test]
async fn test_user_events_are_handled_on_the_session_loop() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(UserEvent::Resized(Viewport {
        height: 500,
        log_offset_top: 100,
    }))
    .unwrap();
    tx.send(UserEvent::VisibilityChanged { hidden: true }).unwrap();
    drop(tx);

    let mut messages = stream::iter(Vec::<Result<Message, WsError>>::new());
    let end = session
        .run(&mut messages, rx, futures::future::pending())
        .await;

    assert_eq!(end, SessionEnd::StreamEnded);
    assert_eq!(page.snapshot().max_height, Some(360));
    assert!(session.favicon().visibility().is_hidden());
}

#[tokio::test]
async fn test_close_frame_ends_session() {
    let (mut session, _page, _kill) = session(DeploymentPhase::Active);
    let mut messages = stream::iter(vec![
        text(entry_json("DEPLOYMENT_START", 1)),
        Ok(Message::Close(None)),
        text(entry_json("DEPLOYMENT_SUCCESS", 2)),
    ]);

    let end = session
        .run(&mut messages, closed_events(), futures::future::pending())
        .await;

    assert_eq!(end, SessionEnd::Closed);
    assert_eq!(session.received(), 1);
    assert_eq!(session.state().status(), StatusLabel::Running);
    assert!(!session.favicon().is_rotating());
}

#[tokio::test]
async fn test_transport_error_is_terminal() {
    let (mut session, _page, _kill) = session(DeploymentPhase::Active);
    let mut messages = stream::iter(vec![
        text(entry_json("DEPLOYMENT_START", 1)),
        Err(WsError::ConnectionClosed),
        text(entry_json("DEPLOYMENT_SUCCESS", 2)),
    ]);

    let end = session
        .run(&mut messages, closed_events(), futures::future::pending())
        .await;

    assert!(matches!(end, SessionEnd::TransportError(_)));
    assert_eq!(session.received(), 1);
    assert!(!session.favicon().is_rotating());
}

#[tokio::test]
async fn test_shutdown_stops_session() {
    let (mut session, _page, _kill) = session(DeploymentPhase::Active);
    session.handle_text(&entry_json("DEPLOYMENT_START", 1)).unwrap();

    let mut messages = stream::pending::<Result<Message, WsError>>();
    let end = session
        .run(&mut messages, closed_events(), async {})
        .await;

    assert_eq!(end, SessionEnd::Shutdown);
    assert!(!session.favicon().is_rotating());
}

#[tokio::test]
async fn test_binary_frames_decode_like_text() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);

    let end = session.handle_message(Message::Binary(
        entry_json("STAGE_RESULT", 1).into_bytes().into(),
    ));
    assert!(end.is_none());
    assert!(session
        .handle_message(Message::Ping(Default::default()))
        .is_none());

    assert_eq!(session.received(), 1);
    assert!(page.snapshot().entries[0].contains("logentry-stage-result"));
}

#[tokio::test]
async fn test_no_stream_path_means_no_connection() {
    let mut ctx = context(DeploymentPhase::Successful);
    ctx.stream_path = None;
    let (mut session, page, _kill) = session_with(ctx, SessionOptions::default());

    let end = session
        .connect_and_run(closed_events(), futures::future::pending())
        .await
        .unwrap();

    assert_eq!(end, SessionEnd::NoStream);
    assert_eq!(page.snapshot().status, Some(StatusLabel::Succeeded));
    assert_eq!(page.snapshot().kill, Some(KillAvailability::Removed));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_clears_timer() {
    let (mut session, page, _kill) = session(DeploymentPhase::Active);

    session.handle_text(&entry_json("DEPLOYMENT_START", 1)).unwrap();
    session.handle_text(&entry_json("DEPLOYMENT_START", 2)).unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(session.favicon().active_timers(), 1);

    session.teardown();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(session.favicon().active_timers(), 0);
    assert_eq!(
        page.snapshot().icons_published as u64,
        session.favicon().ticks()
    );
    assert!(page
        .snapshot()
        .last_icon_href
        .unwrap()
        .starts_with("data:image/png;base64,"));
}
