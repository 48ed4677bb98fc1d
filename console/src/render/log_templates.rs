//! One template per log entry type.
//!
//! The registry is a `match` over [`EntryType`], so adding a tag without a
//! template does not compile.

use crate::errors::DecodeError;
use crate::models::log_entry::{EntryPayload, EntryType, LogEntry};
use crate::render::{html_escape, newline_to_break};

/// Bootstrap label class and caption for an entry type
struct EntryStyle {
    modifier: &'static str,
    label_class: &'static str,
    caption: &'static str,
}

fn style(entry_type: EntryType) -> EntryStyle {
    let (modifier, label_class, caption) = match entry_type {
        EntryType::CommandStdoutOutput => ("stdout", "label-default", "stdout"),
        EntryType::CommandStderrOutput => ("stderr", "label-warning", "stderr"),
        EntryType::CommandStart => ("command-start", "label-default", "Command"),
        EntryType::CommandFail => ("command-fail", "label-danger", "Command failed"),
        EntryType::CommandSuccess => ("command-success", "label-success", "Command succeeded"),
        EntryType::StageStart => ("stage-start", "label-primary", "Stage started"),
        EntryType::StageFail => ("stage-fail", "label-danger", "Stage failed"),
        EntryType::StageSuccess => ("stage-success", "label-success", "Stage succeeded"),
        EntryType::StageResult => ("stage-result", "label-info", "Stage result"),
        EntryType::DeploymentStart => ("deployment-start", "label-info", "Deployment started"),
        EntryType::DeploymentSuccess => ("deployment-success", "label-success", "Deployment successful"),
        EntryType::DeploymentFail => ("deployment-fail", "label-danger", "Deployment failed"),
        EntryType::KillReceived => ("kill-received", "label-warning", "Kill received"),
    };
    EntryStyle {
        modifier,
        label_class,
        caption,
    }
}

/// Render a decoded entry through the template for its type
pub fn render(entry: &LogEntry) -> String {
    let payload = entry.payload();
    match entry.entry_type() {
        EntryType::CommandStdoutOutput => render_output(EntryType::CommandStdoutOutput, payload, ""),
        EntryType::CommandStderrOutput => {
            render_output(EntryType::CommandStderrOutput, payload, " text-danger")
        }
        EntryType::CommandStart => render_line(
            EntryType::CommandStart,
            payload,
            &format!("<code>$ {}</code>", html_escape(&payload.message)),
        ),
        EntryType::CommandFail => render_plain(EntryType::CommandFail, payload),
        EntryType::CommandSuccess => render_plain(EntryType::CommandSuccess, payload),
        EntryType::StageStart => render_stage(EntryType::StageStart, payload),
        EntryType::StageFail => render_stage(EntryType::StageFail, payload),
        EntryType::StageSuccess => render_stage(EntryType::StageSuccess, payload),
        EntryType::StageResult => render_output(EntryType::StageResult, payload, ""),
        EntryType::DeploymentStart => render_plain(EntryType::DeploymentStart, payload),
        EntryType::DeploymentSuccess => render_plain(EntryType::DeploymentSuccess, payload),
        EntryType::DeploymentFail => render_plain(EntryType::DeploymentFail, payload),
        EntryType::KillReceived => render_plain(EntryType::KillReceived, payload),
    }
}

/// Generic entry shown in place of a frame that could not be decoded
pub fn render_decode_error(error: &DecodeError) -> String {
    format!(
        r#"<div class="logentry logentry-error"><span class="label label-danger">Unreadable entry</span> <span class="logentry-message">{}</span></div>"#,
        html_escape(&error.to_string())
    )
}

fn render_plain(entry_type: EntryType, payload: &EntryPayload) -> String {
    render_line(entry_type, payload, &html_escape(&payload.message))
}

fn render_stage(entry_type: EntryType, payload: &EntryPayload) -> String {
    render_line(
        entry_type,
        payload,
        &format!("<strong>{}</strong>", html_escape(&payload.message)),
    )
}

fn render_output(entry_type: EntryType, payload: &EntryPayload, extra_class: &str) -> String {
    let s = style(entry_type);
    format!(
        r#"<div class="logentry logentry-{modifier}" data-entry-id="{id}">{meta}<div class="logentry-output{extra}">{body}</div></div>"#,
        modifier = s.modifier,
        id = payload.id,
        meta = render_meta(payload),
        extra = extra_class,
        body = newline_to_break(&payload.message),
    )
}

fn render_line(entry_type: EntryType, payload: &EntryPayload, body: &str) -> String {
    let s = style(entry_type);
    format!(
        r#"<div class="logentry logentry-{modifier}" data-entry-id="{id}">{meta}<span class="label {label}">{caption}</span> <span class="logentry-message">{body}</span></div>"#,
        modifier = s.modifier,
        id = payload.id,
        meta = render_meta(payload),
        label = s.label_class,
        caption = s.caption,
        body = body,
    )
}

fn render_meta(payload: &EntryPayload) -> String {
    let time = payload
        .timestamp
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    format!(
        r#"<span class="logentry-time">{}</span><span class="logentry-origin">{}</span>"#,
        time,
        html_escape(&payload.origin)
    )
}
