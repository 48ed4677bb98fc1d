//! Terminal rendition of the deployment page

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use colored::Colorize;
use tracing::{debug, info, warn};

use crate::filesys::file::File;
use crate::ui::favicon::RenderedIcon;
use crate::ui::signals::{KillAvailability, StatusLabel};
use crate::ui::views::{IconSink, KillControlView, LogView, SectionView, StatusView};

/// Reduce rendered markup to the text a terminal can show
pub fn markup_to_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut last_was_block_end = false;

    let mut rest = markup;
    while let Some(c) = rest.chars().next() {
        if !in_tag && c == '<' {
            in_tag = true;
            // Closing a label or meta span separates it from what follows
            last_was_block_end = rest.starts_with("</span>");
        } else if in_tag && c == '>' {
            in_tag = false;
            let next_is_space = rest[1..].starts_with(' ');
            if last_was_block_end && !next_is_space && !text.is_empty() && !text.ends_with(' ') {
                text.push(' ');
            }
        } else if !in_tag {
            text.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&hellip;", "...")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Writes each log entry to stdout
#[derive(Debug, Default)]
pub struct TerminalLogView;

impl LogView for TerminalLogView {
    fn append(&mut self, markup: &str) {
        let text = markup_to_text(markup);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", text) {
            warn!("Failed to write log entry: {}", e);
        }
    }

    fn scroll_to_bottom(&mut self) {
        // The terminal is always at its tail; flushing makes the entry visible
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush log output: {}", e);
        }
    }

    fn set_max_height(&mut self, max_height: u32) {
        debug!("Terminal ignores log max height {}", max_height);
    }
}

/// Prints the status badge as a colored line
#[derive(Debug, Default)]
pub struct TerminalStatusView;

impl StatusView for TerminalStatusView {
    fn show_status(&mut self, status: StatusLabel) {
        let badge = format!("[{}]", status.caption());
        let badge = match status {
            StatusLabel::Pending => badge.blue(),
            StatusLabel::Running => badge.cyan(),
            StatusLabel::Succeeded => badge.green().bold(),
            StatusLabel::Failed => badge.red().bold(),
        };
        println!("{} deployment", badge);
    }
}

/// Reports kill control changes
#[derive(Debug, Default)]
pub struct TerminalKillControl;

impl KillControlView for TerminalKillControl {
    fn show_kill(&mut self, availability: KillAvailability) {
        match availability {
            KillAvailability::Available => info!("Kill control available (type `kill` + Enter)"),
            KillAvailability::Disabled => println!("{}", "Kill received, stopping after current stage".yellow()),
            KillAvailability::Removed => debug!("Kill control removed"),
        }
    }
}

/// Writes each redrawn icon to a PNG file
#[derive(Debug)]
pub struct FileIconSink {
    file: File,
}

impl FileIconSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: File::new(path),
        }
    }
}

#[async_trait]
impl IconSink for FileIconSink {
    async fn publish(&mut self, icon: &RenderedIcon) {
        if let Err(e) = self.file.write_bytes(&icon.png).await {
            warn!("Failed to write favicon {:?}: {}", self.file.path(), e);
        }
    }
}

/// Discards icon frames
#[derive(Debug, Default)]
pub struct NullIconSink;

#[async_trait]
impl IconSink for NullIconSink {
    async fn publish(&mut self, _icon: &RenderedIcon) {}
}

/// Prints a dashboard section under a heading
#[derive(Debug)]
pub struct TerminalSection {
    title: String,
}

impl TerminalSection {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        println!("{}", title.bold().underline());
        Self { title }
    }
}

impl SectionView for TerminalSection {
    fn append(&mut self, markup: &str) {
        println!("  {}", markup_to_text(markup));
    }

    fn replace_with(&mut self, markup: &str) {
        println!("  {}", markup_to_text(markup).red());
    }

    fn clear(&mut self) {
        debug!("Section {} cleared", self.title);
    }
}
