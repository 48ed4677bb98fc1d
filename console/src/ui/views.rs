//! Seams between the session and whatever displays it

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ui::favicon::RenderedIcon;
use crate::ui::signals::{KillAvailability, StatusLabel};

/// The visible log container
pub trait LogView: Send {
    /// Insert markup after every previously appended entry
    fn append(&mut self, markup: &str);

    /// Scroll the container so the newest entry is visible
    fn scroll_to_bottom(&mut self);

    /// Cap the container height; overflow scrolls inside it
    fn set_max_height(&mut self, max_height: u32);
}

/// The deployment status badge
pub trait StatusView: Send {
    fn show_status(&mut self, status: StatusLabel);
}

/// The kill button
pub trait KillControlView: Send {
    fn show_kill(&mut self, availability: KillAvailability);
}

/// Receives each redrawn title icon
#[async_trait]
pub trait IconSink: Send {
    async fn publish(&mut self, icon: &RenderedIcon);
}

/// Dashboard section filled by a fetcher (pull requests, branches, diff)
pub trait SectionView: Send {
    fn append(&mut self, markup: &str);

    /// Replace the whole section, container included
    fn replace_with(&mut self, markup: &str);

    fn clear(&mut self);
}

/// Everything a [`MemoryPage`] has been asked to show
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub entries: Vec<String>,
    pub scroll_count: usize,
    pub scrolled_to: Option<usize>,
    pub max_height: Option<u32>,
    pub status: Option<StatusLabel>,
    pub kill: Option<KillAvailability>,
    pub icons_published: usize,
    pub last_icon_href: Option<String>,
}

/// In-memory page. Clones share state, so a test can keep one handle and
/// give the others to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    inner: Arc<Mutex<PageSnapshot>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        // Poisoning only follows a panic in another view call
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogView for MemoryPage {
    fn append(&mut self, markup: &str) {
        self.lock().entries.push(markup.to_string());
    }

    fn scroll_to_bottom(&mut self) {
        let mut page = self.lock();
        page.scroll_count += 1;
        page.scrolled_to = Some(page.entries.len());
    }

    fn set_max_height(&mut self, max_height: u32) {
        self.lock().max_height = Some(max_height);
    }
}

impl StatusView for MemoryPage {
    fn show_status(&mut self, status: StatusLabel) {
        self.lock().status = Some(status);
    }
}

impl KillControlView for MemoryPage {
    fn show_kill(&mut self, availability: KillAvailability) {
        self.lock().kill = Some(availability);
    }
}

#[async_trait]
impl IconSink for MemoryPage {
    async fn publish(&mut self, icon: &RenderedIcon) {
        let href = icon.href();
        let mut page = self.lock();
        page.icons_published += 1;
        page.last_icon_href = Some(href);
    }
}

/// In-memory dashboard section
#[derive(Debug, Clone, Default)]
pub struct MemorySection {
    inner: Arc<Mutex<SectionSnapshot>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSnapshot {
    pub items: Vec<String>,
    pub replaced_with: Option<String>,
}

impl MemorySection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SectionSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SectionSnapshot> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SectionView for MemorySection {
    fn append(&mut self, markup: &str) {
        self.lock().items.push(markup.to_string());
    }

    fn replace_with(&mut self, markup: &str) {
        let mut section = self.lock();
        section.items.clear();
        section.replaced_with = Some(markup.to_string());
    }

    fn clear(&mut self) {
        self.lock().items.clear();
    }
}
