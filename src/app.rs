use crate::feed::{FeedState, PageOutcome};
use crate::news::Article;
use crate::opener::{open_link, LinkOpener};
use std::borrow::Cow;
use tokio::time::Instant;

/// How long a status message stays in the status bar.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Event Types
// ============================================================================

/// What caused a page fetch. Only used for status text and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// First page, requested at startup.
    Startup,
    /// Viewer reached the second-to-last card.
    Prefetch,
    /// User pressed the retry key.
    Manual,
}

impl FetchTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchTrigger::Startup => "startup",
            FetchTrigger::Prefetch => "prefetch",
            FetchTrigger::Manual => "manual",
        }
    }
}

/// Events from background tasks
pub enum AppEvent {
    /// A fetch task finished. The feed state itself arrives through the
    /// store's watch channel; this only carries the outcome for the status bar.
    FetchFinished {
        trigger: FetchTrigger,
        result: Result<PageOutcome, String>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Viewer
// ============================================================================

/// Position of the card on screen.
///
/// Every move is checked against the current length, so the index stays in
/// `[0, len)` whenever the feed is non-empty. Methods return the new index
/// when the position actually changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    index: usize,
}

impl Viewer {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if self.index + 1 >= len {
            return None;
        }
        self.index += 1;
        Some(self.index)
    }

    pub fn back(&mut self) -> Option<usize> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.index)
    }

    pub fn first(&mut self) -> Option<usize> {
        if self.index == 0 {
            return None;
        }
        self.index = 0;
        Some(0)
    }

    pub fn last(&mut self, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        if self.index == last {
            return None;
        }
        self.index = last;
        Some(last)
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central UI state
pub struct App {
    /// Latest snapshot published by the feed store.
    pub feed: FeedState,
    pub viewer: Viewer,
    pub opener: Box<dyn LinkOpener>,

    /// Shown in the card border, e.g. "bbc-news".
    pub source_label: String,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    pub show_help: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(opener: Box<dyn LinkOpener>, source_label: impl Into<String>) -> Self {
        Self {
            feed: FeedState::new(),
            viewer: Viewer::default(),
            opener,
            source_label: source_label.into(),
            status_message: None,
            needs_redraw: true,
            show_help: false,
            spinner_frame: 0,
        }
    }

    /// Take a new snapshot from the store. The viewer keeps its position.
    pub fn apply_feed_state(&mut self, state: FeedState) {
        self.feed = state;
        self.needs_redraw = true;
    }

    pub fn current_article(&self) -> Option<&Article> {
        self.feed.items.get(self.viewer.index())
    }

    pub fn advance(&mut self) -> Option<usize> {
        self.viewer.advance(self.feed.len())
    }

    pub fn back(&mut self) -> Option<usize> {
        self.viewer.back()
    }

    pub fn jump_first(&mut self) -> Option<usize> {
        self.viewer.first()
    }

    pub fn jump_last(&mut self) -> Option<usize> {
        self.viewer.last(self.feed.len())
    }

    /// Open the current card's link. Empty links do nothing.
    pub fn open_current(&mut self) {
        let Some(url) = self.current_article().map(|a| a.link_url.clone()) else {
            return;
        };
        match open_link(self.opener.as_ref(), &url) {
            Ok(true) => self.set_status("Opened in browser"),
            Ok(false) => self.set_status("This article has no link"),
            Err(e) => self.set_status(format!("Could not open link: {}", e)),
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
