//! Render-side list of chat bubbles
//!
//! The window is a projection of what the user sees, separate from the
//! conversation sent to the worker: it also holds the greeting, in-flight
//! placeholders and failure notices, none of which are part of the history.

use std::fmt;

pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Correlation id for one submission, carried from placeholder to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl TurnId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    User,
    Ai,
}

impl BubbleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleKind::User => "user",
            BubbleKind::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub kind: BubbleKind,
    pub text: String,
    /// Set only on the loading bubble of an in-flight turn.
    pub pending: Option<TurnId>,
}

impl Bubble {
    pub fn is_placeholder(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ChatWindow {
    bubbles: Vec<Bubble>,
    scroll: u16,
    unpinned: bool,
}

impl ChatWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, kind: BubbleKind, text: impl Into<String>) {
        self.push(Bubble { kind, text: text.into(), pending: None });
    }

    pub fn append_placeholder(&mut self, turn: TurnId) {
        self.push(Bubble {
            kind: BubbleKind::Ai,
            text: PLACEHOLDER_TEXT.to_string(),
            pending: Some(turn),
        });
    }

    /// Remove the placeholder belonging to `turn`. Other bubbles are untouched,
    /// including ones that happen to read "Thinking...".
    pub fn remove_placeholder(&mut self, turn: TurnId) -> bool {
        match self.bubbles.iter().rposition(|b| b.pending == Some(turn)) {
            Some(idx) => {
                self.bubbles.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn has_placeholder(&self) -> bool {
        self.bubbles.iter().any(Bubble::is_placeholder)
    }

    pub fn last(&self) -> Option<&Bubble> {
        self.bubbles.last()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    fn push(&mut self, bubble: Bubble) {
        tracing::trace!(kind = bubble.kind.as_str(), placeholder = bubble.is_placeholder(), "bubble appended");
        self.bubbles.push(bubble);
        self.scroll_to_bottom();
    }

    // Scrolling

    pub fn scroll_to_bottom(&mut self) {
        self.unpinned = false;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.unpinned = true;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn is_pinned_to_bottom(&self) -> bool {
        !self.unpinned
    }

    /// Resolve the scroll offset for a viewport showing `content_height` rows
    /// of wrapped text. Pinned windows stick to the bottom; scrolling back down
    /// to the bottom re-pins.
    pub fn viewport_offset(&mut self, viewport_height: u16, content_height: u16) -> u16 {
        let max_scroll = content_height.saturating_sub(viewport_height);

        if !self.unpinned || self.scroll >= max_scroll {
            self.unpinned = false;
            self.scroll = max_scroll;
        }

        self.scroll
    }
}
