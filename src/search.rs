//! Debounced search text.
//!
//! The UI writes every keystroke into a [`Debounced`] and polls it from its
//! timer loop; once the text has been quiet for the configured interval the
//! poll yields the query to send. Nothing here performs I/O.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debounced {
    text: String,
    interval: Duration,
    changed_at: Option<Instant>,
    /// Last query handed out by [`Debounced::poll`].
    issued: Option<String>,
    /// Fire on the next poll regardless of the quiet period.
    force: bool,
}

impl Debounced {
    /// A fresh search whose empty initial query fires on the first poll.
    pub fn new(interval: Duration) -> Self {
        Self {
            text: String::new(),
            interval,
            changed_at: None,
            issued: None,
            force: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Record new search text. Restarts the quiet period.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.changed_at = Some(now);
    }

    /// Re-issue the current text on the next poll, skipping the delay.
    pub fn refetch(&mut self) {
        self.force = true;
    }

    /// Return the query to send, if one is due.
    ///
    /// A pending change fires once `interval` has elapsed since the last
    /// [`set`](Self::set); text identical to the last issued query is not
    /// re-sent unless [`refetch`](Self::refetch) was called.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.force {
            self.force = false;
            self.changed_at = None;
            self.issued = Some(self.text.clone());
            return Some(self.text.clone());
        }

        let changed_at = self.changed_at?;
        if now.saturating_duration_since(changed_at) < self.interval {
            return None;
        }
        self.changed_at = None;
        if self.issued.as_deref() == Some(self.text.as_str()) {
            return None;
        }
        self.issued = Some(self.text.clone());
        Some(self.text.clone())
    }
}
