//! Transient user-facing notices.
//!
//! Commands report outcomes ("Copied to clipboard", "Copy failed", ...) as
//! [`Notice`]s handed to a [`NoticeSink`]. The process has one sink, installed
//! at most once through [`init`]; [`sink`] falls back to stderr if nothing
//! was installed.

use log::debug;
use once_cell::sync::OnceCell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    /// A failed action the user asked for. Recoverable.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Destructive, title, description)
    }

    fn new(kind: NoticeKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Destructive => "error",
        };
        if self.description.is_empty() {
            write!(f, "[{}] {}", marker, self.title)
        } else {
            write!(f, "[{}] {}: {}", marker, self.title, self.description)
        }
    }
}

pub trait NoticeSink: Send + Sync {
    fn show(&self, notice: &Notice);
}

/// Writes notices to stderr, keeping stdout for command results.
pub struct StderrSink;

impl NoticeSink for StderrSink {
    fn show(&self, notice: &Notice) {
        eprintln!("{}", notice);
    }
}

static SINK: OnceCell<Box<dyn NoticeSink>> = OnceCell::new();

/// Installs the process-wide sink. Only the first call has an effect; returns
/// whether this call installed it.
pub fn init(sink: Box<dyn NoticeSink>) -> bool {
    let installed = SINK.set(sink).is_ok();
    if !installed {
        debug!("Notice sink already initialized");
    }
    installed
}

/// The process-wide sink.
pub fn sink() -> &'static dyn NoticeSink {
    SINK.get_or_init(|| Box::new(StderrSink)).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingSink;

    #[test]
    fn test_display() {
        let notice = Notice::destructive("Copy failed", "Could not copy text to clipboard");
        assert_eq!(
            notice.to_string(),
            "[error] Copy failed: Could not copy text to clipboard"
        );

        let notice = Notice::success("Download complete", "");
        assert_eq!(notice.to_string(), "[ok] Download complete");
    }

    #[test]
    fn test_init_is_idempotent() {
        // First call may or may not win depending on test order; the second never does
        let _ = init(Box::new(RecordingSink::default()));
        assert!(!init(Box::new(StderrSink)));
        sink().show(&Notice::info("still works", ""));
    }

    #[test]
    fn test_recording_sink_collects_in_order() {
        let sink = RecordingSink::default();
        sink.show(&Notice::info("a", ""));
        sink.show(&Notice::success("b", ""));
        let titles: Vec<_> = sink.notices().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
