//! User-facing outcome notices.
//!
//! Flows that owe the shopper a visible outcome (sign-in, sign-out,
//! checkout) push here; the client drains the queue and renders. Bounded
//! so an unread queue cannot grow without limit; the oldest notice is
//! dropped first.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

const MAX_PENDING: usize = 64;

/// Visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One pending notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Shared notice queue. Cheap to clone.
#[derive(Clone, Default)]
pub struct Notifier {
    pending: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into());
    }

    /// Take every pending notice, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        self.lock().drain(..).collect()
    }

    fn push(&self, kind: NoticeKind, message: String) {
        let mut pending = self.lock();
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(Notice { kind, message });
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notice>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
