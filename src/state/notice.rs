//! Transient user-facing notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! Operation errors from views (a rejected trade, a failed login) land here
//! and are shown by `NoticeBanner`. Session state is never touched.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use crate::net::error::ApiError;

/// Maximum notices kept on screen; older ones are dropped first.
pub const MAX_NOTICES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeState {
    /// Queue a notice and return its id.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice { id, level, message: message.into() });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
        id
    }

    /// Queue an API failure using its user-facing message.
    pub fn push_error(&mut self, err: &ApiError) -> u64 {
        log::warn!("operation failed ({}): {err}", err.error_code());
        self.push(NoticeLevel::Error, err.user_message())
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }
}
