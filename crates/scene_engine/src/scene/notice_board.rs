//! Deferred mailbox for messages whose recipient cannot receive yet
//!
//! Notices are kept in arrival order until their recipient registers (or
//! finishes loading) and are then delivered exactly once. Nothing is ever
//! dropped: notices addressed to a name that never registers stay on the
//! board for the lifetime of the scene. The soft limit only makes that
//! growth visible in the log.

use crate::core::NoticeBoardConfig;

use super::participant::Message;

/// A pending addressed message
#[derive(Debug, Clone)]
pub struct Notice {
    pub sender: String,
    pub recipient: String,
    pub data: Message,
}

/// Ordered list of pending notices
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    soft_limit: Option<usize>,
    over_limit: bool,
}

impl NoticeBoard {
    pub fn new(config: &NoticeBoardConfig) -> Self {
        Self {
            notices: Vec::new(),
            soft_limit: config.soft_limit,
            over_limit: false,
        }
    }

    /// Append a notice
    pub fn push(&mut self, sender: &str, recipient: &str, data: Message) {
        log::trace!("Notice from '{}' to '{}' parked on the board", sender, recipient);
        self.notices.push(Notice {
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
            data,
        });

        if let Some(limit) = self.soft_limit {
            if !self.over_limit && self.notices.len() > limit {
                self.over_limit = true;
                log::warn!(
                    "Notice board holds {} undelivered messages (soft limit {}); \
                     unregistered recipients keep their messages indefinitely",
                    self.notices.len(),
                    limit
                );
            }
        }
    }

    /// Remove and return every notice addressed to `recipient`, oldest first
    pub fn flush(&mut self, recipient: &str) -> Vec<Notice> {
        if !self.notices.iter().any(|notice| notice.recipient == recipient) {
            return Vec::new();
        }

        let (matched, rest): (Vec<Notice>, Vec<Notice>) = std::mem::take(&mut self.notices)
            .into_iter()
            .partition(|notice| notice.recipient == recipient);
        self.notices = rest;

        if let Some(limit) = self.soft_limit {
            if self.notices.len() <= limit {
                self.over_limit = false;
            }
        }
        matched
    }

    /// Number of notices waiting for `recipient`
    pub fn pending_for(&self, recipient: &str) -> usize {
        self.notices.iter().filter(|notice| notice.recipient == recipient).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// True once the board has grown past its configured soft limit
    pub fn is_over_soft_limit(&self) -> bool {
        self.over_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_returns_only_matching_in_order() {
        let mut board = NoticeBoard::default();
        board.push("X", "A", Message::Scalar(1.0));
        board.push("X", "B", Message::Scalar(2.0));
        board.push("Y", "A", Message::Scalar(3.0));

        let flushed = board.flush("A");
        let values: Vec<_> = flushed.iter().filter_map(|n| n.data.as_scalar()).collect();
        assert_eq!(values, vec![1.0, 3.0]);
        assert_eq!(flushed[1].sender, "Y");

        assert_eq!(board.len(), 1);
        assert_eq!(board.pending_for("B"), 1);
        assert!(board.flush("A").is_empty());
    }

    #[test]
    fn test_no_deduplication() {
        let mut board = NoticeBoard::default();
        board.push("X", "A", Message::Scalar(1.0));
        board.push("X", "A", Message::Scalar(1.0));
        assert_eq!(board.flush("A").len(), 2);
    }

    #[test]
    fn test_soft_limit_warns_but_keeps_everything() {
        let mut board = NoticeBoard::new(&NoticeBoardConfig { soft_limit: Some(2) });
        for i in 0..5 {
            board.push("X", "Ghost", Message::Scalar(i as f32));
        }

        assert!(board.is_over_soft_limit());
        assert_eq!(board.len(), 5);

        assert_eq!(board.flush("Ghost").len(), 5);
        assert!(!board.is_over_soft_limit());
    }
}
