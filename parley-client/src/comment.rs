use std::borrow::Cow;

use crate::api::{self, avatar_glyph, CommentId, ThreadId};

/// A comment as held by a `ThreadStore`.
///
/// Replies are not stored inline: they live in the store's arena and are
/// reached through `ThreadStore::replies`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub thread_id: ThreadId,

    /// None for root comments
    pub parent_id: Option<CommentId>,

    /// 0 for root comments, parent's depth + 1 for replies
    pub depth: usize,

    pub author: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u64,

    /// Fields as the service sent them, possibly empty or missing
    raw_avatar: String,
    raw_thread_id: Option<ThreadId>,
    raw_parent_id: Option<CommentId>,
}

impl Comment {
    /// Drops `r.replies`, the caller is responsible for attaching them
    pub(crate) fn from_record(
        r: api::Comment,
        thread_id: &ThreadId,
        parent_id: Option<CommentId>,
        depth: usize,
    ) -> Comment {
        Comment {
            id: r.id,
            thread_id: thread_id.clone(),
            parent_id,
            depth,
            author: r.author,
            content: r.content,
            timestamp: r.timestamp,
            likes: r.likes,
            raw_avatar: r.avatar,
            raw_thread_id: r.thread_id,
            raw_parent_id: r.parent_id,
        }
    }

    /// Rebuilds the record this comment was read from, with the current likes
    pub(crate) fn to_record(&self, replies: Vec<api::Comment>) -> api::Comment {
        api::Comment {
            id: self.id.clone(),
            author: self.author.clone(),
            avatar: self.raw_avatar.clone(),
            content: self.content.clone(),
            timestamp: self.timestamp.clone(),
            likes: self.likes,
            replies,
            thread_id: self.raw_thread_id.clone(),
            parent_id: self.raw_parent_id.clone(),
        }
    }

    /// The service's avatar, or one derived from the author's name
    pub fn avatar(&self) -> Cow<'_, str> {
        match self.raw_avatar.is_empty() {
            true => Cow::Owned(avatar_glyph(&self.author)),
            false => Cow::Borrowed(&self.raw_avatar),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
