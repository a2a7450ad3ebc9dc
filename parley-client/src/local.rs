use std::{cmp, collections::HashMap};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::{self, avatar_glyph, format_timestamp, CommentId, NewComment, ThreadId},
    SyncClient,
};

/// Keeps threads in memory, for running without a comment service.
///
/// Ids are derived from the creation time in milliseconds, bumped when
/// needed so that they stay unique.
#[derive(Clone, Debug, Default)]
pub struct LocalSync {
    threads: HashMap<ThreadId, Vec<api::Comment>>,
    last_id: i64,
}

impl LocalSync {
    pub fn new() -> LocalSync {
        LocalSync::default()
    }

    /// Replaces the content of `thread`
    pub fn seed(&mut self, thread: ThreadId, comments: Vec<api::Comment>) {
        self.threads.insert(thread, comments);
    }

    fn next_id(&mut self) -> CommentId {
        let id = cmp::max(Utc::now().timestamp_millis(), self.last_id + 1);
        self.last_id = id;
        CommentId(id.to_string())
    }
}

fn find_in<'a>(comments: &'a mut [api::Comment], id: &CommentId) -> Option<&'a mut api::Comment> {
    for c in comments.iter_mut() {
        if c.id == *id {
            return Some(c);
        }
        if let Some(res) = find_in(&mut c.replies, id) {
            return Some(res);
        }
    }
    None
}

#[async_trait]
impl SyncClient for LocalSync {
    async fn fetch_comments(&mut self, thread: &ThreadId) -> anyhow::Result<Vec<api::Comment>> {
        Ok(self.threads.get(thread).cloned().unwrap_or_default())
    }

    async fn create_comment(&mut self, c: &NewComment) -> anyhow::Result<api::Comment> {
        c.validate()?;
        let comment = api::Comment {
            id: self.next_id(),
            author: c.author.clone(),
            avatar: avatar_glyph(&c.author),
            content: c.content.clone(),
            timestamp: format_timestamp(&Utc::now()),
            likes: 0,
            replies: Vec::new(),
            thread_id: Some(c.thread_id.clone()),
            parent_id: c.parent_id.clone(),
        };
        let thread = self.threads.entry(c.thread_id.clone()).or_default();
        match &c.parent_id {
            None => thread.push(comment.clone()),
            Some(parent) => find_in(thread, parent)
                .ok_or_else(|| anyhow!(api::Error::ParentNotFound(parent.clone())))?
                .replies
                .push(comment.clone()),
        }
        tracing::debug!(id = %comment.id, thread = %c.thread_id, "stored comment locally");
        Ok(comment)
    }
}
