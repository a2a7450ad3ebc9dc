use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parley_client::{
    api::{
        avatar_glyph, format_timestamp, Comment, CommentId, Error, NewComment, ThreadId, Uuid,
    },
    SyncClient,
};

mod router;
pub use router::{router, HttpError, SharedServer};

/// In-memory stand-in for the comment service.
///
/// Comments are returned as a flat list in creation order, replies carrying
/// their `parent_id`.
#[derive(Debug, Default)]
pub struct MockServer {
    threads: BTreeMap<ThreadId, Vec<Comment>>,
    offline: bool,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    /// While offline, every call fails as if the service was unreachable
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Return the number of comments stored for `thread`, at all depths
    pub fn test_num_comments(&self, thread: &ThreadId) -> usize {
        self.threads.get(thread).map(|t| t.len()).unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), Error> {
        match self.offline {
            true => Err(Error::Unknown(String::from("comment service is offline"))),
            false => Ok(()),
        }
    }

    pub fn fetch_comments(&self, thread: &ThreadId) -> Result<Vec<Comment>, Error> {
        self.check_online()?;
        Ok(self.threads.get(thread).cloned().unwrap_or_default())
    }

    pub fn create_comment(&mut self, c: NewComment) -> Result<Comment, Error> {
        self.check_online()?;
        c.validate()?;
        let thread = self.threads.entry(c.thread_id.clone()).or_default();
        if let Some(parent) = &c.parent_id {
            if !thread.iter().any(|existing| existing.id == *parent) {
                return Err(Error::ParentNotFound(parent.clone()));
            }
        }
        let comment = Comment {
            id: CommentId(Uuid::new_v4().to_string()),
            avatar: avatar_glyph(&c.author),
            author: c.author,
            content: c.content,
            timestamp: format_timestamp(&Utc::now()),
            likes: 0,
            replies: Vec::new(),
            thread_id: Some(c.thread_id),
            parent_id: c.parent_id,
        };
        thread.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl SyncClient for MockServer {
    async fn fetch_comments(&mut self, thread: &ThreadId) -> anyhow::Result<Vec<Comment>> {
        Ok(MockServer::fetch_comments(self, thread)?)
    }

    async fn create_comment(&mut self, comment: &NewComment) -> anyhow::Result<Comment> {
        Ok(MockServer::create_comment(self, comment.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use parley_client::{Error as StoreError, ThreadConfig, ThreadStore};

    use super::*;

    fn root(thread: &str, content: &str) -> NewComment {
        NewComment::root(ThreadId::new(thread), content.into(), "Ana".into())
    }

    #[test]
    fn replies_are_listed_flatly() {
        let mut server = MockServer::new();
        let r = server.create_comment(root("q1", "root")).unwrap();
        let a = server
            .create_comment(NewComment::reply(
                ThreadId::new("q1"),
                r.id.clone(),
                "reply".into(),
                "Bo".into(),
            ))
            .unwrap();
        server.create_comment(root("q2", "elsewhere")).unwrap();

        let fetched = server.fetch_comments(&ThreadId::new("q1")).unwrap();
        assert_eq!(fetched, vec![r.clone(), a.clone()]);
        assert_eq!(a.parent_id, Some(r.id));
        assert_eq!(a.avatar, "B");
        assert_eq!(server.test_num_comments(&ThreadId::new("q2")), 1);
    }

    #[test]
    fn parent_must_be_in_thread() {
        let mut server = MockServer::new();
        let r = server.create_comment(root("q1", "root")).unwrap();
        let res = server.create_comment(NewComment::reply(
            ThreadId::new("q2"),
            r.id.clone(),
            "lost".into(),
            "Bo".into(),
        ));
        assert_eq!(res, Err(Error::ParentNotFound(r.id)));
        assert_eq!(server.test_num_comments(&ThreadId::new("q2")), 0);
    }

    #[test]
    fn rejects_invalid_comments() {
        let mut server = MockServer::new();
        assert_eq!(server.create_comment(root("q1", " ")), Err(Error::EmptyContent));
        assert_eq!(server.test_num_comments(&ThreadId::new("q1")), 0);
    }

    #[tokio::test]
    async fn store_over_mock_server() {
        let t = ThreadId::new("q1");
        let mut store = ThreadStore::new(t.clone(), MockServer::new(), ThreadConfig::remote());
        let r = store.post_root("R", "Ana").await.unwrap();
        let a = store.post_reply(&r.id, "A", "Bo").await.unwrap();
        let b = store.post_reply(&a.id, "B", "Cy").await.unwrap();
        let before = store.snapshot();

        store.load(t.clone()).await.unwrap();
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.get(&b.id).unwrap().depth, 2);

        store.sync_mut().set_offline(true);
        let err = store.load(t).await.unwrap_err();
        assert!(matches!(err, StoreError::Sync(_)), "{err:?}");
        assert_eq!(store.snapshot(), before);
    }
}
