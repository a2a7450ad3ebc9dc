use async_trait::async_trait;

use crate::api::{Comment, NewComment, ThreadId};

/// Access to the service persisting comments.
///
/// Implementations do not retry: a failed call is reported as is.
#[async_trait]
pub trait SyncClient {
    /// Root comments of `thread` in display order, with their replies either
    /// nested or listed flatly
    async fn fetch_comments(&mut self, thread: &ThreadId) -> anyhow::Result<Vec<Comment>>;

    /// Persists `comment`, returning the authoritative record
    async fn create_comment(&mut self, comment: &NewComment) -> anyhow::Result<Comment>;
}
