use anyhow::{anyhow, Context};

use crate::{
    api::{self, CommentId, NewComment, ThreadId},
    tree::Tree,
    Comment, Error, QuotaTracker, SyncClient, ThreadConfig,
};

/// One session's view of a discussion thread.
///
/// Every mutation takes `&mut self`, so operations are applied one at a time
/// in the order they are issued. A mutation that fails leaves the tree exactly
/// as it was; dropping the future of an in-flight `load` or `post_*` has the
/// same effect.
pub struct ThreadStore<S> {
    thread_id: ThreadId,
    config: ThreadConfig,
    quota: QuotaTracker,
    tree: Tree,
    sync: S,
}

impl<S: SyncClient> ThreadStore<S> {
    pub fn new(thread_id: ThreadId, sync: S, config: ThreadConfig) -> ThreadStore<S> {
        ThreadStore {
            quota: QuotaTracker::new(config.max_root_comments),
            thread_id,
            config,
            tree: Tree::new(),
            sync,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn config(&self) -> &ThreadConfig {
        &self.config
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    pub fn remaining_quota(&self) -> usize {
        self.quota.remaining()
    }

    pub fn can_post_root(&self) -> bool {
        self.quota.may_post()
    }

    /// False for unknown comments and for comments already at the maximum depth
    pub fn can_reply(&self, id: &CommentId) -> bool {
        self.tree
            .get(id)
            .map(|c| c.depth < self.config.max_depth)
            .unwrap_or(false)
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.tree.get(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Comment> {
        self.tree.roots()
    }

    pub fn replies(&self, id: &CommentId) -> impl Iterator<Item = &Comment> {
        self.tree.replies(id)
    }

    /// Number of comments in the thread, at all depths
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// The whole thread as nested records, in display order
    pub fn snapshot(&self) -> Vec<api::Comment> {
        self.tree.to_records()
    }

    pub fn sync(&self) -> &S {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut S {
        &mut self.sync
    }

    pub fn into_sync(self) -> S {
        self.sync
    }

    /// Forgets the current tree and quota usage, switching to `thread_id`
    pub fn reset(&mut self, thread_id: ThreadId) {
        tracing::debug!(from = %self.thread_id, to = %thread_id, "resetting thread store");
        self.thread_id = thread_id;
        self.tree = Tree::new();
        self.quota.reset_to(0);
    }

    /// Replaces the tree with the service's view of `thread_id`.
    ///
    /// Loading another thread than the current one also resets the quota.
    pub async fn load(&mut self, thread_id: ThreadId) -> Result<(), Error> {
        tracing::debug!(thread = %thread_id, "loading thread");
        let records = self
            .sync
            .fetch_comments(&thread_id)
            .await
            .with_context(|| format!("fetching comments of thread {thread_id}"))
            .map_err(Error::Sync)?;
        let tree = Tree::hydrate(&thread_id, records, self.config.max_depth)
            .with_context(|| format!("rebuilding thread {thread_id}"))
            .map_err(|err| {
                tracing::warn!(?err, "service returned a malformed thread");
                Error::Sync(err)
            })?;

        if thread_id != self.thread_id {
            self.thread_id = thread_id;
            self.quota.reset_to(0);
        }
        if self.config.count_loaded_roots {
            self.quota.reset_to(tree.num_roots());
        }
        self.tree = tree;
        tracing::debug!(
            num_comments = self.tree.len(),
            num_roots = self.tree.num_roots(),
            "loaded thread"
        );
        Ok(())
    }

    pub async fn post_root(&mut self, content: &str, author: &str) -> Result<Comment, Error> {
        if !self.quota.may_post() {
            tracing::warn!(max = self.quota.max(), "rejecting root comment over quota");
            return Err(Error::QuotaExceeded {
                max: self.quota.max(),
            });
        }
        let req = NewComment::root(
            self.thread_id.clone(),
            String::from(content),
            String::from(author),
        );
        req.validate().map_err(Error::Validation)?;

        let created = self.create(&req).await?;
        // The service stored it, so it counts even if it cannot be displayed
        self.quota.increment();
        let comment = self
            .tree
            .append(&self.thread_id, None, created, self.config.max_depth)
            .context("adding created comment to the thread")
            .map_err(Error::Sync)?
            .clone();
        tracing::debug!(
            id = %comment.id,
            remaining = self.quota.remaining(),
            "posted root comment"
        );
        Ok(comment)
    }

    pub async fn post_reply(
        &mut self,
        parent_id: &CommentId,
        content: &str,
        author: &str,
    ) -> Result<Comment, Error> {
        let parent = self.tree.get(parent_id).ok_or_else(|| {
            tracing::warn!(%parent_id, "rejecting reply to unknown comment");
            Error::NotFound(parent_id.clone())
        })?;
        if parent.depth >= self.config.max_depth {
            tracing::warn!(%parent_id, depth = parent.depth, "rejecting reply over depth limit");
            return Err(Error::DepthExceeded {
                id: parent_id.clone(),
                depth: parent.depth,
                max: self.config.max_depth,
            });
        }
        let req = NewComment::reply(
            self.thread_id.clone(),
            parent_id.clone(),
            String::from(content),
            String::from(author),
        );
        req.validate().map_err(Error::Validation)?;

        let created = self.create(&req).await?;
        let comment = self
            .tree
            .append(
                &self.thread_id,
                Some(parent_id),
                created,
                self.config.max_depth,
            )
            .context("adding created reply to the thread")
            .map_err(Error::Sync)?
            .clone();
        tracing::debug!(id = %comment.id, %parent_id, depth = comment.depth, "posted reply");
        Ok(comment)
    }

    /// Adds one like to the comment, whatever its depth
    pub fn like(&mut self, id: &CommentId) -> Result<(), Error> {
        let comment = self.tree.get_mut(id).ok_or_else(|| {
            tracing::warn!(%id, "rejecting like of unknown comment");
            Error::NotFound(id.clone())
        })?;
        comment.likes = comment.likes.saturating_add(1);
        tracing::debug!(%id, likes = comment.likes, "liked comment");
        Ok(())
    }

    async fn create(&mut self, req: &NewComment) -> Result<api::Comment, Error> {
        let mut created = self
            .sync
            .create_comment(req)
            .await
            .context("creating comment")
            .map_err(Error::Sync)?;
        if let Some(thread) = &created.thread_id {
            if *thread != self.thread_id {
                return Err(Error::Sync(anyhow!(
                    "comment {} was created in thread {thread} instead of {}",
                    created.id,
                    self.thread_id,
                )));
            }
        }
        if created.parent_id.is_some() && created.parent_id != req.parent_id {
            tracing::warn!(
                id = %created.id,
                requested = ?req.parent_id,
                returned = ?created.parent_id,
                "service echoed another parent, keeping the requested one"
            );
            created.parent_id = req.parent_id.clone();
        }
        Ok(created)
    }
}
