use crate::api::{self, CommentId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid comment: {0}")]
    Validation(#[source] api::Error),

    #[error("root comment quota of {max} is exhausted")]
    QuotaExceeded { max: usize },

    #[error("comment {id} is at depth {depth}, replies are only allowed up to depth {max}")]
    DepthExceeded {
        id: CommentId,
        depth: usize,
        max: usize,
    },

    #[error("comment {0} not found in thread")]
    NotFound(CommentId),

    #[error("syncing with the comment service: {0:#}")]
    Sync(anyhow::Error),
}
