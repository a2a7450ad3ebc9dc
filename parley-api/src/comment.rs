use std::fmt;

use crate::{Error, ThreadId};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> CommentId {
        CommentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A comment record as exchanged with the comment service.
///
/// Replies can either be nested in `replies`, or listed flatly next to their
/// parent with `parent_id` set.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author: String,

    /// Glyph shown in place of a profile picture, see `avatar_glyph`
    #[serde(default)]
    pub avatar: String,

    pub content: String,

    /// Creation time, already formatted for display
    pub timestamp: String,

    #[serde(default)]
    pub likes: u64,

    /// Child comments, in display order
    #[serde(default)]
    pub replies: Vec<Comment>,

    #[serde(
        default,
        rename = "questionId",
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<ThreadId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

/// Body of `POST /api/comments`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,

    #[serde(rename = "questionId")]
    pub thread_id: ThreadId,

    pub author: String,
}

impl NewComment {
    pub fn root(thread_id: ThreadId, content: String, author: String) -> NewComment {
        NewComment {
            content,
            parent_id: None,
            thread_id,
            author,
        }
    }

    pub fn reply(
        thread_id: ThreadId,
        parent_id: CommentId,
        content: String,
        author: String,
    ) -> NewComment {
        NewComment {
            content,
            parent_id: Some(parent_id),
            thread_id,
            author,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        if self.author.trim().is_empty() {
            return Err(Error::EmptyAuthor);
        }
        for s in [&self.content, &self.author, &self.thread_id.0] {
            if s.contains('\0') {
                return Err(Error::NullByteInString(s.clone()));
            }
        }
        Ok(())
    }
}

/// First character of the author's name, upper-cased
pub fn avatar_glyph(author: &str) -> String {
    match author.trim().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => String::from("?"),
    }
}
