use anyhow::{anyhow, Context};
use serde_json::json;

use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Comment content is empty")]
    EmptyContent,

    #[error("Comment author is empty")]
    EmptyAuthor,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Parent comment {0} not found in thread")]
    ParentNotFound(CommentId),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::EmptyContent => StatusCode::BAD_REQUEST,
            Error::EmptyAuthor => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::ParentNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::EmptyContent => json!({
                "message": "comment content is required",
                "type": "empty-content",
            }),
            Error::EmptyAuthor => json!({
                "message": "comment author is required",
                "type": "empty-author",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::ParentNotFound(id) => json!({
                "message": "parent comment not found",
                "type": "parent-not-found",
                "id": id,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "empty-content" => Error::EmptyContent,
                "empty-author" => Error::EmptyAuthor,
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                "parent-not-found" => Error::ParentNotFound(CommentId::new(
                    data.get("id")
                        .and_then(|id| id.as_str())
                        .ok_or_else(|| anyhow!("error is a missing parent without an id"))?,
                )),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
