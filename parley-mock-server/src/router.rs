use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use parley_client::api::{Comment, Error, NewComment, ThreadId};
use tokio::sync::Mutex;

use crate::MockServer;

pub type SharedServer = Arc<Mutex<MockServer>>;

/// Serves a `MockServer` with the comment service's HTTP routes
pub fn router(server: SharedServer) -> Router {
    Router::new()
        .route("/api/comments/question/:thread", get(fetch_comments))
        .route("/api/comments", post(create_comment))
        .with_state(server)
}

#[derive(Debug)]
pub struct HttpError(pub Error);

impl From<Error> for HttpError {
    fn from(err: Error) -> HttpError {
        HttpError(err)
    }
}

impl axum::response::IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let HttpError(err) = self;
        match err {
            Error::Unknown(_) => tracing::error!(?err, "internal server error"),
            _ => tracing::info!("returning error to client: {err}"),
        }
        (err.status_code(), err.contents()).into_response()
    }
}

async fn fetch_comments(
    State(server): State<SharedServer>,
    Path(thread): Path<String>,
) -> Result<Json<Vec<Comment>>, HttpError> {
    Ok(Json(server.lock().await.fetch_comments(&ThreadId(thread))?))
}

async fn create_comment(
    State(server): State<SharedServer>,
    Json(data): Json<NewComment>,
) -> Result<Json<Comment>, HttpError> {
    Ok(Json(server.lock().await.create_comment(data)?))
}
