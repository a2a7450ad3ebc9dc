use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::{
    api::{self, NewComment, ThreadId},
    SyncClient,
};

/// Talks to the comment service over HTTP.
///
/// `host` is the service's base url, eg. `http://localhost:8080`.
#[derive(Clone, Debug)]
pub struct HttpSync {
    client: Client,
    host: Url,
}

impl HttpSync {
    pub fn new(host: &str) -> anyhow::Result<HttpSync> {
        HttpSync::with_client(host, Client::new())
    }

    /// Fails any request that did not complete after `timeout`
    pub fn with_timeout(host: &str, timeout: Duration) -> anyhow::Result<HttpSync> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        HttpSync::with_client(host, client)
    }

    pub fn with_client(host: &str, client: Client) -> anyhow::Result<HttpSync> {
        let host = Url::parse(host).with_context(|| format!("parsing host url {host:?}"))?;
        if host.cannot_be_a_base() {
            return Err(anyhow!("host url {host} cannot be used as a base"));
        }
        Ok(HttpSync { client, host })
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("host url {} cannot be used as a base", self.host))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn parse_response<R>(resp: Response) -> anyhow::Result<R>
where
    R: for<'de> serde::Deserialize<'de>,
{
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.context("parsing response from server");
    }
    let body = resp
        .bytes()
        .await
        .with_context(|| format!("reading body of {status} response"))?;
    match api::Error::parse(&body) {
        Ok(err) => Err(anyhow!(err).context(format!("server answered {status}"))),
        Err(_) => Err(anyhow!(
            "server answered {status}: {}",
            String::from_utf8_lossy(&body)
        )),
    }
}

#[async_trait]
impl SyncClient for HttpSync {
    async fn fetch_comments(&mut self, thread: &ThreadId) -> anyhow::Result<Vec<api::Comment>> {
        let url = self.endpoint(&["api", "comments", "question", thread.as_str()])?;
        tracing::debug!(%url, "fetching comments");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("sending fetch request")?;
        parse_response(resp).await
    }

    async fn create_comment(&mut self, comment: &NewComment) -> anyhow::Result<api::Comment> {
        let url = self.endpoint(&["api", "comments"])?;
        tracing::debug!(%url, parent = ?comment.parent_id, "creating comment");
        let resp = self
            .client
            .post(url)
            .json(comment)
            .send()
            .await
            .context("sending create request")?;
        parse_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_escaped() {
        let sync = HttpSync::new("http://localhost:8080").unwrap();
        assert_eq!(
            sync.endpoint(&["api", "comments", "question", "q 1/2"])
                .unwrap()
                .as_str(),
            "http://localhost:8080/api/comments/question/q%201%2F2",
        );
        let sync = HttpSync::new("http://example.org/forum/").unwrap();
        assert_eq!(
            sync.endpoint(&["api", "comments"]).unwrap().as_str(),
            "http://example.org/forum/api/comments",
        );
    }

    #[test]
    fn rejects_unusable_hosts() {
        assert!(HttpSync::new("not a url").is_err());
        assert!(HttpSync::new("mailto:someone@example.org").is_err());
    }
}
