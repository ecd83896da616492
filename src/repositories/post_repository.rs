// src/repositories/post_repository.rs - posts API over HTTP

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::dtos::post_dtos::NewPostUpload;
use crate::models::Post;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("posts api error: {status} -> {body}")]
    Status { status: u16, body: String },
}

/// The two endpoints of the remote posts service.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /posts`, in server order.
    async fn fetch_posts(&self) -> Result<Vec<Post>, RepoError>;

    /// `POST /posts` as multipart. The created post is not returned;
    /// callers reload the feed instead.
    async fn create_post(&self, upload: NewPostUpload) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct HttpPostRepository {
    client: Client,
    base_url: String,
}

impl HttpPostRepository {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RepoError> {
        let client = Client::builder()
            .user_agent(concat!("posts-feed/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self::new(client, base_url))
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PostsApi for HttpPostRepository {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RepoError> {
        let url = self.posts_url();
        debug!("Fetching posts from: {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        // Only a plain 200 carries a feed.
        if status != reqwest::StatusCode::OK {
            return Err(RepoError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let posts: Vec<Post> = serde_json::from_str(&text)?;
        debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    async fn create_post(&self, upload: NewPostUpload) -> Result<(), RepoError> {
        let url = self.posts_url();
        let data = serde_json::to_string(&upload.data)?;

        let image = Part::bytes(upload.image.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(upload.image.mime.essence_str())?;
        let form = Form::new()
            .part("files.image", image)
            .text("data", data);

        info!("Creating post with attachment {}", upload.file_name);

        let resp = self
            .client
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RepoError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Post creation response status: {}", status);
        Ok(())
    }
}
