use serde::{Deserialize, Serialize};

/// One entry of the feed as the posts API returns it.
/// Posts have no id; a post is identified by its position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub nickname: String,
    pub message: String,
    pub image: PostImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    pub url: String,
}
