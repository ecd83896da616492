use std::fmt;

use crate::models::Post;

/// One-shot user-facing notice. The screen shows at most one at a time;
/// a newer notice replaces an unacknowledged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FeedFetchFailed,
    CaptureFailed,
    PostCreationFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::FeedFetchFailed => "Problem in Fetching Posts",
            Notice::CaptureFailed => "Problem in Capturing Photo",
            Notice::PostCreationFailed => "Problem in Creating Post",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Feed part of the screen. `posts` keeps server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub posts: Vec<Post>,
    pub is_loading: bool,
    pub notice: Option<Notice>,
}

impl Default for FeedState {
    // The first paint shows the spinner until activation loads the feed.
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            is_loading: true,
            notice: None,
        }
    }
}

impl FeedState {
    /// Posts newest-first: the reverse of server order.
    pub fn display_order(&self) -> Vec<Post> {
        self.posts.iter().rev().cloned().collect()
    }
}
