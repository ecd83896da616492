pub mod draft;
pub mod feed;
pub mod post;

pub use draft::{CapturedImage, CompleteDraft, DataUrlError, DraftPost, ImageBlob, MissingField};
pub use feed::{FeedState, Notice};
pub use post::{Post, PostImage};
