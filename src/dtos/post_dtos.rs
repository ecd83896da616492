use serde::Serialize;
use uuid::Uuid;

use crate::models::{CompleteDraft, DataUrlError, ImageBlob};

/// The `data` part of a post creation request.
/// Field order matters: the server receives it as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostData {
    pub message: String,
    pub nickname: String,
}

/// Everything needed to send one `POST /posts` multipart request.
#[derive(Debug, Clone)]
pub struct NewPostUpload {
    pub data: CreatePostData,
    pub image: ImageBlob,
    pub file_name: String,
}

impl NewPostUpload {
    pub fn from_draft(draft: CompleteDraft<'_>) -> Result<Self, DataUrlError> {
        let image = draft.image.to_blob()?;
        let file_name = random_file_name(&image);
        Ok(Self {
            data: CreatePostData {
                message: draft.message.to_string(),
                nickname: draft.nickname.to_string(),
            },
            image,
            file_name,
        })
    }
}

// No collision check; the server keeps its own storage names.
fn random_file_name(image: &ImageBlob) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), image.extension())
}
