use base64::{Engine as _, engine::general_purpose};
use mime::Mime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data url")]
    MissingScheme,
    #[error("data url has no payload separator")]
    MissingPayload,
    #[error("data url payload is not base64 encoded")]
    NotBase64,
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// Photo returned by the camera, kept as a `data:<mime>;base64,<payload>` url
/// for as long as the draft it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub data_url: String,
}

/// Binary form of a captured image, ready to be attached to a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime: Mime,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self { data_url: data_url.into() }
    }

    /// Builds a data url from raw image bytes.
    pub fn from_bytes(mime: &Mime, bytes: &[u8]) -> Self {
        let payload = general_purpose::STANDARD.encode(bytes);
        Self::new(format!("data:{};base64,{}", mime.essence_str(), payload))
    }

    pub fn to_blob(&self) -> Result<ImageBlob, DataUrlError> {
        let rest = self
            .data_url
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;

        let mime: Mime = media_type
            .parse()
            .map_err(|_| DataUrlError::InvalidMediaType(media_type.to_string()))?;
        if mime.type_() != mime::IMAGE {
            return Err(DataUrlError::UnsupportedType(mime.essence_str().to_string()));
        }

        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUrlError::Decode(e.to_string()))?;

        Ok(ImageBlob { mime, bytes })
    }
}

impl ImageBlob {
    /// File extension for the attachment name. Types without a well-known
    /// extension use their MIME subtype, or `bin` when that is unusable.
    pub fn extension(&self) -> String {
        match self.mime.essence_str() {
            "image/jpeg" | "image/jpg" => "jpg".to_string(),
            "image/png" => "png".to_string(),
            "image/gif" => "gif".to_string(),
            "image/webp" => "webp".to_string(),
            _ => {
                let subtype = self.mime.subtype().as_str().to_ascii_lowercase();
                if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
                    subtype
                } else {
                    "bin".to_string()
                }
            }
        }
    }
}

/// A draft field that must be filled before the draft can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Nickname,
    Message,
    Image,
}

/// The post being composed. Lives only while the composer is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPost {
    pub nickname: Option<String>,
    pub message: Option<String>,
    pub captured_image: Option<CapturedImage>,
}

/// A draft with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteDraft<'a> {
    pub nickname: &'a str,
    pub message: &'a str,
    pub image: &'a CapturedImage,
}

impl DraftPost {
    pub fn set_nickname(&mut self, value: &str) {
        self.nickname = non_empty(value);
    }

    pub fn set_message(&mut self, value: &str) {
        self.message = non_empty(value);
    }

    pub fn complete(&self) -> Result<CompleteDraft<'_>, MissingField> {
        let nickname = self.nickname.as_deref().ok_or(MissingField::Nickname)?;
        let message = self.message.as_deref().ok_or(MissingField::Message)?;
        let image = self.captured_image.as_ref().ok_or(MissingField::Image)?;
        Ok(CompleteDraft { nickname, message, image })
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_ok()
    }
}

// An emptied text field counts as unset.
fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
