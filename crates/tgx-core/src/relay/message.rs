use crate::domain::{AttachmentId, ChannelId};

/// A channel post as seen by the relay, independent of the messaging SDK.
#[derive(Clone, Debug, Default)]
pub struct InboundMessage {
    pub channel_id: ChannelId,
    /// Public `@username` of the channel, without the `@`.
    pub channel_username: Option<String>,
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Size variants of one photo, ordered by ascending resolution.
    pub photos: Vec<PhotoVariant>,
    pub video: Option<VideoRef>,
    pub document: Option<DocumentRef>,
}

#[derive(Clone, Debug)]
pub struct PhotoVariant {
    pub attachment_id: AttachmentId,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct VideoRef {
    pub attachment_id: AttachmentId,
    pub mime_type: Option<String>,
}

/// Documents are never relayed; only the mime type is kept for logging.
#[derive(Clone, Debug)]
pub struct DocumentRef {
    pub mime_type: Option<String>,
}

impl InboundMessage {
    /// Text if present, else caption, else empty. Never concatenated.
    pub fn content_text(&self) -> &str {
        self.text
            .as_deref()
            .or(self.caption.as_deref())
            .unwrap_or("")
    }

    /// Highest-resolution photo variant (the last one delivered).
    pub fn best_photo(&self) -> Option<&PhotoVariant> {
        self.photos.last()
    }
}
