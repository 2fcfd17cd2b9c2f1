use async_trait::async_trait;

use crate::{
    domain::{AttachmentId, ChannelId, MediaHandle, PostId},
    relay::OutboundPost,
    Result,
};

/// Hexagonal port for reading attachments out of the monitored channel.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Download the raw bytes of an attachment. Failures map to `Error::Fetch`.
    async fn fetch_attachment(&self, channel: &ChannelId, attachment: &AttachmentId)
        -> Result<Vec<u8>>;
}

/// Hexagonal port for the microblogging platform posts are relayed to.
#[async_trait]
pub trait PostingPlatform: Send + Sync {
    /// Upload one media item. Failures map to `Error::Upload`.
    async fn upload_media(&self, bytes: Vec<u8>, mime_type: &str) -> Result<MediaHandle>;

    /// Publish a post. Failures map to `Error::Submit`.
    async fn submit_post(&self, post: &OutboundPost) -> Result<PostId>;
}

/// Best-effort side channel for telling a human operator that a relay failed.
///
/// The destination is bound when the notifier is constructed.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    async fn notify_operator(&self, text: &str) -> Result<()>;
}
