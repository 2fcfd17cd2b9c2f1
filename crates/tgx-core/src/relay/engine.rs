use std::{collections::HashSet, fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    domain::{AttachmentId, MediaHandle, PostId},
    ports::{AttachmentSource, OperatorNotifier, PostingPlatform},
    Error,
};

use super::{
    message::InboundMessage,
    post::{truncate_post_text, OutboundPost},
    state::RelayState,
};

const PHOTO_MIME: &str = "image/jpeg";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";
const NOTIFY_ERROR_MAX_CHARS: usize = 200;

/// Engine-facing configuration values.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub min_interval: Duration,
    /// Channel ids and/or `@usernames`, already trimmed.
    pub monitored_channels: HashSet<String>,
    pub posting_disabled: bool,
    pub fallback_text: String,
}

impl RelayConfig {
    pub fn is_monitored(&self, msg: &InboundMessage) -> bool {
        if self.monitored_channels.contains(msg.channel_id.0.trim()) {
            return true;
        }
        msg.channel_username.as_deref().is_some_and(|name| {
            let alias = format!("@{}", name.trim().trim_start_matches('@'));
            self.monitored_channels.contains(&alias)
        })
    }
}

/// What happened to one inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    Disabled,
    NotMonitored,
    RateLimited { retry_after: Duration },
    NothingToPost,
    Posted { post_id: PostId, media_count: usize },
    SubmitFailed,
}

#[derive(Clone, Copy, Debug)]
enum MediaKind {
    Photo,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Rate-limited, media-aware relay from a monitored channel to the posting platform.
///
/// `handle` never fails: every collaborator error is logged and converted into
/// a `RelayOutcome`. The state lock is held for a whole message, so concurrent
/// callers are serialized and the cooldown check + update is atomic.
pub struct RelayEngine {
    cfg: RelayConfig,
    source: Arc<dyn AttachmentSource>,
    platform: Arc<dyn PostingPlatform>,
    notifier: Option<Arc<dyn OperatorNotifier>>,
    state: Mutex<RelayState>,
}

impl RelayEngine {
    pub fn new(
        cfg: RelayConfig,
        source: Arc<dyn AttachmentSource>,
        platform: Arc<dyn PostingPlatform>,
    ) -> Self {
        Self {
            cfg,
            source,
            platform,
            notifier: None,
            state: Mutex::new(RelayState::default()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn OperatorNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_state(mut self, state: RelayState) -> Self {
        self.state = Mutex::new(state);
        self
    }

    pub async fn last_post_at(&self) -> DateTime<Utc> {
        self.state.lock().await.last_post_at()
    }

    pub async fn handle(&self, msg: &InboundMessage) -> RelayOutcome {
        self.handle_at(msg, Utc::now()).await
    }

    pub async fn handle_at(&self, msg: &InboundMessage, now: DateTime<Utc>) -> RelayOutcome {
        let channel = &msg.channel_id;

        if self.cfg.posting_disabled {
            debug!(%channel, "posting disabled; ignoring channel post");
            return RelayOutcome::Disabled;
        }
        if !self.cfg.is_monitored(msg) {
            debug!(%channel, "channel not monitored; ignoring post");
            return RelayOutcome::NotMonitored;
        }

        let mut state = self.state.lock().await;

        if let Some(retry_after) = state.remaining_cooldown(now, self.cfg.min_interval) {
            info!(
                %channel,
                retry_after_secs = retry_after.as_secs(),
                "rate limited; dropping channel post"
            );
            return RelayOutcome::RateLimited { retry_after };
        }

        let raw_text = msg.content_text();
        let media_handles = self.collect_media(msg).await;
        let text = truncate_post_text(raw_text);

        let Some(post) = OutboundPost::compose(text, media_handles, &self.cfg.fallback_text) else {
            debug!(%channel, "no text and no media; nothing to post");
            return RelayOutcome::NothingToPost;
        };

        match self.platform.submit_post(&post).await {
            Ok(post_id) => {
                state.record_post(now);
                let media_count = post.media_handles.len();
                info!(%channel, %post_id, media_count, "relayed channel post");
                RelayOutcome::Posted {
                    post_id,
                    media_count,
                }
            }
            Err(e) => {
                warn!(%channel, error = %e, "failed to submit post");
                self.notify_failure(msg, &e).await;
                RelayOutcome::SubmitFailed
            }
        }
    }

    /// Upload the best photo, then the video. Each is independent and best-effort.
    async fn collect_media(&self, msg: &InboundMessage) -> Vec<MediaHandle> {
        let mut handles = Vec::new();

        if let Some(photo) = msg.best_photo() {
            debug!(width = photo.width, height = photo.height, "selected photo variant");
            if let Some(h) = self
                .attach(msg, MediaKind::Photo, &photo.attachment_id, PHOTO_MIME)
                .await
            {
                handles.push(h);
            }
        }

        if let Some(video) = &msg.video {
            let mime = video.mime_type.as_deref().unwrap_or(DEFAULT_VIDEO_MIME);
            if let Some(h) = self
                .attach(msg, MediaKind::Video, &video.attachment_id, mime)
                .await
            {
                handles.push(h);
            }
        }

        if let Some(doc) = &msg.document {
            info!(
                mime_type = doc.mime_type.as_deref().unwrap_or("unknown"),
                "documents are not relayed; skipping attachment"
            );
        }

        handles
    }

    async fn attach(
        &self,
        msg: &InboundMessage,
        kind: MediaKind,
        attachment: &AttachmentId,
        mime_type: &str,
    ) -> Option<MediaHandle> {
        let bytes = match self
            .source
            .fetch_attachment(&msg.channel_id, attachment)
            .await
        {
            Ok(b) => b,
            Err(e) => {
                warn!(%kind, error = %e, "failed to fetch attachment; continuing without it");
                return None;
            }
        };

        let size = bytes.len();
        match self.platform.upload_media(bytes, mime_type).await {
            Ok(handle) => {
                debug!(%kind, size, "uploaded media");
                Some(handle)
            }
            Err(e) => {
                warn!(%kind, size, error = %e, "failed to upload media; continuing without it");
                None
            }
        }
    }

    async fn notify_failure(&self, msg: &InboundMessage, err: &Error) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let text = format!(
            "⚠️ Failed to relay a post from channel {} to X: {}",
            msg.channel_id,
            err.to_string()
                .chars()
                .take(NOTIFY_ERROR_MAX_CHARS)
                .collect::<String>()
        );
        if let Err(e) = notifier.notify_operator(&text).await {
            warn!(error = %e, "failed to notify operator");
        }
    }
}
