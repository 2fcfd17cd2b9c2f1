//! X (Twitter) API v2 adapter.
//!
//! Implements the `tgx-core` posting port: media upload (single request for
//! images, chunked for video) and post creation, authenticated with an
//! OAuth 2.0 user-context access token.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use tgx_core::{
    domain::{MediaHandle, PostId},
    errors::Error,
    ports::PostingPlatform,
    relay::OutboundPost,
    Result,
};

pub mod types;

use types::{
    media_category, needs_chunked_upload, CreatePostRequest, CreatedPost, Envelope,
    InitializeUpload, MediaStatus, PostMedia, ProcessingInfo, ProcessingState, UploadedMedia,
    XUser,
};

/// Size of one APPEND segment in the chunked upload flow.
pub const UPLOAD_CHUNK_SIZE: usize = 4 * 1024 * 1024;

const MAX_STATUS_POLLS: u32 = 30;
const DEFAULT_CHECK_AFTER_SECS: u64 = 5;
const MAX_CHECK_AFTER_SECS: u64 = 30;
const ERROR_BODY_MAX_CHARS: usize = 200;

#[derive(Clone)]
pub struct XClient {
    api_base: String,
    access_token: String,
    http: reqwest::Client,
}

impl XClient {
    pub fn new(
        api_base: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build failed: {e}")))?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Check the access token against `GET /2/users/me`.
    pub async fn verify_credentials(&self) -> Result<XUser> {
        let resp = self
            .http
            .get(self.url("/2/users/me"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::External(format!("x request error: {e}")))?;
        let me: Envelope<XUser> = read_json(resp, "credential check", Error::External).await?;
        Ok(me.data)
    }

    async fn upload_simple(&self, bytes: Vec<u8>, mime_type: &str) -> Result<MediaHandle> {
        let form = reqwest::multipart::Form::new()
            .text("media_category", media_category(mime_type))
            .text("media_type", mime_type.to_string())
            .part("media", media_part(bytes, mime_type)?);

        let resp = self
            .http
            .post(self.url("/2/media/upload"))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("x request error: {e}")))?;
        let up: Envelope<UploadedMedia> = read_json(resp, "media upload", Error::Upload).await?;

        if let Some(info) = up.data.processing_info {
            self.wait_for_processing(&up.data.id, info).await?;
        }
        Ok(MediaHandle(up.data.id))
    }

    async fn upload_chunked(&self, bytes: Vec<u8>, mime_type: &str) -> Result<MediaHandle> {
        let init = InitializeUpload {
            media_type: mime_type,
            total_bytes: bytes.len(),
            media_category: media_category(mime_type),
        };
        let resp = self
            .http
            .post(self.url("/2/media/upload/initialize"))
            .bearer_auth(&self.access_token)
            .json(&init)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("x request error: {e}")))?;
        let started: Envelope<UploadedMedia> =
            read_json(resp, "upload initialize", Error::Upload).await?;
        let media_id = started.data.id;

        for (index, chunk) in bytes.chunks(UPLOAD_CHUNK_SIZE).enumerate() {
            let form = reqwest::multipart::Form::new()
                .text("segment_index", index.to_string())
                .part("media", media_part(chunk.to_vec(), "application/octet-stream")?);
            let resp = self
                .http
                .post(self.url(&format!("/2/media/upload/{media_id}/append")))
                .bearer_auth(&self.access_token)
                .multipart(form)
                .send()
                .await
                .map_err(|e| Error::Upload(format!("x request error: {e}")))?;
            ensure_success(resp, "upload append", Error::Upload).await?;
            debug!(%media_id, segment = index, "appended upload segment");
        }

        let resp = self
            .http
            .post(self.url(&format!("/2/media/upload/{media_id}/finalize")))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("x request error: {e}")))?;
        let done: Envelope<UploadedMedia> =
            read_json(resp, "upload finalize", Error::Upload).await?;

        if let Some(info) = done.data.processing_info {
            self.wait_for_processing(&media_id, info).await?;
        }
        Ok(MediaHandle(media_id))
    }

    /// Poll the upload status until X reports the media usable (or broken).
    async fn wait_for_processing(&self, media_id: &str, mut info: ProcessingInfo) -> Result<()> {
        for _ in 0..MAX_STATUS_POLLS {
            match info.state {
                ProcessingState::Succeeded => return Ok(()),
                ProcessingState::Failed => {
                    let reason = info
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "unknown reason".to_string());
                    return Err(Error::Upload(format!(
                        "media {media_id} processing failed: {reason}"
                    )));
                }
                ProcessingState::Pending | ProcessingState::InProgress => {}
            }

            debug!(
                %media_id,
                progress = info.progress_percent.unwrap_or(0),
                "waiting for media processing"
            );
            tokio::time::sleep(check_after(&info)).await;

            let resp = self
                .http
                .get(self.url("/2/media/upload"))
                .query(&[("media_id", media_id), ("command", "STATUS")])
                .bearer_auth(&self.access_token)
                .send()
                .await
                .map_err(|e| Error::Upload(format!("x request error: {e}")))?;
            let status: Envelope<MediaStatus> =
                read_json(resp, "upload status", Error::Upload).await?;
            match status.data.processing_info {
                Some(next) => info = next,
                None => return Ok(()),
            }
        }

        Err(Error::Upload(format!(
            "media {media_id} still processing after {MAX_STATUS_POLLS} checks"
        )))
    }
}

#[async_trait]
impl PostingPlatform for XClient {
    async fn upload_media(&self, bytes: Vec<u8>, mime_type: &str) -> Result<MediaHandle> {
        if needs_chunked_upload(mime_type) {
            self.upload_chunked(bytes, mime_type).await
        } else {
            self.upload_simple(bytes, mime_type).await
        }
    }

    async fn submit_post(&self, post: &OutboundPost) -> Result<PostId> {
        let resp = self
            .http
            .post(self.url("/2/tweets"))
            .bearer_auth(&self.access_token)
            .json(&create_post_request(post))
            .send()
            .await
            .map_err(|e| Error::Submit(format!("x request error: {e}")))?;
        let created: Envelope<CreatedPost> = read_json(resp, "create post", Error::Submit).await?;
        Ok(PostId(created.data.id))
    }
}

fn create_post_request(post: &OutboundPost) -> CreatePostRequest<'_> {
    let media = if post.media_handles.is_empty() {
        None
    } else {
        Some(PostMedia {
            media_ids: post.media_handles.iter().map(|h| h.0.as_str()).collect(),
        })
    };
    CreatePostRequest {
        text: &post.text,
        media,
    }
}

fn media_part(bytes: Vec<u8>, mime_type: &str) -> Result<reqwest::multipart::Part> {
    reqwest::multipart::Part::bytes(bytes)
        .file_name("media")
        .mime_str(mime_type)
        .map_err(|e| Error::Upload(format!("x multipart error: {e}")))
}

fn check_after(info: &ProcessingInfo) -> Duration {
    Duration::from_secs(
        info.check_after_secs
            .unwrap_or(DEFAULT_CHECK_AFTER_SECS)
            .clamp(1, MAX_CHECK_AFTER_SECS),
    )
}

fn api_error(what: &str, status: reqwest::StatusCode, body: &str) -> String {
    format!(
        "x {what} failed: {status} {}",
        body.chars().take(ERROR_BODY_MAX_CHARS).collect::<String>()
    )
}

async fn ensure_success(
    resp: reqwest::Response,
    what: &str,
    to_err: fn(String) -> Error,
) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(to_err(api_error(what, status, &body)))
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
    to_err: fn(String) -> Error,
) -> Result<T> {
    let resp = ensure_success(resp, what, to_err).await?;
    resp.json::<T>()
        .await
        .map_err(|e| to_err(format!("x {what} returned unexpected body: {e}")))
}
