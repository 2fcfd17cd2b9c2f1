//! Wire types for the X API v2 endpoints the relay uses.

use serde::{Deserialize, Serialize};

/// Every v2 success body wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct CreatePostRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<PostMedia<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PostMedia<'a> {
    pub media_ids: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPost {
    pub id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct XUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct InitializeUpload<'a> {
    pub media_type: &'a str,
    pub total_bytes: usize,
    pub media_category: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UploadedMedia {
    pub id: String,
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Deserialize)]
pub struct MediaStatus {
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProcessingInfo {
    pub state: ProcessingState,
    #[serde(default)]
    pub check_after_secs: Option<u64>,
    #[serde(default)]
    pub progress_percent: Option<u32>,
    #[serde(default)]
    pub error: Option<ProcessingError>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProcessingError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Upload category X expects for a mime type.
pub fn media_category(mime_type: &str) -> &'static str {
    if mime_type.starts_with("video/") {
        "tweet_video"
    } else {
        "tweet_image"
    }
}

/// Video must go through the chunked upload flow; photos fit one request.
pub fn needs_chunked_upload(mime_type: &str) -> bool {
    mime_type.starts_with("video/")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn post_request_omits_media_when_absent() {
        let body = serde_json::to_value(CreatePostRequest {
            text: "hello",
            media: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "text": "hello" }));

        let body = serde_json::to_value(CreatePostRequest {
            text: "pic",
            media: Some(PostMedia {
                media_ids: vec!["111", "222"],
            }),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "text": "pic", "media": { "media_ids": ["111", "222"] } })
        );
    }

    #[test]
    fn parses_created_post_and_user() {
        let post: Envelope<CreatedPost> =
            serde_json::from_value(json!({ "data": { "id": "1800", "text": "hello" } })).unwrap();
        assert_eq!(post.data.id, "1800");

        let me: Envelope<XUser> = serde_json::from_value(json!({
            "data": { "id": "12", "username": "relaybot", "name": "Relay" }
        }))
        .unwrap();
        assert_eq!(me.data.id, "12");
        assert_eq!(me.data.username, "relaybot");
    }

    #[test]
    fn parses_upload_processing_states() {
        let up: Envelope<UploadedMedia> = serde_json::from_value(json!({
            "data": {
                "id": "900",
                "media_key": "7_900",
                "processing_info": { "state": "pending", "check_after_secs": 3 }
            }
        }))
        .unwrap();
        let info = up.data.processing_info.unwrap();
        assert_eq!(info.state, ProcessingState::Pending);
        assert_eq!(info.check_after_secs, Some(3));

        let st: Envelope<MediaStatus> = serde_json::from_value(json!({
            "data": {
                "processing_info": {
                    "state": "failed",
                    "error": { "code": 1, "name": "InvalidMedia", "message": "Unsupported codec" }
                }
            }
        }))
        .unwrap();
        let info = st.data.processing_info.unwrap();
        assert_eq!(info.state, ProcessingState::Failed);
        assert_eq!(
            info.error.and_then(|e| e.message).as_deref(),
            Some("Unsupported codec")
        );

        let plain: Envelope<UploadedMedia> =
            serde_json::from_value(json!({ "data": { "id": "901" } })).unwrap();
        assert!(plain.data.processing_info.is_none());
    }

    #[test]
    fn picks_category_and_upload_flow_by_mime() {
        assert_eq!(media_category("image/jpeg"), "tweet_image");
        assert_eq!(media_category("image/png"), "tweet_image");
        assert_eq!(media_category("video/mp4"), "tweet_video");
        assert!(!needs_chunked_upload("image/jpeg"));
        assert!(!needs_chunked_upload("image/png"));
        assert!(needs_chunked_upload("video/mp4"));
        assert!(needs_chunked_upload("video/quicktime"));
    }
}
