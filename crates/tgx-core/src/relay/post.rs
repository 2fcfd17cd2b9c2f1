use crate::domain::MediaHandle;

/// Character limit of a post on the target platform.
pub const MAX_POST_CHARS: usize = 280;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// A post ready to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundPost {
    pub text: String,
    pub media_handles: Vec<MediaHandle>,
}

impl OutboundPost {
    /// Assemble a post from normalized text and uploaded media.
    ///
    /// Returns `None` when there is neither text nor media. Empty text with
    /// media gets `fallback_text`.
    pub fn compose(
        text: String,
        media_handles: Vec<MediaHandle>,
        fallback_text: &str,
    ) -> Option<Self> {
        if text.is_empty() && media_handles.is_empty() {
            return None;
        }
        let text = if text.is_empty() {
            fallback_text.to_string()
        } else {
            text
        };
        Some(Self {
            text,
            media_handles,
        })
    }
}

/// Cap `text` at `MAX_POST_CHARS` characters, ending truncated text with `ELLIPSIS`.
pub fn truncate_post_text(text: &str) -> String {
    if text.chars().count() <= MAX_POST_CHARS {
        return text.to_string();
    }
    let keep = MAX_POST_CHARS - ELLIPSIS.chars().count();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
