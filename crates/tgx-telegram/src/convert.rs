//! teloxide `Message` → `tgx_core` `InboundMessage`.

use teloxide::types::{Message, PhotoSize};

use tgx_core::{
    domain::{AttachmentId, ChannelId},
    relay::{DocumentRef, InboundMessage, PhotoVariant, VideoRef},
};

pub fn inbound_from_message(msg: &Message) -> InboundMessage {
    InboundMessage {
        channel_id: ChannelId(msg.chat.id.0.to_string()),
        channel_username: msg.chat.username().map(|s| s.to_string()),
        text: msg.text().map(|s| s.to_string()),
        caption: msg.caption().map(|s| s.to_string()),
        photos: msg.photo().map(photo_variants).unwrap_or_default(),
        video: msg.video().map(|v| VideoRef {
            attachment_id: AttachmentId(v.file.id.clone()),
            mime_type: v.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
        document: msg.document().map(|d| DocumentRef {
            mime_type: d.mime_type.as_ref().map(|m| m.essence_str().to_string()),
        }),
    }
}

/// Telegram already sends sizes smallest-first; keep that order.
fn photo_variants(sizes: &[PhotoSize]) -> Vec<PhotoVariant> {
    sizes
        .iter()
        .map(|p| PhotoVariant {
            attachment_id: AttachmentId(p.file.id.clone()),
            width: p.width,
            height: p.height,
        })
        .collect()
}
