use std::fmt;

/// Channel identifier as delivered by the messaging platform (numeric chat id
/// rendered as a string, e.g. `-1001234567890`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

/// Platform file id of a channel attachment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachmentId(pub String);

/// Opaque reference returned by the posting platform for an uploaded media item.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaHandle(pub String);

/// Identifier of a published post on the posting platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
