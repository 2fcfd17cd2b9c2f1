/// Core error type for the relay.
///
/// Adapter crates map their vendor errors (teloxide, reqwest) into this type so
/// the relay engine can decide per failure kind whether to degrade or abandon.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Attachment bytes could not be retrieved from the channel.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The posting platform rejected or failed a media upload.
    #[error("upload error: {0}")]
    Upload(String),

    /// The posting platform rejected or failed a post submission.
    #[error("submit error: {0}")]
    Submit(String),

    #[error("notify error: {0}")]
    Notify(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
