//! The relay decision: channel message in, rate-limited X post out.

pub mod engine;
pub mod message;
pub mod post;
pub mod state;

pub use engine::{RelayConfig, RelayEngine, RelayOutcome};
pub use message::{DocumentRef, InboundMessage, PhotoVariant, VideoRef};
pub use post::{truncate_post_text, OutboundPost, ELLIPSIS, MAX_POST_CHARS};
pub use state::RelayState;
