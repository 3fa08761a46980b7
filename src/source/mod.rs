//! Live comment sources
//!
//! A [`LiveCommentSource`] is the per-channel orchestrator: it discovers the
//! on-air program(s) matching its channel, opens upstream ingestion for each
//! and fans the parsed comments into the channel's hub. One source, one hub
//! and one subscriber registry exist per channel, all owned by the
//! dispatcher that constructed them.
//!
//! The trait is vendor-agnostic; [`UpstreamCommentSource`] implements it for
//! any collaborator behind [`LiveCommentApi`].

pub mod api;
pub mod upstream;

pub use api::{FrameStream, LiveCommentApi, OFFICIAL_COMMENTARY_TAG};
pub use upstream::UpstreamCommentSource;

use tokio::task::JoinHandle;

use crate::hub::{CommentHub, SubscriberRegistry};
use crate::models::Channel;

/// Per-channel comment provider
///
/// `start()` returns the handle of the ingestion driver task; it finishes
/// once every per-program ingestion has ended, naturally or on disconnect.
/// The hub and the registry stay valid for the source's whole lifetime, so
/// subscribers may attach before, during and after ingestion. The core does
/// not restart a completed source; retry policy belongs to the caller.
pub trait LiveCommentSource: Send + Sync {
    /// The channel this source serves
    fn channel(&self) -> &Channel;

    /// Fan-out hub delivering this channel's comments
    fn hub(&self) -> &CommentHub;

    /// Liveness registry for this channel's subscribers
    fn subscribers(&self) -> &SubscriberRegistry;

    /// Begin discovery and ingestion
    ///
    /// Aborting the returned handle cancels all ingestion for this source.
    fn start(&self) -> JoinHandle<()>;
}
