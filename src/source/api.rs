//! Upstream collaborator interface
//!
//! One implementation per live-video vendor. The orchestrator stays
//! vendor-agnostic: discovery, connection parameters, the wire protocol and
//! frame parsing all live behind this trait.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::{Comment, ConnectInfo, Program, RawFrame};

/// Tag that marks a program as an official live-commentary broadcast
pub const OFFICIAL_COMMENTARY_TAG: &str = "ニコニコ実況";

/// Lazy, finite sequence of raw frames from one live connection
///
/// The sender side is owned by the vendor adapter; the sequence ends when
/// the upstream disconnects. Not restartable.
pub type FrameStream = mpsc::Receiver<RawFrame>;

/// Discovery and transport collaborator for one upstream vendor
#[async_trait]
pub trait LiveCommentApi: Send + Sync + 'static {
    /// Search currently on-air programs carrying the given tag
    ///
    /// Fails with [`Error::Discovery`](crate::Error::Discovery) when the
    /// upstream is unreachable or returns malformed data; the orchestrator
    /// treats that as "no match for this tag".
    async fn search(&self, tag: &str) -> Result<Vec<Program>>;

    /// Resolve connection parameters for a discovered program
    async fn connect_info(&self, program: &Program) -> Result<ConnectInfo>;

    /// Open the live transport connection for a program
    ///
    /// Fails with [`Error::Transport`](crate::Error::Transport) on connect
    /// failure; a mid-stream drop simply ends the returned sequence.
    async fn open(&self, info: &ConnectInfo) -> Result<FrameStream>;

    /// Parse one raw frame into a comment
    ///
    /// Returns `None` for frames that carry no comment (pings, room
    /// notices); those are dropped without ending ingestion.
    fn parse(&self, frame: RawFrame) -> Option<Comment>;

    /// The tag official channels require on a program before accepting it
    fn official_tag(&self) -> &str {
        OFFICIAL_COMMENTARY_TAG
    }
}
