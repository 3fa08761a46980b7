//! Live comment ("Jikkyo") aggregation and fan-out
//!
//! Aggregates live text-comment streams broadcast alongside online
//! programs and republishes them to in-process subscribers as one
//! near-real-time event stream, independent of which upstream live-video
//! vendor carries the program.
//!
//! # Architecture
//!
//! ```text
//!   vendor API (behind LiveCommentApi)
//!        │ search(tag) / connect_info / open
//!        ▼
//!   UpstreamCommentSource ── one per Channel
//!        │ ingestion task per matched program
//!        ▼
//!   CommentHub (slot of 1, latest value wins)
//!        │
//!        ▼
//!   CommentStream handles          SubscriberRegistry
//!   (one per subscriber)           (dispatcher liveness checks)
//! ```
//!
//! [`cache::RefreshingCache`] is the companion read model for the
//! slowly-changing catalog data (channel and service definitions) a
//! dispatcher keeps around the sources.
//!
//! # Example
//!
//! ```no_run
//! use jikkyo_rs::{Channel, LiveCommentSource, UpstreamCommentSource};
//! # use jikkyo_rs::source::LiveCommentApi;
//!
//! # async fn example(api: impl LiveCommentApi) {
//! let channel = Channel::new("news24").tag("ch1").official();
//! let source = UpstreamCommentSource::new(channel, api);
//!
//! let mut stream = source.hub().subscribe().await;
//! let ingestion = source.start();
//!
//! while let Some(comment) = stream.next().await {
//!     println!("{}: {}", comment.author, comment.text);
//! }
//! # let _ = ingestion;
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod hub;
pub mod models;
pub mod source;

pub use cache::{CacheConfig, RefreshingCache};
pub use error::{Error, Result};
pub use hub::{CommentHub, CommentStream, SubscriberId, SubscriberRegistry};
pub use models::{Channel, Comment, ConnectInfo, Program, RawFrame};
pub use source::{LiveCommentApi, LiveCommentSource, UpstreamCommentSource};
