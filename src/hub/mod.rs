//! Comment fan-out and subscriber tracking
//!
//! One [`CommentHub`] and one [`SubscriberRegistry`] exist per channel; both
//! are owned by that channel's source and constructed explicitly by the
//! dispatcher, never by a shared singleton.
//!
//! # Architecture
//!
//! ```text
//!      [ingestion task]   [ingestion task]        one per matched program
//!             │                  │
//!             └─── hub.publish ──┘
//!                      │
//!            CommentHub (slot of 1, latest value wins)
//!                      │
//!         ┌────────────┼────────────┐
//!         ▼            ▼            ▼
//!   CommentStream CommentStream CommentStream     independent cursors
//!      next()        next()        next()
//! ```
//!
//! The registry is deliberately separate from the hub: attaching a stream
//! and announcing liveness are different concerns, and the dispatcher may
//! keep a subscriber registered across a reconnect of its stream.

pub mod broadcast;
pub mod subscribers;

pub use broadcast::{CommentHub, CommentStream};
pub use subscribers::{SubscriberId, SubscriberRegistry};
