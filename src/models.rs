//! Core value types
//!
//! This module defines the channel descriptor used as discovery criteria, the
//! comment event delivered to subscribers, and the descriptors exchanged with
//! the upstream collaborators.

use bytes::Bytes;

/// A logical live-commentary context (e.g. one TV channel's chat feed),
/// independent of the concrete upstream program currently carrying it.
///
/// Immutable once built. Used as discovery criteria and as the hub's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    name: String,
    tags: Vec<String>,
    is_official: bool,
}

impl Channel {
    /// Create a new community channel with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            is_official: false,
        }
    }

    /// Add a search tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add several search tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Mark this channel as official: only programs carrying the official
    /// live-commentary tag are acceptable matches.
    pub fn official(mut self) -> Self {
        self.is_official = true;
        self
    }

    /// Channel display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Associated search tags (not including the channel name)
    pub fn tags_ref(&self) -> &[String] {
        &self.tags
    }

    /// Whether this channel requires officially tagged programs
    pub fn is_official(&self) -> bool {
        self.is_official
    }

    /// The tag set used for program discovery: the channel's tags plus the
    /// channel name itself, first occurrence wins, order preserved.
    pub fn search_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len() + 1);
        for tag in self.tags.iter().chain(std::iter::once(&self.name)) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One live-comment event
///
/// Immutable value produced by ingestion tasks and fanned out to subscribers.
/// Cheap to clone; the broadcast path clones per delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Upstream program id this comment arrived on
    pub program: String,
    /// Comment number within the program, when the vendor provides one
    pub no: Option<u64>,
    /// Posting time, unix seconds
    pub time: i64,
    /// Author handle (may be an anonymized id)
    pub author: String,
    /// Comment body
    pub text: String,
    /// Vendor command/mail string (rendering hints), when present
    pub command: Option<String>,
    /// Whether the author holds a premium account upstream
    pub premium: bool,
}

impl Comment {
    /// Create a comment with the required fields; vendor extras default off
    pub fn new(
        program: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
        time: i64,
    ) -> Self {
        Self {
            program: program.into(),
            no: None,
            time,
            author: author.into(),
            text: text.into(),
            command: None,
            premium: false,
        }
    }
}

/// Descriptor of one on-air upstream program, as returned by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Upstream program id (e.g. "lv123456789")
    pub id: String,
    /// Program title, for logging
    pub title: String,
    /// Tags attached to the program upstream
    pub tags: Vec<String>,
    /// Whether the program is an official broadcast (vs. community)
    pub is_official: bool,
}

impl Program {
    /// Create a program descriptor
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: Vec::new(),
            is_official: false,
        }
    }

    /// Add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Mark as an official broadcast
    pub fn official(mut self) -> Self {
        self.is_official = true;
        self
    }
}

/// Connection parameters resolved by discovery for one program
///
/// Opaque to the orchestrator; only the transport side of the collaborator
/// interprets the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectInfo {
    /// Transport endpoint (e.g. a web socket URL)
    pub endpoint: String,
    /// Program this connection belongs to
    pub program: String,
}

impl ConnectInfo {
    /// Create connection parameters for a program
    pub fn new(endpoint: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            program: program.into(),
        }
    }
}

/// One raw frame received from the live transport, before parsing
///
/// `Bytes` is reference counted, so cloning a frame never copies the payload.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Program the frame arrived on
    pub program: String,
    /// Raw payload bytes as received from the wire
    pub payload: Bytes,
}

impl RawFrame {
    /// Create a raw frame
    pub fn new(program: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            program: program.into(),
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_tags_include_name() {
        let channel = Channel::new("news24").tag("ch1").tag("ch2");

        assert_eq!(channel.search_tags(), vec!["ch1", "ch2", "news24"]);
    }

    #[test]
    fn test_search_tags_dedup() {
        let channel = Channel::new("ch1").tag("ch1").tag("ch2");

        assert_eq!(channel.search_tags(), vec!["ch1", "ch2"]);
    }

    #[test]
    fn test_channel_builder() {
        let channel = Channel::new("news24").tags(["a", "b"]).official();

        assert_eq!(channel.name(), "news24");
        assert_eq!(channel.tags_ref(), &["a", "b"]);
        assert!(channel.is_official());
    }

    #[test]
    fn test_comment_defaults() {
        let comment = Comment::new("lv1", "anon", "hello", 1700000000);

        assert_eq!(comment.no, None);
        assert_eq!(comment.command, None);
        assert!(!comment.premium);
    }
}
