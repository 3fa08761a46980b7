//! Vendor-agnostic live comment source
//!
//! [`UpstreamCommentSource`] implements [`LiveCommentSource`] for any
//! collaborator implementing [`LiveCommentApi`]. `start()` fans out one
//! lookup task per search tag; each one discovers an on-air program,
//! applies the matching policy and ingests its comment stream into the
//! shared hub. The returned handle finishes once every ingestion has.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::hub::{CommentHub, SubscriberRegistry};
use crate::models::Channel;

use super::api::LiveCommentApi;
use super::LiveCommentSource;

/// Per-channel comment source driven by an upstream collaborator
pub struct UpstreamCommentSource<A> {
    channel: Channel,
    api: Arc<A>,
    hub: CommentHub,
    subscribers: SubscriberRegistry,
}

impl<A: LiveCommentApi> UpstreamCommentSource<A> {
    /// Create a source for one channel
    pub fn new(channel: Channel, api: A) -> Self {
        Self::with_api(channel, Arc::new(api))
    }

    /// Create a source sharing an already-constructed collaborator
    ///
    /// Useful when several channels talk to the same vendor endpoint.
    pub fn with_api(channel: Channel, api: Arc<A>) -> Self {
        Self {
            channel,
            api,
            hub: CommentHub::new(),
            subscribers: SubscriberRegistry::new(),
        }
    }
}

impl<A: LiveCommentApi> LiveCommentSource for UpstreamCommentSource<A> {
    fn channel(&self) -> &Channel {
        &self.channel
    }

    fn hub(&self) -> &CommentHub {
        &self.hub
    }

    fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    fn start(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let hub = self.hub.clone();
        let channel = self.channel.clone();

        tokio::spawn(async move {
            // JoinSet: aborting the outer handle drops the set, which
            // cancels every in-flight ingestion with it.
            let mut lookups = tokio::task::JoinSet::new();

            for tag in channel.search_tags() {
                let api = Arc::clone(&api);
                let hub = hub.clone();
                let channel = channel.clone();

                lookups.spawn(async move {
                    match ingest_tag(api.as_ref(), &hub, &channel, &tag).await {
                        Ok(()) => {}
                        // No acceptable on-air program is the normal case
                        // for most tags, not a failure
                        Err(Error::Match { .. }) => {
                            tracing::debug!(channel = %channel, tag = %tag, "No acceptable on-air program");
                        }
                        Err(e) => {
                            tracing::warn!(channel = %channel, tag = %tag, error = %e, "Ingestion for tag ended with error");
                        }
                    }
                });
            }

            // One tag's task failing or panicking must not cancel its
            // siblings; the outer handle still waits for all of them.
            while lookups.join_next().await.is_some() {}

            tracing::debug!(channel = %channel, "All ingestion tasks finished");
        })
    }
}

/// Discover, match and ingest one tag's program into the hub
async fn ingest_tag<A: LiveCommentApi>(
    api: &A,
    hub: &CommentHub,
    channel: &Channel,
    tag: &str,
) -> Result<()> {
    let programs = api.search(tag).await?;

    // Community channels accept any program; official channels require the
    // official live-commentary tag on the program itself.
    let program = programs
        .into_iter()
        .find(|program| {
            !channel.is_official() || program.tags.iter().any(|t| t == api.official_tag())
        })
        .ok_or_else(|| Error::Match {
            tag: tag.to_string(),
        })?;

    let info = api.connect_info(&program).await?;

    tracing::info!(
        channel = %channel,
        program = %program.id,
        title = %program.title,
        "Starting comment ingestion"
    );

    let mut frames = api.open(&info).await?;
    let mut published = 0u64;

    while let Some(frame) = frames.recv().await {
        if let Some(comment) = api.parse(frame) {
            hub.publish(comment).await;
            published += 1;
        }
    }

    tracing::info!(
        channel = %channel,
        program = %program.id,
        comments = published,
        "Comment ingestion finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::{mpsc, Mutex};
    use tokio::time::timeout;

    use crate::models::{Comment, ConnectInfo, Program, RawFrame};
    use crate::source::api::{FrameStream, OFFICIAL_COMMENTARY_TAG};

    use super::*;

    /// Scripted vendor: canned search results, frames are "no:text" strings
    struct MockApi {
        programs: HashMap<String, Vec<Program>>,
        failing_tags: Vec<String>,
        feed: Vec<(u64, String)>,
        opened: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                programs: HashMap::new(),
                failing_tags: Vec::new(),
                feed: (1..=3).map(|no| (no, format!("comment {}", no))).collect(),
                opened: Mutex::new(Vec::new()),
            }
        }

        fn with_programs(mut self, tag: &str, programs: Vec<Program>) -> Self {
            self.programs.insert(tag.to_string(), programs);
            self
        }

        fn with_failing_tag(mut self, tag: &str) -> Self {
            self.failing_tags.push(tag.to_string());
            self
        }

        async fn opened(&self) -> Vec<String> {
            self.opened.lock().await.clone()
        }
    }

    #[async_trait]
    impl LiveCommentApi for MockApi {
        async fn search(&self, tag: &str) -> Result<Vec<Program>> {
            if self.failing_tags.iter().any(|t| t == tag) {
                return Err(Error::Discovery {
                    tag: tag.to_string(),
                    message: "upstream unreachable".into(),
                });
            }
            Ok(self.programs.get(tag).cloned().unwrap_or_default())
        }

        async fn connect_info(&self, program: &Program) -> Result<ConnectInfo> {
            Ok(ConnectInfo::new(
                format!("wss://mock.example/{}", program.id),
                &program.id,
            ))
        }

        async fn open(&self, info: &ConnectInfo) -> Result<FrameStream> {
            self.opened.lock().await.push(info.program.clone());

            let (tx, rx) = mpsc::channel(8);
            let program = info.program.clone();
            let feed = self.feed.clone();
            tokio::spawn(async move {
                for (no, text) in feed {
                    let payload = Bytes::from(format!("{}:{}", no, text));
                    if tx.send(RawFrame::new(&program, payload)).await.is_err() {
                        break;
                    }
                }
                // sender drops here: upstream disconnect
            });
            Ok(rx)
        }

        fn parse(&self, frame: RawFrame) -> Option<Comment> {
            let text = String::from_utf8(frame.payload.to_vec()).ok()?;
            let (no, body) = text.split_once(':')?;
            let mut comment = Comment::new(&frame.program, "anon", body, 1700000000);
            comment.no = no.parse().ok();
            Some(comment)
        }
    }

    fn official_program(id: &str) -> Program {
        Program::new(id, "official commentary")
            .tag(OFFICIAL_COMMENTARY_TAG)
            .official()
    }

    #[tokio::test]
    async fn test_official_channel_ingests_tagged_program() {
        let api = Arc::new(
            MockApi::new()
                .with_programs("ch1", vec![official_program("p1")])
                .with_programs("news24", vec![]),
        );
        let channel = Channel::new("news24").tag("ch1").official();
        let source = UpstreamCommentSource::with_api(channel, Arc::clone(&api));

        let mut stream = source.hub().subscribe().await;

        timeout(Duration::from_secs(5), source.start())
            .await
            .expect("start() must finish once the feed is exhausted")
            .unwrap();

        assert_eq!(api.opened().await, vec!["p1"]);

        // The stalled handle retains the newest slot value after close
        source.hub().close().await;
        let last = stream.next().await.expect("slot should hold the final comment");
        assert_eq!(last.no, Some(3));
        assert_eq!(last.program, "p1");
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_community_channel_accepts_untagged_program() {
        let api = Arc::new(
            MockApi::new().with_programs("ch1", vec![Program::new("p9", "community stream")]),
        );
        let channel = Channel::new("news24").tag("ch1");
        let source = UpstreamCommentSource::with_api(channel, Arc::clone(&api));

        timeout(Duration::from_secs(5), source.start())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(api.opened().await, vec!["p9"]);
    }

    #[tokio::test]
    async fn test_official_channel_rejects_untagged_program() {
        let api = Arc::new(
            MockApi::new().with_programs("ch1", vec![Program::new("p9", "community stream")]),
        );
        let channel = Channel::new("news24").tag("ch1").official();
        let source = UpstreamCommentSource::with_api(channel, Arc::clone(&api));

        // No acceptable match: start() still completes, publishing nothing
        timeout(Duration::from_secs(5), source.start())
            .await
            .unwrap()
            .unwrap();

        assert!(api.opened().await.is_empty());
    }

    #[tokio::test]
    async fn test_discovery_failure_does_not_cancel_siblings() {
        let api = Arc::new(
            MockApi::new()
                .with_failing_tag("ch1")
                .with_programs("news24", vec![official_program("p2")]),
        );
        let channel = Channel::new("news24").tag("ch1").official();
        let source = UpstreamCommentSource::with_api(channel, Arc::clone(&api));

        timeout(Duration::from_secs(5), source.start())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(api.opened().await, vec!["p2"]);
    }

    #[tokio::test]
    async fn test_multiple_matches_merge_into_one_hub() {
        let api = Arc::new(
            MockApi::new()
                .with_programs("ch1", vec![official_program("p1")])
                .with_programs("ch2", vec![official_program("p2")]),
        );
        let channel = Channel::new("news24").tags(["ch1", "ch2"]).official();
        let source = UpstreamCommentSource::with_api(channel, Arc::clone(&api));

        timeout(Duration::from_secs(5), source.start())
            .await
            .unwrap()
            .unwrap();

        let mut opened = api.opened().await;
        opened.sort();
        assert_eq!(opened, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_source_is_object_safe() {
        let api = MockApi::new();
        let channel = Channel::new("news24").tag("ch1");
        let source: Box<dyn LiveCommentSource> =
            Box::new(UpstreamCommentSource::new(channel, api));

        assert_eq!(source.channel().name(), "news24");
        assert!(source.subscribers().is_empty().await);

        let id = source.subscribers().next_id();
        source.subscribers().join(id).await;
        assert!(!source.subscribers().is_empty().await);

        timeout(Duration::from_secs(5), source.start())
            .await
            .unwrap()
            .unwrap();
    }
}
