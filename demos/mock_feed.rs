//! Mock live comment feed example
//!
//! Run with: cargo run --example mock_feed
//!
//! Wires the whole pipeline together against a scripted vendor: a channel
//! catalog held in a `RefreshingCache`, one `UpstreamCommentSource` for the
//! selected channel, and a subscriber draining the hub while the mocked
//! upstream plays back a short comment feed.
//!
//! No network access involved; the vendor adapter fabricates discovery
//! results and comment frames.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use jikkyo_rs::source::{FrameStream, LiveCommentApi, OFFICIAL_COMMENTARY_TAG};
use jikkyo_rs::{
    CacheConfig, Channel, Comment, ConnectInfo, LiveCommentSource, Program, RawFrame,
    RefreshingCache, Result, UpstreamCommentSource,
};

/// Scripted vendor: one official program on tag "ch1", frames are
/// "author|text" strings played back at a leisurely pace
struct ScriptedVendor;

#[async_trait]
impl LiveCommentApi for ScriptedVendor {
    async fn search(&self, tag: &str) -> Result<Vec<Program>> {
        if tag == "ch1" {
            Ok(vec![Program::new("lv100", "morning news commentary")
                .tag(OFFICIAL_COMMENTARY_TAG)
                .official()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn connect_info(&self, program: &Program) -> Result<ConnectInfo> {
        Ok(ConnectInfo::new(
            format!("wss://mock.example/{}", program.id),
            &program.id,
        ))
    }

    async fn open(&self, info: &ConnectInfo) -> Result<FrameStream> {
        let (tx, rx) = mpsc::channel(8);
        let program = info.program.clone();

        tokio::spawn(async move {
            let script = [
                "viewer_a|こんにちは",
                "viewer_b|今日も始まった",
                "viewer_c|www",
                "viewer_a|この話題きた",
                "viewer_d|8888888",
            ];
            for line in script {
                tokio::time::sleep(Duration::from_millis(300)).await;
                let frame = RawFrame::new(&program, Bytes::from(line));
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    fn parse(&self, frame: RawFrame) -> Option<Comment> {
        let text = String::from_utf8(frame.payload.to_vec()).ok()?;
        let (author, body) = text.split_once('|')?;
        Some(Comment::new(&frame.program, author, body, 0))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // Channel catalog as a dispatcher would hold it
    let catalog = RefreshingCache::with_config(
        CacheConfig::default().refresh_interval(Duration::from_secs(60)),
        || async {
            Ok(vec![
                Channel::new("news24").tag("ch1").official(),
                Channel::new("community-radio").tag("ch9"),
            ])
        },
    );

    let channel = catalog
        .find(|c: &Channel| c.name() == "news24")
        .await
        .expect("catalog holds news24");

    let source = UpstreamCommentSource::new(channel, ScriptedVendor);

    let subscriber = source.subscribers().next_id();
    source.subscribers().join(subscriber).await;

    let mut stream = source.hub().subscribe().await;
    let consumer = tokio::spawn(async move {
        while let Some(comment) = stream.next().await {
            println!("[{}] {}: {}", comment.program, comment.author, comment.text);
        }
    });

    // start() finishes once the scripted feed is exhausted
    let _ = source.start().await;
    source.hub().close().await;
    let _ = consumer.await;

    source.subscribers().leave(subscriber).await;
    if source.subscribers().is_empty().await {
        tracing::info!(channel = %source.channel(), "No subscribers left, source can be discarded");
    }
}
