//! Video enrichment: search a video provider per topic and turn hits into resources.
//!
//! Enrichment is best-effort. Every failure is scoped to its topic and becomes
//! "no extra videos" for that topic; it never fails the plan.

mod executor;
mod youtube;

pub use executor::{merge_outcomes, EnrichmentExecutor, EnrichmentSummary, TopicOutcome};
pub use youtube::YouTubeClient;

use crate::error::EnrichmentError;
use crate::plan::Resource;
use async_trait::async_trait;

/// Upper bound on videos appended to a single topic.
pub const MAX_VIDEOS_PER_TOPIC: usize = 3;
pub const DEFAULT_MAX_RESULTS: usize = MAX_VIDEOS_PER_TOPIC;
pub const DEFAULT_QUERY_SUFFIX: &str = "tutorial";

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub video_id: String,
    pub title: String,
}

/// Video search provider
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Return at most `limit` video hits for `query`.
    async fn search_videos(&self, query: &str, limit: usize)
        -> Result<Vec<VideoHit>, EnrichmentError>;

    fn provider_name(&self) -> &str;
}

/// Search query for a topic, e.g. `"Ownership tutorial"`.
pub fn build_query(topic_title: &str, suffix: &str) -> String {
    let title = topic_title.trim();
    let suffix = suffix.trim();
    if suffix.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, suffix)
    }
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// Search and map hits into video resources, never more than `limit`.
pub async fn fetch_videos(
    search: &dyn VideoSearch,
    query: &str,
    limit: usize,
) -> Result<Vec<Resource>, EnrichmentError> {
    let hits = search.search_videos(query, limit).await?;
    Ok(hits
        .into_iter()
        .take(limit)
        .map(|hit| Resource::video(hit.title, watch_url(&hit.video_id)))
        .collect())
}
