//! Enrichment executor: fans out one video search per topic and merges the results.
//! Owns the join barrier and the merge; search behavior stays in the provider.
//!
//! All searches are issued together and awaited as one batch. A failed search is turned
//! into an empty result inside its own future, so it can never cancel siblings. Results
//! are written back sequentially after the barrier, addressed by topic path.

use super::{
    build_query, fetch_videos, VideoSearch, DEFAULT_MAX_RESULTS, DEFAULT_QUERY_SUFFIX,
    MAX_VIDEOS_PER_TOPIC,
};
use crate::plan::{extract_topics, LearningPlan, Resource, TopicPath, TopicRef};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Settled result for one topic. A failure already carries an empty resource list.
#[derive(Debug, Clone)]
pub struct TopicOutcome {
    pub path: TopicPath,
    pub title: String,
    pub resources: Vec<Resource>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub topics: usize,
    pub enriched: usize,
    pub failed: usize,
    pub videos_appended: usize,
}

pub struct EnrichmentExecutor {
    search: Arc<dyn VideoSearch>,
    max_results: usize,
    query_suffix: String,
    max_concurrency: Option<usize>,
}

impl EnrichmentExecutor {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self {
            search,
            max_results: DEFAULT_MAX_RESULTS,
            query_suffix: DEFAULT_QUERY_SUFFIX.to_string(),
            max_concurrency: None,
        }
    }

    /// Videos requested per topic, capped at [`MAX_VIDEOS_PER_TOPIC`].
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_VIDEOS_PER_TOPIC);
        self
    }

    pub fn with_query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query_suffix = suffix.into();
        self
    }

    /// Cap on in-flight searches. `None` issues every search at once.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency.map(|n| n.max(1));
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Enrich every topic of `plan` in place.
    pub async fn enrich(&self, plan: &mut LearningPlan) -> EnrichmentSummary {
        let started = Instant::now();
        let topics = extract_topics(plan);
        info!(
            provider = self.search.provider_name(),
            topics = topics.len(),
            max_concurrency = self.max_concurrency,
            "Enrichment started"
        );

        let outcomes = self.fetch_all(&topics).await;
        let summary = merge_outcomes(plan, outcomes);

        info!(
            topics = summary.topics,
            enriched = summary.enriched,
            failed = summary.failed,
            videos_appended = summary.videos_appended,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Enrichment completed"
        );
        summary
    }

    /// Run one search per topic and wait for all of them to settle.
    /// Outcomes come back in the same order as `topics`.
    pub async fn fetch_all(&self, topics: &[TopicRef]) -> Vec<TopicOutcome> {
        let semaphore = self.max_concurrency.map(Semaphore::new);
        let semaphore = semaphore.as_ref();

        let searches = topics.iter().map(move |topic| async move {
            let _permit = match semaphore {
                Some(s) => s.acquire().await.ok(),
                None => None,
            };
            let query = build_query(&topic.title, &self.query_suffix);
            match fetch_videos(self.search.as_ref(), &query, self.max_results).await {
                Ok(resources) => {
                    debug!(topic = %topic.title, videos = resources.len(), "Topic enriched");
                    TopicOutcome {
                        path: topic.path,
                        title: topic.title.clone(),
                        resources,
                        error: None,
                    }
                }
                Err(err) => {
                    warn!(topic = %topic.title, error = %err, "Video search failed for topic");
                    TopicOutcome {
                        path: topic.path,
                        title: topic.title.clone(),
                        resources: Vec::new(),
                        error: Some(err.to_string()),
                    }
                }
            }
        });

        join_all(searches).await
    }
}

/// Append each outcome's resources to the end of its topic.
pub fn merge_outcomes(plan: &mut LearningPlan, outcomes: Vec<TopicOutcome>) -> EnrichmentSummary {
    let mut summary = EnrichmentSummary {
        topics: outcomes.len(),
        ..EnrichmentSummary::default()
    };

    for outcome in outcomes {
        if outcome.error.is_some() {
            summary.failed += 1;
            continue;
        }
        match plan.topic_mut(outcome.path) {
            Some(topic) => {
                summary.enriched += 1;
                summary.videos_appended += outcome.resources.len();
                topic.append_resources(outcome.resources);
            }
            None => {
                warn!(topic = %outcome.title, path = ?outcome.path, "Topic path no longer resolves; dropping videos");
            }
        }
    }
    summary
}
