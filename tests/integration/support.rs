//! Shared fakes and fixtures for integration tests
//!
//! `FakeModel` and `FakeSearch` implement the provider traits in-process and record every
//! call, so tests can assert both the produced plan and the calls that were (not) made.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roadmap::enrichment::{build_query, EnrichmentExecutor, VideoHit, VideoSearch, DEFAULT_QUERY_SUFFIX};
use roadmap::error::{EnrichmentError, ProviderError};
use roadmap::generation::PlanGenerator;
use roadmap::pipeline::RoadmapService;
use roadmap::plan::LearningPlanRequest;
use roadmap::provider::{CompletionOptions, CompletionResponse, StructuredModelClient, TokenUsage};
use roadmap::schema::{SchemaDialect, SchemaNode};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Model client that returns a canned response.
pub struct FakeModel {
    response: Result<String, String>,
    dialect: SchemaDialect,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn returning(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(content.into()),
            dialect: SchemaDialect::JsonSchema,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Like [`FakeModel::returning`], reporting the Gemini schema dialect.
    pub fn returning_gemini(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(content.into()),
            dialect: SchemaDialect::Gemini,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.into()),
            dialect: SchemaDialect::JsonSchema,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl StructuredModelClient for FakeModel {
    async fn complete_structured(
        &self,
        prompt: &str,
        _schema: &SchemaNode,
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        match &self.response {
            Ok(content) => Ok(CompletionResponse {
                content: content.clone(),
                model: "fake-model".to_string(),
                usage: Some(TokenUsage {
                    prompt_tokens: 100,
                    completion_tokens: 200,
                    total_tokens: 300,
                }),
                finish_reason: Some("STOP".to_string()),
            }),
            Err(message) => Err(ProviderError::RequestFailed(message.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    fn schema_dialect(&self) -> SchemaDialect {
        self.dialect
    }
}

/// Video search that returns `hits_per_query` hits, with per-query failures and latency.
pub struct FakeSearch {
    hits_per_query: usize,
    failing: HashSet<String>,
    latency: HashMap<String, Duration>,
    default_latency: Duration,
    calls: Mutex<Vec<String>>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started_at_completion: Mutex<Vec<usize>>,
}

impl FakeSearch {
    pub fn new(hits_per_query: usize) -> Self {
        Self {
            hits_per_query,
            failing: HashSet::new(),
            latency: HashMap::new(),
            default_latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            started_at_completion: Mutex::new(Vec::new()),
        }
    }

    /// Fail the search issued for `topic_title`.
    pub fn failing_for(mut self, topic_title: &str) -> Self {
        self.failing.insert(query_for(topic_title));
        self
    }

    pub fn with_latency(mut self, topic_title: &str, latency: Duration) -> Self {
        self.latency.insert(query_for(topic_title), latency);
        self
    }

    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// For each completed call, how many calls had been started when it completed.
    pub fn started_at_completion(&self) -> Vec<usize> {
        self.started_at_completion.lock().clone()
    }
}

#[async_trait]
impl VideoSearch for FakeSearch {
    async fn search_videos(&self, query: &str, limit: usize) -> Result<Vec<VideoHit>, EnrichmentError> {
        self.calls.lock().push(query.to_string());
        self.started.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let latency = self.latency.get(query).copied().unwrap_or(self.default_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.started_at_completion
            .lock()
            .push(self.started.load(Ordering::SeqCst));

        if self.failing.contains(query) {
            return Err(EnrichmentError::Api {
                status: 403,
                message: "quotaExceeded".to_string(),
            });
        }

        let _ = limit;
        Ok((0..self.hits_per_query)
            .map(|i| VideoHit {
                video_id: format!("{}-{}", query.replace(' ', "_"), i),
                title: format!("{} video {}", query, i),
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "fake-search"
    }
}

pub fn query_for(topic_title: &str) -> String {
    build_query(topic_title, DEFAULT_QUERY_SUFFIX)
}

pub fn request() -> LearningPlanRequest {
    LearningPlanRequest::new("Backend Engineer", "Career switch", "Beginner")
        .expect("valid request")
}

pub fn service(model: Arc<FakeModel>, search: Arc<FakeSearch>) -> RoadmapService {
    RoadmapService::new(
        PlanGenerator::new(model, CompletionOptions::default()),
        Some(EnrichmentExecutor::new(search)),
    )
}

pub fn service_with_executor(model: Arc<FakeModel>, executor: EnrichmentExecutor) -> RoadmapService {
    RoadmapService::new(
        PlanGenerator::new(model, CompletionOptions::default()),
        Some(executor),
    )
}

fn topic(title: &str) -> Value {
    json!({
        "title": title,
        "subtopics": ["Basics", "Practice", "Pitfalls"],
        "resources": [
            { "title": format!("{} docs", title), "type": "documentation", "link": "https://docs.example.com" },
            { "title": format!("{} course", title), "type": "course", "link": "https://course.example.com" }
        ],
        "notes": "Focus on fundamentals"
    })
}

/// Plan with `phases` x `steps` x `topics`; topic titles are `"Topic p.s.t"`.
pub fn plan_value(phases: usize, steps: usize, topics: usize) -> Value {
    let phases: Vec<Value> = (0..phases)
        .map(|p| {
            let steps: Vec<Value> = (0..steps)
                .map(|s| {
                    let topics: Vec<Value> =
                        (0..topics).map(|t| topic(&format!("Topic {}.{}.{}", p, s, t))).collect();
                    json!({ "title": format!("Step {}.{}", p, s), "topics": topics })
                })
                .collect();
            json!({
                "title": format!("Phase {}", p),
                "duration": "4 weeks",
                "goal": "Make progress",
                "steps": steps
            })
        })
        .collect();
    json!({
        "title": "Backend Engineer Roadmap",
        "description": "From basics to production services",
        "phases": phases
    })
}

/// Single phase and step holding the named topics.
pub fn plan_with_topics(titles: &[&str]) -> Value {
    let topics: Vec<Value> = titles.iter().map(|t| topic(t)).collect();
    json!({
        "title": "Roadmap",
        "description": "Test plan",
        "phases": [{
            "title": "Foundation",
            "duration": "2 weeks",
            "goal": "Start",
            "steps": [{ "title": "Learn", "topics": topics }]
        }]
    })
}
