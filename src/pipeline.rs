//! End-to-end roadmap pipeline: prompt, generate, then enrich.
//!
//! A request that reaches this layer is already validated. Generation failure aborts the
//! run before any search is issued; enrichment never fails the run.

use crate::config::RoadmapConfig;
use crate::enrichment::{EnrichmentExecutor, EnrichmentSummary, VideoSearch, YouTubeClient};
use crate::error::{ApiError, GenerationError};
use crate::generation::PlanGenerator;
use crate::plan::{LearningPlan, LearningPlanRequest};
use crate::prompt::build_prompt;
use crate::provider::ProviderFactory;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A generated plan plus how enrichment went, if it ran.
#[derive(Debug, Clone)]
pub struct GeneratedRoadmap {
    pub plan: LearningPlan,
    pub enrichment: Option<EnrichmentSummary>,
}

pub struct RoadmapService {
    generator: PlanGenerator,
    enricher: Option<EnrichmentExecutor>,
}

impl RoadmapService {
    pub fn new(generator: PlanGenerator, enricher: Option<EnrichmentExecutor>) -> Self {
        Self {
            generator,
            enricher,
        }
    }

    /// Build the generation client and, when search is enabled and keyed, the enricher.
    pub fn from_config(config: &RoadmapConfig) -> Result<Self, ApiError> {
        let provider = config.generation.to_model_provider()?;
        let client = ProviderFactory::create_client(&provider)?;
        let generator = PlanGenerator::new(client, config.generation.completion_options());

        let enricher = if !config.search.enabled {
            info!("Video enrichment disabled by configuration");
            None
        } else {
            match config.search.resolved_api_key() {
                Some(api_key) => {
                    let search: Arc<dyn VideoSearch> = Arc::new(
                        YouTubeClient::new(api_key, Some(config.search.endpoint.clone()))
                            .map_err(|e| ApiError::ConfigError(e.to_string()))?,
                    );
                    Some(
                        EnrichmentExecutor::new(search)
                            .with_max_results(config.search.max_results)
                            .with_query_suffix(config.search.query_suffix.clone())
                            .with_max_concurrency(config.search.max_concurrency),
                    )
                }
                None => {
                    warn!("No search API key configured (search.api_key or YOUTUBE_API_KEY); plans will not be enriched");
                    None
                }
            }
        };

        Ok(Self::new(generator, enricher))
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enricher.is_some()
    }

    pub fn generator(&self) -> &PlanGenerator {
        &self.generator
    }

    /// Generate and enrich.
    pub async fn generate(
        &self,
        request: &LearningPlanRequest,
    ) -> Result<GeneratedRoadmap, GenerationError> {
        self.generate_with(request, true).await
    }

    /// Generate, enriching only when `enrich` is set and an enricher is configured.
    pub async fn generate_with(
        &self,
        request: &LearningPlanRequest,
        enrich: bool,
    ) -> Result<GeneratedRoadmap, GenerationError> {
        let started = Instant::now();
        info!(
            goal = request.career_goal(),
            level = request.skill_level(),
            "Roadmap requested"
        );

        let prompt = build_prompt(request, self.generator.schema_dialect());
        let mut plan = self.generator.generate(&prompt).await?;

        let enrichment = match (&self.enricher, enrich) {
            (Some(enricher), true) => Some(enricher.enrich(&mut plan).await),
            _ => None,
        };

        info!(
            topics = plan.topic_count(),
            enriched = enrichment.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Roadmap ready"
        );
        Ok(GeneratedRoadmap { plan, enrichment })
    }
}
