//! Plan generation: one schema-constrained model call, then parse and shape-check.
//!
//! No retries. A transport or provider failure surfaces as
//! [`GenerationError::ProviderFailure`]; anything returned that is not a plan-shaped JSON
//! document surfaces as [`GenerationError::MalformedResponse`].

use crate::error::GenerationError;
use crate::plan::LearningPlan;
use crate::provider::{CompletionOptions, StructuredModelClient};
use crate::schema::{check_plan_shape, learning_plan_schema, SchemaDialect, SchemaNode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Characters of raw output kept in logs when parsing fails.
const RAW_SNIPPET_LEN: usize = 200;

pub struct PlanGenerator {
    client: Arc<dyn StructuredModelClient>,
    schema: SchemaNode,
    options: CompletionOptions,
}

impl PlanGenerator {
    pub fn new(client: Arc<dyn StructuredModelClient>, options: CompletionOptions) -> Self {
        Self {
            client,
            schema: learning_plan_schema(),
            options,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn schema_dialect(&self) -> SchemaDialect {
        self.client.schema_dialect()
    }

    /// Ask the model for a plan and parse it.
    pub async fn generate(&self, prompt: &str) -> Result<LearningPlan, GenerationError> {
        let started = Instant::now();
        info!(
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            prompt_chars = prompt.len(),
            "Plan generation started"
        );

        let completion = self
            .client
            .complete_structured(prompt, &self.schema, &self.options)
            .await
            .map_err(|e| {
                warn!(provider = self.client.provider_name(), error = %e, "Generation provider failed");
                GenerationError::ProviderFailure(e)
            })?;

        let plan = parse_plan(&completion.content).map_err(|e| {
            warn!(
                error = %e,
                finish_reason = completion.finish_reason.as_deref().unwrap_or("unknown"),
                raw = %snippet(&completion.content),
                "Generation returned a malformed plan"
            );
            e
        })?;

        info!(
            model = %completion.model,
            phases = plan.phases.len(),
            topics = plan.topic_count(),
            prompt_tokens = completion.usage.map(|u| u.prompt_tokens),
            completion_tokens = completion.usage.map(|u| u.completion_tokens),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Plan generation completed"
        );
        Ok(plan)
    }
}

/// Parse raw model output into a plan.
pub fn parse_plan(raw: &str) -> Result<LearningPlan, GenerationError> {
    let payload = strip_code_fence(raw);
    if payload.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "empty response from model".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {}", e)))?;
    check_plan_shape(&value).map_err(GenerationError::MalformedResponse)?;
    let plan: LearningPlan = serde_json::from_value(value)
        .map_err(|e| GenerationError::MalformedResponse(format!("schema mismatch: {}", e)))?;

    debug!(phases = plan.phases.len(), "Parsed generated plan");
    Ok(plan)
}

/// Remove a surrounding Markdown code fence (```json ... ```), if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn snippet(raw: &str) -> String {
    raw.chars().take(RAW_SNIPPET_LEN).collect()
}
