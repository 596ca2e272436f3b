//! Inbound generation request and its validation.

use crate::error::RequestError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Validated profile used to build a single generation prompt.
///
/// Construction enforces that the three required fields are non-empty;
/// the value is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningPlanRequest {
    career_goal: String,
    motivation: String,
    skill_level: String,
    academic_background: Option<String>,
    weekly_time_commitment: Option<String>,
}

impl LearningPlanRequest {
    pub fn new(
        career_goal: impl Into<String>,
        motivation: impl Into<String>,
        skill_level: impl Into<String>,
    ) -> Result<Self, RequestError> {
        Ok(Self {
            career_goal: required("goal", Some(career_goal.into()))?,
            motivation: required("purpose", Some(motivation.into()))?,
            skill_level: required("level", Some(skill_level.into()))?,
            academic_background: None,
            weekly_time_commitment: None,
        })
    }

    pub fn with_academic_background(mut self, value: Option<String>) -> Self {
        self.academic_background = optional(value);
        self
    }

    pub fn with_weekly_time_commitment(mut self, value: Option<String>) -> Self {
        self.weekly_time_commitment = optional(value);
        self
    }

    pub fn career_goal(&self) -> &str {
        &self.career_goal
    }

    pub fn motivation(&self) -> &str {
        &self.motivation
    }

    pub fn skill_level(&self) -> &str {
        &self.skill_level
    }

    pub fn academic_background(&self) -> Option<&str> {
        self.academic_background.as_deref()
    }

    pub fn weekly_time_commitment(&self) -> Option<&str> {
        self.weekly_time_commitment.as_deref()
    }
}

/// JSON body accepted by `POST /api/generate`.
///
/// Any JSON object deserializes (callers check the body is an object); a field that is not a string reads as absent and is
/// rejected later by the required-field check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequestBody {
    #[serde(default, deserialize_with = "text_or_none")]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub timeframe: Option<String>,
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

impl TryFrom<GenerateRequestBody> for LearningPlanRequest {
    type Error = RequestError;

    fn try_from(body: GenerateRequestBody) -> Result<Self, Self::Error> {
        let goal = required("goal", body.goal)?;
        let purpose = required("purpose", body.purpose)?;
        let level = required("level", body.level)?;
        Ok(LearningPlanRequest::new(goal, purpose, level)?
            .with_academic_background(body.experience)
            .with_weekly_time_commitment(body.timeframe))
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, RequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(RequestError::InvalidRequest { field }),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
