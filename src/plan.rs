//! Learning plan domain: the generated document, the inbound request, and topic addressing.
//!
//! A [`LearningPlan`] is owned by exactly one request. It is produced by the generation step,
//! enriched in place, and serialized back to the caller. Nothing here is persisted.

mod model;
mod request;
mod topics;

pub use model::{LearningPlan, Phase, Resource, ResourceKind, Step, Topic};
pub use request::{GenerateRequestBody, LearningPlanRequest};
pub use topics::{extract_topics, TopicPath, TopicRef};
