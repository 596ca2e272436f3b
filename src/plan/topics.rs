//! Topic extraction: flattens phases → steps → topics into addressable references.
//!
//! Each [`TopicRef`] carries the index path of its topic in the owning plan. Concurrent
//! enrichment works on these detached references and the results are written back
//! through [`LearningPlan::topic_mut`] once every call has settled, so no task ever
//! holds a mutable borrow into the tree.

use super::model::{LearningPlan, Topic};
use serde::Serialize;

/// Position of a topic inside a plan, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TopicPath {
    pub phase: usize,
    pub step: usize,
    pub topic: usize,
}

/// A topic reference handed to enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRef {
    pub path: TopicPath,
    pub title: String,
}

/// Collect every topic in document order. Phases without steps and steps without
/// topics contribute nothing.
pub fn extract_topics(plan: &LearningPlan) -> Vec<TopicRef> {
    plan.topics()
        .map(|(path, topic)| TopicRef {
            path,
            title: topic.title.clone(),
        })
        .collect()
}

impl LearningPlan {
    /// Iterate topics with their paths, in document order.
    pub fn topics(&self) -> impl Iterator<Item = (TopicPath, &Topic)> {
        self.phases.iter().enumerate().flat_map(|(p, phase)| {
            phase.steps.iter().enumerate().flat_map(move |(s, step)| {
                step.topics.iter().enumerate().map(move |(t, topic)| {
                    (
                        TopicPath {
                            phase: p,
                            step: s,
                            topic: t,
                        },
                        topic,
                    )
                })
            })
        })
    }

    /// Mutable iteration over topics; mutations are visible in the plan.
    pub fn topics_mut(&mut self) -> impl Iterator<Item = &mut Topic> {
        self.phases
            .iter_mut()
            .flat_map(|phase| phase.steps.iter_mut())
            .flat_map(|step| step.topics.iter_mut())
    }

    pub fn topic(&self, path: TopicPath) -> Option<&Topic> {
        self.phases
            .get(path.phase)?
            .steps
            .get(path.step)?
            .topics
            .get(path.topic)
    }

    pub fn topic_mut(&mut self, path: TopicPath) -> Option<&mut Topic> {
        self.phases
            .get_mut(path.phase)?
            .steps
            .get_mut(path.step)?
            .topics
            .get_mut(path.topic)
    }

    pub fn topic_count(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|phase| phase.steps.iter())
            .map(|step| step.topics.len())
            .sum()
    }
}
