//! Plan document types. Field names match the JSON the model is asked to produce.

use serde::{Deserialize, Deserializer, Serialize};

/// Root of a generated roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPlan {
    pub title: String,
    pub description: String,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default, deserialize_with = "string_or_default")]
    pub title: String,
    /// Free text, e.g. "8-12 weeks"
    #[serde(default, deserialize_with = "string_or_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub goal: String,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "string_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub topics: Vec<Topic>,
}

/// Leaf of the plan tree and the unit of enrichment.
///
/// `resources` holds the generated entries first; enrichment only ever appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default, deserialize_with = "string_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub subtopics: Vec<String>,
    #[serde(default, deserialize_with = "seq_or_default")]
    pub resources: Vec<Resource>,
    #[serde(default, deserialize_with = "string_or_default")]
    pub notes: String,
}

impl Topic {
    /// Append enrichment results after the existing resources.
    pub fn append_resources(&mut self, resources: impl IntoIterator<Item = Resource>) {
        self.resources.extend(resources);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "string_or_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "kind_or_default")]
    pub kind: ResourceKind,
    #[serde(default, deserialize_with = "string_or_default")]
    pub link: String,
}

impl Resource {
    pub fn video(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: ResourceKind::Video,
            link: link.into(),
        }
    }
}

/// Resource category. The model writes free text here, so unknown values
/// collapse to [`ResourceKind::Other`] instead of failing the parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Video,
    Course,
    Article,
    Tutorial,
    Documentation,
    Interactive,
    #[default]
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Course => "course",
            ResourceKind::Article => "article",
            ResourceKind::Tutorial => "tutorial",
            ResourceKind::Documentation => "documentation",
            ResourceKind::Interactive => "interactive",
            ResourceKind::Other => "other",
        }
    }
}

impl From<String> for ResourceKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" | "videos" | "playlist" | "youtube" => ResourceKind::Video,
            "course" | "mooc" => ResourceKind::Course,
            "article" | "blog" | "blog post" => ResourceKind::Article,
            "tutorial" | "guide" => ResourceKind::Tutorial,
            "documentation" | "docs" | "official documentation" => ResourceKind::Documentation,
            "interactive" | "exercise" | "practice" => ResourceKind::Interactive,
            _ => ResourceKind::Other,
        }
    }
}

impl From<ResourceKind> for String {
    fn from(value: ResourceKind) -> Self {
        value.as_str().to_string()
    }
}

/// Accepts a missing or `null` sequence as empty.
fn seq_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a missing or `null` string as empty.
fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn kind_or_default<'de, D>(deserializer: D) -> Result<ResourceKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ResourceKind>::deserialize(deserializer)?.unwrap_or_default())
}
