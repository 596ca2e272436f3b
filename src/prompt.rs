//! Prompt construction for plan generation.
//!
//! Pure and deterministic: the same request and dialect always produce the same text.
//! The embedded schema is rendered in the dialect the provider receives.

use crate::plan::LearningPlanRequest;
use crate::schema::{learning_plan_schema, SchemaDialect};

const MENTOR_INSTRUCTIONS: &str = "\
You are an expert AI learning designer and mentor for college students. Your task is to create a detailed, personalized learning roadmap.
Prioritize resources from trusted sources: YouTube tutorials and playlists, online courses (e.g., Coursera, freeCodeCamp, Udemy), official documentation, and respected articles or blogs.
Maintain clean and concise language.";

const OUTPUT_RULES: &str = "\
Only return valid JSON. Do not add explanations, commentary, or extra fields.
Your JSON must strictly adhere to the following schema:";

const STRUCTURE_RULES: &str = "\
Instructions:
1. Divide the roadmap into 3-5 logical phases (e.g., Foundation, Application, Mastery), each with clear duration and goals.
2. In each phase, add several clear steps (e.g., \"Learn Basics of X\", \"Build a Mini Project\").
3. Each step should include multiple topics. Each topic must include:
    - 3-5 subtopics
    - 2-4 high-quality resources with title, type (e.g., course, tutorial, article, video), and link
    - A helpful note on what to focus on or why it's important";

pub const DEFAULT_EXPERIENCE: &str = "None";
pub const DEFAULT_TIMEFRAME: &str = "Not specified";

/// Build the single generation prompt for `request`.
pub fn build_prompt(request: &LearningPlanRequest, dialect: SchemaDialect) -> String {
    let schema = learning_plan_schema().render(dialect);
    let schema_text =
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string());

    format!(
        "{instructions}\n\n{rules}\n{schema}\n\n\
         Use the following inputs to tailor the plan:\n\
         - Goal: {goal}\n\
         - Motivation: {motivation}\n\
         - Current Level: {level}\n\
         - Prior Experience: {experience}\n\
         - Weekly Time: {timeframe}\n\n\
         {structure}\n",
        instructions = MENTOR_INSTRUCTIONS,
        rules = OUTPUT_RULES,
        schema = schema_text,
        goal = request.career_goal(),
        motivation = request.motivation(),
        level = request.skill_level(),
        experience = request.academic_background().unwrap_or(DEFAULT_EXPERIENCE),
        timeframe = request.weekly_time_commitment().unwrap_or(DEFAULT_TIMEFRAME),
        structure = STRUCTURE_RULES,
    )
}
