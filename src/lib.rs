//! Roadmap: AI-generated learning roadmaps enriched with video tutorials
//!
//! A learner's goal, motivation, and level become a prompt; one schema-constrained model
//! call returns a phased plan; every topic in the plan is then enriched concurrently with
//! video search results, appended after the generated resources.

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod generation;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod server;
