//! CLI presentation: text formatters for generated roadmaps and config checks.

use crate::config::ValidationError;
use crate::enrichment::EnrichmentSummary;
use crate::pipeline::GeneratedRoadmap;
use crate::plan::{Phase, ResourceKind};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Human-readable roadmap: one table per phase, then the enrichment line.
pub fn format_plan_text(roadmap: &GeneratedRoadmap) -> String {
    let plan = &roadmap.plan;
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading(&plan.title)));
    if !plan.description.is_empty() {
        out.push_str(&format!("{}\n", plan.description));
    }
    out.push('\n');

    for (index, phase) in plan.phases.iter().enumerate() {
        out.push_str(&format_phase(index + 1, phase));
    }

    out.push_str(&format_enrichment_line(roadmap.enrichment.as_ref()));
    out
}

fn format_phase(number: usize, phase: &Phase) -> String {
    let mut heading = format!("Phase {}: {}", number, phase.title);
    if !phase.duration.is_empty() {
        heading.push_str(&format!(" ({})", phase.duration));
    }
    let mut out = format!("{}\n", format_section_heading(&heading));
    if !phase.goal.is_empty() {
        out.push_str(&format!("  Goal: {}\n", phase.goal));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Step", "Topic", "Subtopics", "Resources", "Videos"]);
    for step in &phase.steps {
        for topic in &step.topics {
            let videos = topic
                .resources
                .iter()
                .filter(|r| r.kind == ResourceKind::Video)
                .count();
            table.add_row(vec![
                step.title.clone(),
                topic.title.clone(),
                topic.subtopics.len().to_string(),
                topic.resources.len().to_string(),
                videos.to_string(),
            ]);
        }
    }
    out.push_str(&format!("{}\n\n", table));
    out
}

fn format_enrichment_line(summary: Option<&EnrichmentSummary>) -> String {
    match summary {
        None => format!("{}\n", "Video enrichment: skipped".dimmed()),
        Some(s) if s.failed == 0 => format!(
            "Video enrichment: {} videos across {} topics\n",
            s.videos_appended.green(),
            s.enriched
        ),
        Some(s) => format!(
            "Video enrichment: {} videos across {} topics, {} topics without videos\n",
            s.videos_appended.green(),
            s.enriched,
            s.failed.yellow()
        ),
    }
}

pub fn format_config_validation(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => format!("{} Configuration is valid", "✓".green()),
        Err(errors) => {
            let mut out = format!("{} Configuration has {} error(s):\n", "✗".red(), errors.len());
            for error in errors {
                out.push_str(&format!("  - {}\n", error));
            }
            out
        }
    }
}
