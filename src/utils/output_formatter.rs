/// Output formatter for rename plans and results
///
/// This module handles console rendering of a plan and of the apply
/// outcome, and exporting a plan as JSON.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{json, Value};

use crate::core::apply::{ApplyError, ApplyReport};
use crate::core::plan::RenamePlan;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a plan for console output
///
/// # Arguments
///
/// * `plan` - The plan to describe
///
/// # Returns
///
/// Formatted string for console output
pub fn format_plan(plan: &RenamePlan) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "Project file".bold()));
    match &plan.project_file {
        Some(project) if project.changes_content() => {
            output.push_str(&format!("  {} {}\n", "patch".cyan(), project.path.display()));
        }
        Some(project) => {
            output.push_str(&format!("  {} {}\n", "unchanged".yellow(), project.path.display()));
        }
        None => output.push_str(&format!("  {}\n", "none found".dimmed())),
    }

    output.push_str(&format!("\n{}\n", "Sources".bold()));
    if plan.sources.is_empty() {
        output.push_str(&format!("  {}\n", "no matching files".dimmed()));
    }
    for change in &plan.sources {
        let marker = if change.rewrite.changes_content() {
            "rewrite".cyan()
        } else {
            "rename".cyan()
        };
        output.push_str(&format!(
            "  {:<8} {} -> {}\n",
            marker,
            file_name(&change.from),
            file_name(&change.to).green()
        ));
    }

    output
}

/// Format the summary printed after a successful apply
pub fn format_report(report: &ApplyReport) -> String {
    format!(
        "\n{}\n{} {}\n{} {}\n",
        "Rename complete".bold(),
        "Files renamed:".green(),
        report.renamed(),
        "Files rewritten:".green(),
        report.rewritten()
    )
}

/// Format a failed apply, listing every step that completed before it
pub fn format_failure(error: &ApplyError) -> String {
    let mut output = format!("{} {}\n", "Error:".red().bold(), error);
    if let Some(source) = std::error::Error::source(error) {
        output.push_str(&format!("  {}\n", source));
    }

    if error.completed.is_empty() {
        output.push_str("No changes were made.\n");
        return output;
    }

    let heading = if error.rolled_back {
        "Completed and rolled back:"
    } else {
        "Completed before the failure:"
    };
    output.push_str(&format!("{}\n", heading.yellow()));
    for step in &error.completed {
        output.push_str(&format!("  - {}\n", step));
    }

    output
}

/// Describe a plan as JSON
pub fn plan_to_json(plan: &RenamePlan) -> Value {
    let project_file = plan.project_file.as_ref().map(|project| {
        json!({
            "path": project.path.display().to_string(),
            "changed": project.changes_content(),
        })
    });

    let sources: Vec<Value> = plan
        .sources
        .iter()
        .map(|change| {
            json!({
                "from": change.from.display().to_string(),
                "to": change.to.display().to_string(),
                "extension": change.extension,
                "changed": change.rewrite.changes_content(),
            })
        })
        .collect();

    json!({
        "project_file": project_file,
        "sources": sources,
        "changed_files": plan.changed_files(),
    })
}

/// Export a plan to a JSON file
///
/// # Arguments
///
/// * `plan` - The plan to export
/// * `output_path` - Path to the output JSON file
pub fn export_plan_json(plan: &RenamePlan, output_path: &Path) -> Result<()> {
    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    let json_string = serde_json::to_string_pretty(&plan_to_json(plan))?;
    file.write_all(json_string.as_bytes())
        .context(format!("Failed to write JSON file: {}", output_path.display()))?;

    Ok(())
}
