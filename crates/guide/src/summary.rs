//! Completion statistics and the downloadable plain-text assembly summary.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shared::{Product, StepNumber};

/// Figures shown on the completion screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub completed: usize,
    pub total: StepNumber,
    /// Percentage of steps completed, rounded
    pub completion_rate: u32,
    /// Share of the estimated assembly time covered by completed steps, rounded
    pub estimated_minutes_used: u32,
    pub people_needed: u32,
    pub tool_count: usize,
    pub fully_completed: bool,
}

fn share(completed: usize, total: StepNumber, of: f64) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * of).round() as u32
}

pub fn assembly_stats(product: &Product, completed: &BTreeSet<StepNumber>) -> AssemblyStats {
    let total = product.total_steps();
    let count = completed.iter().filter(|n| product.contains_step(**n)).count();
    AssemblyStats {
        completed: count,
        total,
        completion_rate: share(count, total, 100.0),
        estimated_minutes_used: share(count, total, product.estimated_time_min as f64),
        people_needed: product.people_needed,
        tool_count: product.tools.len(),
        fully_completed: count == total as usize,
    }
}

fn bullet_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the summary document. The layout is a fixed external format.
pub fn generate_summary(
    product: &Product,
    completed: &BTreeSet<StepNumber>,
    date: NaiveDate,
) -> String {
    let stats = assembly_stats(product, completed);

    let completed_titles = product
        .steps
        .iter()
        .filter(|step| completed.contains(&step.step))
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step.title))
        .collect::<Vec<_>>()
        .join("\n");
    let parts = bullet_list(
        product
            .replacement_parts
            .iter()
            .map(|part| format!("{} (SKU: {})", part.name, part.sku)),
    );

    format!(
        "SARMOBI ASSEMBLY SUMMARY
========================

Product: {name}
Model: {id}
Assembly Date: {date}

COMPLETION STATUS:
- Steps Completed: {completed}/{total}
- Completion Rate: {rate}%
- Estimated Time Used: {minutes} minutes

COMPLETED STEPS:
{completed_titles}

TOOLS USED:
{tools}

CARE INSTRUCTIONS:
{care}

REPLACEMENT PARTS:
{parts}

Thank you for choosing Sarmobi!
For support, visit: support@sarmobi.com",
        name = product.name,
        id = product.id,
        date = date.format("%-m/%-d/%Y"),
        completed = stats.completed,
        total = stats.total,
        rate = stats.completion_rate,
        minutes = stats.estimated_minutes_used,
        tools = bullet_list(&product.tools),
        care = bullet_list(&product.care_tips),
    )
}

/// Download name for a summary generated at `now`
pub fn summary_file_name(now: DateTime<Utc>) -> String {
    format!("sarmobi-assembly-summary-{}.txt", now.timestamp_millis())
}
