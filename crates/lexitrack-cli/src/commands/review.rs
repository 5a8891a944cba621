//! The `lexitrack review` command.

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};

use lexitrack_core::model::{Outcome, ProficiencyLevel};
use lexitrack_core::scheduler::{format_interval, interval_days, next_level, next_review_at, preview};

pub fn execute(level: i64, outcome: Option<String>, show_preview: bool) -> Result<()> {
    let level = ProficiencyLevel::new(level)?;
    let now = Utc::now();

    if show_preview {
        let mut table = Table::new();
        table.set_header(vec!["Outcome", "Level", "Interval", "Next review"]);
        for p in preview(level) {
            table.add_row(vec![
                Cell::new(p.outcome),
                Cell::new(p.level),
                Cell::new(format_interval(p.interval_days)),
                Cell::new(next_review_at(p.level, now).format("%Y-%m-%d")),
            ]);
        }
        println!("From level {level}:");
        println!("{table}");
        return Ok(());
    }

    let outcome: Outcome = outcome
        .ok_or_else(|| anyhow::anyhow!("--outcome is required without --preview"))?
        .parse()?;
    let next = next_level(level, outcome);
    let days = interval_days(next);

    println!("Outcome: {outcome}");
    println!("Level: {level} -> {next}");
    println!("Interval: {days} day(s) ({})", format_interval(days));
    println!("Next review: {}", next_review_at(next, now).format("%Y-%m-%d"));
    Ok(())
}
