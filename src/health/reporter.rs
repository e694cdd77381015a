//! Formatting and reporting for health check results

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a health check report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["System", "Status", "Duration", "Message"]);

    for outcome in &report.outcomes {
        let result = &outcome.result;
        builder.push_record([
            outcome.name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        String::new(),
        "Summary".bold().underline().to_string(),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];

    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    lines.push(String::new());
    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "Overall: UNHEALTHY".red().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "Overall: HEALTHY".green().bold(),
    };
    lines.push(format!("  {overall}"));
    lines.push(String::new());

    lines.join("\n")
}

/// Prints a report plus the details of every check that has any
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for outcome in &report.outcomes {
        if outcome.result.details.is_empty() {
            continue;
        }
        match outcome.description {
            Some(description) => println!("\n{} ({}):", outcome.name.bold(), description),
            None => println!("\n{}:", outcome.name.bold()),
        }
        for line in &outcome.result.details {
            println!("  {line}");
        }
    }
}
