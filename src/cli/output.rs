//! CLI output formatting

use crate::text::{StepConfig, TextPipelineConfig};

// Re-export style
pub use console::style;
use console::Emoji;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");

/// Format one pipeline result for display
pub fn format_result(index: usize, value: &str) -> String {
    format!("{} {}", style(format!("[{}]", index + 1)).dim(), format_output(value, 10))
}

/// Format a step as a one-line summary
pub fn format_step(index: usize, step: &StepConfig) -> String {
    let mut flags = Vec::new();
    if step.isolated {
        flags.push("isolated");
    }
    if step.keep_initial_destination == Some(true) {
        flags.push("keeps destination");
    }
    if step.when.is_some() {
        flags.push("conditional");
    }
    if step.op.is_multi() {
        flags.push("multi");
    }

    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };

    format!(
        "  {}. {} [{}]{}",
        index + 1,
        style(step.display_name()).bold(),
        style(step.op.kind()).cyan(),
        style(flags).dim()
    )
}

/// Format a validated pipeline for display
pub fn format_pipeline(config: &TextPipelineConfig) -> String {
    let mut lines = vec![
        format!("  Name: {}", style(config.name.as_deref().unwrap_or("(unnamed)")).bold()),
        format!("  Steps: {}", style(config.steps.len()).cyan()),
        format!("  Variables: {}", style(config.variables.len()).cyan()),
    ];
    lines.extend(config.steps.iter().enumerate().map(|(i, step)| format_step(i, step)));
    lines.join("\n")
}

/// Format output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}
