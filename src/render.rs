//! Plain-text rendering of step trees, summaries, and schedules.
//!
//! Renderers return `String`s; callers decide whether they go to stdout
//! or into a progress line.

use std::fmt::Write;
use vectra_core::locale::Locale;
use vectra_core::schedule::ScheduleDescriptor;
use vectra_core::steps::{display_roots, label_for, walk, StepRecord, StepStatus, StepSummary};

fn glyph(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Running => "…",
        StepStatus::Completed => "✓",
        StepStatus::Failed => "✗",
    }
}

/// Seconds as `420ms`, `3.25s`, or `2m 05s`.
pub fn format_duration(secs: f64) -> String {
    // Pick the unit from the rounded value so 0.9996 reads "1.00s", not "1000ms".
    let millis = (secs * 1000.0).round();
    let centis = (secs * 100.0).round();
    if millis < 1000.0 {
        format!("{}ms", millis as u64)
    } else if centis < 6000.0 {
        format!("{:.2}s", centis / 100.0)
    } else {
        let whole = secs.round() as u64;
        format!("{}m {:02}s", whole / 60, whole % 60)
    }
}

/// One line for a single step, without indentation.
pub fn render_step_line(step: &StepRecord, locale: &Locale) -> String {
    let mut line = format!("{} {}", glyph(step.status), label_for(&step.step_type, locale));
    if !step.label.is_empty() && step.label != step.step_type {
        let _ = write!(line, ": {}", step.label);
    }
    if let Some(d) = step.duration {
        let _ = write!(line, "  {}", format_duration(d));
    }
    if let Some(t) = step.tokens {
        let _ = write!(line, "  tokens {} in / {} out", t.input, t.output);
    }
    line
}

/// Render a forest as an indented tree, two spaces per level.
///
/// The completed marker is left out of the root list.
pub fn render_tree(roots: &[StepRecord], locale: &Locale) -> String {
    let mut out = String::new();
    for root in display_roots(roots) {
        walk(std::slice::from_ref(root), &mut |depth, step| {
            let _ = writeln!(
                out,
                "{}{}",
                "  ".repeat(depth),
                render_step_line(step, locale)
            );
        });
    }
    out
}

pub fn render_summary(summary: &StepSummary) -> String {
    let mut line = format!(
        "{} completed, {} failed",
        summary.completed_count, summary.failed_count
    );
    if summary.running_count > 0 {
        let _ = write!(line, ", {} running", summary.running_count);
    }
    let _ = write!(
        line,
        "  |  {}  |  tokens {} in / {} out",
        format_duration(summary.total_duration),
        summary.total_input_tokens,
        summary.total_output_tokens
    );
    line
}

/// Key/value listing of a descriptor and its label.
pub fn render_descriptor(descriptor: &ScheduleDescriptor, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "type:      {}", descriptor.schedule_type);
    let _ = writeln!(out, "minute:    {}", descriptor.minute);
    let _ = writeln!(out, "hour:      {}", descriptor.hour);
    let _ = writeln!(out, "dayWeek:   {}", descriptor.day_week);
    let _ = writeln!(out, "dayMonth:  {}", descriptor.day_month);
    let _ = writeln!(out, "label:     {}", label);
    out
}
