//! `vectra steps …` commands.
//!
//! Step files hold either a JSON array of step records or NDJSON in the
//! stream format (see [`crate::stream`]). For NDJSON, only the steps after
//! the last `message_start` event are kept.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tokio::io::{AsyncBufRead, BufReader};
use vectra_core::locale::Locale;
use vectra_core::steps::{build_forest, compute_summary, display_roots, StepRecord};

use crate::render::{render_summary, render_tree};
use crate::stream::{watch, ReportMode, StepLog, StreamLine};

/// `-` reads from stdin.
pub const STDIN_PATH: &str = "-";

/// Read a step file (or stdin) into records.
pub fn load_steps(path: &Path) -> Result<Vec<StepRecord>> {
    let content = if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read steps from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read step file: {}", path.display()))?
    };
    parse_steps(&content)
}

/// Parse a JSON array or NDJSON step document.
pub fn parse_steps(content: &str) -> Result<Vec<StepRecord>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Failed to parse step array");
    }

    let mut steps = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match StreamLine::parse(line).with_context(|| format!("line {}", i + 1))? {
            StreamLine::Control(_) => steps.clear(),
            StreamLine::Step(step) => steps.push(step),
        }
    }
    Ok(steps)
}

pub fn run_tree(path: &Path, locale: &Locale, json: bool) -> Result<()> {
    let steps = load_steps(path)?;
    let roots = build_forest(&steps);
    let summary = compute_summary(&steps);

    if json {
        let obj = serde_json::json!({
            "steps": display_roots(&roots),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
        return Ok(());
    }

    if steps.is_empty() {
        println!("No steps.");
        return Ok(());
    }
    print!("{}", render_tree(&roots, locale));
    println!();
    println!("{}", render_summary(&summary));
    Ok(())
}

pub fn run_summary(path: &Path, json: bool) -> Result<()> {
    let steps = load_steps(path)?;
    let summary = compute_summary(&steps);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", render_summary(&summary));
    }
    Ok(())
}

/// Follow an NDJSON step stream, reporting progress on stderr and printing
/// the final tree of the last message on stdout.
pub async fn run_watch(path: &Path, mode: ReportMode, locale: &Locale) -> Result<()> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if path.as_os_str() == STDIN_PATH {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open step stream: {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let log = StepLog::new();
    let reporter = mode.reporter(locale);
    let stats = watch(reader, log.clone(), reporter.as_ref()).await?;

    let snapshot = log.snapshot().await;
    if snapshot.steps.is_empty() {
        println!("No steps.");
    } else {
        let roots = build_forest(&snapshot.steps);
        print!("{}", render_tree(&roots, locale));
        println!();
        println!("{}", render_summary(&compute_summary(&snapshot.steps)));
    }

    if stats.skipped > 0 {
        eprintln!("Warning: skipped {} malformed line(s)", stats.skipped);
    }
    Ok(())
}
