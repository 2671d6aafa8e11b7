//! Live step events from a streaming assistant response.
//!
//! The backend emits newline-delimited JSON: one [`StepRecord`] per step
//! update, plus `{"event": "message_start"}` when a new user message
//! begins and the previous steps are discarded.
//!
//! [`StepLog`] is the append-only list those events build up. Readers
//! only ever see a copy taken under the lock ([`StepLog::snapshot`]), so a
//! render pass never observes the list mid-append.
//!
//! [`watch`] reads lines on a background task and appends them to the log.
//! Each append yields the snapshot as of that line, from which the forest
//! and summary are recomputed and handed to a [`WatchReporter`]. Reporters write
//! to **stderr** so stdout stays free for the final tree.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, RwLock};
use vectra_core::locale::Locale;
use vectra_core::steps::{build_forest, compute_summary, StepRecord, StepSummary};

use crate::render::{render_step_line, render_summary};

/// Control events interleaved with step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlEvent {
    /// A new user message started streaming; earlier steps are discarded.
    MessageStart,
}

/// One decoded NDJSON line.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    Control(ControlEvent),
    Step(StepRecord),
}

impl StreamLine {
    /// Decode a line. Objects with an `event` key are control events;
    /// anything else must be a step record.
    pub fn parse(line: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(line).with_context(|| "invalid JSON")?;
        if !value.is_object() {
            bail!("expected a JSON object");
        }
        if let Some(event) = value.get("event") {
            let event = ControlEvent::deserialize(event)
                .with_context(|| format!("unknown control event: {}", event))?;
            return Ok(StreamLine::Control(event));
        }
        let step = StepRecord::deserialize(value).with_context(|| "invalid step record")?;
        Ok(StreamLine::Step(step))
    }
}

/// A consistent copy of the log.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Incremented on every reset; 0 for the first message.
    pub generation: u64,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Default)]
struct LogState {
    generation: u64,
    steps: Vec<StepRecord>,
}

/// Shared, append-only step list for the response currently streaming.
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    inner: Arc<RwLock<LogState>>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, step: StepRecord) {
        self.inner.write().await.steps.push(step);
    }

    /// Append `step` and return the log as of that append.
    pub async fn append(&self, step: StepRecord) -> Snapshot {
        let mut state = self.inner.write().await;
        state.steps.push(step);
        Snapshot {
            generation: state.generation,
            steps: state.steps.clone(),
        }
    }

    /// Drop all steps and start a new generation, returning its number.
    pub async fn reset(&self) -> u64 {
        let mut state = self.inner.write().await;
        state.steps.clear();
        state.generation += 1;
        state.generation
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.inner.read().await;
        Snapshot {
            generation: state.generation,
            steps: state.steps.clone(),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.steps.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// What a reporter is told after each accepted line.
#[derive(Debug, Clone)]
pub enum WatchEvent<'a> {
    MessageStart {
        generation: u64,
    },
    Step {
        generation: u64,
        step: &'a StepRecord,
        roots: &'a [StepRecord],
        summary: &'a StepSummary,
    },
}

/// Receives watch updates. Implementations write to stderr.
pub trait WatchReporter: Send + Sync {
    fn report(&self, event: WatchEvent<'_>);
}

/// One human-readable line per update:
/// `step 3  ✓ Searching documents  1.20s  [2 completed, 0 failed | ...]`.
pub struct HumanReporter {
    locale: Locale,
}

impl HumanReporter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl WatchReporter for HumanReporter {
    fn report(&self, event: WatchEvent<'_>) {
        let line = match event {
            WatchEvent::MessageStart { generation } => {
                format!("--- message {} ---\n", generation + 1)
            }
            WatchEvent::Step { step, summary, .. } => format!(
                "{}  [{}]\n",
                render_step_line(step, &self.locale),
                render_summary(summary)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// One JSON object per line on stderr.
pub struct JsonReporter;

impl WatchReporter for JsonReporter {
    fn report(&self, event: WatchEvent<'_>) {
        let obj = match event {
            WatchEvent::MessageStart { generation } => serde_json::json!({
                "event": "message_start",
                "generation": generation,
            }),
            WatchEvent::Step {
                generation,
                step,
                roots,
                summary,
            } => serde_json::json!({
                "event": "step",
                "generation": generation,
                "step": step,
                "roots": roots.len(),
                "summary": summary,
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoReporter;

impl WatchReporter for NoReporter {
    fn report(&self, _event: WatchEvent<'_>) {}
}

/// Progress mode for `steps watch`: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ReportMode {
    Off,
    Human,
    Json,
}

impl ReportMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ReportMode::Human
        } else {
            ReportMode::Off
        }
    }

    pub fn reporter(&self, locale: &Locale) -> Box<dyn WatchReporter> {
        match self {
            ReportMode::Off => Box::new(NoReporter),
            ReportMode::Human => Box::new(HumanReporter::new(locale.clone())),
            ReportMode::Json => Box::new(JsonReporter),
        }
    }
}

/// Counters for a finished watch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub lines: usize,
    pub steps: usize,
    pub resets: usize,
    pub skipped: usize,
}

/// What the reader saw, with the log exactly as that line left it.
enum Tick {
    Reset { generation: u64 },
    Step { step: StepRecord, snapshot: Snapshot },
}

/// Consume an NDJSON step stream until EOF.
///
/// Blank lines are ignored. Lines that fail to decode are logged and
/// skipped. Returns the read counters; the final state is left in `log`.
pub async fn watch<R>(reader: R, log: StepLog, reporter: &dyn WatchReporter) -> Result<WatchStats>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Tick>();

    let read_task = tokio::spawn(async move {
        let mut stats = WatchStats::default();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read step stream")? {
            stats.lines += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match StreamLine::parse(trimmed) {
                Ok(StreamLine::Control(ControlEvent::MessageStart)) => {
                    let generation = log.reset().await;
                    stats.resets += 1;
                    let _ = tx.send(Tick::Reset { generation });
                }
                Ok(StreamLine::Step(step)) => {
                    let snapshot = log.append(step.clone()).await;
                    stats.steps += 1;
                    let _ = tx.send(Tick::Step { step, snapshot });
                }
                Err(e) => {
                    stats.skipped += 1;
                    tracing::warn!(line = stats.lines, error = %format!("{:#}", e), "skipping stream line");
                }
            }
        }
        anyhow::Ok(stats)
    });

    while let Some(tick) = rx.recv().await {
        match tick {
            Tick::Reset { generation } => reporter.report(WatchEvent::MessageStart { generation }),
            Tick::Step { step, snapshot } => {
                let roots = build_forest(&snapshot.steps);
                let summary = compute_summary(&snapshot.steps);
                reporter.report(WatchEvent::Step {
                    generation: snapshot.generation,
                    step: &step,
                    roots: &roots,
                    summary: &summary,
                });
            }
        }
    }

    let stats = read_task.await.context("step stream reader panicked")??;
    tracing::debug!(
        lines = stats.lines,
        steps = stats.steps,
        resets = stats.resets,
        skipped = stats.skipped,
        "step stream finished"
    );
    Ok(stats)
}
