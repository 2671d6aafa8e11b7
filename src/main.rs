//! # Vectra CLI (`vectra`)
//!
//! Inspect connector sync schedules and pipeline-step streams from the
//! command line.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vectra schedule parse <cron>` | Decode a cron string into a schedule descriptor |
//! | `vectra schedule build --type <t>` | Build the cron string for a UI schedule |
//! | `vectra schedule label <cron>` | Localized schedule label |
//! | `vectra schedule next <cron>` | Upcoming fire times (UTC) |
//! | `vectra connectors` | List configured connectors and their schedules |
//! | `vectra steps tree <file>` | Render a step file as a tree with totals |
//! | `vectra steps summary <file>` | Totals only |
//! | `vectra steps watch [file]` | Follow an NDJSON step stream |
//!
//! ## Examples
//!
//! ```bash
//! vectra schedule parse "30 2 * * *"
//! vectra schedule build --type weekly --minute 0 --hour 9 --day-week 1
//! vectra --locale de schedule label "0 9 * * 1"
//! vectra connectors --config ./config/vectra.toml
//! backend-stream | vectra steps watch --progress json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vectra::schedule::ScheduleFields;
use vectra::stream::ReportMode;
use vectra::{config, connectors, logging, schedule_cmd, steps_cmd};

/// Vectra CLI: connector schedules and pipeline-step streams.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "vectra",
    about = "Vectra: connector schedules and pipeline-step streams",
    version,
    long_about = "Translates connector sync schedules between cron strings and editable \
    descriptors, and rebuilds streamed assistant pipeline steps into trees with roll-up totals."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/vectra.toml")]
    config: PathBuf,

    /// Locale for labels (`en` or a table from `[locale.tables]`).
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Log debug output to stderr (overridden by `VECTRA_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate connector schedules.
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// List configured connectors with schedule labels and next runs.
    Connectors,

    /// Inspect pipeline steps of an assistant response.
    Steps {
        #[command(subcommand)]
        action: StepsAction,
    },
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// Decode a cron string into `{type, minute, hour, dayWeek, dayMonth}`.
    ///
    /// Unsupported expressions (ranges, steps, lists) decode as manual.
    Parse {
        cron: String,
        /// Print JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Build the cron string for a schedule type and fields.
    ///
    /// Prints `manual` when no cron string applies.
    Build {
        /// `manual`, `hourly`, `daily`, `weekly`, or `monthly`.
        #[arg(long = "type")]
        schedule_type: String,
        #[arg(long)]
        minute: Option<u32>,
        #[arg(long)]
        hour: Option<u32>,
        /// Day of week, 0 = Sunday (weekly only; default 1).
        #[arg(long)]
        day_week: Option<u32>,
        /// Day of month (monthly only; default 1).
        #[arg(long)]
        day_month: Option<u32>,
        #[arg(long)]
        json: bool,
    },

    /// Print the localized label for a cron string.
    Label { cron: String },

    /// Print upcoming fire times in UTC.
    Next {
        cron: String,
        /// Number of runs to list (1 to 1000).
        #[arg(
            long,
            default_value_t = 5,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
                .range(1..=vectra::schedule::MAX_UPCOMING as u64)
        )]
        count: usize,
        /// Start instant (RFC 3339). Defaults to now.
        #[arg(long)]
        after: Option<String>,
    },
}

#[derive(Subcommand)]
enum StepsAction {
    /// Render steps as a tree followed by totals.
    Tree {
        /// JSON array or NDJSON file; `-` for stdin.
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Print totals: completed/failed counts, duration, tokens.
    Summary {
        /// JSON array or NDJSON file; `-` for stdin.
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Follow an NDJSON step stream until EOF.
    ///
    /// Progress goes to stderr; the final tree goes to stdout.
    Watch {
        /// NDJSON file; `-` (default) for stdin.
        #[arg(default_value = steps_cmd::STDIN_PATH)]
        file: PathBuf,
        /// Progress output. Defaults to `human` when stderr is a terminal.
        #[arg(long, value_enum)]
        progress: Option<ReportMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cfg = config::load_config_or_default(&cli.config)?;
    let locale = cfg.locale(cli.locale.as_deref())?;

    match cli.command {
        Commands::Schedule { action } => match action {
            ScheduleAction::Parse { cron, json } => {
                schedule_cmd::run_parse(&cron, &locale, json)?;
            }
            ScheduleAction::Build {
                schedule_type,
                minute,
                hour,
                day_week,
                day_month,
                json,
            } => {
                let fields = ScheduleFields {
                    minute,
                    hour,
                    day_week,
                    day_month,
                };
                schedule_cmd::run_build(&schedule_type, fields, json)?;
            }
            ScheduleAction::Label { cron } => {
                schedule_cmd::run_label(&cron, &locale)?;
            }
            ScheduleAction::Next { cron, count, after } => {
                schedule_cmd::run_next(&cron, count, after.as_deref())?;
            }
        },
        Commands::Connectors => {
            connectors::list_connectors(&cfg, &locale, chrono::Utc::now())?;
        }
        Commands::Steps { action } => match action {
            StepsAction::Tree { file, json } => {
                steps_cmd::run_tree(&file, &locale, json)?;
            }
            StepsAction::Summary { file, json } => {
                steps_cmd::run_summary(&file, json)?;
            }
            StepsAction::Watch { file, progress } => {
                let mode = progress.unwrap_or_else(ReportMode::default_for_tty);
                steps_cmd::run_watch(&file, mode, &locale).await?;
            }
        },
    }

    Ok(())
}
