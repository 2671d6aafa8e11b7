//! # Vectra
//!
//! Connector schedule translation and pipeline-step aggregation for the
//! Vectra assistant platform.
//!
//! Vectra connectors store their sync schedule as a cron string; editors
//! work on a typed schedule descriptor. While an answer streams, the
//! backend reports pipeline steps (retrieval, SQL generation, …) that are
//! rebuilt into a tree with roll-up totals. The pure algorithms live in
//! [`vectra_core`]; this crate adds configuration, stream ingestion,
//! rendering, and the `vectra` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────┐
//! │ vectra.toml │──▶│ schedule     │──▶│  CLI     │
//! │ connectors  │   │ cron ⇄ UI    │   │ (vectra) │
//! └─────────────┘   └──────────────┘   └────▲─────┘
//! ┌─────────────┐   ┌──────────────┐        │
//! │ NDJSON step │──▶│ StepLog ──▶  │────────┘
//! │ stream      │   │ forest+sum   │
//! └─────────────┘   └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration: locales and connectors |
//! | [`connectors`] | Connector schedule listing and next runs |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`render`] | Text rendering of trees, summaries, schedules |
//! | [`schedule_cmd`] | `vectra schedule` commands |
//! | [`steps_cmd`] | `vectra steps` commands |
//! | [`stream`] | Step event log and NDJSON watcher |

pub mod config;
pub mod connectors;
pub mod logging;
pub mod render;
pub mod schedule_cmd;
pub mod steps_cmd;
pub mod stream;

pub use vectra_core::{locale, schedule, steps};
