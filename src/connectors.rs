//! Connector listing: each configured data source with its decoded
//! schedule, localized label, and next run.

use anyhow::Result;
use chrono::{DateTime, Utc};
use vectra_core::locale::Locale;
use vectra_core::schedule::{parse_cron, ScheduleDescriptor};

use crate::config::Config;

/// A configured connector with its decoded schedule.
#[derive(Debug, Clone)]
pub struct ConnectorSchedule {
    pub name: String,
    pub kind: String,
    pub enabled: bool,
    /// Stored value: a cron string or `manual`.
    pub stored: String,
    pub descriptor: ScheduleDescriptor,
    /// `None` for manual, disabled, or never-firing schedules.
    pub next_run: Option<DateTime<Utc>>,
}

/// Decode every connector's schedule, sorted by connector name.
pub fn connector_schedules(config: &Config, now: DateTime<Utc>) -> Vec<ConnectorSchedule> {
    config
        .connectors
        .iter()
        .map(|(name, connector)| {
            let stored = connector.persisted_schedule().trim().to_string();
            let descriptor = parse_cron(Some(&stored));
            let next_run = if connector.enabled {
                descriptor.next_run_after(now)
            } else {
                None
            };
            ConnectorSchedule {
                name: name.clone(),
                kind: connector.kind.clone(),
                enabled: connector.enabled,
                stored,
                descriptor,
                next_run,
            }
        })
        .collect()
}

pub fn list_connectors(config: &Config, locale: &Locale, now: DateTime<Utc>) -> Result<()> {
    let schedules = connector_schedules(config, now);
    if schedules.is_empty() {
        println!("No connectors configured.");
        return Ok(());
    }

    println!(
        "{:<20} {:<12} {:<30} {:<16} NEXT RUN (UTC)",
        "CONNECTOR", "KIND", "SCHEDULE", "CRON"
    );
    for s in &schedules {
        let next = match (s.enabled, s.next_run) {
            (false, _) => "disabled".to_string(),
            (true, Some(t)) => t.format("%Y-%m-%d %H:%M").to_string(),
            (true, None) => "-".to_string(),
        };
        println!(
            "{:<20} {:<12} {:<30} {:<16} {}",
            s.name,
            s.kind,
            s.descriptor.label(locale),
            s.stored,
            next
        );
    }

    Ok(())
}
