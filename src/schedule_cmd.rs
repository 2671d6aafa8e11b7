//! `vectra schedule …` commands.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use vectra_core::locale::Locale;
use vectra_core::schedule::{parse_cron, ScheduleDescriptor, ScheduleFields, ScheduleType};

use crate::render::render_descriptor;

/// Print the descriptor for a stored cron string.
pub fn run_parse(cron: &str, locale: &Locale, json: bool) -> Result<()> {
    let descriptor = parse_cron(Some(cron));
    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print!("{}", render_descriptor(&descriptor, &descriptor.label(locale)));
    }
    Ok(())
}

/// Build and print the cron string for a UI schedule.
///
/// Unknown type names produce a manual schedule. Fields relevant to the
/// type must be in range.
pub fn run_build(type_name: &str, fields: ScheduleFields, json: bool) -> Result<()> {
    let schedule_type = ScheduleType::parse_lossy(type_name);
    if schedule_type == ScheduleType::Manual && !type_name.eq_ignore_ascii_case("manual") {
        tracing::warn!(schedule_type = %type_name, "unknown schedule type, using manual");
    }

    let descriptor = ScheduleDescriptor {
        schedule_type,
        minute: fields.minute.unwrap_or(0),
        hour: fields.hour.unwrap_or(0),
        day_week: fields.day_week.unwrap_or(1),
        day_month: fields.day_month.unwrap_or(1),
    };
    if !descriptor.is_in_range() {
        bail!(
            "{} schedule out of range: minute 0-59, hour 0-23, day-week 0-6, day-month 1-31",
            schedule_type
        );
    }

    let spec = vectra_core::schedule::to_cron(schedule_type, &fields);
    if json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
    } else {
        println!("{}", spec.persisted());
    }
    Ok(())
}

pub fn run_label(cron: &str, locale: &Locale) -> Result<()> {
    println!("{}", vectra_core::schedule::format_label(Some(cron), locale));
    Ok(())
}

/// Print the next `count` fire times (UTC) after `after` or now.
pub fn run_next(cron: &str, count: usize, after: Option<&str>) -> Result<()> {
    let start = match after {
        Some(s) => parse_instant(s)?,
        None => Utc::now(),
    };

    let descriptor = parse_cron(Some(cron));
    if descriptor.schedule_type == ScheduleType::Manual {
        println!("manual: no scheduled runs");
        return Ok(());
    }
    if !descriptor.is_in_range() {
        bail!("schedule '{}' has out-of-range fields and never fires", cron);
    }

    for run in descriptor.upcoming(start, count) {
        println!("{}", run.format("%Y-%m-%dT%H:%M:%SZ"));
    }
    Ok(())
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --after timestamp '{}': expected RFC 3339", s))
}
