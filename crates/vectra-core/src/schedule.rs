//! Connector schedule translation between cron strings and UI descriptors.
//!
//! Connectors persist their sync schedule as a 5-field cron expression
//! (`minute hour day-of-month month day-of-week`) or the `"manual"`
//! sentinel. Editors work on a [`ScheduleDescriptor`] instead: a schedule
//! type plus the numeric fields relevant to it.
//!
//! # Classification
//!
//! [`parse_cron`] classifies a cron string by which fields are wildcards
//! (`*` or `?`) and which are plain integers. Patterns are checked in a
//! fixed order and the first match wins:
//!
//! | minute | hour | day | month | weekday | type |
//! |--------|------|-----|-------|---------|------|
//! | N | `*` | `*` | `*` | `*` | hourly |
//! | N | N | `*` | `*` | `*` | daily |
//! | N | N | `*` | `*` | N | weekly |
//! | N | N | N | `*` | `*` | monthly |
//!
//! Everything else, including ranges (`1-5`), steps (`*/5`) and lists
//! (`1,2`), is manual. Parsing never fails; malformed input is manual.
//!
//! # Example
//!
//! ```rust
//! use vectra_core::schedule::{parse_cron, to_cron, ScheduleFields, ScheduleType};
//!
//! let spec = to_cron(
//!     ScheduleType::Daily,
//!     &ScheduleFields { minute: Some(30), hour: Some(2), ..Default::default() },
//! );
//! assert_eq!(spec.cron_expression.as_deref(), Some("30 2 * * *"));
//!
//! let back = parse_cron(spec.cron_expression.as_deref());
//! assert_eq!(back.schedule_type, ScheduleType::Daily);
//! assert_eq!((back.minute, back.hour), (30, 2));
//! ```

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Value persisted on a connector that has no periodic schedule.
pub const MANUAL_SENTINEL: &str = "manual";

/// Most fire times [`ScheduleDescriptor::upcoming`] will list.
pub const MAX_UPCOMING: usize = 1000;

/// Upper bound on months scanned when looking for a monthly fire date.
const MONTHLY_SEARCH_LIMIT: u32 = 48;

/// How often a connector syncs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Manual,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Manual => "manual",
            ScheduleType::Hourly => "hourly",
            ScheduleType::Daily => "daily",
            ScheduleType::Weekly => "weekly",
            ScheduleType::Monthly => "monthly",
        }
    }

    /// Parse a type name case-insensitively. Unknown names are manual.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => ScheduleType::Hourly,
            "daily" => ScheduleType::Daily,
            "weekly" => ScheduleType::Weekly,
            "monthly" => ScheduleType::Monthly,
            _ => ScheduleType::Manual,
        }
    }
}

impl std::fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One whitespace-separated cron token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronField {
    /// `*` or `?`.
    Wildcard,
    /// A plain non-negative integer. Values too large for `u32` read as 0.
    Literal(u32),
    /// Anything else: ranges, steps, lists, names, signs.
    Unsupported(String),
}

impl CronField {
    pub fn parse(token: &str) -> Self {
        match token {
            "*" | "?" => CronField::Wildcard,
            t if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) => {
                CronField::Literal(t.parse().unwrap_or(0))
            }
            t => CronField::Unsupported(t.to_string()),
        }
    }
}

/// Editable form of a connector schedule.
///
/// Serializes as `{ "type", "minute", "hour", "dayWeek", "dayMonth" }`.
/// `day_week` is 0 for Sunday. Fields that do not apply to the type hold
/// their defaults (0, except `day_month` which is 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDescriptor {
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub minute: u32,
    pub hour: u32,
    pub day_week: u32,
    pub day_month: u32,
}

impl Default for ScheduleDescriptor {
    fn default() -> Self {
        Self::manual()
    }
}

/// Input to [`to_cron`]. Unset fields take type-specific defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleFields {
    pub minute: Option<u32>,
    pub hour: Option<u32>,
    pub day_week: Option<u32>,
    pub day_month: Option<u32>,
}

/// Result of [`to_cron`]: the type to persist and its cron string.
///
/// `cron_expression` is `None` for manual schedules, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronSpec {
    pub schedule_type: ScheduleType,
    pub cron_expression: Option<String>,
}

impl CronSpec {
    /// The value stored on the connector: the cron string or `"manual"`.
    pub fn persisted(&self) -> &str {
        self.cron_expression.as_deref().unwrap_or(MANUAL_SENTINEL)
    }
}

/// Translate a stored cron string into a descriptor.
///
/// Absent, empty, or under-length input yields [`ScheduleDescriptor::manual`].
/// Tokens past the fifth are ignored. An expression that matches none of
/// the recognized shapes is manual with every numeric field reset, so its
/// literal values are not carried over.
pub fn parse_cron(cron: Option<&str>) -> ScheduleDescriptor {
    let Some(cron) = cron else {
        return ScheduleDescriptor::manual();
    };

    let fields: Vec<CronField> = cron.split_whitespace().take(5).map(CronField::parse).collect();
    let [minute, hour, day_month, month, day_week] = fields.as_slice() else {
        return ScheduleDescriptor::manual();
    };

    use CronField::{Literal, Wildcard};
    let base = ScheduleDescriptor::manual();
    match (minute, hour, day_month, month, day_week) {
        (Literal(m), Wildcard, Wildcard, Wildcard, Wildcard) => ScheduleDescriptor {
            schedule_type: ScheduleType::Hourly,
            minute: *m,
            ..base
        },
        (Literal(m), Literal(h), Wildcard, Wildcard, Wildcard) => ScheduleDescriptor {
            schedule_type: ScheduleType::Daily,
            minute: *m,
            hour: *h,
            ..base
        },
        (Literal(m), Literal(h), Wildcard, Wildcard, Literal(dw)) => ScheduleDescriptor {
            schedule_type: ScheduleType::Weekly,
            minute: *m,
            hour: *h,
            day_week: *dw,
            ..base
        },
        (Literal(m), Literal(h), Literal(dm), Wildcard, Wildcard) => ScheduleDescriptor {
            schedule_type: ScheduleType::Monthly,
            minute: *m,
            hour: *h,
            day_month: *dm,
            ..base
        },
        _ => base,
    }
}

/// Build the cron string for a schedule edited in the UI.
///
/// | type | cron |
/// |------|------|
/// | hourly | `{minute} * * * *` |
/// | daily | `{minute} {hour} * * *` |
/// | weekly | `{minute} {hour} * * {dayWeek}` (dayWeek defaults to 1) |
/// | monthly | `{minute} {hour} {dayMonth} * *` (dayMonth defaults to 1) |
/// | manual | no cron string |
pub fn to_cron(schedule_type: ScheduleType, fields: &ScheduleFields) -> CronSpec {
    let minute = fields.minute.unwrap_or(0);
    let hour = fields.hour.unwrap_or(0);

    let cron_expression = match schedule_type {
        ScheduleType::Manual => None,
        ScheduleType::Hourly => Some(format!("{} * * * *", minute)),
        ScheduleType::Daily => Some(format!("{} {} * * *", minute, hour)),
        ScheduleType::Weekly => Some(format!(
            "{} {} * * {}",
            minute,
            hour,
            fields.day_week.unwrap_or(1)
        )),
        ScheduleType::Monthly => Some(format!(
            "{} {} {} * *",
            minute,
            hour,
            fields.day_month.unwrap_or(1)
        )),
    };

    CronSpec {
        schedule_type,
        cron_expression,
    }
}

/// Localized label for a stored cron string, e.g. `Weekly (Monday, 09:00)`.
pub fn format_label(cron: Option<&str>, locale: &Locale) -> String {
    parse_cron(cron).label(locale)
}

impl ScheduleDescriptor {
    /// `{ manual, minute: 0, hour: 0, dayWeek: 0, dayMonth: 1 }`.
    pub const fn manual() -> Self {
        Self {
            schedule_type: ScheduleType::Manual,
            minute: 0,
            hour: 0,
            day_week: 0,
            day_month: 1,
        }
    }

    pub fn fields(&self) -> ScheduleFields {
        ScheduleFields {
            minute: Some(self.minute),
            hour: Some(self.hour),
            day_week: Some(self.day_week),
            day_month: Some(self.day_month),
        }
    }

    pub fn to_cron(&self) -> CronSpec {
        to_cron(self.schedule_type, &self.fields())
    }

    /// True when every field that matters for the type is a valid clock or
    /// calendar value. Manual schedules are always in range.
    pub fn is_in_range(&self) -> bool {
        let minute_ok = self.minute < 60;
        let hour_ok = self.hour < 24;
        match self.schedule_type {
            ScheduleType::Manual => true,
            ScheduleType::Hourly => minute_ok,
            ScheduleType::Daily => minute_ok && hour_ok,
            ScheduleType::Weekly => minute_ok && hour_ok && self.day_week < 7,
            ScheduleType::Monthly => {
                minute_ok && hour_ok && (1..=31).contains(&self.day_month)
            }
        }
    }

    pub fn label(&self, locale: &Locale) -> String {
        let type_name = self.schedule_type.as_str();
        let Some(template) = locale.schedule_template(type_name) else {
            return type_name.to_string();
        };

        let day = match self.schedule_type {
            ScheduleType::Weekly => locale.day_name(self.day_week).to_string(),
            ScheduleType::Monthly => self.day_month.to_string(),
            _ => String::new(),
        };

        template
            .replace("{time}", &format!("{:02}:{:02}", self.hour, self.minute))
            .replace("{minute}", &format!("{:02}", self.minute))
            .replace("{day}", &day)
    }

    /// Next UTC instant strictly after `after` at which this schedule fires.
    ///
    /// Returns `None` for manual schedules and for out-of-range fields.
    /// Monthly schedules skip months that do not have `day_month`.
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.is_in_range() {
            return None;
        }

        let today = after.date_naive();
        match self.schedule_type {
            ScheduleType::Manual => None,
            ScheduleType::Hourly => {
                let candidate = at(today, after.hour(), self.minute)?;
                if candidate > after {
                    Some(candidate)
                } else {
                    Some(candidate + Duration::hours(1))
                }
            }
            ScheduleType::Daily => {
                let candidate = at(today, self.hour, self.minute)?;
                if candidate > after {
                    Some(candidate)
                } else {
                    at(today.succ_opt()?, self.hour, self.minute)
                }
            }
            ScheduleType::Weekly => (0..=7u64)
                .filter_map(|offset| today.checked_add_days(Days::new(offset)))
                .filter(|d| d.weekday().num_days_from_sunday() == self.day_week)
                .filter_map(|d| at(d, self.hour, self.minute))
                .find(|t| *t > after),
            ScheduleType::Monthly => {
                let (mut year, mut month) = (today.year(), today.month());
                for _ in 0..MONTHLY_SEARCH_LIMIT {
                    if let Some(t) = NaiveDate::from_ymd_opt(year, month, self.day_month)
                        .and_then(|d| at(d, self.hour, self.minute))
                    {
                        if t > after {
                            return Some(t);
                        }
                    }
                    if month == 12 {
                        year += 1;
                        month = 1;
                    } else {
                        month += 1;
                    }
                }
                None
            }
        }
    }

    /// The next `count` fire times after `after`, in order, capped at
    /// [`MAX_UPCOMING`].
    pub fn upcoming(&self, after: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        let count = count.min(MAX_UPCOMING);
        let mut runs = Vec::with_capacity(count);
        let mut cursor = after;
        while runs.len() < count {
            match self.next_run_after(cursor) {
                Some(t) => {
                    runs.push(t);
                    cursor = t;
                }
                None => break,
            }
        }
        runs
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0).map(|dt| dt.and_utc())
}
