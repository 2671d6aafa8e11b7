//! Translation tables for schedule and step labels.
//!
//! Every formatting call takes a [`Locale`] explicitly; there is no
//! process-wide "current locale". The CLI resolves one `Locale` from
//! configuration at startup and threads it through.
//!
//! Schedule templates are keyed by the lowercase schedule type name and
//! may use the placeholders `{time}` (`HH:MM`), `{minute}` (`MM`) and
//! `{day}` (weekday name for weekly, day-of-month number for monthly).

use std::collections::HashMap;

/// Day names used when no table overrides them, Sunday first.
pub const ENGLISH_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// A resolved set of translations.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    /// Locale identifier, e.g. `en` or `de`.
    pub name: String,
    /// Weekday names, Sunday first.
    pub days: [String; 7],
    /// Schedule label templates keyed by schedule type name.
    pub schedule: HashMap<String, String>,
    /// Human-readable step descriptions keyed by step type.
    pub steps: HashMap<String, String>,
}

impl Locale {
    /// The built-in English table.
    pub fn english() -> Self {
        let schedule = [
            ("manual", "Manual"),
            ("hourly", "Hourly (at :{minute})"),
            ("daily", "Daily ({time})"),
            ("weekly", "Weekly ({day}, {time})"),
            ("monthly", "Monthly (Day {day}, {time})"),
        ];
        let steps = [
            ("intent", "Understanding the question"),
            ("routing", "Choosing a data source"),
            ("retrieval", "Searching documents"),
            ("vector_search", "Searching documents"),
            ("reranking", "Ranking results"),
            ("sql_generation", "Writing SQL query"),
            ("sql_execution", "Running SQL query"),
            ("generation", "Writing the answer"),
            ("completed", "Done"),
        ];
        Self {
            name: "en".to_string(),
            days: ENGLISH_DAYS.map(str::to_string),
            schedule: to_map(&schedule),
            steps: to_map(&steps),
        }
    }

    /// Layer overrides on top of this table.
    ///
    /// `days`, when given, replaces the whole weekday list; template and
    /// step maps are merged key by key.
    pub fn with_overrides(
        mut self,
        name: &str,
        days: Option<[String; 7]>,
        schedule: &HashMap<String, String>,
        steps: &HashMap<String, String>,
    ) -> Self {
        self.name = name.to_string();
        if let Some(days) = days {
            self.days = days;
        }
        for (k, v) in schedule {
            self.schedule.insert(k.to_lowercase(), v.clone());
        }
        for (k, v) in steps {
            self.steps.insert(k.clone(), v.clone());
        }
        self
    }

    /// Weekday name for an index; the index is taken modulo 7.
    pub fn day_name(&self, index: u32) -> &str {
        &self.days[(index % 7) as usize]
    }

    /// Localized description of a step type, if the table has one.
    pub fn step_label(&self, step_type: &str) -> Option<&str> {
        self.steps.get(step_type).map(String::as_str)
    }

    /// Schedule template for a type name.
    pub fn schedule_template(&self, type_name: &str) -> Option<&str> {
        self.schedule.get(type_name).map(String::as_str)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
