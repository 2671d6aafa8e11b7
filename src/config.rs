//! TOML configuration: locale tables and connector schedules.
//!
//! ```toml
//! [locale]
//! default = "de"
//!
//! [locale.tables.de]
//! days = ["Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag"]
//! [locale.tables.de.schedule]
//! daily = "Täglich ({time})"
//! [locale.tables.de.steps]
//! retrieval = "Dokumentsuche"
//!
//! [connectors.handbook]
//! kind = "folder"
//! schedule = "30 2 * * *"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use vectra_core::locale::Locale;
use vectra_core::schedule::{parse_cron, ScheduleType, MANUAL_SENTINEL};

/// Name of the built-in locale.
pub const BUILTIN_LOCALE: &str = "en";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub connectors: BTreeMap<String, ConnectorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocaleConfig {
    #[serde(default = "default_locale")]
    pub default: String,
    #[serde(default)]
    pub tables: BTreeMap<String, LocaleTableConfig>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            tables: BTreeMap::new(),
        }
    }
}

fn default_locale() -> String {
    BUILTIN_LOCALE.to_string()
}

/// Overrides layered on the built-in English table.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LocaleTableConfig {
    /// Weekday names, Sunday first. Exactly 7 entries.
    #[serde(default)]
    pub days: Option<Vec<String>>,
    /// Schedule label templates keyed by type (`manual`, `hourly`, …).
    #[serde(default)]
    pub schedule: HashMap<String, String>,
    /// Step descriptions keyed by step type.
    #[serde(default)]
    pub steps: HashMap<String, String>,
}

/// One data-source connector and its sync schedule.
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectorConfig {
    /// Connector kind, e.g. `folder`, `database`, `sharepoint`.
    pub kind: String,
    /// Cron expression or `"manual"`. Absent means manual.
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ConnectorConfig {
    /// The schedule as stored, with absence shown as `"manual"`.
    pub fn persisted_schedule(&self) -> &str {
        self.schedule.as_deref().unwrap_or(MANUAL_SENTINEL)
    }
}

impl Config {
    /// Configuration used when no file is present: English, no connectors.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Resolve a locale by name, or the configured default when `None`.
    pub fn locale(&self, name: Option<&str>) -> Result<Locale> {
        let name = name.unwrap_or(&self.locale.default);
        let base = Locale::english();

        let Some(table) = self.locale.tables.get(name) else {
            if name == BUILTIN_LOCALE {
                return Ok(base);
            }
            bail!(
                "Unknown locale: '{}'. Available: {}",
                name,
                self.locale_names().join(", ")
            );
        };

        let days = match &table.days {
            Some(days) => Some(days_array(name, days)?),
            None => None,
        };
        Ok(base.with_overrides(name, days, &table.schedule, &table.steps))
    }

    /// Built-in plus configured locale names, sorted.
    pub fn locale_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.locale.tables.keys().cloned().collect();
        if !names.iter().any(|n| n == BUILTIN_LOCALE) {
            names.push(BUILTIN_LOCALE.to_string());
        }
        names.sort();
        names
    }
}

fn days_array(locale: &str, days: &[String]) -> Result<[String; 7]> {
    <[String; 7]>::try_from(days.to_vec()).map_err(|v| {
        anyhow::anyhow!(
            "locale.tables.{}.days must list 7 weekday names (Sunday first), got {}",
            locale,
            v.len()
        )
    })
}

/// Load configuration, or [`Config::minimal`] when `path` does not exist.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::minimal());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate locale tables
    for (name, table) in &config.locale.tables {
        if let Some(days) = &table.days {
            days_array(name, days)?;
        }
        for key in table.schedule.keys() {
            match key.to_lowercase().as_str() {
                "manual" | "hourly" | "daily" | "weekly" | "monthly" => {}
                other => bail!(
                    "locale.tables.{}.schedule: unknown schedule type '{}'",
                    name,
                    other
                ),
            }
        }
    }

    if config.locale.default != BUILTIN_LOCALE
        && !config.locale.tables.contains_key(&config.locale.default)
    {
        bail!(
            "locale.default '{}' is not '{}' or a configured locale table",
            config.locale.default,
            BUILTIN_LOCALE
        );
    }

    // Validate connectors
    for (name, connector) in &config.connectors {
        if connector.kind.trim().is_empty() {
            bail!("connectors.{}.kind must not be empty", name);
        }
        let stored = connector.persisted_schedule().trim();
        if stored.eq_ignore_ascii_case(MANUAL_SENTINEL) {
            continue;
        }
        let descriptor = parse_cron(Some(stored));
        if descriptor.schedule_type == ScheduleType::Manual {
            tracing::warn!(
                connector = %name,
                schedule = %stored,
                "schedule is not an hourly, daily, weekly or monthly cron; treating as manual"
            );
        } else if !descriptor.is_in_range() {
            tracing::warn!(
                connector = %name,
                schedule = %stored,
                "schedule has out-of-range fields and will never fire"
            );
        }
    }

    Ok(config)
}
