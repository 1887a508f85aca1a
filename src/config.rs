use crate::schedule::{ScheduleError, TimeInterval, parse_clock};
use anyhow::{Context, Result, bail};
use chrono::Weekday;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Server configuration, read from an optional TOML file
///
/// Every field has a default, so a partial file is valid:
///
/// ```toml
/// week_starts_on = "Mon"
/// default_from = "09:00"
/// default_to = "18:00"
/// display_date_format = "%d/%m"
/// day_names = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// First day of the week edited in specific-week mode
    pub week_starts_on: Weekday,
    /// Start of the interval added by add_hours (HH:MM)
    pub default_from: String,
    /// End of the interval added by add_hours (HH:MM)
    pub default_to: String,
    /// strftime format for the date shown next to each day of a specific week
    pub display_date_format: String,
    /// Day names indexed by weekday, Sunday first
    pub day_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_starts_on: Weekday::Sun,
            default_from: "08:00".to_string(),
            default_to: "17:00".to_string(),
            display_date_format: "%d/%m".to_string(),
            day_names: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// The interval appended by add_hours
    pub fn default_interval(&self) -> Result<TimeInterval, ScheduleError> {
        let (from_hour, from_minutes) = parse_clock(&self.default_from)?;
        let (to_hour, to_minutes) = parse_clock(&self.default_to)?;
        TimeInterval::new(from_hour, from_minutes, to_hour, to_minutes)
    }

    /// Display name of a weekday index, falling back to the index itself
    pub fn day_name(&self, weekday: u8) -> String {
        self.day_names
            .get(usize::from(weekday))
            .cloned()
            .unwrap_or_else(|| format!("Day {}", weekday))
    }

    /// Whether chrono can render `display_date_format`
    pub fn date_format_is_valid(&self) -> bool {
        !StrftimeItems::new(&self.display_date_format).any(|item| matches!(item, Item::Error))
    }
}

/// Load the configuration file, or the defaults when no file is given or it does not exist
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(Config::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .default_interval()
        .with_context(|| format!("Invalid default hours in {}", path.display()))?;
    if !config.date_format_is_valid() {
        bail!(
            "Invalid display_date_format '{}' in {}",
            config.display_date_format,
            path.display()
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.week_starts_on, Weekday::Sun);
        assert_eq!(config.default_interval().unwrap(), TimeInterval::default());
        assert_eq!(config.day_name(0), "Sunday");
        assert_eq!(config.day_name(6), "Saturday");
    }

    #[test]
    fn test_load_config_without_path() -> Result<()> {
        assert_eq!(load_config(None)?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_config_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config(Some(&dir.path().join("missing.toml")))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_partial_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "week_starts_on = \"Mon\"\ndefault_from = \"09:30\"\n")?;

        let config = load_config(Some(&path))?;
        assert_eq!(config.week_starts_on, Weekday::Mon);
        assert_eq!(
            config.default_interval()?,
            TimeInterval::new(9, 30, 17, 0)?
        );
        assert_eq!(config.display_date_format, "%d/%m");
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_bad_default_hours() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_to = \"25:00\"\n")?;

        assert!(load_config(Some(&path)).is_err());
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_bad_date_format() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "display_date_format = \"%Q\"\n")?;

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("display_date_format"));

        fs::write(&path, "display_date_format = \"%a %d.%m.\"\n")?;
        assert_eq!(load_config(Some(&path))?.display_date_format, "%a %d.%m.");
        Ok(())
    }

    #[test]
    fn test_date_format_is_valid() {
        assert!(Config::default().date_format_is_valid());
        let config = Config {
            display_date_format: "%d/%Q".to_string(),
            ..Config::default()
        };
        assert!(!config.date_format_is_valid());
    }

    #[test]
    fn test_day_name_falls_back_when_list_is_short() {
        let config = Config {
            day_names: vec!["Dom".to_string()],
            ..Config::default()
        };
        assert_eq!(config.day_name(0), "Dom");
        assert_eq!(config.day_name(3), "Day 3");
    }
}
