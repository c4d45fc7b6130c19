use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::MatchError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub matching: MatchingSettings,
    pub columns: ColumnSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Half-width of the window of hour buckets a mentor is indexed under
    pub timezone_buffer_hours: i32,
    /// Capacity assumed when a mentor leaves the capacity question blank
    pub default_capacity: u32,
}

/// Widest accepted bucket half-width; real offsets span GMT-12 to GMT+14
pub const MAX_TIMEZONE_BUFFER_HOURS: i32 = 48;

impl MatchingSettings {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0..=MAX_TIMEZONE_BUFFER_HOURS).contains(&self.timezone_buffer_hours) {
            return Err(MatchError::InvalidSetting(format!(
                "matching.timezone_buffer_hours must be between 0 and {}, got {}",
                MAX_TIMEZONE_BUFFER_HOURS, self.timezone_buffer_hours
            )));
        }
        Ok(())
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            timezone_buffer_hours: 12,
            default_capacity: 1,
        }
    }
}

/// Header names of the survey exports
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub email: String,
    pub time_zone: String,
    pub mentor_field: String,
    pub mentee_field: String,
    pub capacity: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Mentor columns copied into the combined output table, in order
    pub mentor_output: Vec<String>,
    /// Mentee columns copied into the combined output table, in order
    pub mentee_output: Vec<String>,
}

pub const CAPACITY_QUESTION: &str = "How many mentees would you be willing to take on? (The expectation is only a 1-hour meeting per mentee and any further communication is entirely up to you.)";

impl Default for ColumnSettings {
    fn default() -> Self {
        let first_name = "Name (First)".to_string();
        let middle_name = "Name (Middle)".to_string();
        let last_name = "Name (Last)".to_string();
        let email = "Email".to_string();
        let time_zone = "Time Zone".to_string();
        let mentor_field = "How are you involved in the industry?".to_string();
        let mentee_field = "Primary Involvement: How are you involved in the industry?".to_string();
        let capacity = CAPACITY_QUESTION.to_string();

        Self {
            mentor_output: vec![
                first_name.clone(),
                middle_name.clone(),
                last_name.clone(),
                email.clone(),
                time_zone.clone(),
                mentor_field.clone(),
                capacity.clone(),
            ],
            mentee_output: vec![
                first_name.clone(),
                middle_name.clone(),
                last_name.clone(),
                email.clone(),
                time_zone.clone(),
                mentee_field.clone(),
            ],
            email,
            time_zone,
            mentor_field,
            mentee_field,
            capacity,
            first_name,
            middle_name,
            last_name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub summary_format: SummaryFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./Matches.csv"),
            summary_format: SummaryFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

fn environment() -> Environment {
    // e.g., MENTOR_MATCH__MATCHING__DEFAULT_CAPACITY -> matching.default_capacity
    Environment::with_prefix("MENTOR_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.matching
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.timezone_buffer_hours, 12);
        assert_eq!(matching.default_capacity, 1);
    }

    #[test]
    fn test_buffer_bounds() {
        let mut matching = MatchingSettings::default();
        assert!(matching.validate().is_ok());

        matching.timezone_buffer_hours = 0;
        assert!(matching.validate().is_ok());

        matching.timezone_buffer_hours = -3;
        assert!(matches!(matching.validate(), Err(MatchError::InvalidSetting(_))));

        matching.timezone_buffer_hours = 1_000_000;
        assert!(matches!(matching.validate(), Err(MatchError::InvalidSetting(_))));
    }

    #[test]
    fn test_out_of_range_buffer_rejected_on_load() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[matching]\ntimezone_buffer_hours = -1\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(settings.validated(), Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_default_output_projections_include_email() {
        let columns = ColumnSettings::default();
        assert!(columns.mentor_output.contains(&columns.email));
        assert!(columns.mentee_output.contains(&columns.email));
        assert!(columns.mentor_output.contains(&columns.capacity));
        assert!(!columns.mentee_output.contains(&columns.capacity));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[matching]\ntimezone_buffer_hours = 3\n\n[output]\nsummary_format = \"json\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.matching.timezone_buffer_hours, 3);
        assert_eq!(settings.matching.default_capacity, 1);
        assert_eq!(settings.output.summary_format, SummaryFormat::Json);
        assert_eq!(settings.columns.email, "Email");
    }
}
