use crate::Result;
use crate::devops::ApiVersions;
use crate::reports::{CalendarSettings, ReportZone, WeekRule};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Weekday;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::fs;
use std::io;

const LOG_TARGET: &str = "    config";

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "devops-analyzer.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `api-version` sent with every request except the team endpoints
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `api-version` sent with the team and team member endpoints
    #[serde(default = "default_team_api_version")]
    pub team_api_version: String,

    /// Seconds to wait for a single request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// The `[calendar]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default)]
    pub time_zone: ReportZone,

    #[serde(default)]
    pub week_rule: WeekRule,

    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: Weekday,
}

fn default_api_version() -> String {
    ApiVersions::default().default
}

fn default_team_api_version() -> String {
    ApiVersions::default().teams
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_first_day_of_week() -> Weekday {
    Weekday::Sun
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_zone: ReportZone::default(),
            week_rule: WeekRule::default(),
            first_day_of_week: default_first_day_of_week(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            team_api_version: default_team_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit path must exist. Without one, `devops-analyzer.toml` in `base_dir` is used when
    /// present.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No configuration file at '{path}', using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_version.trim().is_empty() {
            return Err(app_err!("api_version must not be empty"));
        }

        if self.team_api_version.trim().is_empty() {
            return Err(app_err!("team_api_version must not be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(app_err!("request_timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    #[must_use]
    pub fn api_versions(&self) -> ApiVersions {
        ApiVersions {
            default: self.api_version.clone(),
            teams: self.team_api_version.clone(),
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn calendar_settings(&self) -> CalendarSettings {
        CalendarSettings {
            zone: self.calendar.time_zone,
            week_rule: self.calendar.week_rule,
            first_day_of_week: self.calendar.first_day_of_week,
        }
    }
}
