//! Startup configuration.
//!
//! Dashboard options come from a JSON file; process settings (listen
//! address, data file paths) come from the environment.

use crate::modules::utilisation::adapters::outbound::teamweek_client::TeamweekCredentials;
use crate::modules::utilisation::core::holidays::{HolidayProject, HolidayProjects};
use chrono::Weekday;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;

const KNOWN_OPTIONS: [&str; 8] = [
    "cache_minutes",
    "hours_per_day",
    "non_work_days",
    "holiday_projects",
    "teamweek_api_base_url",
    "teamweek_account_id",
    "teamweek_account_auth_token",
    "teamweek_account_base_url",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is broken: {reason}")]
    Broken { path: String, reason: String },

    #[error("unknown option `{0}` in the config file")]
    UnknownOption(String),

    #[error("teamweek_account_id and teamweek_account_auth_token must both be set")]
    MissingCredentials,

    #[error(
        "holiday_projects must be null or hold exactly two entries (bank holidays first, annual leave second)"
    )]
    MalformedHolidayProjects,

    #[error("`{0}` is not a weekday name")]
    InvalidNonWorkDay(String),

    #[error("hours_per_day must be a number greater than zero")]
    InvalidHoursPerDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub cache_minutes: u64,
    pub hours_per_day: f64,
    pub non_work_days: Vec<Weekday>,
    pub holiday_projects: Option<HolidayProjects>,
    pub teamweek: TeamweekCredentials,
    pub teamweek_account_base_url: String,
}

impl DashboardOptions {
    /// Read options from `path`. A missing file means every option takes its
    /// default, which still fails on the credentials.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown_path = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&shown_path, &raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %shown_path, "config file not found, using defaults");
                Self::from_map(&shown_path, Map::new())
            }
            Err(source) => Err(ConfigError::Io {
                path: shown_path,
                source,
            }),
        }
    }

    pub fn from_json_str(path: &str, raw: &str) -> Result<Self, ConfigError> {
        let broken = |reason: String| ConfigError::Broken {
            path: path.to_string(),
            reason,
        };
        match serde_json::from_str::<Value>(raw).map_err(|e| broken(e.to_string()))? {
            Value::Object(map) => Self::from_map(path, map),
            _ => Err(broken("expected a JSON object".into())),
        }
    }

    fn from_map(path: &str, mut overrides: Map<String, Value>) -> Result<Self, ConfigError> {
        if let Some(unknown) = overrides
            .keys()
            .find(|key| !KNOWN_OPTIONS.contains(&key.as_str()))
        {
            return Err(ConfigError::UnknownOption(unknown.clone()));
        }

        let mut take = |key: &str, default: Value| overrides.remove(key).unwrap_or(default);

        let cache_minutes = take("cache_minutes", json!(60));
        let hours_per_day = take("hours_per_day", json!(8));
        let non_work_days = take("non_work_days", json!(["Saturday", "Sunday"]));
        let holiday_projects = take(
            "holiday_projects",
            json!({ "Bank Holiday": "Bank Holiday(s)", "Holiday": "Holiday(s)" }),
        );
        let api_base_url = take("teamweek_api_base_url", json!("https://teamweek.com/api/v2/"));
        let account_id = take("teamweek_account_id", Value::Null);
        let auth_token = take("teamweek_account_auth_token", Value::Null);
        let account_base_url = take("teamweek_account_base_url", json!("https://teamweek.com/"));

        let (Some(account_id), Some(auth_token)) = (scalar_text(&account_id), scalar_text(&auth_token))
        else {
            return Err(ConfigError::MissingCredentials);
        };

        Ok(Self {
            cache_minutes: cache_minutes.as_u64().ok_or_else(|| ConfigError::Broken {
                path: path.to_string(),
                reason: "cache_minutes must be a whole number of minutes".into(),
            })?,
            hours_per_day: hours_per_day
                .as_f64()
                .filter(|hours| *hours > 0.0)
                .ok_or(ConfigError::InvalidHoursPerDay)?,
            non_work_days: parse_non_work_days(&non_work_days)?,
            holiday_projects: parse_holiday_projects(&holiday_projects)?,
            teamweek: TeamweekCredentials {
                api_base_url: scalar_text(&api_base_url).unwrap_or_default(),
                account_id,
                auth_token,
            },
            teamweek_account_base_url: scalar_text(&account_base_url).unwrap_or_default(),
        })
    }
}

/// Non-empty text, accepting numbers for ids written without quotes.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_non_work_days(value: &Value) -> Result<Vec<Weekday>, ConfigError> {
    let Value::Array(names) = value else {
        return Err(ConfigError::InvalidNonWorkDay(value.to_string()));
    };
    let mut days = Vec::new();
    for name in names {
        let day = name
            .as_str()
            .and_then(|s| s.trim().parse::<Weekday>().ok())
            .ok_or_else(|| ConfigError::InvalidNonWorkDay(name.to_string()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

fn parse_holiday_projects(value: &Value) -> Result<Option<HolidayProjects>, ConfigError> {
    let pairs: Vec<(String, String)> = match value {
        Value::Null => return Ok(None),
        Value::Object(map) => map
            .iter()
            .map(|(name, display)| {
                display
                    .as_str()
                    .map(|display| (name.clone(), display.to_string()))
            })
            .collect::<Option<_>>()
            .ok_or(ConfigError::MalformedHolidayProjects)?,
        Value::Array(names) => names
            .iter()
            .map(|name| name.as_str().map(|name| (name.to_string(), name.to_string())))
            .collect::<Option<_>>()
            .ok_or(ConfigError::MalformedHolidayProjects)?,
        _ => return Err(ConfigError::MalformedHolidayProjects),
    };

    let [bank, regular]: [(String, String); 2] = pairs
        .try_into()
        .map_err(|_| ConfigError::MalformedHolidayProjects)?;
    let project = |(project_name, display_name): (String, String)| HolidayProject {
        project_name,
        display_name,
    };
    Ok(Some(HolidayProjects {
        bank: project(bank),
        regular: project(regular),
    }))
}

/// Process level settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub addr: String,
    pub config_file: PathBuf,
    pub cache_file: PathBuf,
    pub requirements_file: PathBuf,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            addr: var("DASHBOARD_ADDR", "0.0.0.0:8080"),
            config_file: var("DASHBOARD_CONFIG", "config.json").into(),
            cache_file: var("DASHBOARD_CACHE_FILE", "projects_tasks_cache.json").into(),
            requirements_file: var("DASHBOARD_REQUIREMENTS_FILE", "project_requirements.json")
                .into(),
        }
    }
}
