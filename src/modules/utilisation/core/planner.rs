// Planner domain types.
//
// These mirror what the remote planner hands out, reduced to the fields the
// report needs. They are read-only for the duration of a request.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type UserId = u64;
pub type ProjectId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
}

/// Active users keyed by id.
pub type UserDirectory = BTreeMap<UserId, UserSummary>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Every project the planner knows about, archived ones included.
pub type ProjectCatalogue = BTreeMap<ProjectId, ProjectMetadata>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProject {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub user_id: UserId,
    #[serde(default)]
    pub project: Option<TaskProject>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSpan {
    /// Neither date present; the task is ignored.
    Undated,
    Dated { start: NaiveDate, end: NaiveDate },
    Unreadable,
}

impl Task {
    pub fn span(&self) -> TaskSpan {
        let start = non_empty(self.start_date.as_deref());
        let end = non_empty(self.end_date.as_deref());
        let (start, end) = match (start, end) {
            (None, None) => return TaskSpan::Undated,
            (Some(start), None) => (start, start),
            (None, Some(end)) => (end, end),
            (Some(start), Some(end)) => (start, end),
        };
        match (parse_day(start), parse_day(end)) {
            (Some(start), Some(end)) => TaskSpan::Dated { start, end },
            _ => TaskSpan::Unreadable,
        }
    }

    /// Share of a working day booked for each day the task covers.
    pub fn allocation_per_day(&self, hours_per_day: f64) -> f64 {
        match self.estimated_hours {
            Some(hours) if hours != 0.0 => hours / hours_per_day,
            _ => 1.0,
        }
    }

    pub fn to_projectless(&self) -> ProjectlessTask {
        ProjectlessTask {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            comment: self.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectlessTask {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub comment: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// Dates may come with a time suffix; only the calendar day matters.
fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hours {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Hours>::deserialize(deserializer)? {
        Some(Hours::Number(n)) => Some(n),
        Some(Hours::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}
