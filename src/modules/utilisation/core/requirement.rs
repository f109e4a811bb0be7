use crate::modules::utilisation::core::planner::ProjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A weekly requirement as the user submitted it, trimmed but not coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequirementValue(String);

impl RequirementValue {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric reading of the value, in days.
    pub fn days(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|d| d.is_finite())
    }
}

impl<'de> Deserialize<'de> for RequirementValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RequirementValue::new(s),
            Raw::Number(n) => RequirementValue(n.to_string()),
        })
    }
}

/// Stored requirements, `project id -> week start -> value`.
pub type RequirementSheet = BTreeMap<ProjectId, BTreeMap<NaiveDate, RequirementValue>>;
