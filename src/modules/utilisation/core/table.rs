// Project week table.
//
// One row per project, one cell per window week plus a synthesised totals
// entry. The serialised shape is the flat object the dashboard has always
// stored in its cache file:
//
//   { "<project id>": { "<week start>": {"allocated", "required"}, ...,
//                       "totals": {"allocated", "required", "utilisation"} } }

use crate::modules::utilisation::core::planner::ProjectId;
use crate::modules::utilisation::core::window::DisplayWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekCell {
    #[serde(default, deserialize_with = "lenient_number")]
    pub allocated: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub required: f64,
}

/// Allocated over required as a percentage, or "N/A" when nothing is required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Utilisation {
    NotApplicable,
    Percent(f64),
}

impl Utilisation {
    pub fn of(allocated: f64, required: f64) -> Self {
        if required == 0.0 {
            Utilisation::NotApplicable
        } else {
            Utilisation::Percent(round_to_tenth(allocated / required * 100.0))
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            Utilisation::NotApplicable => None,
            Utilisation::Percent(p) => Some(*p),
        }
    }

    pub fn is_fully_scheduled(&self) -> bool {
        self.percent() == Some(100.0)
    }
}

impl Serialize for Utilisation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Utilisation::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
            Utilisation::Percent(p) => serializer.serialize_f64(*p),
        }
    }
}

impl<'de> Deserialize<'de> for Utilisation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(p) => Utilisation::Percent(p),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Utilisation::Percent)
                .unwrap_or(Utilisation::NotApplicable),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectTotals {
    #[serde(deserialize_with = "lenient_number")]
    pub allocated: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub required: f64,
    pub utilisation: Utilisation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    #[serde(flatten)]
    pub weeks: BTreeMap<NaiveDate, WeekCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<ProjectTotals>,
}

impl ProjectRow {
    /// A row with a zeroed cell for every week of the window.
    pub fn empty(window: &DisplayWindow) -> Self {
        Self {
            weeks: window
                .weeks()
                .into_iter()
                .map(|week| (week.start, WeekCell::default()))
                .collect(),
            totals: None,
        }
    }

    /// Sum the week cells and replace the totals entry.
    pub fn recompute_totals(&mut self) -> ProjectTotals {
        let (allocated, required) = self
            .weeks
            .values()
            .fold((0.0, 0.0), |(a, r), cell| (a + cell.allocated, r + cell.required));
        let totals = ProjectTotals {
            allocated,
            required,
            utilisation: Utilisation::of(allocated, required),
        };
        self.totals = Some(totals);
        totals
    }
}

pub type ProjectTable = BTreeMap<ProjectId, ProjectRow>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrandTotals {
    pub total_allocated: f64,
    pub total_available: f64,
    pub total_utilisation: f64,
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Nothing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Raw::Nothing(()) => 0.0,
    })
}
