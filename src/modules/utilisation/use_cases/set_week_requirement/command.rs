use crate::modules::utilisation::core::planner::ProjectId;
use crate::modules::utilisation::core::requirement::RequirementValue;
use serde::{Deserialize, Deserializer};

/// A requirement edit as it arrives from a form, a JSON body or GraphQL.
///
/// Every field is optional text so that missing and malformed values reach
/// validation instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequirementSubmission {
    #[serde(default, deserialize_with = "text_or_number")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub week: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub requirement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetWeekRequirement {
    pub project_id: ProjectId,
    pub week: String,
    pub requirement: RequirementValue,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}
