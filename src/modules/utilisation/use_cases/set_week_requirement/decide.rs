use crate::modules::utilisation::core::planner::ProjectId;
use crate::modules::utilisation::core::requirement::RequirementValue;
use crate::modules::utilisation::errors::RequirementRejection;
use crate::modules::utilisation::use_cases::set_week_requirement::command::{
    RequirementSubmission, SetWeekRequirement,
};
use crate::modules::utilisation::use_cases::set_week_requirement::decision::Decision;
use regex::Regex;
use std::sync::OnceLock;

fn project_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").expect("project id pattern"))
}

fn week_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("week pattern"))
}

fn requirement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("requirement pattern"))
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

/// Checks run in field order; the first failing field is reported.
pub fn decide_set_requirement(submission: &RequirementSubmission) -> Decision {
    let project_id = trimmed(&submission.project_id);
    let Some(project_id) = project_id_re()
        .is_match(project_id)
        .then(|| project_id.parse::<ProjectId>().ok())
        .flatten()
    else {
        return Decision::Rejected {
            reason: RequirementRejection::ProjectId,
        };
    };

    let week = trimmed(&submission.week);
    if !week_re().is_match(week) {
        return Decision::Rejected {
            reason: RequirementRejection::Week,
        };
    }

    let requirement = trimmed(&submission.requirement);
    if !requirement_re().is_match(requirement) {
        return Decision::Rejected {
            reason: RequirementRejection::Requirement,
        };
    }

    Decision::Accepted {
        command: SetWeekRequirement {
            project_id,
            week: week.to_string(),
            requirement: RequirementValue::new(requirement),
        },
    }
}
