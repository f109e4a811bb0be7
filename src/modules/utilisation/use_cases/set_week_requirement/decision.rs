use crate::modules::utilisation::errors::RequirementRejection;
use crate::modules::utilisation::use_cases::set_week_requirement::command::SetWeekRequirement;

pub enum Decision {
    Accepted { command: SetWeekRequirement },
    Rejected { reason: RequirementRejection },
}
