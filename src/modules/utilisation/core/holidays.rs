use serde::{Deserialize, Serialize};

/// A planner project whose bookings count as time off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayProject {
    pub project_name: String,
    pub display_name: String,
}

/// Bank/public holidays first, regular leave second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayProjects {
    pub bank: HolidayProject,
    pub regular: HolidayProject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HolidayTally {
    pub bank_holidays: u32,
    pub holidays: u32,
}

impl HolidayProjects {
    /// Count one working day of a task booked against `project_name`.
    pub fn record(&self, tally: &mut HolidayTally, project_name: &str) {
        if project_name == self.bank.project_name {
            tally.bank_holidays += 1;
        } else if project_name == self.regular.project_name {
            tally.holidays += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayInfo {
    pub project_name: String,
    pub info_display_name: String,
    pub total_allocated: Option<u32>,
}

impl HolidayInfo {
    pub fn new(project: &HolidayProject, total_allocated: Option<u32>) -> Self {
        Self {
            project_name: project.project_name.clone(),
            info_display_name: project.display_name.clone(),
            total_allocated,
        }
    }
}
