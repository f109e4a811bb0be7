// Allocation of planner tasks onto the project week table.
//
// Pure functions only. The report handler decides where the inputs come from
// (cache or planner) and what gets cached afterwards.

use crate::modules::utilisation::core::holidays::{HolidayProjects, HolidayTally};
use crate::modules::utilisation::core::planner::{ProjectCatalogue, ProjectlessTask, Task, TaskSpan};
use crate::modules::utilisation::core::requirement::RequirementSheet;
use crate::modules::utilisation::core::table::{
    GrandTotals, ProjectRow, ProjectTable, round_to_tenth,
};
use crate::modules::utilisation::core::window::DisplayWindow;
use chrono::{Datelike, Weekday};

#[derive(Debug, Clone, Copy)]
pub struct AllocationRules<'a> {
    pub hours_per_day: f64,
    pub non_work_days: &'a [Weekday],
    pub holiday_projects: Option<&'a HolidayProjects>,
}

impl AllocationRules<'_> {
    pub fn working_days_per_week(&self) -> u32 {
        7u32.saturating_sub(self.non_work_days.len() as u32)
    }

    fn is_working_day(&self, weekday: Weekday) -> bool {
        !self.non_work_days.contains(&weekday)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskAllocation {
    pub projectless_tasks: Vec<ProjectlessTask>,
    /// `None` when holiday tracking is not configured.
    pub holidays: Option<HolidayTally>,
}

/// Zeroed rows for every known project.
pub fn seed_table(catalogue: &ProjectCatalogue, window: &DisplayWindow) -> ProjectTable {
    catalogue
        .keys()
        .map(|project_id| (*project_id, ProjectRow::empty(window)))
        .collect()
}

pub fn allocate_tasks(
    table: &mut ProjectTable,
    tasks: &[Task],
    window: &DisplayWindow,
    rules: &AllocationRules<'_>,
) -> TaskAllocation {
    let mut projectless_tasks = Vec::new();
    let mut tally = rules.holiday_projects.map(|_| HolidayTally::default());

    for task in tasks {
        if task.span() == TaskSpan::Undated {
            continue;
        }

        let Some(project) = &task.project else {
            projectless_tasks.push(task.to_projectless());
            continue;
        };

        let TaskSpan::Dated { start, end } = task.span() else {
            tracing::warn!(
                user_id = task.user_id,
                project_id = project.id,
                start_date = ?task.start_date,
                end_date = ?task.end_date,
                "skipping task with unreadable dates"
            );
            continue;
        };

        let row = table
            .entry(project.id)
            .or_insert_with(|| ProjectRow::empty(window));

        let start = start.max(window.starting_day());
        if start > end {
            continue;
        }

        let per_day = task.allocation_per_day(rules.hours_per_day);
        for day in start.iter_days().take_while(|day| *day <= end) {
            if !rules.is_working_day(day.weekday()) {
                continue;
            }
            if let Some(week) = window.week_containing(day) {
                row.weeks.entry(week).or_default().allocated += per_day;
            }
            if let (Some(holidays), Some(tally)) = (rules.holiday_projects, tally.as_mut()) {
                holidays.record(tally, &project.name);
            }
        }
    }

    TaskAllocation {
        projectless_tasks,
        holidays: tally,
    }
}

/// Overwrite `required` for cells that exist both in the sheet and the table.
///
/// Projects unknown to the catalogue and weeks outside the window are ignored.
pub fn merge_requirements(
    table: &mut ProjectTable,
    requirements: &RequirementSheet,
    catalogue: &ProjectCatalogue,
    window: &DisplayWindow,
) {
    for (project_id, weeks) in requirements {
        if !catalogue.contains_key(project_id) {
            continue;
        }
        let row = table
            .entry(*project_id)
            .or_insert_with(|| ProjectRow::empty(window));
        for (week, value) in weeks {
            let Some(cell) = row.weeks.get_mut(week) else {
                continue;
            };
            match value.days() {
                Some(days) => cell.required = days,
                None => tracing::warn!(
                    project_id,
                    week = %week,
                    value = value.as_str(),
                    "ignoring non-numeric requirement"
                ),
            }
        }
    }
}

/// Refresh every row's totals entry and return the allocated grand sum.
pub fn apply_totals(table: &mut ProjectTable) -> f64 {
    table
        .values_mut()
        .map(|row| row.recompute_totals().allocated)
        .sum()
}

pub fn grand_totals(
    total_allocated: f64,
    user_count: usize,
    window: &DisplayWindow,
    rules: &AllocationRules<'_>,
) -> GrandTotals {
    let total_available =
        (user_count as u64 * window.week_count() as u64 * rules.working_days_per_week() as u64)
            as f64;
    let total_utilisation = if total_available == 0.0 {
        0.0
    } else {
        round_to_tenth(total_allocated / total_available * 100.0)
    };
    GrandTotals {
        total_allocated,
        total_available,
        total_utilisation,
    }
}
