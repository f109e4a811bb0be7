use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};

use crate::modules::utilisation::core::holidays::HolidayInfo;
use crate::modules::utilisation::core::planner::{
    ProjectCatalogue, ProjectId, ProjectlessTask,
};
use crate::modules::utilisation::core::table::{ProjectRow, ProjectTable};
use crate::modules::utilisation::core::window::DisplayWindow;
use crate::modules::utilisation::use_cases::view_utilisation_report::handler::{
    ReportQuery, UtilisationReport,
};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlWeekCell {
    pub week_start: String,
    pub allocated: f64,
    pub required: f64,
}

#[derive(SimpleObject, Clone)]
pub struct GqlProjectRow {
    pub project_id: ID,
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub weeks: Vec<GqlWeekCell>,
    pub allocated: f64,
    pub required: f64,
    /// Percentage, absent when nothing is required.
    pub utilisation: Option<f64>,
}

impl GqlProjectRow {
    fn new(project_id: ProjectId, row: ProjectRow, catalogue: &ProjectCatalogue) -> Self {
        let metadata = catalogue.get(&project_id);
        let totals = row.totals;
        Self {
            project_id: ID(project_id.to_string()),
            name: metadata.map(|m| m.name.clone()),
            client_name: metadata.and_then(|m| m.client_name.clone()),
            weeks: row
                .weeks
                .into_iter()
                .map(|(week, cell)| GqlWeekCell {
                    week_start: week.format("%Y-%m-%d").to_string(),
                    allocated: cell.allocated,
                    required: cell.required,
                })
                .collect(),
            allocated: totals.map(|t| t.allocated).unwrap_or_default(),
            required: totals.map(|t| t.required).unwrap_or_default(),
            utilisation: totals.and_then(|t| t.utilisation.percent()),
        }
    }

    pub fn rows(table: ProjectTable, catalogue: &ProjectCatalogue) -> Vec<Self> {
        table
            .into_iter()
            .map(|(project_id, row)| Self::new(project_id, row, catalogue))
            .collect()
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlProjectlessTask {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub comment: Option<String>,
}

impl From<ProjectlessTask> for GqlProjectlessTask {
    fn from(t: ProjectlessTask) -> Self {
        Self {
            start_date: t.start_date,
            end_date: t.end_date,
            comment: t.comment,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlHolidayInfo {
    pub project_name: String,
    pub display_name: String,
    pub total_allocated: Option<u32>,
}

impl From<HolidayInfo> for GqlHolidayInfo {
    fn from(h: HolidayInfo) -> Self {
        Self {
            project_name: h.project_name,
            display_name: h.info_display_name,
            total_allocated: h.total_allocated,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlUtilisationReport {
    pub starting_day: String,
    pub weeks_to_show: u32,
    pub hide_fully_scheduled_projects: bool,
    pub projects: Vec<GqlProjectRow>,
    pub projectless_tasks: Vec<GqlProjectlessTask>,
    pub total_available: f64,
    pub total_allocated: f64,
    pub total_utilisation: f64,
    pub users_count: u32,
    pub bank_holiday_info: Option<GqlHolidayInfo>,
    pub holiday_info: Option<GqlHolidayInfo>,
    pub pdf_download_url: String,
}

impl From<UtilisationReport> for GqlUtilisationReport {
    fn from(r: UtilisationReport) -> Self {
        Self {
            starting_day: r.starting_day.format("%Y-%m-%d").to_string(),
            weeks_to_show: r.weeks_to_show,
            hide_fully_scheduled_projects: r.hide_fully_scheduled_projects,
            projects: GqlProjectRow::rows(r.project_table_data, &r.project_metadata),
            projectless_tasks: r.projectless_tasks.into_iter().map(Into::into).collect(),
            total_available: r.total_available,
            total_allocated: r.total_allocated,
            total_utilisation: r.total_utilisation,
            users_count: u32::try_from(r.users_count).unwrap_or(u32::MAX),
            bank_holiday_info: r.bank_holiday_info.map(Into::into),
            holiday_info: r.holiday_info.map(Into::into),
            pdf_download_url: r.links.pdf_download,
        }
    }
}

/// Window from GraphQL arguments, with the same fallbacks as the query string.
pub fn window_from_args(
    week_start: Option<&str>,
    week_count: Option<i32>,
    state: &AppState,
) -> DisplayWindow {
    let week_count = week_count.map(|count| count.to_string());
    DisplayWindow::resolve(
        week_start,
        week_count.as_deref(),
        state.report_handler.today(),
    )
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn utilisation_report(
        &self,
        context: &Context<'_>,
        week_start: Option<String>,
        week_count: Option<i32>,
        force_refresh: Option<bool>,
        hide_fully_scheduled_projects: Option<bool>,
    ) -> GqlResult<GqlUtilisationReport> {
        let state = context.data_unchecked::<AppState>();
        let query = ReportQuery {
            window: window_from_args(week_start.as_deref(), week_count, state),
            force_refresh: force_refresh.unwrap_or(false),
            hide_fully_scheduled: hide_fully_scheduled_projects.unwrap_or(false),
        };
        let report = state
            .report_handler
            .handle(&query)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(report.into())
    }
}
