use crate::modules::utilisation::adapters::outbound::planner_api::PlannerApi;
use crate::modules::utilisation::adapters::outbound::requirement_store::RequirementStore;
use crate::modules::utilisation::adapters::outbound::schedule_cache::{
    CacheKey, CacheScope, ScheduleCache,
};
use crate::modules::utilisation::core::allocation::{
    AllocationRules, allocate_tasks, apply_totals, grand_totals, merge_requirements, seed_table,
};
use crate::modules::utilisation::core::holidays::{HolidayInfo, HolidayProjects};
use crate::modules::utilisation::core::navigation::NavigationLinks;
use crate::modules::utilisation::core::planner::{
    ProjectCatalogue, ProjectlessTask, Task, UserDirectory,
};
use crate::modules::utilisation::core::table::ProjectTable;
use crate::modules::utilisation::core::window::{DisplayWindow, Week};
use crate::modules::utilisation::errors::ApplicationError;
use crate::shared::core::clock::Clock;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::sync::Arc;

/// Dashboard options the report depends on.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub hours_per_day: f64,
    pub non_work_days: Vec<Weekday>,
    pub holiday_projects: Option<HolidayProjects>,
    pub account_base_url: String,
}

impl ReportSettings {
    fn rules(&self) -> AllocationRules<'_> {
        AllocationRules {
            hours_per_day: self.hours_per_day,
            non_work_days: &self.non_work_days,
            holiday_projects: self.holiday_projects.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub window: DisplayWindow,
    pub force_refresh: bool,
    pub hide_fully_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilisationReport {
    pub starting_day: NaiveDate,
    pub weeks_to_show: u32,
    pub weeks: Vec<Week>,
    pub hide_fully_scheduled_projects: bool,
    pub project_table_data: ProjectTable,
    pub project_metadata: ProjectCatalogue,
    pub projectless_tasks: Vec<ProjectlessTask>,
    pub total_available: f64,
    pub total_allocated: f64,
    pub total_utilisation: f64,
    pub users_count: usize,
    pub bank_holiday_info: Option<HolidayInfo>,
    pub holiday_info: Option<HolidayInfo>,
    pub links: NavigationLinks,
}

struct TableBuild {
    table: ProjectTable,
    projectless_tasks: Vec<ProjectlessTask>,
    bank_holidays: Option<u32>,
    holidays: Option<u32>,
}

pub struct UtilisationReportHandler {
    planner: Arc<dyn PlannerApi>,
    cache: Arc<ScheduleCache>,
    requirements: Arc<RequirementStore>,
    clock: Arc<dyn Clock>,
    settings: ReportSettings,
}

impl UtilisationReportHandler {
    pub fn new(
        planner: Arc<dyn PlannerApi>,
        cache: Arc<ScheduleCache>,
        requirements: Arc<RequirementStore>,
        clock: Arc<dyn Clock>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            planner,
            cache,
            requirements,
            clock,
            settings,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn handle(&self, query: &ReportQuery) -> Result<UtilisationReport, ApplicationError> {
        let window = &query.window;
        let scope = self.cache.scope(window, query.force_refresh);

        let users = self.users(&scope).await?;
        let catalogue = self.project_metadata(&scope).await?;
        let mut build = self.project_table(&scope, window, &users, &catalogue).await?;

        let total_allocated = apply_totals(&mut build.table);
        let totals = grand_totals(total_allocated, users.len(), window, &self.settings.rules());

        if query.hide_fully_scheduled {
            build.table.retain(|_, row| {
                !row.totals
                    .is_some_and(|totals| totals.utilisation.is_fully_scheduled())
            });
        }

        let (bank_holiday_info, holiday_info) = match &self.settings.holiday_projects {
            Some(projects) => (
                Some(HolidayInfo::new(&projects.bank, build.bank_holidays)),
                Some(HolidayInfo::new(&projects.regular, build.holidays)),
            ),
            None => (None, None),
        };

        tracing::info!(
            fingerprint = %scope.fingerprint(),
            projects = build.table.len(),
            users = users.len(),
            "utilisation report built"
        );

        Ok(UtilisationReport {
            starting_day: window.starting_day(),
            weeks_to_show: window.week_count(),
            weeks: window.weeks(),
            hide_fully_scheduled_projects: query.hide_fully_scheduled,
            project_table_data: build.table,
            project_metadata: catalogue,
            projectless_tasks: build.projectless_tasks,
            total_available: totals.total_available,
            total_allocated: totals.total_allocated,
            total_utilisation: totals.total_utilisation,
            users_count: users.len(),
            bank_holiday_info,
            holiday_info,
            links: NavigationLinks::build(
                window,
                self.clock.today(),
                query.hide_fully_scheduled,
                &self.settings.account_base_url,
            ),
        })
    }

    async fn users(&self, scope: &CacheScope<'_>) -> Result<UserDirectory, ApplicationError> {
        if let Some(users) = scope.get_users::<UserDirectory>().await? {
            return Ok(users);
        }
        let users = self.planner.fetch_users().await;
        scope.put_users(&users).await?;
        Ok(users)
    }

    async fn project_metadata(
        &self,
        scope: &CacheScope<'_>,
    ) -> Result<ProjectCatalogue, ApplicationError> {
        if let Some(catalogue) = scope.get(CacheKey::ProjectMetadata).await? {
            return Ok(catalogue);
        }
        let catalogue = self.planner.fetch_projects().await;
        scope.put(CacheKey::ProjectMetadata, &catalogue).await?;
        Ok(catalogue)
    }

    async fn project_table(
        &self,
        scope: &CacheScope<'_>,
        window: &DisplayWindow,
        users: &UserDirectory,
        catalogue: &ProjectCatalogue,
    ) -> Result<TableBuild, ApplicationError> {
        if let Some(table) = scope.get::<ProjectTable>(CacheKey::ProjectTableData).await? {
            let projectless_tasks = scope
                .get(CacheKey::ProjectlessTasks)
                .await?
                .unwrap_or_default();
            let bank_holidays = scope
                .get::<Option<u32>>(CacheKey::BankHolidaysAllocated)
                .await?
                .flatten();
            let holidays = scope
                .get::<Option<u32>>(CacheKey::HolidaysAllocated)
                .await?
                .flatten();
            return Ok(TableBuild {
                table,
                projectless_tasks,
                bank_holidays,
                holidays,
            });
        }

        let rules = self.settings.rules();
        let mut table = seed_table(catalogue, window);
        let tasks = self.tasks(window, users).await;
        let allocation = allocate_tasks(&mut table, &tasks, window, &rules);
        let requirements = self.requirements.get_all().await?;
        merge_requirements(&mut table, &requirements, catalogue, window);
        apply_totals(&mut table);

        let bank_holidays = allocation.holidays.map(|tally| tally.bank_holidays);
        let holidays = allocation.holidays.map(|tally| tally.holidays);

        scope.put(CacheKey::ProjectTableData, &table).await?;
        scope
            .put(CacheKey::ProjectlessTasks, &allocation.projectless_tasks)
            .await?;
        scope
            .put(CacheKey::BankHolidaysAllocated, &bank_holidays)
            .await?;
        scope.put(CacheKey::HolidaysAllocated, &holidays).await?;

        Ok(TableBuild {
            table,
            projectless_tasks: allocation.projectless_tasks,
            bank_holidays,
            holidays,
        })
    }

    /// Tasks in the window that belong to known users.
    async fn tasks(&self, window: &DisplayWindow, users: &UserDirectory) -> Vec<Task> {
        let mut tasks = self.planner.fetch_tasks(window).await;
        tasks.retain(|task| users.contains_key(&task.user_id));
        tasks
    }
}
