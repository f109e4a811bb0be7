use crate::modules::utilisation::adapters::outbound::planner_api::PlannerApi;
use crate::modules::utilisation::adapters::outbound::requirement_store::RequirementStore;
use crate::modules::utilisation::adapters::outbound::schedule_cache::ScheduleCache;
use crate::modules::utilisation::use_cases::set_week_requirement::handler::SetWeekRequirementHandler;
use crate::modules::utilisation::use_cases::view_utilisation_report::handler::{
    ReportSettings, UtilisationReportHandler,
};
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::json_store::JsonStore;
use crate::shell::config::DashboardOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub report_handler: Arc<UtilisationReportHandler>,
    pub set_requirement_handler: Arc<SetWeekRequirementHandler>,
}

/// Concrete collaborators the handlers are wired from.
pub struct Dependencies {
    pub planner: Arc<dyn PlannerApi>,
    pub cache_store: Arc<dyn JsonStore>,
    pub requirement_store: Arc<dyn JsonStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(deps: Dependencies, options: &DashboardOptions) -> Self {
        let cache = Arc::new(ScheduleCache::with_ttl_minutes(
            deps.cache_store,
            deps.clock.clone(),
            options.cache_minutes,
        ));
        let requirements = Arc::new(RequirementStore::new(deps.requirement_store));
        let report_handler = Arc::new(UtilisationReportHandler::new(
            deps.planner,
            cache,
            requirements.clone(),
            deps.clock,
            ReportSettings {
                hours_per_day: options.hours_per_day,
                non_work_days: options.non_work_days.clone(),
                holiday_projects: options.holiday_projects.clone(),
                account_base_url: options.teamweek_account_base_url.clone(),
            },
        ));
        let set_requirement_handler = Arc::new(SetWeekRequirementHandler::new(
            requirements,
            report_handler.clone(),
        ));
        Self {
            report_handler,
            set_requirement_handler,
        }
    }
}
