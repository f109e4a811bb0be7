use crate::modules::utilisation::adapters::outbound::requirement_store::RequirementStore;
use crate::modules::utilisation::core::window::DisplayWindow;
use crate::modules::utilisation::errors::ApplicationError;
use crate::modules::utilisation::use_cases::set_week_requirement::command::RequirementSubmission;
use crate::modules::utilisation::use_cases::set_week_requirement::decide::decide_set_requirement;
use crate::modules::utilisation::use_cases::set_week_requirement::decision::Decision;
use crate::modules::utilisation::use_cases::view_utilisation_report::handler::{
    ReportQuery, UtilisationReport, UtilisationReportHandler,
};
use std::sync::Arc;

pub struct SetWeekRequirementHandler {
    requirements: Arc<RequirementStore>,
    reports: Arc<UtilisationReportHandler>,
}

impl SetWeekRequirementHandler {
    pub fn new(requirements: Arc<RequirementStore>, reports: Arc<UtilisationReportHandler>) -> Self {
        Self {
            requirements,
            reports,
        }
    }

    /// Store the requirement, then rebuild the report for `window` without
    /// reading cached data so the new value shows up immediately.
    pub async fn handle(
        &self,
        submission: &RequirementSubmission,
        window: DisplayWindow,
    ) -> Result<UtilisationReport, ApplicationError> {
        let command = match decide_set_requirement(submission) {
            Decision::Accepted { command } => command,
            Decision::Rejected { reason } => {
                tracing::debug!(%reason, "requirement submission rejected");
                return Err(ApplicationError::Rejected(reason));
            }
        };

        self.requirements
            .set(command.project_id, &command.week, &command.requirement)
            .await?;

        self.reports
            .handle(&ReportQuery {
                window,
                force_refresh: true,
                hide_fully_scheduled: false,
            })
            .await
    }
}
