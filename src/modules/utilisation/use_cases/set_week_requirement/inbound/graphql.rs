use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::utilisation::use_cases::set_week_requirement::command::RequirementSubmission;
use crate::modules::utilisation::use_cases::view_utilisation_report::inbound::graphql::{
    GqlProjectRow, window_from_args,
};
use crate::shell::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Returns the recomputed project rows for the given window.
    async fn set_week_requirement(
        &self,
        context: &Context<'_>,
        project_id: String,
        week: String,
        requirement: String,
        week_start: Option<String>,
        week_count: Option<i32>,
    ) -> GqlResult<Vec<GqlProjectRow>> {
        let state = context.data_unchecked::<AppState>();
        let submission = RequirementSubmission {
            project_id: Some(project_id),
            week: Some(week),
            requirement: Some(requirement),
        };
        let window = window_from_args(week_start.as_deref(), week_count, state);

        let report = state
            .set_requirement_handler
            .handle(&submission, window)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        Ok(GqlProjectRow::rows(
            report.project_table_data,
            &report.project_metadata,
        ))
    }
}
