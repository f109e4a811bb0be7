use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::modules::utilisation::use_cases::set_week_requirement::inbound::http as requirement_http;
use crate::modules::utilisation::use_cases::view_utilisation_report::inbound::http as report_http;
use crate::shell::graphql::{graphiql, graphql, schema};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report_http::handle))
        .route("/requirements", post(requirement_http::handle))
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state.clone())))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
