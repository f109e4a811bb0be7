use crate::modules::utilisation::adapters::outbound::planner_in_memory::InMemoryPlanner;
use crate::modules::utilisation::adapters::outbound::teamweek_client::TeamweekCredentials;
use crate::shared::core::clock::FixedClock;
use crate::shared::infrastructure::json_store::in_memory::InMemoryJsonStore;
use crate::shell::config::DashboardOptions;
use crate::shell::state::{AppState, Dependencies};
use crate::tests::fixtures::planner::date;
use axum::Router;
use chrono::Weekday;
use std::sync::Arc;

/// Application state over in-memory adapters, with the clock pinned to
/// Wednesday 2024-03-06 09:00.
pub struct TestApp {
    pub state: AppState,
    pub planner: Arc<InMemoryPlanner>,
    pub cache_store: Arc<InMemoryJsonStore>,
    pub requirement_store: Arc<InMemoryJsonStore>,
    pub clock: Arc<FixedClock>,
}

pub fn test_options() -> DashboardOptions {
    DashboardOptions {
        cache_minutes: 60,
        hours_per_day: 8.0,
        non_work_days: vec![Weekday::Sat, Weekday::Sun],
        holiday_projects: None,
        teamweek: TeamweekCredentials {
            api_base_url: "https://teamweek.com/api/v2/".into(),
            account_id: "42".into(),
            auth_token: "token".into(),
        },
        teamweek_account_base_url: "https://teamweek.com/".into(),
    }
}

impl TestApp {
    pub fn new(planner: InMemoryPlanner) -> Self {
        Self::with_stores(planner, InMemoryJsonStore::new(), InMemoryJsonStore::new())
    }

    pub fn with_stores(
        planner: InMemoryPlanner,
        cache_store: InMemoryJsonStore,
        requirement_store: InMemoryJsonStore,
    ) -> Self {
        let planner = Arc::new(planner);
        let cache_store = Arc::new(cache_store);
        let requirement_store = Arc::new(requirement_store);
        let clock = Arc::new(FixedClock::new(
            date("2024-03-06").and_hms_opt(9, 0, 0).expect("fixture time"),
        ));
        let state = AppState::new(
            Dependencies {
                planner: planner.clone(),
                cache_store: cache_store.clone(),
                requirement_store: requirement_store.clone(),
                clock: clock.clone(),
            },
            &test_options(),
        );
        Self {
            state,
            planner,
            cache_store,
            requirement_store,
            clock,
        }
    }

    pub fn router(&self) -> Router {
        crate::shell::http::router(self.state.clone())
    }
}
