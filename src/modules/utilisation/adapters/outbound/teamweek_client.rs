//! HTTP client for the Teamweek planner API.
//!
//! Every method is `GET <api base><account id>/<method>.json` with the auth
//! token appended as a query parameter.

use crate::modules::utilisation::adapters::outbound::planner_api::PlannerApi;
use crate::modules::utilisation::core::planner::{
    ProjectCatalogue, ProjectId, ProjectMetadata, Task, UserDirectory, UserId, UserSummary,
};
use crate::modules::utilisation::core::window::DisplayWindow;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamweekCredentials {
    pub api_base_url: String,
    pub account_id: String,
    pub auth_token: String,
}

#[derive(Debug, Error)]
pub enum TeamweekError {
    #[error("teamweek request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("teamweek answered {status} for {method}")]
    Status {
        method: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode teamweek {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: UserId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiProject {
    id: ProjectId,
    #[serde(flatten)]
    metadata: ProjectMetadata,
}

pub struct TeamweekClient {
    client: reqwest::Client,
    credentials: TeamweekCredentials,
}

impl TeamweekClient {
    pub fn new(credentials: TeamweekCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}{}/{}.json",
            self.credentials.api_base_url, self.credentials.account_id, method
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, TeamweekError> {
        let resp = self
            .client
            .get(self.method_url(method))
            .query(params)
            .query(&[("auth_token", self.credentials.auth_token.as_str())])
            .send()
            .await
            .map_err(TeamweekError::Request)?;

        if !resp.status().is_success() {
            return Err(TeamweekError::Status {
                method: method.to_string(),
                status: resp.status(),
            });
        }

        resp.json::<T>().await.map_err(|source| TeamweekError::Decode {
            method: method.to_string(),
            source,
        })
    }

    async fn call_or_default<T: DeserializeOwned + Default>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> T {
        match self.call(method, params).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(method, error = %e, "teamweek call failed, continuing without its data");
                T::default()
            }
        }
    }
}

#[async_trait]
impl PlannerApi for TeamweekClient {
    async fn fetch_users(&self) -> UserDirectory {
        let users: Vec<ApiUser> = self.call_or_default("users", &[]).await;
        users
            .into_iter()
            .map(|user| (user.id, UserSummary { name: user.name }))
            .collect()
    }

    async fn fetch_projects(&self) -> ProjectCatalogue {
        let projects: Vec<ApiProject> = self
            .call_or_default("projects", &[("filter", "all".to_string())])
            .await;
        projects
            .into_iter()
            .map(|project| (project.id, project.metadata))
            .collect()
    }

    async fn fetch_tasks(&self, window: &DisplayWindow) -> Vec<Task> {
        self.call_or_default(
            "tasks",
            &[
                (
                    "range_start",
                    window.starting_day().format("%Y-%m-%d").to_string(),
                ),
                ("days", window.day_count().to_string()),
            ],
        )
        .await
    }
}
