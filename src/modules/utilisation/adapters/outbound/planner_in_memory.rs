// In memory implementation of the PlannerApi port.
//
// Purpose
// - Drive report handler tests and local development without the remote
//   planner.
//
// Responsibilities
// - Serve fixed users, projects and tasks.
// - Count calls so tests can tell a cache hit from a fetch.
// - Simulate an unreachable planner via `toggle_offline` (empty results).

use crate::modules::utilisation::adapters::outbound::planner_api::PlannerApi;
use crate::modules::utilisation::core::planner::{
    ProjectCatalogue, ProjectId, ProjectMetadata, Task, UserDirectory, UserId, UserSummary,
};
use crate::modules::utilisation::core::window::DisplayWindow;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlannerCalls {
    pub users: usize,
    pub projects: usize,
    pub tasks: usize,
}

#[derive(Default)]
pub struct InMemoryPlanner {
    users: UserDirectory,
    projects: ProjectCatalogue,
    tasks: Vec<Task>,
    is_offline: bool,
    user_calls: AtomicUsize,
    project_calls: AtomicUsize,
    task_calls: AtomicUsize,
}

impl InMemoryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: UserId, name: impl Into<String>) -> Self {
        self.users.insert(id, UserSummary { name: name.into() });
        self
    }

    pub fn with_project(mut self, id: ProjectId, name: impl Into<String>) -> Self {
        self.projects.insert(
            id,
            ProjectMetadata {
                name: name.into(),
                color: None,
                client_id: None,
                client_name: None,
                active: true,
            },
        );
        self
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn calls(&self) -> PlannerCalls {
        PlannerCalls {
            users: self.user_calls.load(Ordering::SeqCst),
            projects: self.project_calls.load(Ordering::SeqCst),
            tasks: self.task_calls.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl PlannerApi for InMemoryPlanner {
    async fn fetch_users(&self) -> UserDirectory {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return UserDirectory::new();
        }
        self.users.clone()
    }

    async fn fetch_projects(&self) -> ProjectCatalogue {
        self.project_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return ProjectCatalogue::new();
        }
        self.projects.clone()
    }

    async fn fetch_tasks(&self, _window: &DisplayWindow) -> Vec<Task> {
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return Vec::new();
        }
        self.tasks.clone()
    }
}
