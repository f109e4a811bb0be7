// Remote planner port.
//
// Every call is best effort: a transport failure or an undecodable response
// yields an empty result and a warning, never an error. The report is then
// built from whatever did arrive.

use crate::modules::utilisation::core::planner::{ProjectCatalogue, Task, UserDirectory};
use crate::modules::utilisation::core::window::DisplayWindow;
use async_trait::async_trait;

#[async_trait]
pub trait PlannerApi: Send + Sync {
    async fn fetch_users(&self) -> UserDirectory;

    /// All projects, archived ones included.
    async fn fetch_projects(&self) -> ProjectCatalogue;

    /// Tasks overlapping the window, for every user.
    async fn fetch_tasks(&self, window: &DisplayWindow) -> Vec<Task>;
}
