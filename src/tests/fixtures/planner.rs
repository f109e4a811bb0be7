use crate::modules::utilisation::core::planner::{
    ProjectCatalogue, ProjectId, ProjectMetadata, Task, TaskProject, UserId,
};
use chrono::NaiveDate;

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date")
}

pub fn catalogue_of(projects: &[(ProjectId, &str)]) -> ProjectCatalogue {
    projects
        .iter()
        .map(|(id, name)| {
            (
                *id,
                ProjectMetadata {
                    name: name.to_string(),
                    color: None,
                    client_id: None,
                    client_name: None,
                    active: true,
                },
            )
        })
        .collect()
}

/// One day, full-day booking on a project unless told otherwise.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            task: Task {
                user_id: 1,
                project: Some(TaskProject {
                    id: project_id,
                    name: format!("Project {project_id}"),
                }),
                start_date: Some("2024-03-04".into()),
                end_date: Some("2024-03-04".into()),
                estimated_hours: None,
                comment: None,
            },
        }
    }

    pub fn projectless() -> Self {
        let mut builder = Self::new(0);
        builder.task.project = None;
        builder
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.task.user_id = user_id;
        self
    }

    pub fn dates(mut self, start: &str, end: &str) -> Self {
        self.task.start_date = Some(start.into());
        self.task.end_date = Some(end.into());
        self
    }

    pub fn undated(mut self) -> Self {
        self.task.start_date = None;
        self.task.end_date = None;
        self
    }

    pub fn estimated_hours(mut self, hours: f64) -> Self {
        self.task.estimated_hours = Some(hours);
        self
    }

    pub fn project_name(mut self, name: &str) -> Self {
        if let Some(project) = self.task.project.as_mut() {
            project.name = name.into();
        }
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.task.comment = Some(comment.into());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
