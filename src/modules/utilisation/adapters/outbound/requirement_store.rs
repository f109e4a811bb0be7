// Per-project weekly requirements, persisted as
// `{ "<project id>": { "<week start>": "<value>" } }`.
//
// Values are stored exactly as submitted (trimmed). Entries whose keys do not
// parse are kept on disk but skipped when reading.

use crate::modules::utilisation::core::planner::ProjectId;
use crate::modules::utilisation::core::requirement::{RequirementSheet, RequirementValue};
use crate::shared::infrastructure::json_store::{JsonStore, JsonStoreError};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct RequirementStore {
    store: Arc<dyn JsonStore>,
}

impl RequirementStore {
    pub fn new(store: Arc<dyn JsonStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<RequirementSheet, JsonStoreError> {
        let document = self.store.load().await?;
        let mut sheet = RequirementSheet::new();

        for (project_key, weeks) in &document {
            let Ok(project_id) = project_key.parse::<ProjectId>() else {
                tracing::warn!(%project_key, "skipping requirement entry with a non-numeric project id");
                continue;
            };
            let Value::Object(weeks) = weeks else {
                continue;
            };
            let row = sheet.entry(project_id).or_default();
            for (week_key, value) in weeks {
                let Ok(week) = NaiveDate::parse_from_str(week_key, "%Y-%m-%d") else {
                    tracing::warn!(project_id, %week_key, "skipping requirement entry with an unreadable week");
                    continue;
                };
                match serde_json::from_value::<RequirementValue>(value.clone()) {
                    Ok(value) => {
                        row.insert(week, value);
                    }
                    Err(_) => {
                        tracing::warn!(project_id, %week_key, "skipping requirement entry with an unreadable value");
                    }
                }
            }
        }

        Ok(sheet)
    }

    /// Store one cell, leaving every other cell untouched.
    pub async fn set(
        &self,
        project_id: ProjectId,
        week: &str,
        requirement: &RequirementValue,
    ) -> Result<(), JsonStoreError> {
        let mut document = self.store.load().await?;
        let row = document
            .entry(project_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !row.is_object() {
            *row = Value::Object(Map::new());
        }
        if let Value::Object(weeks) = row {
            weeks.insert(
                week.to_string(),
                Value::String(requirement.as_str().to_string()),
            );
        }
        self.store.save(&document).await?;
        tracing::info!(project_id, week, requirement = requirement.as_str(), "requirement stored");
        Ok(())
    }
}

#[cfg(test)]
mod requirement_store_tests {
    use super::*;
    use crate::shared::infrastructure::json_store::in_memory::InMemoryJsonStore;
    use crate::tests::fixtures::planner::date;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn backend() -> Arc<InMemoryJsonStore> {
        Arc::new(InMemoryJsonStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_persist_the_submitted_text(backend: Arc<InMemoryJsonStore>) {
        let store = RequirementStore::new(backend.clone());

        store
            .set(12, "2024-03-04", &RequirementValue::new("5.5"))
            .await
            .unwrap();

        assert_eq!(
            Value::Object(backend.snapshot().await),
            json!({ "12": { "2024-03-04": "5.5" } })
        );
        let sheet = store.get_all().await.unwrap();
        assert_eq!(sheet[&12][&date("2024-03-04")], RequirementValue::new("5.5"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_only_touch_the_submitted_cell() {
        let backend = Arc::new(InMemoryJsonStore::with_document(
            json!({ "12": { "2024-03-04": "1", "2024-03-11": "2" }, "13": { "2024-03-04": "4" } })
                .as_object()
                .cloned()
                .unwrap(),
        ));
        let store = RequirementStore::new(backend.clone());

        store
            .set(12, "2024-03-11", &RequirementValue::new(" 3 "))
            .await
            .unwrap();

        assert_eq!(
            Value::Object(backend.snapshot().await),
            json!({ "12": { "2024-03-04": "1", "2024-03-11": "3" }, "13": { "2024-03-04": "4" } })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_skip_unreadable_keys_when_reading() {
        let backend = Arc::new(InMemoryJsonStore::with_document(
            json!({
                "abc": { "2024-03-04": "1" },
                "12": { "someday": "2", "2024-03-04": 2.5 },
                "13": "not an object"
            })
            .as_object()
            .cloned()
            .unwrap(),
        ));

        let sheet = RequirementStore::new(backend).get_all().await.unwrap();

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[&12].len(), 1);
        assert_eq!(sheet[&12][&date("2024-03-04")].days(), Some(2.5));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_backend_failures() {
        let mut backend = InMemoryJsonStore::new();
        backend.toggle_offline();
        let store = RequirementStore::new(Arc::new(backend));

        assert!(store.get_all().await.is_err());
        assert!(
            store
                .set(1, "2024-03-04", &RequirementValue::new("1"))
                .await
                .is_err()
        );
    }
}
