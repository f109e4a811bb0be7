// In memory implementation of the JsonStore port.
//
// Purpose
// - Support handler tests and local development without touching disk.
//
// Responsibilities
// - Hold one document and count how often it was written.
// - Simulate an unavailable backend via `toggle_offline`.

use crate::shared::infrastructure::json_store::{JsonDocument, JsonStore, JsonStoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryJsonStore {
    document: RwLock<JsonDocument>,
    writes: AtomicUsize,
    is_offline: bool,
}

impl InMemoryJsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: JsonDocument) -> Self {
        Self {
            document: RwLock::new(document),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> JsonDocument {
        self.document.read().await.clone()
    }

    fn ensure_online(&self) -> Result<(), JsonStoreError> {
        if self.is_offline {
            return Err(JsonStoreError::Backend("Json store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl JsonStore for InMemoryJsonStore {
    async fn load(&self) -> Result<JsonDocument, JsonStoreError> {
        self.ensure_online()?;
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &JsonDocument) -> Result<(), JsonStoreError> {
        self.ensure_online()?;
        *self.document.write().await = document.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_json_store_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn it_should_save_and_load_a_document() {
        let store = InMemoryJsonStore::new();
        let mut document = JsonDocument::new();
        document.insert("key".into(), json!({ "nested": true }));

        store.save(&document).await.expect("save failed");

        assert_eq!(store.load().await.unwrap(), document);
        assert_eq!(store.writes(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_offline() {
        let mut store = InMemoryJsonStore::new();
        store.toggle_offline();

        assert!(matches!(
            store.load().await,
            Err(JsonStoreError::Backend(_))
        ));
        assert!(store.save(&JsonDocument::new()).await.is_err());
        assert_eq!(store.writes(), 0);
    }
}
