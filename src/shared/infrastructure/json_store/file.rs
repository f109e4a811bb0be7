use crate::shared::infrastructure::json_store::{
    JsonDocument, JsonStore, JsonStoreError, parse_document,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A JSON document kept in a single file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl JsonStore for JsonFileStore {
    async fn load(&self) -> Result<JsonDocument, JsonStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => parse_document(&self.display(), &raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(JsonDocument::new()),
            Err(source) => Err(JsonStoreError::Io {
                path: self.display(),
                source,
            }),
        }
    }

    async fn save(&self, document: &JsonDocument) -> Result<(), JsonStoreError> {
        let encoded = serde_json::to_string(document).map_err(|e| JsonStoreError::Malformed {
            path: self.display(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(&self.path, encoded)
            .await
            .map_err(|source| JsonStoreError::Io {
                path: self.display(),
                source,
            })
    }
}

#[cfg(test)]
mod json_file_store_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_load_an_empty_document_when_the_file_is_missing(dir: TempDir) {
        let store = JsonFileStore::new(dir.path().join("missing.json"));
        let document = store.load().await.expect("load failed");
        assert!(document.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_save_and_load_the_whole_document(dir: TempDir) {
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let mut document = JsonDocument::new();
        document.insert("12".into(), json!({ "2024-03-04": "5.5" }));
        document.insert("3".into(), json!({ "2024-03-11": "1" }));

        store.save(&document).await.expect("save failed");
        let loaded = store.load().await.expect("load failed");

        assert_eq!(loaded, document);
        let keys: Vec<_> = loaded.keys().cloned().collect();
        assert_eq!(keys, vec!["12", "3"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_replace_the_previous_content_on_save(dir: TempDir) {
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let mut first = JsonDocument::new();
        first.insert("a".into(), json!(1));
        store.save(&first).await.unwrap();

        let mut second = JsonDocument::new();
        second.insert("b".into(), json!(2));
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.get("a"), None);
        assert_eq!(loaded.get("b"), Some(&json!(2)));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_broken_file_as_malformed(dir: TempDir) {
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"oops\":").unwrap();
        let store = JsonFileStore::new(&path);

        let result = store.load().await;
        assert!(matches!(result, Err(JsonStoreError::Malformed { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_save_into_a_missing_directory(dir: TempDir) {
        let store = JsonFileStore::new(dir.path().join("nope").join("store.json"));
        let result = store.save(&JsonDocument::new()).await;
        assert!(matches!(result, Err(JsonStoreError::Io { .. })));
    }
}
