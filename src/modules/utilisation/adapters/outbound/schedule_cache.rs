// Response cache over a JsonStore.
//
// Layout of the document:
//
//   {
//     "users": { "<created>": <users> , ... },
//     "<key>": { "<start>__<count>": { "created": "<created>", "content": <value> } }
//   }
//
// `created` is "YYYY-MM-DD HH:MM:SS" in the clock's time. An entry is valid
// while now - created < ttl. Reading an expired entry removes it and rewrites
// the document. User snapshots are keyed by their creation time; the first
// valid one wins and expired ones seen before it are dropped.

use crate::modules::utilisation::core::window::DisplayWindow;
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::json_store::{JsonDocument, JsonStore, JsonStoreError};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const USERS_KEY: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    ProjectMetadata,
    ProjectTableData,
    ProjectlessTasks,
    BankHolidaysAllocated,
    HolidaysAllocated,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::ProjectMetadata => "project_metadata",
            CacheKey::ProjectTableData => "project_table_data",
            CacheKey::ProjectlessTasks => "projectless_tasks",
            CacheKey::BankHolidaysAllocated => "bank_holidays_allocated",
            CacheKey::HolidaysAllocated => "holidays_allocated",
        }
    }
}

pub struct ScheduleCache {
    store: Arc<dyn JsonStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl ScheduleCache {
    pub fn new(store: Arc<dyn JsonStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn with_ttl_minutes(store: Arc<dyn JsonStore>, clock: Arc<dyn Clock>, minutes: u64) -> Self {
        let ttl = i64::try_from(minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        Self::new(store, clock, ttl)
    }

    /// Bind the cache to one request.
    pub fn scope(&self, window: &DisplayWindow, bypass: bool) -> CacheScope<'_> {
        CacheScope {
            cache: self,
            fingerprint: window.fingerprint(),
            bypass,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        fingerprint: &str,
    ) -> Result<Option<T>, JsonStoreError> {
        let mut document = self.load().await?;
        let Some(Value::Object(entries)) = document.get_mut(key.as_str()) else {
            tracing::debug!(key = key.as_str(), fingerprint, "cache miss");
            return Ok(None);
        };
        let Some(entry) = entries.get(fingerprint) else {
            tracing::debug!(key = key.as_str(), fingerprint, "cache miss");
            return Ok(None);
        };

        let created = entry.get("created").and_then(Value::as_str);
        if !self.is_fresh(created) {
            tracing::debug!(key = key.as_str(), fingerprint, "cache entry expired");
            entries.retain(|candidate, _| candidate != fingerprint);
            self.store.save(&document).await?;
            return Ok(None);
        }

        let content = entry.get("content").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<T>(content) {
            Ok(value) => {
                tracing::debug!(key = key.as_str(), fingerprint, "cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(key = key.as_str(), fingerprint, error = %e, "ignoring undecodable cache entry");
                Ok(None)
            }
        }
    }

    pub async fn put<T: Serialize>(
        &self,
        key: CacheKey,
        fingerprint: &str,
        value: &T,
    ) -> Result<(), JsonStoreError> {
        let content = encode(key.as_str(), value)?;
        let mut document = self.load().await?;
        let slot = document
            .entry(key.as_str())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(entries) = slot {
            entries.insert(
                fingerprint.to_string(),
                json!({ "created": self.created_now(), "content": content }),
            );
        }
        self.store.save(&document).await
    }

    pub async fn get_users<T: DeserializeOwned>(&self) -> Result<Option<T>, JsonStoreError> {
        let mut document = self.load().await?;
        let Some(Value::Object(snapshots)) = document.get_mut(USERS_KEY) else {
            return Ok(None);
        };

        let mut expired = Vec::new();
        let mut found = None;
        for (created, content) in snapshots.iter() {
            if self.is_fresh(Some(created)) {
                found = Some(content.clone());
                break;
            }
            expired.push(created.clone());
        }

        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "dropping expired user snapshots");
            snapshots.retain(|created, _| !expired.contains(created));
            self.store.save(&document).await?;
        }

        let Some(content) = found else {
            tracing::debug!("users cache miss");
            return Ok(None);
        };
        match serde_json::from_value::<T>(content) {
            Ok(users) => Ok(Some(users)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring undecodable user snapshot");
                Ok(None)
            }
        }
    }

    pub async fn put_users<T: Serialize>(&self, users: &T) -> Result<(), JsonStoreError> {
        let content = encode(USERS_KEY, users)?;
        let mut document = self.load().await?;
        let slot = document
            .entry(USERS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(snapshots) = slot {
            snapshots.insert(self.created_now(), content);
        }
        self.store.save(&document).await
    }

    async fn load(&self) -> Result<JsonDocument, JsonStoreError> {
        match self.store.load().await {
            Err(JsonStoreError::Malformed { path, reason }) => {
                tracing::warn!(%path, %reason, "cache document is malformed, starting from empty");
                Ok(JsonDocument::new())
            }
            other => other,
        }
    }

    fn created_now(&self) -> String {
        self.clock.now().format(CREATED_FORMAT).to_string()
    }

    fn is_fresh(&self, created: Option<&str>) -> bool {
        created
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, CREATED_FORMAT).ok())
            .is_some_and(|created| self.clock.now() - created < self.ttl)
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<Value, JsonStoreError> {
    serde_json::to_value(value)
        .map_err(|e| JsonStoreError::Backend(format!("cannot encode {key} for the cache: {e}")))
}

/// Cache access for one request: one window, one force-refresh decision.
///
/// Under bypass every read is a miss without touching the document, while
/// writes still go through so the next regular request sees fresh data.
pub struct CacheScope<'a> {
    cache: &'a ScheduleCache,
    fingerprint: String,
    bypass: bool,
}

impl CacheScope<'_> {
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub async fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Result<Option<T>, JsonStoreError> {
        if self.bypass {
            return Ok(None);
        }
        self.cache.get(key, &self.fingerprint).await
    }

    pub async fn put<T: Serialize>(&self, key: CacheKey, value: &T) -> Result<(), JsonStoreError> {
        self.cache.put(key, &self.fingerprint, value).await
    }

    pub async fn get_users<T: DeserializeOwned>(&self) -> Result<Option<T>, JsonStoreError> {
        if self.bypass {
            return Ok(None);
        }
        self.cache.get_users().await
    }

    pub async fn put_users<T: Serialize>(&self, users: &T) -> Result<(), JsonStoreError> {
        self.cache.put_users(users).await
    }
}
