use crate::errors::AppError;
use crate::models::Habit;
use std::{
    env,
    future::Future,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;

pub const HABITS_KEY: &str = "habits";

/// String-keyed store holding one JSON document per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = io::Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: String) -> impl Future<Output = io::Result<()>> + Send;
}

/// Keeps each key in `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.path_for(key), value).await
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read stored habits: {0}")]
    Read(io::Error),
    #[error("failed to parse stored habits: {0}")]
    Parse(serde_json::Error),
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

/// Reads the stored collection once. Absent data yields an empty collection
/// silently; unreadable or corrupt data yields an empty collection and is
/// handed to `on_error`.
pub async fn load_habits<S, F>(store: &S, on_error: F) -> Vec<Habit>
where
    S: KeyValueStore,
    F: FnOnce(LoadError),
{
    let raw = match store.get(HABITS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            on_error(LoadError::Read(err));
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(habits) => habits,
        Err(err) => {
            on_error(LoadError::Parse(err));
            Vec::new()
        }
    }
}

pub async fn persist_habits<S: KeyValueStore>(store: &S, habits: &[Habit]) -> Result<(), AppError> {
    let payload = serde_json::to_string(habits)?;
    store.set(HABITS_KEY, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::HabitStore;
    use crate::models::{HabitDraft, Schedule};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct MemoryStore {
        entries: Arc<Mutex<HashMap<String, String>>>,
    }

    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> io::Result<Option<String>> {
            let entries = self
                .entries
                .lock()
                .map_err(|_| io::Error::other("memory store lock poisoned"))?;
            Ok(entries.get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> io::Result<()> {
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| io::Error::other("memory store lock poisoned"))?;
            entries.insert(key.to_string(), value);
            Ok(())
        }
    }

    fn sample_store() -> HabitStore {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let mut store = HabitStore::default();
        let id = store
            .add(
                HabitDraft {
                    name: "Drink Water".into(),
                    schedule: Schedule::daily(),
                },
                now,
            )
            .id
            .clone();
        store.add(
            HabitDraft {
                name: "Gym".into(),
                schedule: Schedule::weekly([1, 3, 5]),
            },
            now,
        );
        store.toggle_completion(&id, &now);
        store
    }

    #[tokio::test]
    async fn round_trip_preserves_collection() {
        let kv = MemoryStore::default();
        let store = sample_store();

        persist_habits(&kv, store.habits()).await.unwrap();
        let loaded = load_habits(&kv, |err| panic!("unexpected load error: {err}")).await;

        assert_eq!(loaded, store.habits());
        assert_eq!(loaded[0].completed_dates, vec!["2026-10-19T00:00:00.000Z".to_string()]);
    }

    #[tokio::test]
    async fn absent_key_loads_empty_without_error() {
        let kv = MemoryStore::default();
        let mut reported = false;
        let loaded = load_habits(&kv, |_| reported = true).await;

        assert!(loaded.is_empty());
        assert!(!reported);
    }

    #[tokio::test]
    async fn corrupt_data_loads_empty_and_reports() {
        let kv = MemoryStore::default();
        kv.set(HABITS_KEY, "[{not json".into()).await.unwrap();

        let mut reported = None;
        let loaded = load_habits(&kv, |err| reported = Some(err)).await;

        assert!(loaded.is_empty());
        assert!(matches!(reported, Some(LoadError::Parse(_))));
        let message = reported.map(|err| err.to_string()).unwrap_or_default();
        assert!(message.starts_with("failed to parse stored habits: "));
    }

    #[tokio::test]
    async fn records_without_completed_dates_default_to_empty() {
        let kv = MemoryStore::default();
        let legacy = r#"[{"id":"1700000000000","name":"Read","schedule":{"days":[0,1,2,3,4,5,6],"frequency":"daily"},"lastCompleted":null,"streak":4,"missedOnce":false}]"#;
        kv.set(HABITS_KEY, legacy.into()).await.unwrap();

        let loaded = load_habits(&kv, |err| panic!("unexpected load error: {err}")).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].streak, 4);
        assert!(loaded[0].completed_dates.is_empty());
    }

    #[tokio::test]
    async fn file_store_writes_under_root() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("habit_tracker_store_{}_{nanos}", std::process::id()));
        let kv = FileStore::new(&root);

        assert!(kv.get(HABITS_KEY).await.unwrap().is_none());
        persist_habits(&kv, sample_store().habits()).await.unwrap();
        assert!(root.join("habits.json").exists());

        let loaded = load_habits(&kv, |err| panic!("unexpected load error: {err}")).await;
        assert_eq!(loaded.len(), 2);

        let _ = std::fs::remove_dir_all(&root);
    }
}
