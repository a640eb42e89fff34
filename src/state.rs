use crate::counter::EventCounter;
use crate::habits::HabitStore;
use crate::storage::FileStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub storage: FileStore,
    pub habits: Arc<Mutex<HabitStore>>,
}

impl AppState {
    pub fn new(storage: FileStore, habits: HabitStore) -> Self {
        Self {
            storage,
            habits: Arc::new(Mutex::new(habits)),
        }
    }
}

#[derive(Clone, Default)]
pub struct MetricsState {
    pub events: Arc<EventCounter>,
}
