pub mod app;
pub mod config;
pub mod counter;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod state;
pub mod storage;

pub use app::{metrics_router, router};
pub use config::ServerConfig;
pub use habits::HabitStore;
pub use state::{AppState, MetricsState};
pub use storage::{load_habits, FileStore};
