use habit_tracker::{
    app::shutdown_signal,
    config::{init_tracing, HABITS_DEFAULT_PORT, HABITS_PORT_VAR},
    load_habits, router,
    storage::resolve_data_dir,
    AppState, FileStore, HabitStore, ServerConfig,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config = ServerConfig::from_env(HABITS_PORT_VAR, HABITS_DEFAULT_PORT);
    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;

    let storage = FileStore::new(&data_dir);
    let habits = load_habits(&storage, |err| error!("{err}; starting with no habits")).await;
    info!(count = habits.len(), dir = %data_dir.display(), "loaded habits");

    let app = router(AppState::new(storage, HabitStore::new(habits)));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
