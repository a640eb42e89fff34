use crate::errors::AppError;
use crate::habits::{is_completed_on, pending_first, status_at, weekday_index, HabitStore};
use crate::models::{Frequency, Habit, HabitDraft, HabitPatch, HabitView, TodayResponse};
use crate::state::AppState;
use crate::storage::persist_habits;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Local, Utc};
use tracing::{debug, error};

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitView>> {
    let store = state.habits.lock().await;
    Json(views(store.habits().iter(), &Local::now()))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(draft): Json<HabitDraft>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    let draft = validate_draft(draft)?;
    apply(&state, |store| {
        let habit = store.add(draft, Utc::now());
        debug!(id = %habit.id, "habit added");
    })
    .await
}

pub async fn edit_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<HabitPatch>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    apply(&state, |store| {
        store.edit(&id, patch);
    })
    .await
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    apply(&state, |store| {
        store.delete(&id);
    })
    .await
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    apply(&state, |store| {
        store.toggle_completion(&id, &Local::now());
    })
    .await
}

pub async fn reset_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    apply(&state, |store| {
        store.reset(&id);
    })
    .await
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let now = Local::now();
    let store = state.habits.lock().await;
    let todays = pending_first(store.todays_habits(&now), &now);

    Json(TodayResponse {
        date: now.date_naive().to_string(),
        weekday: weekday_index(&now),
        completion_percentage: store.completion_percentage(&now),
        habits: views(todays.into_iter(), &now),
    })
}

/// Runs one mutation under the lock, then writes the whole collection back.
/// The mutation is committed before the write, so a failed write is logged
/// and the committed collection is still returned.
async fn apply<F>(state: &AppState, mutate: F) -> Result<Json<Vec<HabitView>>, AppError>
where
    F: FnOnce(&mut HabitStore),
{
    let mut store = state.habits.lock().await;
    mutate(&mut store);

    if let Err(err) = persist_habits(&state.storage, store.habits()).await {
        error!(dir = %state.storage.root().display(), "failed to persist habits: {}", err.message);
    }

    Ok(Json(views(store.habits().iter(), &Local::now())))
}

fn validate_draft(mut draft: HabitDraft) -> Result<HabitDraft, AppError> {
    draft.name = draft.name.trim().to_string();
    if draft.name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    if draft.schedule.days.iter().any(|day| *day > 6) {
        return Err(AppError::bad_request("schedule days must be between 0 and 6"));
    }
    if draft.schedule.frequency == Frequency::Weekly && draft.schedule.days.is_empty() {
        return Err(AppError::bad_request("weekly schedule needs at least one day"));
    }
    Ok(draft)
}

fn views<'a>(habits: impl Iterator<Item = &'a Habit>, now: &DateTime<Local>) -> Vec<HabitView> {
    habits
        .map(|habit| HabitView {
            status: status_at(habit, now),
            completed_today: is_completed_on(habit, now),
            habit: habit.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;
    use crate::storage::FileStore;

    fn unwritable_state() -> (AppState, std::path::PathBuf) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let blocker = std::env::temp_dir().join(format!("habit_tracker_blocker_{}_{nanos}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut habits = HabitStore::default();
        habits.add(
            HabitDraft {
                name: "Drink Water".into(),
                schedule: Schedule::daily(),
            },
            Utc::now(),
        );
        let state = AppState::new(FileStore::new(blocker.join("data")), habits);
        (state, blocker)
    }

    #[tokio::test]
    async fn toggle_reports_committed_state_when_write_fails() {
        let (state, blocker) = unwritable_state();
        let id = state.habits.lock().await.habits()[0].id.clone();

        let Json(first) = toggle_habit(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(first[0].habit.streak, 1);
        assert!(first[0].completed_today);

        // Nothing reaches disk; each call still reports the committed state.
        let Json(second) = toggle_habit(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(second[0].habit.streak, 0);
        assert_eq!(state.habits.lock().await.habits()[0].streak, 0);

        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn validate_trims_and_rejects_empty_names() {
        let ok = validate_draft(HabitDraft {
            name: "  Read  ".into(),
            schedule: Schedule::daily(),
        })
        .unwrap();
        assert_eq!(ok.name, "Read");

        let err = validate_draft(HabitDraft {
            name: "   ".into(),
            schedule: Schedule::daily(),
        })
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validate_rejects_bad_weekly_days() {
        let empty = validate_draft(HabitDraft {
            name: "Gym".into(),
            schedule: Schedule::weekly(Vec::<u8>::new()),
        });
        assert!(empty.is_err());

        let out_of_range = validate_draft(HabitDraft {
            name: "Gym".into(),
            schedule: Schedule::weekly([1, 7]),
        });
        assert!(out_of_range.is_err());
    }
}
