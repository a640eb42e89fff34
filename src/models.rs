use crate::habits::HabitStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ALL_WEEKDAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

/// Weekday indices run from 0 (Sunday) to 6 (Saturday). `days` only
/// matters for weekly schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub days: Vec<u8>,
    pub frequency: Frequency,
}

impl Schedule {
    pub fn daily() -> Self {
        Self {
            days: ALL_WEEKDAYS.to_vec(),
            frequency: Frequency::Daily,
        }
    }

    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            days: days.into_iter().collect(),
            frequency: Frequency::Weekly,
        }
    }

    pub fn is_due_on(&self, weekday: u8) -> bool {
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => self.days.contains(&weekday),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub schedule: Schedule,
    pub last_completed: Option<DateTime<Utc>>,
    pub streak: i64,
    // Initialized and reset, never read by completion logic.
    #[serde(default)]
    pub missed_once: bool,
    #[serde(default)]
    pub completed_dates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabitDraft {
    pub name: String,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    pub name: Option<String>,
    pub schedule: Option<Schedule>,
    pub streak: Option<i64>,
    pub missed_once: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub status: HabitStatus,
    pub completed_today: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub weekday: u8,
    pub completion_percentage: u32,
    pub habits: Vec<HabitView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackRequest {
    pub event: Option<String>,
    pub page: Option<String>,
}
