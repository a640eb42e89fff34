use crate::models::{Habit, HabitDraft, HabitPatch};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Display state of a habit, derived from its completion fields on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Pending,
    Completed,
    Warning,
    Overdue,
}

/// Owns the habit collection. Mutations report whether a habit matched;
/// persisting the result is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn new(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn add(&mut self, draft: HabitDraft, now: DateTime<Utc>) -> &Habit {
        let habit = Habit {
            id: self.next_id(now),
            name: draft.name,
            schedule: draft.schedule,
            last_completed: None,
            streak: 0,
            missed_once: false,
            completed_dates: Vec::new(),
        };
        self.habits.push(habit);
        &self.habits[self.habits.len() - 1]
    }

    /// Marks the habit done for `now`'s calendar day, or undoes it when the
    /// day is already recorded. Undoing keeps `last_completed` and may take
    /// the streak below zero.
    pub fn toggle_completion<Tz: TimeZone>(&mut self, id: &str, now: &DateTime<Tz>) -> bool {
        let Some(habit) = self.find_mut(id) else {
            return false;
        };

        if is_completed_on(habit, now) {
            let today = now.date_naive();
            let tz = now.timezone();
            habit
                .completed_dates
                .retain(|entry| entry_day(entry, &tz) != Some(today));
            habit.streak -= 1;
        } else {
            habit.completed_dates.push(start_of_day_stamp(now));
            habit.last_completed = Some(now.with_timezone(&Utc));
            habit.streak += 1;
        }
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        self.habits.len() != before
    }

    pub fn reset(&mut self, id: &str) -> bool {
        let Some(habit) = self.find_mut(id) else {
            return false;
        };
        habit.last_completed = None;
        habit.streak = 0;
        habit.missed_once = false;
        habit.completed_dates.clear();
        true
    }

    pub fn edit(&mut self, id: &str, patch: HabitPatch) -> bool {
        let Some(habit) = self.find_mut(id) else {
            return false;
        };
        if let Some(name) = patch.name {
            habit.name = name;
        }
        if let Some(schedule) = patch.schedule {
            habit.schedule = schedule;
        }
        if let Some(streak) = patch.streak {
            habit.streak = streak;
        }
        if let Some(missed_once) = patch.missed_once {
            habit.missed_once = missed_once;
        }
        true
    }

    pub fn todays_habits<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Habit> {
        let weekday = weekday_index(now);
        self.habits
            .iter()
            .filter(|habit| habit.schedule.is_due_on(weekday))
            .collect()
    }

    pub fn completion_percentage<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u32 {
        let todays = self.todays_habits(now);
        let done = todays
            .iter()
            .filter(|habit| is_completed_on(habit, now))
            .count();

        let ratio = done as f64 / todays.len() as f64;
        if ratio.is_nan() {
            return 0;
        }
        (ratio * 100.0).round() as u32
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|habit| habit.id == id)
    }

    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}

/// 0 is Sunday, 6 is Saturday.
pub fn weekday_index<Tz: TimeZone>(now: &DateTime<Tz>) -> u8 {
    now.weekday().num_days_from_sunday() as u8
}

pub fn is_completed_on<Tz: TimeZone>(habit: &Habit, now: &DateTime<Tz>) -> bool {
    let today = now.date_naive();
    let tz = now.timezone();
    habit
        .completed_dates
        .iter()
        .any(|entry| entry_day(entry, &tz) == Some(today))
}

pub fn status_at<Tz: TimeZone>(habit: &Habit, now: &DateTime<Tz>) -> HabitStatus {
    if is_completed_on(habit, now) {
        return HabitStatus::Completed;
    }
    let Some(last) = habit.last_completed else {
        return HabitStatus::Pending;
    };

    match now.with_timezone(&Utc).signed_duration_since(last).num_days() {
        1 => HabitStatus::Warning,
        days if days > 1 => HabitStatus::Overdue,
        _ => HabitStatus::Pending,
    }
}

/// Stable ordering that puts habits not yet done today ahead of completed ones.
pub fn pending_first<'a, Tz: TimeZone>(
    mut habits: Vec<&'a Habit>,
    now: &DateTime<Tz>,
) -> Vec<&'a Habit> {
    habits.sort_by_key(|habit| is_completed_on(habit, now));
    habits
}

fn entry_day<Tz: TimeZone>(entry: &str, tz: &Tz) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(entry) {
        return Some(stamp.with_timezone(tz).date_naive());
    }
    NaiveDate::parse_from_str(entry, "%Y-%m-%d").ok()
}

fn start_of_day_stamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = now
        .timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| now.clone());
    start
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
