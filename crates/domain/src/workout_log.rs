use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{DayPlanID, ExerciseID};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutLog {
    pub id: WorkoutLogID,
    pub date: DateTime<Utc>,
    pub day_plan_id: DayPlanID,
    pub exercises: Vec<ExerciseLog>,
    pub duration_seconds: f64,
    pub notes: Option<String>,
}

/// Time-ordered identifier of a finished workout.
///
/// Logs created by older versions carry a millisecond timestamp instead of a
/// UUID, so any string is accepted.
#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutLogID(String);

impl WorkoutLogID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl Default for WorkoutLogID {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for WorkoutLogID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutLogID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseLog {
    pub exercise_id: ExerciseID,
    pub exercise_name: String,
    pub sets: Vec<SetPerformance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPerformance {
    pub set_number: u32,
    /// Load in kg.
    pub weight: f32,
    /// Repetitions, or minutes for bike and time based entries.
    pub reps: f32,
    /// RPM
    pub cadence: Option<f32>,
    /// km/h
    pub speed: Option<f32>,
    /// km
    pub distance: Option<f32>,
    /// BPM
    pub heart_rate: Option<f32>,
    pub completed: bool,
}
