//! Serialized shape of plans and workout logs.
//!
//! Field names follow the JSON written by earlier versions of the app, so
//! existing data keeps loading.

use chrono::DateTime;
use companion_domain as domain;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub exercises: Vec<Exercise>,
}

impl From<&domain::DayPlan> for DayPlan {
    fn from(value: &domain::DayPlan) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            duration: value.duration.clone(),
            exercises: value.exercises.iter().map(Exercise::from).collect(),
        }
    }
}

impl From<DayPlan> for domain::DayPlan {
    fn from(value: DayPlan) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            duration: value.duration,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub mode: ExerciseMode,
    pub sets: u32,
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cadence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            category: value.category.into(),
            mode: value.mode.into(),
            sets: value.sets,
            reps: value.reps.clone(),
            target_cadence: value.target_cadence.clone(),
            target_duration: value.target_duration.clone(),
            description: value.description.clone(),
        }
    }
}

impl From<Exercise> for domain::Exercise {
    fn from(value: Exercise) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            category: value.category.into(),
            mode: value.mode.into(),
            sets: value.sets,
            reps: value.reps,
            target_cadence: value.target_cadence,
            target_duration: value.target_duration,
            description: value.description,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Warmup,
    Strength,
    Abs,
}

impl From<domain::ExerciseCategory> for ExerciseCategory {
    fn from(value: domain::ExerciseCategory) -> Self {
        match value {
            domain::ExerciseCategory::Warmup => ExerciseCategory::Warmup,
            domain::ExerciseCategory::Strength => ExerciseCategory::Strength,
            domain::ExerciseCategory::Abs => ExerciseCategory::Abs,
        }
    }
}

impl From<ExerciseCategory> for domain::ExerciseCategory {
    fn from(value: ExerciseCategory) -> Self {
        match value {
            ExerciseCategory::Warmup => domain::ExerciseCategory::Warmup,
            ExerciseCategory::Strength => domain::ExerciseCategory::Strength,
            ExerciseCategory::Abs => domain::ExerciseCategory::Abs,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseMode {
    Standard,
    Bike,
}

impl From<domain::ExerciseMode> for ExerciseMode {
    fn from(value: domain::ExerciseMode) -> Self {
        match value {
            domain::ExerciseMode::Standard => ExerciseMode::Standard,
            domain::ExerciseMode::Bike => ExerciseMode::Bike,
        }
    }
}

impl From<ExerciseMode> for domain::ExerciseMode {
    fn from(value: ExerciseMode) -> Self {
        match value {
            ExerciseMode::Standard => domain::ExerciseMode::Standard,
            ExerciseMode::Bike => domain::ExerciseMode::Bike,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    pub day_plan_id: String,
    pub exercises: Vec<ExerciseLog>,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&domain::WorkoutLog> for WorkoutLog {
    fn from(value: &domain::WorkoutLog) -> Self {
        Self {
            id: value.id.to_string(),
            date: value.date.timestamp_millis(),
            day_plan_id: value.day_plan_id.to_string(),
            exercises: value.exercises.iter().map(ExerciseLog::from).collect(),
            duration_seconds: value.duration_seconds,
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<WorkoutLog> for domain::WorkoutLog {
    type Error = ConversionError;

    fn try_from(value: WorkoutLog) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: DateTime::from_timestamp_millis(value.date)
                .ok_or(ConversionError::InvalidDate(value.date))?,
            day_plan_id: value.day_plan_id.into(),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::ExerciseLog::from)
                .collect(),
            duration_seconds: value.duration_seconds,
            notes: value.notes,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<SetPerformance>,
}

impl From<&domain::ExerciseLog> for ExerciseLog {
    fn from(value: &domain::ExerciseLog) -> Self {
        Self {
            exercise_id: value.exercise_id.to_string(),
            exercise_name: value.exercise_name.clone(),
            sets: value.sets.iter().map(SetPerformance::from).collect(),
        }
    }
}

impl From<ExerciseLog> for domain::ExerciseLog {
    fn from(value: ExerciseLog) -> Self {
        Self {
            exercise_id: value.exercise_id.into(),
            exercise_name: value.exercise_name,
            sets: value
                .sets
                .into_iter()
                .map(domain::SetPerformance::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetPerformance {
    pub set_number: u32,
    pub weight: f32,
    pub reps: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f32>,
    pub completed: bool,
}

impl From<&domain::SetPerformance> for SetPerformance {
    fn from(value: &domain::SetPerformance) -> Self {
        Self {
            set_number: value.set_number,
            weight: value.weight,
            reps: value.reps,
            cadence: value.cadence,
            speed: value.speed,
            distance: value.distance,
            heart_rate: value.heart_rate,
            completed: value.completed,
        }
    }
}

impl From<SetPerformance> for domain::SetPerformance {
    fn from(value: SetPerformance) -> Self {
        Self {
            set_number: value.set_number,
            weight: value.weight,
            reps: value.reps,
            cadence: value.cadence,
            speed: value.speed,
            distance: value.distance,
            heart_rate: value.heart_rate,
            completed: value.completed,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid date: {0}")]
    InvalidDate(i64),
}
