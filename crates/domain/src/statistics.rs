use chrono::{DateTime, Utc};

use crate::{ExerciseLog, SetPerformance, WorkoutLog};

/// Number of most recent workouts shown in the volume chart.
pub const RECENT_WORKOUTS: usize = 7;

impl ExerciseLog {
    /// Sum of weight times reps over all completed sets.
    #[must_use]
    pub fn volume_load(&self) -> f32 {
        self.completed_sets().map(|s| s.weight * s.reps).sum()
    }

    pub fn completed_sets(&self) -> impl Iterator<Item = &SetPerformance> {
        self.sets.iter().filter(|s| s.completed)
    }
}

impl WorkoutLog {
    #[must_use]
    pub fn volume_load(&self) -> f32 {
        self.exercises.iter().map(ExerciseLog::volume_load).sum()
    }

    #[must_use]
    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.completed_sets().count())
            .sum()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_seconds / 60.0).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub sessions: usize,
    pub last_date: Option<DateTime<Utc>>,
}

#[must_use]
pub fn summary(logs: &[WorkoutLog]) -> Summary {
    Summary {
        sessions: logs.len(),
        last_date: logs.last().map(|log| log.date),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumePoint {
    pub date: DateTime<Utc>,
    pub volume: f32,
    pub duration_minutes: i64,
}

/// Volume and duration of the last `n` workouts in history order.
#[must_use]
pub fn recent_volume(logs: &[WorkoutLog], n: usize) -> Vec<VolumePoint> {
    logs[logs.len().saturating_sub(n)..]
        .iter()
        .map(|log| VolumePoint {
            date: log.date,
            volume: log.volume_load(),
            duration_minutes: log.duration_minutes(),
        })
        .collect()
}
