use std::fmt;

use derive_more::{Deref, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub id: DayPlanID,
    pub name: String,
    pub duration: String,
    pub exercises: Vec<Exercise>,
}

impl DayPlan {
    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    #[must_use]
    pub fn is_bike(&self) -> bool {
        self.exercises
            .iter()
            .any(|e| e.category != ExerciseCategory::Abs && e.mode == ExerciseMode::Bike)
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayPlanID(String);

impl From<String> for DayPlanID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DayPlanID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub category: ExerciseCategory,
    pub mode: ExerciseMode,
    pub sets: u32,
    /// A plain number (`"10"`), a range (`"8-12"`), `"Max"` or a duration (`"10min"`).
    pub reps: String,
    /// Revolutions per minute, digits only.
    pub target_cadence: Option<String>,
    /// Minutes, digits only.
    pub target_duration: Option<String>,
    pub description: Option<String>,
}

impl Exercise {
    #[must_use]
    pub fn kind(&self) -> ExerciseKind {
        match (self.category, self.mode) {
            (ExerciseCategory::Warmup, ExerciseMode::Standard) => ExerciseKind::Warmup,
            (ExerciseCategory::Warmup, ExerciseMode::Bike) => ExerciseKind::BikeWarmup,
            (ExerciseCategory::Strength, ExerciseMode::Standard) => ExerciseKind::Strength,
            (ExerciseCategory::Strength, ExerciseMode::Bike) => ExerciseKind::BikeStrength,
            (ExerciseCategory::Abs, _) => ExerciseKind::Abs,
        }
    }
}

#[derive(Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseCategory {
    Warmup,
    Strength,
    Abs,
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExerciseCategory::Warmup => "warmup",
                ExerciseCategory::Strength => "strength",
                ExerciseCategory::Abs => "abs",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseMode {
    Standard,
    Bike,
}

impl fmt::Display for ExerciseMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExerciseMode::Standard => "standard",
                ExerciseMode::Bike => "bike",
            }
        )
    }
}

/// Combination of category and mode that determines how an exercise is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKind {
    /// Confirmed once, nothing to enter.
    Warmup,
    /// Duration and cadence of the warmup ride.
    BikeWarmup,
    /// Weight and reps per set.
    Strength,
    /// One aggregate entry with speed, distance, heart rate and cadence.
    BikeStrength,
    /// Confirmed once, nothing to enter.
    Abs,
}

impl ExerciseKind {
    #[must_use]
    pub fn is_bike(self) -> bool {
        matches!(self, ExerciseKind::BikeWarmup | ExerciseKind::BikeStrength)
    }
}
