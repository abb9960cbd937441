//! Progression through the exercises and sets of one plan.
//!
//! A [`WorkoutSession`] materializes one [`SetPerformance`] per set at
//! construction, accepts edits and completions, moves the focus from one
//! exercise to the next and produces exactly one [`WorkoutLog`] when the last
//! set of the last exercise is completed.

use std::{sync::LazyLock, time::Duration};

use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, info};
use regex::Regex;
use strum::{Display, EnumString};

use crate::{DayPlan, Exercise, ExerciseKind, ExerciseLog, SetPerformance, WorkoutLog, WorkoutLogID};

/// Presentational pause before the focus moves to the next exercise.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(600);
/// Presentational pause before a finished session is handed over.
pub const FINISH_DELAY: Duration = Duration::from_millis(300);

const DEFAULT_WEIGHT: f32 = 8.0;
const DEFAULT_REPS: f32 = 10.0;

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)([0-9]+)kg").unwrap());
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*min").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    plan: DayPlan,
    start_time: DateTime<Utc>,
    current_exercise_idx: usize,
    sets: Vec<Vec<SetPerformance>>,
    finished: bool,
}

impl WorkoutSession {
    #[must_use]
    pub fn new(plan: DayPlan) -> Self {
        Self::with_start_time(plan, Utc::now())
    }

    #[must_use]
    pub fn with_start_time(plan: DayPlan, start_time: DateTime<Utc>) -> Self {
        let sets = plan
            .exercises
            .iter()
            .map(|exercise| {
                let kind = exercise.kind();
                (1..=exercise.sets)
                    .map(|set_number| kind.initial_set(exercise, set_number))
                    .collect()
            })
            .collect();

        debug!("started workout session for plan {}", plan.id);

        Self {
            plan,
            start_time,
            current_exercise_idx: 0,
            sets,
            finished: false,
        }
    }

    #[must_use]
    pub fn plan(&self) -> &DayPlan {
        &self.plan
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Index of the exercise in focus, equal to the number of exercises once finished.
    #[must_use]
    pub fn current_exercise_idx(&self) -> usize {
        self.current_exercise_idx
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.plan.exercises.get(self.current_exercise_idx)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn exercise_status(&self, exercise_idx: usize) -> ExerciseStatus {
        match exercise_idx.cmp(&self.current_exercise_idx) {
            std::cmp::Ordering::Less => ExerciseStatus::Past,
            std::cmp::Ordering::Equal => ExerciseStatus::Active,
            std::cmp::Ordering::Greater => ExerciseStatus::Future,
        }
    }

    #[must_use]
    pub fn sets(&self, exercise_idx: usize) -> Option<&[SetPerformance]> {
        self.sets.get(exercise_idx).map(Vec::as_slice)
    }

    /// Whether [`WorkoutSession::complete_set`] would accept this set.
    #[must_use]
    pub fn is_set_enabled(&self, exercise_idx: usize, set_idx: usize) -> bool {
        self.check_completion(exercise_idx, set_idx).is_ok()
    }

    /// First set of the active exercise that can be completed.
    #[must_use]
    pub fn next_set(&self) -> Option<(usize, usize)> {
        let exercise_idx = self.current_exercise_idx;
        self.sets(exercise_idx)?
            .iter()
            .position(|set| !set.completed)
            .filter(|set_idx| self.is_set_enabled(exercise_idx, *set_idx))
            .map(|set_idx| (exercise_idx, set_idx))
    }

    /// Replace one field of a set that has not been completed yet.
    ///
    /// The exercise does not need to be the active one, so values of upcoming
    /// exercises can be prepared in advance.
    pub fn update_set(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
        field: SetField,
    ) -> Result<(), UpdateSetError> {
        if self.finished {
            return Err(UpdateSetError::Finished);
        }

        let set = self
            .sets
            .get_mut(exercise_idx)
            .ok_or(UpdateSetError::ExerciseOutOfRange(exercise_idx))?
            .get_mut(set_idx)
            .ok_or(UpdateSetError::SetOutOfRange {
                exercise_idx,
                set_idx,
            })?;

        if set.completed {
            return Err(UpdateSetError::Completed {
                exercise_idx,
                set_idx,
            });
        }

        field.apply(set);

        Ok(())
    }

    pub fn complete_set(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
    ) -> Result<Progress, CompleteSetError> {
        self.complete_set_at(exercise_idx, set_idx, Utc::now())
    }

    /// Mark a set as completed at the given time.
    ///
    /// Completing the last set of the active exercise moves the focus to the
    /// next exercise. Completing the last set of the last exercise finishes the
    /// session and returns the log. A rejected request leaves the session
    /// unchanged.
    pub fn complete_set_at(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
        now: DateTime<Utc>,
    ) -> Result<Progress, CompleteSetError> {
        self.check_completion(exercise_idx, set_idx)?;

        let sets = &mut self.sets[exercise_idx];
        sets[set_idx].completed = true;

        if set_idx + 1 < sets.len() {
            return Ok(Progress::SetCompleted);
        }

        self.current_exercise_idx += 1;

        if self.current_exercise_idx < self.plan.exercises.len() {
            debug!(
                "advanced to exercise {} of plan {}",
                self.current_exercise_idx, self.plan.id
            );
            return Ok(Progress::ExerciseCompleted {
                next_exercise_idx: self.current_exercise_idx,
            });
        }

        self.finished = true;
        let log = self.to_log(now);

        info!(
            "finished workout session for plan {} after {:.0} s",
            self.plan.id, log.duration_seconds
        );

        Ok(Progress::Finished(log))
    }

    fn check_completion(&self, exercise_idx: usize, set_idx: usize) -> Result<(), CompleteSetError> {
        if self.finished {
            return Err(CompleteSetError::Finished);
        }

        let sets = self
            .sets
            .get(exercise_idx)
            .ok_or(CompleteSetError::ExerciseOutOfRange(exercise_idx))?;

        let set = sets.get(set_idx).ok_or(CompleteSetError::SetOutOfRange {
            exercise_idx,
            set_idx,
        })?;

        if exercise_idx != self.current_exercise_idx {
            return Err(CompleteSetError::NotActive {
                exercise_idx,
                active_exercise_idx: self.current_exercise_idx,
            });
        }

        if set.completed {
            return Err(CompleteSetError::AlreadyCompleted {
                exercise_idx,
                set_idx,
            });
        }

        if set_idx > 0 && !sets[set_idx - 1].completed {
            return Err(CompleteSetError::PreviousSetIncomplete {
                exercise_idx,
                set_idx,
            });
        }

        Ok(())
    }

    fn to_log(&self, now: DateTime<Utc>) -> WorkoutLog {
        #[allow(clippy::cast_precision_loss)]
        let duration_seconds = (now - self.start_time).num_milliseconds().max(0) as f64 / 1000.0;

        WorkoutLog {
            id: WorkoutLogID::new(),
            date: now.trunc_subsecs(3),
            day_plan_id: self.plan.id.clone(),
            exercises: self
                .plan
                .exercises
                .iter()
                .zip(&self.sets)
                .map(|(exercise, sets)| ExerciseLog {
                    exercise_id: exercise.id.clone(),
                    exercise_name: exercise.name.clone(),
                    sets: sets.clone(),
                })
                .collect(),
            duration_seconds,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStatus {
    Past,
    Active,
    Future,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    SetCompleted,
    ExerciseCompleted { next_exercise_idx: usize },
    Finished(WorkoutLog),
}

impl Progress {
    /// Pause a front end may insert before showing the resulting state.
    #[must_use]
    pub fn settle_delay(&self) -> Option<Duration> {
        match self {
            Progress::SetCompleted => None,
            Progress::ExerciseCompleted { .. } => Some(ADVANCE_DELAY),
            Progress::Finished(_) => Some(FINISH_DELAY),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetField {
    Weight(f32),
    Reps(f32),
    Cadence(Option<f32>),
    Speed(Option<f32>),
    Distance(Option<f32>),
    HeartRate(Option<f32>),
}

impl SetField {
    #[must_use]
    pub fn kind(&self) -> SetFieldKind {
        match self {
            SetField::Weight(_) => SetFieldKind::Weight,
            SetField::Reps(_) => SetFieldKind::Reps,
            SetField::Cadence(_) => SetFieldKind::Cadence,
            SetField::Speed(_) => SetFieldKind::Speed,
            SetField::Distance(_) => SetFieldKind::Distance,
            SetField::HeartRate(_) => SetFieldKind::HeartRate,
        }
    }

    fn apply(self, set: &mut SetPerformance) {
        match self {
            SetField::Weight(value) => set.weight = value,
            SetField::Reps(value) => set.reps = value,
            SetField::Cadence(value) => set.cadence = value,
            SetField::Speed(value) => set.speed = value,
            SetField::Distance(value) => set.distance = value,
            SetField::HeartRate(value) => set.heart_rate = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SetFieldKind {
    Weight,
    Reps,
    Cadence,
    Speed,
    Distance,
    HeartRate,
}

impl SetFieldKind {
    #[must_use]
    pub fn with_value(self, value: f32) -> SetField {
        match self {
            SetFieldKind::Weight => SetField::Weight(value),
            SetFieldKind::Reps => SetField::Reps(value),
            SetFieldKind::Cadence => SetField::Cadence(Some(value)),
            SetFieldKind::Speed => SetField::Speed(Some(value)),
            SetFieldKind::Distance => SetField::Distance(Some(value)),
            SetFieldKind::HeartRate => SetField::HeartRate(Some(value)),
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            SetFieldKind::Weight => "kg",
            SetFieldKind::Reps => "reps",
            SetFieldKind::Cadence => "rpm",
            SetFieldKind::Speed => "km/h",
            SetFieldKind::Distance => "km",
            SetFieldKind::HeartRate => "bpm",
        }
    }
}

impl ExerciseKind {
    /// Fields a front end lets the user edit for this kind of exercise.
    #[must_use]
    pub fn editable_fields(self) -> &'static [SetFieldKind] {
        match self {
            ExerciseKind::Warmup | ExerciseKind::Abs => &[],
            ExerciseKind::Strength => &[SetFieldKind::Weight, SetFieldKind::Reps],
            ExerciseKind::BikeWarmup => &[SetFieldKind::Reps, SetFieldKind::Cadence],
            ExerciseKind::BikeStrength => &[
                SetFieldKind::Speed,
                SetFieldKind::Distance,
                SetFieldKind::HeartRate,
                SetFieldKind::Cadence,
            ],
        }
    }

    fn initial_set(self, exercise: &Exercise, set_number: u32) -> SetPerformance {
        let (weight, reps, cadence) = if self.is_bike() {
            (0.0, bike_minutes(exercise), parse_number(exercise.target_cadence.as_deref()))
        } else {
            (standard_weight(exercise), standard_reps(exercise), None)
        };

        SetPerformance {
            set_number,
            weight,
            reps,
            cadence,
            speed: None,
            distance: None,
            heart_rate: None,
            completed: false,
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<f32> {
    value.and_then(|v| v.trim().parse::<f32>().ok())
}

fn bike_minutes(exercise: &Exercise) -> f32 {
    parse_number(exercise.target_duration.as_deref())
        .or_else(|| {
            MINUTES
                .captures(&exercise.reps)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f32>().ok())
        })
        .unwrap_or(0.0)
}

fn standard_weight(exercise: &Exercise) -> f32 {
    exercise
        .description
        .as_deref()
        .and_then(|description| WEIGHT.captures(description))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .unwrap_or(DEFAULT_WEIGHT)
}

#[allow(clippy::cast_precision_loss)]
fn standard_reps(exercise: &Exercise) -> f32 {
    // A range such as "8-12" starts at its lower bound.
    exercise
        .reps
        .split('-')
        .next()
        .and_then(|reps| reps.trim().parse::<u32>().ok())
        .map_or(DEFAULT_REPS, |reps| reps as f32)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateSetError {
    #[error("workout session is already finished")]
    Finished,
    #[error("no exercise {0}")]
    ExerciseOutOfRange(usize),
    #[error("no set {set_idx} in exercise {exercise_idx}")]
    SetOutOfRange { exercise_idx: usize, set_idx: usize },
    #[error("set {set_idx} of exercise {exercise_idx} is already completed")]
    Completed { exercise_idx: usize, set_idx: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompleteSetError {
    #[error("workout session is already finished")]
    Finished,
    #[error("no exercise {0}")]
    ExerciseOutOfRange(usize),
    #[error("no set {set_idx} in exercise {exercise_idx}")]
    SetOutOfRange { exercise_idx: usize, set_idx: usize },
    #[error("exercise {exercise_idx} is not active (active: {active_exercise_idx})")]
    NotActive {
        exercise_idx: usize,
        active_exercise_idx: usize,
    },
    #[error("set {set_idx} of exercise {exercise_idx} is already completed")]
    AlreadyCompleted { exercise_idx: usize, set_idx: usize },
    #[error("set {set_idx} of exercise {exercise_idx} requires the previous set to be completed")]
    PreviousSetIncomplete { exercise_idx: usize, set_idx: usize },
}
