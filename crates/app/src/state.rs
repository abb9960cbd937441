//! Application state and its transitions.
//!
//! [`update`] never mutates its input: every event yields a new [`AppState`]
//! together with the side effects the caller has to perform.

use std::time::Duration;

use chrono::{DateTime, Utc};
use companion_domain::{
    CompleteSetError, DayPlan, DayPlanID, Progress, SetField, UpdateSetError, WorkoutLog,
    WorkoutSession,
};
use log::{debug, info};

#[derive(strum::Display, strum::EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Workout,
    Stats,
    Settings,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppState {
    pub view: View,
    pub plans: Vec<DayPlan>,
    pub logs: Vec<WorkoutLog>,
    pub active_workout: Option<WorkoutSession>,
}

impl AppState {
    #[must_use]
    pub fn new(plans: Vec<DayPlan>, logs: Vec<WorkoutLog>) -> Self {
        Self {
            view: View::Home,
            plans,
            logs,
            active_workout: None,
        }
    }

    #[must_use]
    pub fn plan(&self, id: &DayPlanID) -> Option<&DayPlan> {
        self.plans.iter().find(|p| p.id == *id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Navigate(View),
    ImportPlans(Vec<DayPlan>),
    ClearPlans,
    StartWorkout {
        plan_id: DayPlanID,
        start_time: DateTime<Utc>,
    },
    UpdateSet {
        exercise_idx: usize,
        set_idx: usize,
        field: SetField,
    },
    CompleteSet {
        exercise_idx: usize,
        set_idx: usize,
        time: DateTime<Utc>,
    },
    CancelWorkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PersistPlans,
    PersistWorkoutLogs,
    /// Presentational pause before the new state is shown.
    Settle(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(state: AppState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown plan {0}")]
    UnknownPlan(DayPlanID),
    #[error("a workout is in progress")]
    WorkoutInProgress,
    #[error("no workout in progress")]
    NoActiveWorkout,
    #[error(transparent)]
    UpdateSet(#[from] UpdateSetError),
    #[error(transparent)]
    CompleteSet(#[from] CompleteSetError),
}

pub fn update(state: &AppState, event: Event) -> Result<Transition, StateError> {
    debug!("handling {event:?} in view {}", state.view);

    let mut state = state.clone();

    match event {
        Event::Navigate(view) => {
            match (&state.active_workout, view) {
                (Some(_), View::Workout) => {}
                (Some(_), _) => return Err(StateError::WorkoutInProgress),
                (None, View::Workout) => return Err(StateError::NoActiveWorkout),
                (None, _) => state.view = view,
            }
            Ok(Transition::new(state, vec![]))
        }
        Event::ImportPlans(plans) => {
            if state.active_workout.is_some() {
                return Err(StateError::WorkoutInProgress);
            }
            info!("replacing {} plans by {}", state.plans.len(), plans.len());
            state.plans = plans;
            state.view = View::Home;
            Ok(Transition::new(state, vec![Effect::PersistPlans]))
        }
        Event::ClearPlans => {
            // The workout history is kept.
            state.plans.clear();
            state.active_workout = None;
            if state.view == View::Workout {
                state.view = View::Home;
            }
            Ok(Transition::new(state, vec![Effect::PersistPlans]))
        }
        Event::StartWorkout {
            plan_id,
            start_time,
        } => {
            if state.active_workout.is_some() {
                return Err(StateError::WorkoutInProgress);
            }
            let plan = state
                .plan(&plan_id)
                .cloned()
                .ok_or(StateError::UnknownPlan(plan_id))?;
            state.active_workout = Some(WorkoutSession::with_start_time(plan, start_time));
            state.view = View::Workout;
            Ok(Transition::new(state, vec![]))
        }
        Event::UpdateSet {
            exercise_idx,
            set_idx,
            field,
        } => {
            state
                .active_workout
                .as_mut()
                .ok_or(StateError::NoActiveWorkout)?
                .update_set(exercise_idx, set_idx, field)?;
            Ok(Transition::new(state, vec![]))
        }
        Event::CompleteSet {
            exercise_idx,
            set_idx,
            time,
        } => {
            let progress = state
                .active_workout
                .as_mut()
                .ok_or(StateError::NoActiveWorkout)?
                .complete_set_at(exercise_idx, set_idx, time)?;
            let settle = progress.settle_delay().map(Effect::Settle);
            let mut effects = settle.into_iter().collect::<Vec<_>>();
            if let Progress::Finished(log) = progress {
                state.logs.push(log);
                state.active_workout = None;
                state.view = View::Stats;
                effects.push(Effect::PersistWorkoutLogs);
            }
            Ok(Transition::new(state, effects))
        }
        Event::CancelWorkout => {
            if state.active_workout.take().is_none() {
                return Err(StateError::NoActiveWorkout);
            }
            info!("cancelled workout");
            state.view = View::Home;
            Ok(Transition::new(state, vec![]))
        }
    }
}
