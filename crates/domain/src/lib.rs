#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod generator;
pub mod parser;
pub mod plan;
pub mod service;
pub mod statistics;
pub mod workout_log;
pub mod workout_session;

pub use error::{ReadError, StorageError, WriteError};
pub use generator::{GenerateError, GeneratorError, PlanTextGenerator, generate_plans};
pub use parser::ImportError;
pub use plan::{DayPlan, DayPlanID, Exercise, ExerciseCategory, ExerciseID, ExerciseKind, ExerciseMode};
pub use service::{
    PlanRepository, PlanService, Service, WorkoutLogRepository, WorkoutLogService,
};
pub use statistics::{Summary, VolumePoint};
pub use workout_log::{ExerciseLog, SetPerformance, WorkoutLog, WorkoutLogID};
pub use workout_session::{
    CompleteSetError, ExerciseStatus, Progress, SetField, SetFieldKind, UpdateSetError,
    WorkoutSession,
};
