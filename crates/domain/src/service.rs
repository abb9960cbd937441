use log::{debug, error, info};

use crate::{DayPlan, ReadError, WorkoutLog, WriteError};

pub trait PlanRepository {
    fn read_plans(&self) -> Result<Vec<DayPlan>, ReadError>;
    fn write_plans(&self, plans: &[DayPlan]) -> Result<(), WriteError>;
}

pub trait WorkoutLogRepository {
    fn read_workout_logs(&self) -> Result<Vec<WorkoutLog>, ReadError>;
    fn write_workout_logs(&self, logs: &[WorkoutLog]) -> Result<(), WriteError>;
}

pub trait PlanService {
    fn get_plans(&self) -> Result<Vec<DayPlan>, ReadError>;
    fn replace_plans(&self, plans: &[DayPlan]) -> Result<(), WriteError>;
}

pub trait WorkoutLogService {
    fn get_workout_logs(&self) -> Result<Vec<WorkoutLog>, ReadError>;
    fn replace_workout_logs(&self, logs: &[WorkoutLog]) -> Result<(), WriteError>;

    /// Append a finished workout to the history.
    fn add_workout_log(&self, log: WorkoutLog) -> Result<Vec<WorkoutLog>, WriteError> {
        let mut logs = self.get_workout_logs()?;
        logs.push(log);
        self.replace_workout_logs(&logs)?;
        Ok(logs)
    }
}

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R: PlanRepository> PlanService for Service<R> {
    fn get_plans(&self) -> Result<Vec<DayPlan>, ReadError> {
        let plans = log_on_error!(self.repository.read_plans(), "read", "plans")?;
        debug!("loaded {} plans", plans.len());
        Ok(plans)
    }

    fn replace_plans(&self, plans: &[DayPlan]) -> Result<(), WriteError> {
        log_on_error!(self.repository.write_plans(plans), "write", "plans")?;
        info!("stored {} plans", plans.len());
        Ok(())
    }
}

impl<R: WorkoutLogRepository> WorkoutLogService for Service<R> {
    fn get_workout_logs(&self) -> Result<Vec<WorkoutLog>, ReadError> {
        let logs = log_on_error!(self.repository.read_workout_logs(), "read", "workout logs")?;
        debug!("loaded {} workout logs", logs.len());
        Ok(logs)
    }

    fn replace_workout_logs(&self, logs: &[WorkoutLog]) -> Result<(), WriteError> {
        log_on_error!(
            self.repository.write_workout_logs(logs),
            "write",
            "workout logs"
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use crate::{StorageError, parser};

    use super::*;

    #[derive(Default)]
    struct FakeRepository {
        plans: RefCell<Vec<DayPlan>>,
        logs: RefCell<Vec<WorkoutLog>>,
        unavailable: bool,
    }

    impl PlanRepository for FakeRepository {
        fn read_plans(&self) -> Result<Vec<DayPlan>, ReadError> {
            if self.unavailable {
                return Err(StorageError::Unavailable("offline".into()).into());
            }
            Ok(self.plans.borrow().clone())
        }

        fn write_plans(&self, plans: &[DayPlan]) -> Result<(), WriteError> {
            if self.unavailable {
                return Err(StorageError::Unavailable("offline".into()).into());
            }
            *self.plans.borrow_mut() = plans.to_vec();
            Ok(())
        }
    }

    impl WorkoutLogRepository for FakeRepository {
        fn read_workout_logs(&self) -> Result<Vec<WorkoutLog>, ReadError> {
            if self.unavailable {
                return Err(StorageError::Unavailable("offline".into()).into());
            }
            Ok(self.logs.borrow().clone())
        }

        fn write_workout_logs(&self, logs: &[WorkoutLog]) -> Result<(), WriteError> {
            if self.unavailable {
                return Err(StorageError::Unavailable("offline".into()).into());
            }
            *self.logs.borrow_mut() = logs.to_vec();
            Ok(())
        }
    }

    fn workout_log(id: &str) -> WorkoutLog {
        WorkoutLog {
            id: id.into(),
            date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            day_plan_id: "a-0".into(),
            exercises: vec![],
            duration_seconds: 10.0,
            notes: None,
        }
    }

    #[test]
    fn test_plans() {
        let service = Service::new(FakeRepository::default());
        let plans = parser::parse(parser::SAMPLE_PLANS);

        assert!(service.get_plans().unwrap().is_empty());
        service.replace_plans(&plans).unwrap();
        assert_eq!(service.get_plans().unwrap(), plans);
        service.replace_plans(&[]).unwrap();
        assert!(service.repository().plans.borrow().is_empty());
    }

    #[test]
    fn test_add_workout_log() {
        let service = Service::new(FakeRepository::default());

        assert_eq!(service.add_workout_log(workout_log("1")).unwrap().len(), 1);
        assert_eq!(
            service.add_workout_log(workout_log("2")).unwrap(),
            vec![workout_log("1"), workout_log("2")]
        );
        assert_eq!(service.get_workout_logs().unwrap().len(), 2);
    }

    #[test]
    fn test_unavailable() {
        let service = Service::new(FakeRepository {
            unavailable: true,
            ..FakeRepository::default()
        });

        assert!(matches!(
            service.get_plans(),
            Err(ReadError::Storage(StorageError::Unavailable(_)))
        ));
        assert!(matches!(
            service.replace_plans(&[]),
            Err(WriteError::Storage(StorageError::Unavailable(_)))
        ));
        assert!(matches!(
            service.add_workout_log(workout_log("1")),
            Err(WriteError::Storage(StorageError::Unavailable(_)))
        ));
    }
}
