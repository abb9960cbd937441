use std::collections::VecDeque;

use companion_app::{Settings, SettingsRepository, log};
use companion_domain::{
    DayPlan, PlanRepository, ReadError, StorageError, WorkoutLog, WorkoutLogRepository, WriteError,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Backend, dto};

const KEY_PLANS: &str = "companion_plans";
const KEY_LOGS: &str = "companion_logs";
const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

/// Plans, workout logs and settings kept as JSON documents in a [`Backend`].
pub struct LocalStorage<B> {
    backend: B,
}

impl<B: Backend> LocalStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(value) = self
            .backend
            .get(key)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?
        else {
            return Ok(None);
        };
        serde_json::from_str(&value)
            .map(Some)
            .map_err(|err| StorageError::Corrupt {
                key: key.to_string(),
                reason: err.to_string(),
            })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = serde_json::to_string(value).map_err(|err| StorageError::Corrupt {
            key: key.to_string(),
            reason: err.to_string(),
        })?;
        self.backend
            .set(key, value)
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }
}

impl<B: Backend> PlanRepository for LocalStorage<B> {
    fn read_plans(&self) -> Result<Vec<DayPlan>, ReadError> {
        Ok(self
            .read::<Vec<dto::DayPlan>>(KEY_PLANS)?
            .unwrap_or_default()
            .into_iter()
            .map(DayPlan::from)
            .collect())
    }

    fn write_plans(&self, plans: &[DayPlan]) -> Result<(), WriteError> {
        let plans = plans.iter().map(dto::DayPlan::from).collect::<Vec<_>>();
        Ok(self.write(KEY_PLANS, &plans)?)
    }
}

impl<B: Backend> WorkoutLogRepository for LocalStorage<B> {
    fn read_workout_logs(&self) -> Result<Vec<WorkoutLog>, ReadError> {
        self.read::<Vec<dto::WorkoutLog>>(KEY_LOGS)?
            .unwrap_or_default()
            .into_iter()
            .map(|log| {
                WorkoutLog::try_from(log).map_err(|err| {
                    ReadError::Storage(StorageError::Corrupt {
                        key: KEY_LOGS.to_string(),
                        reason: err.to_string(),
                    })
                })
            })
            .collect()
    }

    fn write_workout_logs(&self, logs: &[WorkoutLog]) -> Result<(), WriteError> {
        let logs = logs.iter().map(dto::WorkoutLog::from).collect::<Vec<_>>();
        Ok(self.write(KEY_LOGS, &logs)?)
    }
}

impl<B: Backend> SettingsRepository for LocalStorage<B> {
    fn read_settings(&self) -> Result<Settings, String> {
        self.read(KEY_SETTINGS)
            .map(Option::unwrap_or_default)
            .map_err(|err| err.to_string())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), String> {
        self.write(KEY_SETTINGS, &settings)
            .map_err(|err| err.to_string())
    }
}

/// Application log entries, newest first.
pub struct Log<B> {
    backend: B,
}

impl<B: Backend> Log<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: Backend> log::Repository for Log<B> {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match self.backend.get(KEY_LOG) {
            Ok(Some(entries)) => serde_json::from_str(&entries).map_err(|err| err.to_string()),
            Ok(None) => Ok(VecDeque::new()),
            Err(err) => Err(err.to_string()),
        }
        .map_err(log::Error::Unknown)
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        let entries =
            serde_json::to_string(&entries).map_err(|err| log::Error::Unknown(err.to_string()))?;
        self.backend
            .set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
