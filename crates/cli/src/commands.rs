use std::{io::Write, thread};

use anyhow::{Result, anyhow};
use chrono::Local;
use companion_app::{
    AppState, Effect, Event, LogLevel, Settings, SettingsService, Transition, log, update,
};
use companion_domain::{
    PlanService, WorkoutLogService, parser,
    statistics::{self, RECENT_WORKOUTS},
};

pub fn load(service: &(impl PlanService + WorkoutLogService)) -> Result<AppState> {
    Ok(AppState::new(
        service.get_plans()?,
        service.get_workout_logs()?,
    ))
}

/// Apply `event` and carry out the resulting effects.
pub fn dispatch(
    state: &AppState,
    event: Event,
    service: &(impl PlanService + WorkoutLogService),
    settings: &Settings,
) -> Result<AppState> {
    let Transition { state, effects } = update(state, event)?;

    for effect in effects {
        match effect {
            Effect::PersistPlans => service.replace_plans(&state.plans)?,
            Effect::PersistWorkoutLogs => service.replace_workout_logs(&state.logs)?,
            Effect::Settle(delay) => {
                if settings.settle_delays {
                    thread::sleep(delay);
                }
            }
        }
    }

    Ok(state)
}

pub fn import(
    service: &(impl PlanService + WorkoutLogService),
    settings: &Settings,
    text: &str,
    output: &mut impl Write,
) -> Result<()> {
    let plans = parser::import(text)?;
    let state = dispatch(&load(service)?, Event::ImportPlans(plans), service, settings)?;

    writeln!(output, "Imported {} plans.", state.plans.len())?;
    write_plans(&state, output)
}

pub fn plans(
    service: &(impl PlanService + WorkoutLogService),
    output: &mut impl Write,
) -> Result<()> {
    let state = load(service)?;

    if state.plans.is_empty() {
        writeln!(output, "No plans. Use `import` or `sample` to add some.")?;
        return Ok(());
    }

    write_plans(&state, output)
}

fn write_plans(state: &AppState, output: &mut impl Write) -> Result<()> {
    for plan in &state.plans {
        writeln!(
            output,
            "{}  {} ({})  {} exercises, {} sets{}",
            plan.id,
            plan.name,
            plan.duration,
            plan.exercises.len(),
            plan.num_sets(),
            if plan.is_bike() { "  [bike]" } else { "" }
        )?;
    }
    Ok(())
}

pub fn stats(service: &impl WorkoutLogService, output: &mut impl Write) -> Result<()> {
    let logs = service.get_workout_logs()?;
    let summary = statistics::summary(&logs);

    let Some(last_date) = summary.last_date else {
        writeln!(output, "No workouts yet.")?;
        return Ok(());
    };

    writeln!(output, "Sessions: {}", summary.sessions)?;
    writeln!(
        output,
        "Last workout: {}",
        last_date.with_timezone(&Local).format("%Y-%m-%d")
    )?;
    writeln!(output)?;
    writeln!(output, "{:<16} {:>10} {:>8}", "date", "volume", "duration")?;
    for point in statistics::recent_volume(&logs, RECENT_WORKOUTS) {
        writeln!(
            output,
            "{:<16} {:>7.0} kg {:>4} min",
            point.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            point.volume,
            point.duration_minutes
        )?;
    }

    Ok(())
}

pub fn clear(
    service: &(impl PlanService + WorkoutLogService),
    settings: &Settings,
    output: &mut impl Write,
) -> Result<()> {
    let state = dispatch(&load(service)?, Event::ClearPlans, service, settings)?;

    writeln!(
        output,
        "Removed all plans. {} workouts remain in the history.",
        state.logs.len()
    )?;
    Ok(())
}

pub fn log_entries(service: &impl log::Service, output: &mut impl Write) -> Result<()> {
    for entry in service.get_log_entries()?.iter().rev() {
        writeln!(output, "{} {:<5} {}", entry.time, entry.level, entry.message)?;
    }
    Ok(())
}

pub fn settings(
    service: &impl SettingsService,
    settle_delays: Option<bool>,
    log_level: Option<LogLevel>,
    output: &mut impl Write,
) -> Result<()> {
    let mut settings = service.get_settings().map_err(|err| anyhow!(err))?;

    if settle_delays.is_some() || log_level.is_some() {
        settings.settle_delays = settle_delays.unwrap_or(settings.settle_delays);
        settings.log_level = log_level.unwrap_or(settings.log_level);
        service
            .set_settings(settings)
            .map_err(|err| anyhow!(err))?;
    }

    writeln!(output, "settle delays: {}", settings.settle_delays)?;
    writeln!(output, "log level: {}", settings.log_level)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use companion_app::View;
    use companion_domain::{ImportError, Service, parser::SAMPLE_PLANS};
    use companion_storage::{LocalStorage, MemoryBackend};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::train::tests::finish_bike_workout;

    use super::*;

    type TestService = Service<LocalStorage<MemoryBackend>>;

    #[fixture]
    fn service() -> TestService {
        Service::new(LocalStorage::new(MemoryBackend::new()))
    }

    fn no_delays() -> Settings {
        Settings {
            settle_delays: false,
            ..Settings::default()
        }
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    fn test_import(service: TestService) {
        let text = output(|o| import(&service, &no_delays(), SAMPLE_PLANS, o));

        assert!(text.starts_with("Imported 3 plans.\n"));
        assert!(text.contains("musculation-1-1  Musculation 1"));
        assert!(text.contains("[bike]"));
        assert_eq!(service.get_plans().unwrap().len(), 3);
    }

    #[rstest]
    fn test_import_empty(service: TestService) {
        let err = import(&service, &no_delays(), "  \n", &mut Vec::new()).unwrap_err();

        assert_eq!(err.downcast_ref::<ImportError>(), Some(&ImportError::Empty));
        assert_eq!(service.get_plans().unwrap(), vec![]);
    }

    #[rstest]
    fn test_plans(service: TestService) {
        assert_eq!(
            output(|o| plans(&service, o)),
            "No plans. Use `import` or `sample` to add some.\n"
        );

        import(&service, &no_delays(), SAMPLE_PLANS, &mut Vec::new()).unwrap();

        assert_eq!(output(|o| plans(&service, o)).lines().count(), 3);
    }

    #[rstest]
    fn test_dispatch_persists(service: TestService) {
        let plans = parser::parse(SAMPLE_PLANS);
        let state = dispatch(
            &AppState::default(),
            Event::ImportPlans(plans.clone()),
            &service,
            &no_delays(),
        )
        .unwrap();

        assert_eq!(state.view, View::Home);
        assert_eq!(service.get_plans().unwrap(), plans);
    }

    #[rstest]
    fn test_dispatch_rejected(service: TestService) {
        let err = dispatch(
            &AppState::default(),
            Event::CancelWorkout,
            &service,
            &no_delays(),
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<companion_app::StateError>(),
            Some(&companion_app::StateError::NoActiveWorkout)
        );
    }

    #[rstest]
    fn test_clear_keeps_history(service: TestService) {
        import(&service, &no_delays(), SAMPLE_PLANS, &mut Vec::new()).unwrap();
        finish_bike_workout(&service);

        let text = output(|o| clear(&service, &no_delays(), o));

        assert_eq!(
            text,
            "Removed all plans. 1 workouts remain in the history.\n"
        );
        assert_eq!(service.get_plans().unwrap(), vec![]);
        assert_eq!(service.get_workout_logs().unwrap().len(), 1);
    }

    #[rstest]
    fn test_stats(service: TestService) {
        assert_eq!(output(|o| stats(&service, o)), "No workouts yet.\n");

        import(&service, &no_delays(), SAMPLE_PLANS, &mut Vec::new()).unwrap();
        finish_bike_workout(&service);
        finish_bike_workout(&service);

        let text = output(|o| stats(&service, o));

        assert!(text.starts_with("Sessions: 2\nLast workout: "));
        assert_eq!(text.lines().filter(|l| l.ends_with(" min")).count(), 2);
    }

    #[test]
    fn test_settings() {
        let service = companion_app::Service::new(LocalStorage::new(MemoryBackend::new()));

        assert_eq!(
            output(|o| settings(&service, None, None, o)),
            "settle delays: true\nlog level: info\n"
        );
        assert_eq!(
            output(|o| settings(&service, Some(false), None, o)),
            "settle delays: false\nlog level: info\n"
        );
        assert_eq!(
            output(|o| settings(&service, None, Some(LogLevel::Warn), o)),
            "settle delays: false\nlog level: warn\n"
        );
    }

    #[test]
    fn test_log_entries() {
        use companion_app::log::Repository;

        let repository = companion_storage::Log::new(MemoryBackend::new());
        for message in ["first", "second"] {
            repository
                .write_entry(log::Entry {
                    time: String::from("Jan 01 10:00:00"),
                    level: ::log::Level::Warn,
                    message: message.to_string(),
                })
                .unwrap();
        }
        let service = companion_app::Service::new(repository);

        assert_eq!(
            output(|o| log_entries(&service, o)),
            "Jan 01 10:00:00 WARN  first\nJan 01 10:00:00 WARN  second\n"
        );
    }
}
