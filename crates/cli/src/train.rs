//! Interactive workout driven by line commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Utc;
use companion_app::{AppState, Event, Settings, StateError, View};
use companion_domain::{
    CompleteSetError, DayPlanID, ExerciseStatus, PlanService, SetFieldKind, SetPerformance,
    UpdateSetError, WorkoutLogService,
};

use crate::commands::dispatch;

const HELP: &str = "\
commands:
  done                          complete the next set
  set <field> <value> [<exercise> <set>]
                                change a value of the next or the given set
  show                          show the workout
  quit                          cancel the workout without saving";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Done,
    Set {
        field: SetFieldKind,
        value: f32,
        position: Option<(usize, usize)>,
    },
    Show,
    Help,
    Quit,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
enum CommandError {
    #[error("unknown command \"{0}\", type `help` for a list of commands")]
    Unknown(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid field \"{0}\"")]
    InvalidField(String),
    #[error("invalid value \"{0}\"")]
    InvalidValue(String),
    #[error("invalid position \"{0}\"")]
    InvalidPosition(String),
}

fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();

    let Some(command) = words.next() else {
        return Ok(None);
    };

    let command = match command {
        "done" | "d" => Command::Done,
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        "set" => {
            let field = words.next().ok_or(CommandError::MissingArgument("field"))?;
            let field = field
                .parse::<SetFieldKind>()
                .map_err(|_| CommandError::InvalidField(field.to_string()))?;
            let value = words.next().ok_or(CommandError::MissingArgument("value"))?;
            let value = value
                .replace(',', ".")
                .parse::<f32>()
                .map_err(|_| CommandError::InvalidValue(value.to_string()))?;
            let position = match (words.next(), words.next()) {
                (None, _) => None,
                (Some(_), None) => return Err(CommandError::MissingArgument("set")),
                (Some(exercise), Some(set)) => Some((position(exercise)?, position(set)?)),
            };
            Command::Set {
                field,
                value,
                position,
            }
        }
        _ => return Err(CommandError::Unknown(command.to_string())),
    };

    Ok(Some(command))
}

/// Convert a 1-based position into an index.
fn position(word: &str) -> Result<usize, CommandError> {
    word.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidPosition(word.to_string()))
}

pub fn run(
    state: &AppState,
    plan_id: DayPlanID,
    service: &(impl PlanService + WorkoutLogService),
    settings: &Settings,
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<AppState> {
    let mut state = dispatch(
        state,
        Event::StartWorkout {
            plan_id,
            start_time: Utc::now(),
        },
        service,
        settings,
    )?;
    show(&state, output)?;

    for line in input.lines() {
        let command = match parse_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };

        let Some(session) = &state.active_workout else {
            break;
        };

        let event = match command {
            Command::Show => {
                show(&state, output)?;
                continue;
            }
            Command::Help => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            Command::Quit => Event::CancelWorkout,
            Command::Done => {
                let Some((exercise_idx, set_idx)) = session.next_set() else {
                    continue;
                };
                Event::CompleteSet {
                    exercise_idx,
                    set_idx,
                    time: Utc::now(),
                }
            }
            Command::Set {
                field,
                value,
                position,
            } => {
                let Some((exercise_idx, set_idx)) = position.or_else(|| session.next_set())
                else {
                    continue;
                };
                Event::UpdateSet {
                    exercise_idx,
                    set_idx,
                    field: field.with_value(value),
                }
            }
        };

        match dispatch(&state, event, service, settings) {
            Ok(next) => state = next,
            Err(err) => match err.downcast::<StateError>() {
                Ok(err) => {
                    writeln!(output, "{}", rejection(&err))?;
                    continue;
                }
                Err(err) => return Err(err),
            },
        }

        if state.active_workout.is_some() {
            show(&state, output)?;
        } else {
            break;
        }
    }

    if state.active_workout.is_some() {
        state = dispatch(&state, Event::CancelWorkout, service, settings)?;
    }

    match (state.view, state.logs.last()) {
        (View::Stats, Some(log)) => writeln!(
            output,
            "Workout finished in {} min, {} sets, volume {:.0} kg.",
            log.duration_minutes(),
            log.completed_sets(),
            log.volume_load()
        )?,
        _ => writeln!(output, "Workout cancelled.")?,
    }

    Ok(state)
}

/// Describe a rejected event using the 1-based positions of the `set` command.
fn rejection(err: &StateError) -> String {
    match err {
        StateError::UpdateSet(err) => match *err {
            UpdateSetError::Finished => err.to_string(),
            UpdateSetError::ExerciseOutOfRange(exercise_idx) => {
                format!("no exercise {}", exercise_idx + 1)
            }
            UpdateSetError::SetOutOfRange {
                exercise_idx,
                set_idx,
            } => format!("no set {} in exercise {}", set_idx + 1, exercise_idx + 1),
            UpdateSetError::Completed {
                exercise_idx,
                set_idx,
            } => format!(
                "set {} of exercise {} is already completed",
                set_idx + 1,
                exercise_idx + 1
            ),
        },
        StateError::CompleteSet(err) => match *err {
            CompleteSetError::Finished => err.to_string(),
            CompleteSetError::ExerciseOutOfRange(exercise_idx) => {
                format!("no exercise {}", exercise_idx + 1)
            }
            CompleteSetError::SetOutOfRange {
                exercise_idx,
                set_idx,
            } => format!("no set {} in exercise {}", set_idx + 1, exercise_idx + 1),
            CompleteSetError::NotActive {
                exercise_idx,
                active_exercise_idx,
            } => format!(
                "exercise {} is not active, continue with exercise {}",
                exercise_idx + 1,
                active_exercise_idx + 1
            ),
            CompleteSetError::AlreadyCompleted {
                exercise_idx,
                set_idx,
            } => format!(
                "set {} of exercise {} is already completed",
                set_idx + 1,
                exercise_idx + 1
            ),
            CompleteSetError::PreviousSetIncomplete {
                exercise_idx,
                set_idx,
            } => format!(
                "set {} of exercise {} requires the previous set to be completed",
                set_idx + 1,
                exercise_idx + 1
            ),
        },
        _ => err.to_string(),
    }
}

fn show(state: &AppState, output: &mut impl Write) -> Result<()> {
    let Some(session) = &state.active_workout else {
        return Ok(());
    };
    let plan = session.plan();

    writeln!(output)?;
    writeln!(output, "{} ({})", plan.name, plan.duration)?;

    for (exercise_idx, exercise) in plan.exercises.iter().enumerate() {
        let status = session.exercise_status(exercise_idx);
        let marker = match status {
            ExerciseStatus::Past => "✓",
            ExerciseStatus::Active => ">",
            ExerciseStatus::Future => " ",
        };
        writeln!(
            output,
            "{marker} {}. {} ({} × {})",
            exercise_idx + 1,
            exercise.name,
            exercise.sets,
            exercise.reps
        )?;

        if status != ExerciseStatus::Active {
            continue;
        }

        if let Some(description) = &exercise.description {
            writeln!(output, "     {description}")?;
        }

        let fields = exercise.kind().editable_fields();
        for (set_idx, set) in session.sets(exercise_idx).unwrap_or_default().iter().enumerate() {
            let label = if set.completed {
                "done"
            } else if session.next_set() == Some((exercise_idx, set_idx)) {
                "next"
            } else {
                ""
            };
            writeln!(
                output,
                "     set {}: {}  {label}",
                set.set_number,
                format_fields(set, fields)
            )?;
        }
    }

    Ok(())
}

fn format_fields(set: &SetPerformance, fields: &[SetFieldKind]) -> String {
    if fields.is_empty() {
        return String::from("confirm with `done`");
    }

    fields
        .iter()
        .map(|field| match field_value(set, *field) {
            Some(value) => format!("{field} {value} {}", field.unit()),
            None => format!("{field} -"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_value(set: &SetPerformance, field: SetFieldKind) -> Option<f32> {
    match field {
        SetFieldKind::Weight => Some(set.weight),
        SetFieldKind::Reps => Some(set.reps),
        SetFieldKind::Cadence => set.cadence,
        SetFieldKind::Speed => set.speed,
        SetFieldKind::Distance => set.distance,
        SetFieldKind::HeartRate => set.heart_rate,
    }
}
