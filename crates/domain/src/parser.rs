//! Parsing of workout programs given as comma-separated rows.
//!
//! Each row describes one [`DayPlan`] using a fixed positional layout (see
//! [`PLAN_HEADER`]). The detail columns are free French text from which the
//! number of sets, the reps or duration and the cadence are inferred.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::{DayPlan, DayPlanID, Exercise, ExerciseCategory, ExerciseMode};

pub const PLAN_HEADER: &str = "Type,Durée,Echauffement,Exercices échauffement,Exercice 1,Série Ex 1,Exercice 2,Série Ex 2,Exercice 3,Série Ex 3,Exercice 4,Série Ex 4,Exercice 5,Série Ex 5,Exercice 6,Série Ex 6,Abdominaux";

pub const SAMPLE_PLANS: &str = "Type,Durée,Echauffement,Exercices échauffement,Exercice 1,Série Ex 1,Exercice 2,Série Ex 2,Exercice 3,Série Ex 3,Exercice 4,Série Ex 4,Exercice 5,Série Ex 5,Exercice 6,Série Ex 6,Abdominaux
Musculation 1,1h15,Echauffement,Rameur 10min + Mobilisations articulaires,Développé Couché,3 séries de 10 répétitions (1min récup),Squat,3 séries de 10 répétitions (1m30 récup),Tirage Poitrine,3 séries de 12 répétitions (1min récup),Développé Militaire,3 séries de 10 répétitions (1min récup),Leg Extension,3 séries de 15 répétitions,Curl Biceps,3 séries de 12 répétitions,Gainage face + côtés (3 tours)
Hometrainer Force,50min,Echauffement,10min souple à 90rpm,Force sous-max,4 séries de 5min à 60rpm,Vélocité,4 séries de 2min à 110rpm,,,,,,,,,Abdos crunchs 3x20
Vélo Route,1h30,Echauffement,20min progressif,Endurance,1h à 140bpm,,,,,,,,,,,Etirements";

const MIN_FIELDS: usize = 5;
const NUM_EXERCISE_SLOTS: usize = 6;

const DURATION_FIELD: usize = 1;
const WARMUP_FIELD: usize = 3;
const FIRST_EXERCISE_FIELD: usize = 4;
const ABS_FIELD: usize = 16;

const DEFAULT_DURATION: &str = "1h";
const DEFAULT_WARMUP: &str = "Aucun échauffement précisé";
const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "10";

const WARMUP_NAME: &str = "Échauffement";
const ABS_NAME: &str = "Abdominaux";
const BIKE_WARMUP_MINUTES: u32 = 10;

static BIKE_PLAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)vélo|velo|bike|hometrainer|home-trainer|cycling|cyclisme").unwrap()
});
static SETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:séries|série|series|serie)").unwrap());
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:minutes|min)").unwrap());
static REPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:-[0-9]+)?)\s*(?:répétition|repetition|rep)").unwrap()
});
static CADENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*rpm").unwrap());

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("no data to import")]
    Empty,
    #[error("no workout plan found, check the format")]
    NoPlans,
}

/// Parse all rows of `text` into plans.
///
/// Rows with fewer than five fields are skipped, so malformed input yields a
/// shorter or empty result instead of an error.
#[must_use]
pub fn parse(text: &str) -> Vec<DayPlan> {
    let lines = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();

    let start = match lines.first() {
        Some(first) if is_header(first) => 1,
        _ => 0,
    };

    lines
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(idx, line)| {
            let plan = parse_row(idx, line);
            if plan.is_none() {
                debug!("skipped malformed row {idx}");
            }
            plan
        })
        .collect()
}

/// Parse `text` and fail if nothing usable was found.
pub fn import(text: &str) -> Result<Vec<DayPlan>, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let plans = parse(text);

    if plans.is_empty() {
        return Err(ImportError::NoPlans);
    }

    info!("imported {} plans", plans.len());

    Ok(plans)
}

fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .is_some_and(|field| clean_field(field).to_lowercase().contains("type"))
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.trim()
}

fn parse_row(idx: usize, line: &str) -> Option<DayPlan> {
    let fields = line.split(',').map(clean_field).collect::<Vec<_>>();

    if fields.len() < MIN_FIELDS {
        return None;
    }

    let field = |i: usize| fields.get(i).copied().unwrap_or_default();
    let or_default = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    let name = or_default(field(0), &format!("Programme {idx}"));
    let duration = or_default(field(DURATION_FIELD), DEFAULT_DURATION);
    let warmup = or_default(field(WARMUP_FIELD), DEFAULT_WARMUP);
    let abs = field(ABS_FIELD);

    let mode = if is_bike_plan(&name) {
        ExerciseMode::Bike
    } else {
        ExerciseMode::Standard
    };
    let id = plan_id(&name, idx);

    let mut exercises = vec![warmup_exercise(&id, mode, warmup)];

    for slot in 0..NUM_EXERCISE_SLOTS {
        let exercise_name = field(FIRST_EXERCISE_FIELD + 2 * slot);
        if exercise_name.is_empty() {
            continue;
        }
        let details = field(FIRST_EXERCISE_FIELD + 2 * slot + 1);
        exercises.push(strength_exercise(&id, slot, mode, exercise_name, details));
    }

    if !abs.is_empty() {
        exercises.push(abs_exercise(&id, abs));
    }

    Some(DayPlan {
        id,
        name,
        duration,
        exercises,
    })
}

#[must_use]
pub fn is_bike_plan(name: &str) -> bool {
    BIKE_PLAN.is_match(name)
}

fn plan_id(name: &str, idx: usize) -> DayPlanID {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}-{idx}").into()
}

fn warmup_exercise(plan_id: &DayPlanID, mode: ExerciseMode, details: String) -> Exercise {
    let bike = mode == ExerciseMode::Bike;
    Exercise {
        id: format!("{plan_id}-warmup").into(),
        name: WARMUP_NAME.to_string(),
        category: ExerciseCategory::Warmup,
        mode,
        sets: 1,
        reps: if bike {
            format!("{BIKE_WARMUP_MINUTES}min")
        } else {
            String::from("0")
        },
        target_cadence: if bike { cadence(&details) } else { None },
        target_duration: bike.then(|| BIKE_WARMUP_MINUTES.to_string()),
        description: Some(details),
    }
}

fn strength_exercise(
    plan_id: &DayPlanID,
    slot: usize,
    mode: ExerciseMode,
    name: &str,
    details: &str,
) -> Exercise {
    let bike = mode == ExerciseMode::Bike;
    Exercise {
        id: format!("{plan_id}-ex-{}", slot + 1).into(),
        name: name.to_string(),
        category: ExerciseCategory::Strength,
        mode,
        // Bike intervals are logged as one aggregate entry whatever the text says.
        sets: if bike { 1 } else { set_count(details) },
        reps: reps(details),
        target_cadence: if bike { cadence(details) } else { None },
        target_duration: None,
        description: Some(details.to_string()),
    }
}

fn abs_exercise(plan_id: &DayPlanID, details: &str) -> Exercise {
    Exercise {
        id: format!("{plan_id}-abs").into(),
        name: ABS_NAME.to_string(),
        category: ExerciseCategory::Abs,
        mode: ExerciseMode::Standard,
        sets: 1,
        reps: String::from("Max"),
        target_cadence: None,
        target_duration: None,
        description: Some(details.to_string()),
    }
}

fn capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn set_count(details: &str) -> u32 {
    capture(&SETS, details)
        .and_then(|sets| sets.parse::<u32>().ok())
        .filter(|sets| *sets > 0)
        .unwrap_or(DEFAULT_SETS)
}

fn reps(details: &str) -> String {
    if let Some(minutes) = capture(&MINUTES, details) {
        return format!("{minutes}min");
    }
    capture(&REPS, details).map_or_else(|| DEFAULT_REPS.to_string(), str::to_string)
}

fn cadence(details: &str) -> Option<String> {
    capture(&CADENCE, details).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn row(fields: &[&str]) -> String {
        let mut fields = fields.iter().map(ToString::to_string).collect::<Vec<_>>();
        fields.resize(17, String::new());
        fields.join(",")
    }

    #[test]
    fn test_parse_sample() {
        let plans = parse(SAMPLE_PLANS);

        assert_eq!(
            plans
                .iter()
                .map(|p| (p.name.as_str(), p.exercises.len()))
                .collect::<Vec<_>>(),
            vec![
                ("Musculation 1", 8),
                ("Hometrainer Force", 4),
                ("Vélo Route", 3)
            ]
        );
        assert_eq!(
            plans.iter().map(|p| p.id.to_string()).collect::<Vec<_>>(),
            vec!["musculation-1-1", "hometrainer-force-2", "vélo-route-3"]
        );
    }

    #[test]
    fn test_parse_sample_standard_plan() {
        let plan = &parse(SAMPLE_PLANS)[0];

        assert_eq!(plan.duration, "1h15");
        assert_eq!(
            plan.exercises[0],
            Exercise {
                id: "musculation-1-1-warmup".into(),
                name: String::from("Échauffement"),
                category: ExerciseCategory::Warmup,
                mode: ExerciseMode::Standard,
                sets: 1,
                reps: String::from("0"),
                target_cadence: None,
                target_duration: None,
                description: Some(String::from("Rameur 10min + Mobilisations articulaires")),
            }
        );
        assert_eq!(
            plan.exercises
                .iter()
                .map(|e| (e.id.to_string(), e.sets, e.reps.as_str()))
                .collect::<Vec<_>>(),
            vec![
                (String::from("musculation-1-1-warmup"), 1, "0"),
                (String::from("musculation-1-1-ex-1"), 3, "1min"),
                (String::from("musculation-1-1-ex-2"), 3, "10"),
                (String::from("musculation-1-1-ex-3"), 3, "1min"),
                (String::from("musculation-1-1-ex-4"), 3, "1min"),
                (String::from("musculation-1-1-ex-5"), 3, "15"),
                (String::from("musculation-1-1-ex-6"), 3, "12"),
                (String::from("musculation-1-1-abs"), 1, "Max"),
            ]
        );
        assert!(
            plan.exercises
                .iter()
                .all(|e| e.mode == ExerciseMode::Standard && e.target_cadence.is_none())
        );
    }

    #[test]
    fn test_parse_sample_bike_plan() {
        let plan = &parse(SAMPLE_PLANS)[1];

        assert_eq!(
            plan.exercises[0],
            Exercise {
                id: "hometrainer-force-2-warmup".into(),
                name: String::from("Échauffement"),
                category: ExerciseCategory::Warmup,
                mode: ExerciseMode::Bike,
                sets: 1,
                reps: String::from("10min"),
                target_cadence: Some(String::from("90")),
                target_duration: Some(String::from("10")),
                description: Some(String::from("10min souple à 90rpm")),
            }
        );
        assert_eq!(
            plan.exercises[1],
            Exercise {
                id: "hometrainer-force-2-ex-1".into(),
                name: String::from("Force sous-max"),
                category: ExerciseCategory::Strength,
                mode: ExerciseMode::Bike,
                sets: 1,
                reps: String::from("5min"),
                target_cadence: Some(String::from("60")),
                target_duration: None,
                description: Some(String::from("4 séries de 5min à 60rpm")),
            }
        );
        assert_eq!(plan.exercises[2].reps, "2min");
        assert_eq!(plan.exercises[2].target_cadence, Some(String::from("110")));
        assert_eq!(
            plan.exercises[3],
            Exercise {
                id: "hometrainer-force-2-abs".into(),
                name: String::from("Abdominaux"),
                category: ExerciseCategory::Abs,
                mode: ExerciseMode::Standard,
                sets: 1,
                reps: String::from("Max"),
                target_cadence: None,
                target_duration: None,
                description: Some(String::from("Abdos crunchs 3x20")),
            }
        );
    }

    #[test]
    fn test_parse_sample_bike_plan_without_cadence() {
        let plan = &parse(SAMPLE_PLANS)[2];

        assert_eq!(plan.exercises[0].target_cadence, None);
        assert_eq!(plan.exercises[0].target_duration, Some(String::from("10")));
        assert_eq!(plan.exercises[1].reps, "10");
        assert_eq!(plan.exercises[1].sets, 1);
        assert_eq!(plan.exercises[1].target_cadence, None);
    }

    #[rstest]
    #[case::header("Type,Durée,a,b,c\nA,1h,,w,Squat,3 séries", vec!["a-1"])]
    #[case::quoted_header("\"TYPE\",Durée,a,b,c\nA,1h,,w,Squat", vec!["a-1"])]
    #[case::no_header("A,1h,,w,Squat\nB,1h,,w,Squat", vec!["a-0", "b-1"])]
    #[case::blank_lines("\n\nA,1h,,w,Squat\n   \nB,1h,,w,Squat\n", vec!["a-0", "b-1"])]
    #[case::crlf("A,1h,,w,Squat\r\nB,1h,,w,Squat\r\n", vec!["a-0", "b-1"])]
    #[case::short_row("A,1h,,w\nB,1h,,w,Squat", vec!["b-1"])]
    #[case::empty("", vec![])]
    fn test_parse_rows(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(
            parse(text)
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_parse_duplicate_names() {
        let text = [row(&["Jambes", "1h"]), row(&["Jambes", "1h"])].join("\n");
        let plans = parse(&text);

        assert_eq!(plans.len(), 2);
        assert_ne!(plans[0].id, plans[1].id);
    }

    #[test]
    fn test_parse_defaults() {
        let plans = parse(&row(&["", "", "", "", "", "", "Squat"]));

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Programme 0");
        assert_eq!(plans[0].id.to_string(), "programme-0-0");
        assert_eq!(plans[0].duration, "1h");
        assert_eq!(
            plans[0].exercises[0].description,
            Some(String::from("Aucun échauffement précisé"))
        );
        assert_eq!(plans[0].exercises.len(), 2);
        assert_eq!(plans[0].exercises[1].id.to_string(), "programme-0-0-ex-2");
        assert_eq!(plans[0].exercises[1].sets, 3);
        assert_eq!(plans[0].exercises[1].reps, "10");
        assert_eq!(plans[0].exercises[1].description, Some(String::new()));
    }

    #[test]
    fn test_parse_warmup_only() {
        let plans = parse("Repos,30min,Echauffement,Marche");

        assert!(plans.is_empty());

        let plans = parse("Repos,30min,Echauffement,Marche,");

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].exercises.len(), 1);
        assert_eq!(plans[0].exercises[0].category, ExerciseCategory::Warmup);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let plans = parse(&row(&[
            "\"Haut du corps\"",
            "\"45min\"",
            "",
            "\"Rameur\"",
            "\" Curl \"",
            "\"4 séries de 8 reps\"",
        ]));

        assert_eq!(plans[0].name, "Haut du corps");
        assert_eq!(plans[0].duration, "45min");
        assert_eq!(plans[0].exercises[1].name, "Curl");
        assert_eq!(plans[0].exercises[1].sets, 4);
        assert_eq!(plans[0].exercises[1].reps, "8");
    }

    #[test]
    fn test_parse_exercise_count() {
        let plans = parse(&row(&[
            "Full", "1h", "", "w", "A", "", "", "", "C", "", "", "", "", "", "F", "", "gainage",
        ]));

        assert_eq!(
            plans[0]
                .exercises
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>(),
            vec!["full-0-warmup", "full-0-ex-1", "full-0-ex-3", "full-0-ex-6", "full-0-abs"]
        );
    }

    #[test]
    fn test_parse_bike_sets_ignore_description() {
        let plans = parse(&row(&[
            "Hometrainer",
            "1h",
            "",
            "",
            "Intervalles",
            "4 séries de 5min à 60rpm",
        ]));

        assert_eq!(plans[0].exercises[1].sets, 1);
        assert_eq!(plans[0].exercises[1].mode, ExerciseMode::Bike);
    }

    #[test]
    fn test_parse_bike_abs_is_standard() {
        let plans = parse(&row(&[
            "Cycling", "1h", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "Crunchs",
        ]));

        let abs = plans[0].exercises.last().unwrap();
        assert_eq!(abs.category, ExerciseCategory::Abs);
        assert_eq!(abs.mode, ExerciseMode::Standard);
        assert_eq!(abs.sets, 1);
        assert_eq!(abs.reps, "Max");
    }

    #[rstest]
    #[case("Vélo Route", true)]
    #[case("VELO", true)]
    #[case("Home-Trainer Force", true)]
    #[case("hometrainer", true)]
    #[case("Cyclisme", true)]
    #[case("Indoor cycling", true)]
    #[case("Bike sprint", true)]
    #[case("Musculation", false)]
    #[case("Course à pied", false)]
    fn test_is_bike_plan(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_bike_plan(name), expected);
    }

    #[rstest]
    #[case("3 séries de 10 répétitions", 3)]
    #[case("5 Series", 5)]
    #[case("4serie", 4)]
    #[case("0 séries", 3)]
    #[case("10 répétitions", 3)]
    #[case("", 3)]
    fn test_set_count(#[case] details: &str, #[case] expected: u32) {
        assert_eq!(set_count(details), expected);
    }

    #[rstest]
    #[case("3 séries de 10 répétitions", "10")]
    #[case("3 séries de 8-12 reps", "8-12")]
    #[case("3 séries de 12 repetitions", "12")]
    #[case("20 minutes à allure modérée", "20min")]
    #[case("4 séries de 5 MIN", "5min")]
    #[case("3 séries de 10 répétitions (1min récup)", "1min")]
    #[case("3 séries de 10 répétitions (1m30 récup)", "10")]
    #[case("1h à 140bpm", "10")]
    #[case("", "10")]
    fn test_reps(#[case] details: &str, #[case] expected: &str) {
        assert_eq!(reps(details), expected);
    }

    #[rstest]
    #[case("10min souple à 90rpm", Some("90"))]
    #[case("4 séries de 2min à 110 RPM", Some("110"))]
    #[case("20min progressif", None)]
    fn test_cadence(#[case] details: &str, #[case] expected: Option<&str>) {
        assert_eq!(cadence(details), expected.map(str::to_string));
    }

    #[rstest]
    #[case("", Err(ImportError::Empty))]
    #[case("  \n ", Err(ImportError::Empty))]
    #[case("a,b,c", Err(ImportError::NoPlans))]
    #[case(PLAN_HEADER, Err(ImportError::NoPlans))]
    fn test_import_errors(#[case] text: &str, #[case] expected: Result<Vec<DayPlan>, ImportError>) {
        assert_eq!(import(text), expected);
    }

    #[test]
    fn test_import() {
        assert_eq!(import(SAMPLE_PLANS).map(|plans| plans.len()), Ok(3));
    }
}
