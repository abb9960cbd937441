use log::{error, info};

use crate::{
    DayPlan,
    parser::{self, ImportError},
};

/// Source of plan text for a free-form training goal.
///
/// Implementations return text in the same format as a manual import,
/// starting with [`parser::PLAN_HEADER`].
pub trait PlanTextGenerator {
    fn generate(&self, goal: &str) -> Result<String, GeneratorError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("missing API key, configure the credentials of the plan generator")]
    MissingCredentials,
    #[error("no goal given")]
    EmptyGoal,
    #[error("generation failed: {0}")]
    Failed(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Generate plans for `goal` and parse them like a manual import.
pub fn generate_plans(
    generator: &impl PlanTextGenerator,
    goal: &str,
) -> Result<Vec<DayPlan>, GenerateError> {
    let goal = goal.trim();

    if goal.is_empty() {
        return Err(GeneratorError::EmptyGoal.into());
    }

    let text = generator.generate(goal).inspect_err(|err| {
        error!("failed to generate plans: {err}");
    })?;
    let plans = parser::import(text.trim())?;

    info!("generated {} plans", plans.len());

    Ok(plans)
}
