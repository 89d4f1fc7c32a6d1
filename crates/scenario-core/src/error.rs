use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Invariant violation: {}", .0.join("; "))]
    InvariantViolation(Vec<String>),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
