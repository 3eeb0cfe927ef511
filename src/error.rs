//! Error types for checked runs.

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Error returned by [`EnrollmentEngine::try_run`](crate::scheduler::EnrollmentEngine::try_run)
/// and [`EnrollmentEngine::assign`](crate::scheduler::EnrollmentEngine::assign).
///
/// Infeasibility is never an error: unserved demand shows up in the
/// plan's metrics instead.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog or pre-built groups failed validation.
    #[error("Invalid input: {} problem(s), first: {}", .0.len(), first_message(.0))]
    Invalid(Vec<ValidationError>),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map_or("none", |e| e.message.as_str())
}
