use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Description length {length} exceeds {max}")]
    DescriptionTooLong { length: usize, max: usize },
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    /// Raised on purpose for the reserved test description, see
    /// [`crate::service::FAILURE_HOOK_DESCRIPTION`].
    #[error("This is for testing the error handler")]
    FailureHook,
    #[error("Task has no id, only saved tasks can be exported")]
    MissingId,
    #[error("Task {0} not found")]
    NotFound(TaskId),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
