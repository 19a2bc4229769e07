use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Validation error: {0}")]
    ValidationError(anyhow::Error),

    #[error("Invalid lifecycle transition: {0}")]
    InvalidTransition(anyhow::Error),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Export error: {0}")]
    ExportError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ExportError(anyhow::Error::new(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ExportError(anyhow::Error::new(err))
    }
}
