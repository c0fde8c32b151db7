use thiserror::Error;

/// Errors raised by the query operations. All of them are caller errors.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    #[error("Parameter '{field}' must be a valid number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Clinic dataset is not available")]
    DatasetUnavailable,
}

/// Errors raised while reading the clinic dataset file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Failure inside an external department classifier
#[derive(Debug, Error)]
#[error("Department classification failed: {0}")]
pub struct ClassifyError(pub String);
