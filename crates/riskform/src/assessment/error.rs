use super::validation::ValidationError;
use std::path::PathBuf;

/// A definition that cannot be constructed as written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{rule} rule requires at least one of likelihood or consequence")]
    MissingScore { rule: &'static str },
    #[error("control effect on risk `{risk_id}` requires at least one of reduces_likelihood or reduces_consequence")]
    EmptyEffect { risk_id: String },
    #[error("{kind} question `{question_id}` requires at least one option")]
    MissingOptions {
        kind: &'static str,
        question_id: String,
    },
    #[error("{kind} question `{question_id}` does not take options")]
    UnexpectedOptions {
        kind: &'static str,
        question_id: String,
    },
}

/// Failure reading a form definition from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid form definition in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failure building a usable form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failure importing answers or exporting assessment results.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
