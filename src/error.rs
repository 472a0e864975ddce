//! Error types shared across the pipeline

use thiserror::Error;

/// Errors raised by table loading and request validation.
///
/// Degradable failures (model or corpus unavailable, malformed model output,
/// unknown intent from the model) never surface as errors; they are recovered
/// where they occur and only logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{owner} references unknown {kind} '{id}'")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        id: String,
    },

    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PipelineError::Validation(msg.into())
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Validation(_) | PipelineError::NotFound { .. }
        )
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
