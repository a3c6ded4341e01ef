use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed priority token: {0}")]
    MalformedPriorityToken(String),

    /// The student has not completed the preceding round at this stall.
    /// Not retryable until that interview is completed.
    #[error("Round gate violation: round {required_round} must be completed first")]
    RoundGateViolation { required_round: u8 },

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Internal error: {0}")]
    Internal(String),
}
