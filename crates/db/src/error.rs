use careerfair_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules
/// inside a transaction (admission, lifecycle transitions).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain rule rejected the operation. The transaction was rolled back.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
