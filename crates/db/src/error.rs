use uptemplate_core::error::CoreError;

/// Error type for repository operations that can fail on a domain
/// invariant as well as on the database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
