use sea_orm::DbErr;
use thiserror::Error;

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Attaching a child under a parent that already sits at maximum depth.
    #[error("activity nesting depth cannot exceed {}", crate::taxonomy::MAX_DEPTH)]
    InvalidHierarchy,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}
