use crate::context::ContextError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("laptop ID is not a valid UUID: {0}")]
    InvalidId(String),

    #[error("a record with ID {0} already exists")]
    AlreadyExists(String),

    #[error("invalid image type: {0:?}")]
    InvalidImageType(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("cannot write image file: {0}")]
    Io(#[from] std::io::Error),
}
