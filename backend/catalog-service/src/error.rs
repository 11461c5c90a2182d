/// Error types for the catalog service
///
/// Every handler failure ends up as exactly one `tonic::Status`. Errors are
/// logged when they are converted, so call sites just return them.
use crate::context::ContextError;
use crate::store::StoreError;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("request is canceled")]
    Canceled,

    #[error("deadline is exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Unknown(String),
}

impl CatalogError {
    /// Map a store failure, prefixing the message with what was attempted
    pub fn from_store(action: &str, err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) | StoreError::InvalidImageType(_) => {
                CatalogError::InvalidArgument(format!("{}: {}", action, err))
            }
            StoreError::AlreadyExists(_) => CatalogError::AlreadyExists(format!("{}: {}", action, err)),
            StoreError::Context(err) => err.into(),
            StoreError::Io(_) => CatalogError::Internal(format!("{}: {}", action, err)),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            CatalogError::InvalidArgument(_) => Code::InvalidArgument,
            CatalogError::AlreadyExists(_) => Code::AlreadyExists,
            CatalogError::NotFound(_) => Code::NotFound,
            CatalogError::Canceled => Code::Cancelled,
            CatalogError::DeadlineExceeded => Code::DeadlineExceeded,
            CatalogError::Internal(_) => Code::Internal,
            CatalogError::Unknown(_) => Code::Unknown,
        }
    }

    pub fn to_status(&self) -> Status {
        Status::new(self.code(), self.to_string())
    }
}

impl From<ContextError> for CatalogError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Canceled => CatalogError::Canceled,
            ContextError::DeadlineExceeded => CatalogError::DeadlineExceeded,
        }
    }
}

impl From<CatalogError> for Status {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::Internal(_) | CatalogError::Unknown(_) => error!(error = %err, "Request failed"),
            _ => warn!(error = %err, code = ?err.code(), "Request rejected"),
        }
        err.to_status()
    }
}
