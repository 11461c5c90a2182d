use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Missing user or wrong password; deliberately indistinguishable
    #[error("Incorrect username/password")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid user seed: {0}")]
    InvalidSeed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Token error: {0}")]
    Token(#[from] grpc_jwt_auth::AuthError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            IdentityError::InvalidCredentials => {
                Status::new(Code::NotFound, "incorrect username/password")
            }
            IdentityError::UsernameAlreadyExists(_) => {
                Status::new(Code::AlreadyExists, "Username already exists")
            }
            IdentityError::InvalidUsername(msg) | IdentityError::InvalidSeed(msg) => {
                Status::new(Code::InvalidArgument, msg.clone())
            }
            IdentityError::Store(_) => Status::new(Code::Internal, "cannot find user"),
            IdentityError::Token(_) => Status::new(Code::Internal, "cannot generate access token"),
            IdentityError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

// gRPC Status conversion
impl From<IdentityError> for Status {
    fn from(err: IdentityError) -> Self {
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_is_not_found() {
        let status = IdentityError::InvalidCredentials.to_status();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "incorrect username/password");
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let status = IdentityError::Store("lock poisoned".to_string()).to_status();
        assert_eq!(status.code(), Code::Internal);
        assert!(!status.message().contains("poisoned"));
    }
}
