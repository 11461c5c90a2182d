use crate::claims::Role;
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid authorization format")]
    MalformedHeader,

    #[error("Token validation failed: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Role {role} is not allowed to call {method}")]
    PermissionDenied { role: Role, method: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid access policy: {0}")]
    InvalidPolicy(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            AuthError::MissingToken | AuthError::MalformedHeader => {
                Status::new(Code::Unauthenticated, self.to_string())
            }
            AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                Status::new(Code::Unauthenticated, "Invalid or expired access token")
            }
            AuthError::PermissionDenied { .. } => {
                Status::new(Code::PermissionDenied, "No permission to access this RPC")
            }
            AuthError::UnknownRole(_) | AuthError::InvalidPolicy(_) => {
                Status::new(Code::InvalidArgument, self.to_string())
            }
            AuthError::Signing(_) => Status::new(Code::Internal, "Cannot generate access token"),
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.to_status().code(), Code::Unauthenticated);
        assert_eq!(AuthError::TokenExpired.to_status().code(), Code::Unauthenticated);
        assert_eq!(
            AuthError::PermissionDenied {
                role: Role::User,
                method: "/svc/Method".to_string(),
            }
            .to_status()
            .code(),
            Code::PermissionDenied
        );
        assert_eq!(
            AuthError::Signing("boom".to_string()).to_status().code(),
            Code::Internal
        );
    }

    #[test]
    fn test_invalid_token_does_not_leak_detail() {
        let status = AuthError::InvalidToken("InvalidSignature".to_string()).to_status();
        assert!(!status.message().contains("InvalidSignature"));
    }
}
